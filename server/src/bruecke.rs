//! Gateway-Bruecke – Plattform-Implementierung ueber den Connector
//!
//! Ausgehende Aufrufe werden als [`GatewayCall`] in die Sende-Queue der
//! aktuell verbundenen Connector-Verbindung gelegt. Abfragen (Mitglieder,
//! Sprachkanal, Kanalname) beantwortet die lokale [`Praesenz`].
//!
//! Ohne verbundenen Connector schlaegt jeder Aufruf mit
//! `PlattformAufruf` fehl.

use async_trait::async_trait;
use parking_lot::Mutex;
use pomodoro_core::{
    ChannelId, MemberId, MessageHandle, PomodoroError, Result, TextChannelId,
};
use pomodoro_observability::PomodoroMetriken;
use pomodoro_protocol::{GatewayCall, InteractionId, NachrichtInhalt};
use pomodoro_session::Plattform;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::praesenz::Praesenz;

/// Verbindung zwischen Session-Kern und Connector
///
/// Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct GatewayBruecke {
    inner: Arc<BrueckeInner>,
}

struct BrueckeInner {
    ausgang: Mutex<Option<mpsc::Sender<GatewayCall>>>,
    praesenz: Praesenz,
}

impl GatewayBruecke {
    pub fn neu(praesenz: Praesenz) -> Self {
        Self {
            inner: Arc::new(BrueckeInner {
                ausgang: Mutex::new(None),
                praesenz,
            }),
        }
    }

    pub fn praesenz(&self) -> &Praesenz {
        &self.inner.praesenz
    }

    /// Haengt eine Connector-Verbindung an
    pub fn verbinden(&self, tx: mpsc::Sender<GatewayCall>) {
        *self.inner.ausgang.lock() = Some(tx);
    }

    /// Loest die Verbindung, sofern `tx` noch die aktuelle ist
    pub fn trennen(&self, tx: &mpsc::Sender<GatewayCall>) {
        let mut ausgang = self.inner.ausgang.lock();
        if ausgang.as_ref().is_some_and(|aktuell| aktuell.same_channel(tx)) {
            *ausgang = None;
        }
    }

    pub fn ist_verbunden(&self) -> bool {
        self.inner
            .ausgang
            .lock()
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }

    /// Beantwortet eine Interaktion
    pub async fn antworten(
        &self,
        interaktion: InteractionId,
        text: impl Into<String>,
        fluechtig: bool,
    ) -> Result<()> {
        self.senden(GatewayCall::Antworten {
            interaktion,
            text: text.into(),
            fluechtig,
        })
        .await
    }

    async fn senden(&self, call: GatewayCall) -> Result<()> {
        // Sender klonen, Lock nicht ueber await halten
        let tx = self
            .inner
            .ausgang
            .lock()
            .clone()
            .ok_or_else(|| PomodoroError::plattform("Kein Connector verbunden"))?;
        tx.send(call)
            .await
            .map_err(|_| PomodoroError::plattform("Connector-Verbindung getrennt"))
    }
}

#[async_trait]
impl Plattform for GatewayBruecke {
    async fn nachricht_senden(
        &self,
        text_kanal: TextChannelId,
        inhalt: NachrichtInhalt,
    ) -> Result<MessageHandle> {
        let handle = MessageHandle::neu(Uuid::new_v4().to_string());
        self.senden(GatewayCall::NachrichtSenden {
            handle: handle.clone(),
            text_kanal,
            inhalt,
        })
        .await?;
        Ok(handle)
    }

    async fn nachricht_bearbeiten(
        &self,
        handle: &MessageHandle,
        inhalt: NachrichtInhalt,
    ) -> Result<()> {
        self.senden(GatewayCall::NachrichtBearbeiten {
            handle: handle.clone(),
            inhalt,
        })
        .await
    }

    async fn stumm_setzen(&self, mitglied: MemberId, stumm: bool) -> Result<()> {
        self.senden(GatewayCall::StummSetzen { mitglied, stumm }).await
    }

    async fn mitglieder_von(&self, kanal: ChannelId) -> Result<Vec<MemberId>> {
        Ok(self.inner.praesenz.mitglieder_von(kanal))
    }

    async fn sprachkanal_von(&self, mitglied: MemberId) -> Result<Option<ChannelId>> {
        Ok(self.inner.praesenz.sprachkanal_von(mitglied))
    }

    async fn kanal_name(&self, kanal: ChannelId) -> Result<String> {
        self.inner
            .praesenz
            .kanal_name(kanal)
            .ok_or_else(|| PomodoroError::plattform(format!("Kanalname fuer {kanal} unbekannt")))
    }
}

// ---------------------------------------------------------------------------
// Gemessene Plattform
// ---------------------------------------------------------------------------

/// Zaehlt fehlgeschlagene Plattform-Aufrufe in den Metriken
pub struct GemessenePlattform<P> {
    innen: P,
    metriken: PomodoroMetriken,
}

impl<P: Plattform> GemessenePlattform<P> {
    pub fn neu(innen: P, metriken: PomodoroMetriken) -> Self {
        Self { innen, metriken }
    }

    fn zaehlen<T>(&self, aufruf: &str, ergebnis: Result<T>) -> Result<T> {
        if ergebnis.is_err() {
            self.metriken
                .platform_errors_total
                .with_label_values(&[aufruf])
                .inc();
        }
        ergebnis
    }
}

#[async_trait]
impl<P: Plattform> Plattform for GemessenePlattform<P> {
    async fn nachricht_senden(
        &self,
        text_kanal: TextChannelId,
        inhalt: NachrichtInhalt,
    ) -> Result<MessageHandle> {
        let r = self.innen.nachricht_senden(text_kanal, inhalt).await;
        self.zaehlen("send_message", r)
    }

    async fn nachricht_bearbeiten(
        &self,
        handle: &MessageHandle,
        inhalt: NachrichtInhalt,
    ) -> Result<()> {
        let r = self.innen.nachricht_bearbeiten(handle, inhalt).await;
        self.zaehlen("edit_message", r)
    }

    async fn stumm_setzen(&self, mitglied: MemberId, stumm: bool) -> Result<()> {
        let r = self.innen.stumm_setzen(mitglied, stumm).await;
        self.zaehlen("set_mute", r)
    }

    async fn mitglieder_von(&self, kanal: ChannelId) -> Result<Vec<MemberId>> {
        let r = self.innen.mitglieder_von(kanal).await;
        self.zaehlen("members_of", r)
    }

    async fn sprachkanal_von(&self, mitglied: MemberId) -> Result<Option<ChannelId>> {
        let r = self.innen.sprachkanal_von(mitglied).await;
        self.zaehlen("voice_channel_of", r)
    }

    async fn kanal_name(&self, kanal: ChannelId) -> Result<String> {
        let r = self.innen.kanal_name(kanal).await;
        self.zaehlen("channel_name", r)
    }
}
