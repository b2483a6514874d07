//! Aufzeichnende In-Memory-Plattform fuer Unit-Tests

use async_trait::async_trait;
use parking_lot::Mutex;
use pomodoro_core::{
    ChannelId, MemberId, MessageHandle, PomodoroError, Result, TextChannelId, TokioZeit,
};
use pomodoro_protocol::NachrichtInhalt;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use crate::einstellungen::SessionEinstellungen;
use crate::plattform::Plattform;
use crate::registry::SessionRegistry;
use crate::session::{PomodoroSession, SessionKontext, SessionUmgebung};

/// Ein aufgezeichneter Plattform-Aufruf
#[derive(Debug, Clone, PartialEq)]
pub enum Aufruf {
    Gesendet(MessageHandle, NachrichtInhalt),
    Bearbeitet(MessageHandle, NachrichtInhalt),
    Stumm(MemberId, bool),
}

#[derive(Default)]
struct Zustand {
    belegung: BTreeMap<MemberId, ChannelId>,
    aufrufe: Vec<Aufruf>,
    stumm_fehler: HashSet<MemberId>,
    bearbeiten_fehlschlagen: bool,
    naechster_handle: u64,
}

#[derive(Default)]
pub struct TestPlattform {
    zustand: Mutex<Zustand>,
}

impl TestPlattform {
    pub fn neu() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn betreten(&self, mitglied: MemberId, kanal: ChannelId) {
        self.zustand.lock().belegung.insert(mitglied, kanal);
    }

    pub fn verlassen(&self, mitglied: MemberId) {
        self.zustand.lock().belegung.remove(&mitglied);
    }

    /// Stummschaltungs-Aufrufe fuer dieses Mitglied schlagen fehl
    pub fn stumm_fehler_fuer(&self, mitglied: MemberId) {
        self.zustand.lock().stumm_fehler.insert(mitglied);
    }

    pub fn bearbeiten_fehlschlagen(&self) {
        self.zustand.lock().bearbeiten_fehlschlagen = true;
    }

    pub fn aufrufe(&self) -> Vec<Aufruf> {
        self.zustand.lock().aufrufe.clone()
    }

    /// Alle Stummschaltungs-Aufrufe (auch fehlgeschlagene) in Reihenfolge
    pub fn stumm_aufrufe(&self) -> Vec<(MemberId, bool)> {
        self.aufrufe()
            .into_iter()
            .filter_map(|a| match a {
                Aufruf::Stumm(m, s) => Some((m, s)),
                _ => None,
            })
            .collect()
    }

    /// Texte aller gesendeten Text-Nachrichten
    pub fn texte(&self) -> Vec<String> {
        self.aufrufe()
            .into_iter()
            .filter_map(|a| match a {
                Aufruf::Gesendet(_, NachrichtInhalt::Text { text }) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn anzahl_bearbeitet(&self) -> usize {
        self.aufrufe()
            .iter()
            .filter(|a| matches!(a, Aufruf::Bearbeitet(..)))
            .count()
    }

    pub fn abschluss_gesendet(&self) -> bool {
        self.aufrufe()
            .iter()
            .any(|a| matches!(a, Aufruf::Gesendet(_, NachrichtInhalt::Abschluss(_))))
    }

    pub fn aufrufe_leeren(&self) {
        self.zustand.lock().aufrufe.clear();
    }
}

#[async_trait]
impl Plattform for TestPlattform {
    async fn nachricht_senden(
        &self,
        _text_kanal: TextChannelId,
        inhalt: NachrichtInhalt,
    ) -> Result<MessageHandle> {
        let mut z = self.zustand.lock();
        z.naechster_handle += 1;
        let handle = MessageHandle::neu(format!("m{}", z.naechster_handle));
        z.aufrufe.push(Aufruf::Gesendet(handle.clone(), inhalt));
        Ok(handle)
    }

    async fn nachricht_bearbeiten(
        &self,
        handle: &MessageHandle,
        inhalt: NachrichtInhalt,
    ) -> Result<()> {
        let mut z = self.zustand.lock();
        if z.bearbeiten_fehlschlagen {
            return Err(PomodoroError::plattform("Nachricht nicht gefunden"));
        }
        z.aufrufe.push(Aufruf::Bearbeitet(handle.clone(), inhalt));
        Ok(())
    }

    async fn stumm_setzen(&self, mitglied: MemberId, stumm: bool) -> Result<()> {
        let mut z = self.zustand.lock();
        z.aufrufe.push(Aufruf::Stumm(mitglied, stumm));
        if z.stumm_fehler.contains(&mitglied) {
            return Err(PomodoroError::plattform("Missing Permissions"));
        }
        Ok(())
    }

    async fn mitglieder_von(&self, kanal: ChannelId) -> Result<Vec<MemberId>> {
        Ok(self
            .zustand
            .lock()
            .belegung
            .iter()
            .filter(|(_, k)| **k == kanal)
            .map(|(m, _)| *m)
            .collect())
    }

    async fn sprachkanal_von(&self, mitglied: MemberId) -> Result<Option<ChannelId>> {
        Ok(self.zustand.lock().belegung.get(&mitglied).copied())
    }

    async fn kanal_name(&self, kanal: ChannelId) -> Result<String> {
        Ok(format!("Lernraum {}", kanal.inner()))
    }
}

pub const KANAL: ChannelId = ChannelId(1000);
pub const TEXT: TextChannelId = TextChannelId(2000);

pub fn umgebung(plattform: Arc<TestPlattform>, registry: SessionRegistry) -> SessionUmgebung {
    SessionUmgebung {
        plattform,
        zeit: Arc::new(TokioZeit::neu()),
        registry,
        aktualisierungs_intervall: Duration::from_secs(10),
    }
}

pub fn kontext(kanal: ChannelId) -> SessionKontext {
    SessionKontext {
        kanal,
        kanal_name: "Lernraum".into(),
        text_kanal: TEXT,
        ausloeser: MemberId(1),
    }
}

pub fn einstellungen(fokus_min: u64, pause_min: u64, zyklen: u32) -> SessionEinstellungen {
    SessionEinstellungen {
        fokus: Duration::from_secs(fokus_min * 60),
        pause: Duration::from_secs(pause_min * 60),
        zyklen,
    }
}

/// Erstellt und registriert eine Session (noch nicht gestartet)
pub fn session(
    plattform: &Arc<TestPlattform>,
    registry: &SessionRegistry,
    einstellungen: SessionEinstellungen,
) -> Arc<PomodoroSession> {
    let session = PomodoroSession::neu(
        kontext(KANAL),
        einstellungen,
        umgebung(Arc::clone(plattform), registry.clone()),
    );
    registry
        .registrieren(Arc::clone(&session))
        .expect("Registrierung fehlgeschlagen");
    session
}
