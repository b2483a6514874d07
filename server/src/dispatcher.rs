//! Event-Dispatcher – Verteilt Connector-Ereignisse an die Handler
//!
//! Jedes [`GatewayEvent`] wird an genau einen Handler weitergeleitet:
//!
//! | Ereignis        | Handler                                   |
//! |-----------------|-------------------------------------------|
//! | `Bereit`        | nur Logging                               |
//! | `KanalInfo`     | Praesenz (Kanalname)                      |
//! | `SprachStatus`  | Praesenz, danach [`MembershipRouter`]     |
//! | `Befehl`        | [`BefehlsHandler`], Antwort, Session-Start |
//! | `Schaltflaeche` | [`SteuerungsHandler`], Antwort            |
//!
//! Interaktionen werden immer fluechtig beantwortet, auch im Fehlerfall.

use pomodoro_protocol::{GatewayEvent, InteractionId};
use pomodoro_session::{
    BefehlsAnfrage, BefehlsHandler, MembershipRouter, SessionUmgebung, SteuerungsHandler,
    SessionEinstellungen,
};

use crate::bruecke::GatewayBruecke;

#[derive(Clone)]
pub struct Dispatcher {
    bruecke: GatewayBruecke,
    router: MembershipRouter,
    befehle: BefehlsHandler,
    steuerung: SteuerungsHandler,
}

impl Dispatcher {
    pub fn neu(
        bruecke: GatewayBruecke,
        umgebung: SessionUmgebung,
        standard: SessionEinstellungen,
    ) -> Self {
        let registry = umgebung.registry.clone();
        Self {
            bruecke,
            router: MembershipRouter::neu(registry.clone()),
            befehle: BefehlsHandler::neu(umgebung, standard),
            steuerung: SteuerungsHandler::neu(registry),
        }
    }

    /// Verarbeitet ein einzelnes Ereignis vollstaendig
    pub async fn verarbeiten(&self, ereignis: GatewayEvent) {
        match ereignis {
            GatewayEvent::Bereit { connector_version } => {
                tracing::info!(connector_version = %connector_version, "Connector bereit");
            }
            GatewayEvent::KanalInfo { kanal, name } => {
                tracing::debug!(kanal = %kanal, name = %name, "Kanalname aktualisiert");
                self.bruecke.praesenz().kanal_name_setzen(kanal, name);
            }
            GatewayEvent::SprachStatus { mitglied, kanal } => {
                let ereignis = self.bruecke.praesenz().sprachstatus_setzen(mitglied, kanal);
                if let Some(ereignis) = ereignis {
                    self.router.verarbeiten(ereignis).await;
                }
            }
            GatewayEvent::Befehl {
                interaktion,
                ausloeser,
                text_kanal,
                optionen,
            } => {
                let anfrage = BefehlsAnfrage {
                    ausloeser,
                    text_kanal,
                    optionen,
                };
                self.befehl_verarbeiten(interaktion, anfrage).await;
            }
            GatewayEvent::Schaltflaeche {
                interaktion,
                mitglied,
                kennung,
            } => {
                tracing::debug!(mitglied = %mitglied, kennung = %kennung, "Schaltflaeche");
                let text = match self.steuerung.verarbeiten(&kennung).await {
                    Ok(bestaetigung) => bestaetigung.to_string(),
                    Err(e) => {
                        tracing::debug!(kennung = %kennung, fehler = %e, "Steuerung abgelehnt");
                        e.benutzer_meldung()
                    }
                };
                self.antworten(interaktion, text).await;
            }
        }
    }

    async fn befehl_verarbeiten(&self, interaktion: InteractionId, anfrage: BefehlsAnfrage) {
        match self.befehle.ausfuehren(anfrage).await {
            Ok(start) => {
                // Bestaetigung vor der ersten Statusnachricht
                self.antworten(interaktion, start.bestaetigung).await;
                start.session.starten().await;
            }
            Err(e) => {
                if e.ist_validierung() {
                    tracing::debug!(fehler = %e, "Befehl abgelehnt");
                } else {
                    tracing::error!(fehler = %e, "Befehl fehlgeschlagen");
                }
                self.antworten(interaktion, e.benutzer_meldung()).await;
            }
        }
    }

    async fn antworten(&self, interaktion: InteractionId, text: String) {
        if let Err(e) = self.bruecke.antworten(interaktion, text, true).await {
            tracing::warn!(fehler = %e, "Antwort auf Interaktion fehlgeschlagen");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::praesenz::Praesenz;
    use pomodoro_core::{ChannelId, MemberId, TextChannelId, TokioZeit};
    use pomodoro_protocol::{BefehlsOptionen, GatewayCall};
    use pomodoro_session::SessionRegistry;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    const KANAL: ChannelId = ChannelId(10);

    struct Aufbau {
        dispatcher: Dispatcher,
        registry: SessionRegistry,
        rx: mpsc::Receiver<GatewayCall>,
    }

    fn aufbau() -> Aufbau {
        let bruecke = GatewayBruecke::neu(Praesenz::neu());
        let (tx, rx) = mpsc::channel(256);
        bruecke.verbinden(tx);
        let registry = SessionRegistry::neu();
        let umgebung = SessionUmgebung {
            plattform: Arc::new(bruecke.clone()),
            zeit: Arc::new(TokioZeit::neu()),
            registry: registry.clone(),
            aktualisierungs_intervall: Duration::ZERO,
        };
        Aufbau {
            dispatcher: Dispatcher::neu(bruecke, umgebung, SessionEinstellungen::default()),
            registry,
            rx,
        }
    }

    fn alle_aufrufe(rx: &mut mpsc::Receiver<GatewayCall>) -> Vec<GatewayCall> {
        let mut aufrufe = Vec::new();
        while let Ok(call) = rx.try_recv() {
            aufrufe.push(call);
        }
        aufrufe
    }

    fn befehl(ausloeser: u64) -> GatewayEvent {
        GatewayEvent::Befehl {
            interaktion: InteractionId("i1".into()),
            ausloeser: MemberId(ausloeser),
            text_kanal: TextChannelId(5),
            optionen: BefehlsOptionen::default(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn befehl_startet_session_und_schaltet_stumm() {
        let mut a = aufbau();
        a.dispatcher
            .verarbeiten(GatewayEvent::KanalInfo {
                kanal: KANAL,
                name: "Lernraum".into(),
            })
            .await;
        a.dispatcher
            .verarbeiten(GatewayEvent::SprachStatus {
                mitglied: MemberId(1),
                kanal: Some(KANAL),
            })
            .await;
        a.dispatcher.verarbeiten(befehl(1)).await;

        assert!(a.registry.ist_aktiv(KANAL));
        let aufrufe = alle_aufrufe(&mut a.rx);
        assert!(matches!(
            &aufrufe[0],
            GatewayCall::Antworten { text, fluechtig: true, .. } if text.contains("Lernraum")
        ));
        assert!(aufrufe.iter().any(|c| matches!(c, GatewayCall::NachrichtSenden { .. })));
        assert!(aufrufe.contains(&GatewayCall::StummSetzen {
            mitglied: MemberId(1),
            stumm: true,
        }));

        a.registry.alle_stoppen().await;
    }

    #[tokio::test(start_paused = true)]
    async fn befehl_ohne_sprachkanal_wird_abgelehnt() {
        let mut a = aufbau();
        a.dispatcher.verarbeiten(befehl(1)).await;

        assert_eq!(a.registry.anzahl(), 0);
        assert_eq!(
            alle_aufrufe(&mut a.rx),
            vec![GatewayCall::Antworten {
                interaktion: InteractionId("i1".into()),
                text: pomodoro_core::PomodoroError::KeinZielkanal.benutzer_meldung(),
                fluechtig: true,
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn beitritt_waehrend_fokus_wird_stummgeschaltet() {
        let mut a = aufbau();
        a.dispatcher
            .verarbeiten(GatewayEvent::SprachStatus {
                mitglied: MemberId(1),
                kanal: Some(KANAL),
            })
            .await;
        a.dispatcher.verarbeiten(befehl(1)).await;
        alle_aufrufe(&mut a.rx);

        a.dispatcher
            .verarbeiten(GatewayEvent::SprachStatus {
                mitglied: MemberId(2),
                kanal: Some(KANAL),
            })
            .await;
        assert_eq!(
            alle_aufrufe(&mut a.rx),
            vec![GatewayCall::StummSetzen {
                mitglied: MemberId(2),
                stumm: true,
            }]
        );

        // Verlassen gibt frei
        a.dispatcher
            .verarbeiten(GatewayEvent::SprachStatus {
                mitglied: MemberId(2),
                kanal: None,
            })
            .await;
        assert_eq!(
            alle_aufrufe(&mut a.rx),
            vec![GatewayCall::StummSetzen {
                mitglied: MemberId(2),
                stumm: false,
            }]
        );

        a.registry.alle_stoppen().await;
    }

    #[tokio::test(start_paused = true)]
    async fn schaltflaeche_pausiert_session() {
        let mut a = aufbau();
        a.dispatcher
            .verarbeiten(GatewayEvent::SprachStatus {
                mitglied: MemberId(1),
                kanal: Some(KANAL),
            })
            .await;
        a.dispatcher.verarbeiten(befehl(1)).await;
        alle_aufrufe(&mut a.rx);

        let klick = |kennung: &str| GatewayEvent::Schaltflaeche {
            interaktion: InteractionId("i2".into()),
            mitglied: MemberId(1),
            kennung: kennung.into(),
        };
        a.dispatcher.verarbeiten(klick("pomodoro:pause:10")).await;

        let session = a.registry.suchen(KANAL).unwrap();
        assert_eq!(session.lebenszyklus().await, pomodoro_session::Lebenszyklus::Pausiert);
        assert!(alle_aufrufe(&mut a.rx).iter().any(|c| matches!(
            c,
            GatewayCall::Antworten { fluechtig: true, .. }
        )));

        // Unbekannte Kennung wird beantwortet, aendert nichts
        a.dispatcher.verarbeiten(klick("pomodoro:explode:10")).await;
        assert_eq!(session.lebenszyklus().await, pomodoro_session::Lebenszyklus::Pausiert);

        a.registry.alle_stoppen().await;
    }
}
