//! Steuerungs-Handler fuer Schaltflaechen
//!
//! Die Kennung wird hier einmal in eine [`ControlRef`] geparst und an die
//! Session des Kanals weitergeleitet. Ergebnis ist eine fluechtige
//! Bestaetigung fuer den klickenden Benutzer.

use pomodoro_core::{PomodoroError, Result};
use pomodoro_protocol::steuerung::KennungUngueltig;
use pomodoro_protocol::{ControlAction, ControlRef};

use crate::registry::SessionRegistry;

pub const BESTAETIGUNG_PAUSIERT: &str = "⏸️ Timer pausiert.";
pub const BESTAETIGUNG_FORTGESETZT: &str = "▶️ Timer fortgesetzt.";
pub const BESTAETIGUNG_GESTOPPT: &str = "⏹️ Session gestoppt.";

#[derive(Clone)]
pub struct SteuerungsHandler {
    registry: SessionRegistry,
}

impl SteuerungsHandler {
    pub fn neu(registry: SessionRegistry) -> Self {
        Self { registry }
    }

    /// Verarbeitet eine rohe Schaltflaechen-Kennung
    pub async fn verarbeiten(&self, kennung: &str) -> Result<&'static str> {
        let referenz = kennung
            .parse::<ControlRef>()
            .map_err(|KennungUngueltig(k)| PomodoroError::UngueltigeSteuerung(k))?;
        self.ausfuehren(referenz).await
    }

    /// Fuehrt eine bereits geparste Steuerungsaktion aus
    pub async fn ausfuehren(&self, referenz: ControlRef) -> Result<&'static str> {
        let session = self
            .registry
            .suchen(referenz.kanal)
            .ok_or(PomodoroError::SessionNichtGefunden(referenz.kanal))?;

        match referenz.aktion {
            ControlAction::Pausieren => {
                if !session.pausieren().await {
                    return Err(PomodoroError::AktionNichtMoeglich(
                        "Timer ist bereits pausiert.".into(),
                    ));
                }
                session.status_aktualisieren().await;
                Ok(BESTAETIGUNG_PAUSIERT)
            }
            ControlAction::Fortsetzen => {
                if !session.fortsetzen().await {
                    return Err(PomodoroError::AktionNichtMoeglich(
                        "Timer laeuft bereits.".into(),
                    ));
                }
                session.status_aktualisieren().await;
                Ok(BESTAETIGUNG_FORTGESETZT)
            }
            ControlAction::Stoppen => {
                if !session.stoppen().await {
                    return Err(PomodoroError::SessionNichtGefunden(referenz.kanal));
                }
                Ok(BESTAETIGUNG_GESTOPPT)
            }
        }
    }
}
