//! Fehlertypen fuer den Pomodoro-Bot
//!
//! Zentraler Fehler-Enum fuer Validierung, Registry-Konflikte und
//! Plattform-Aufrufe. Validierungsfehler werden dem Ausloeser als
//! fluechtige Meldung angezeigt (siehe [`PomodoroError::benutzer_meldung`]).

use crate::types::ChannelId;
use thiserror::Error;

/// Globaler Result-Alias
pub type Result<T> = std::result::Result<T, PomodoroError>;

/// Alle moeglichen Fehler im Pomodoro-System
#[derive(Debug, Error)]
pub enum PomodoroError {
    // --- Registry ---
    #[error("Session fuer {0} ist bereits aktiv")]
    BereitsAktiv(ChannelId),

    #[error("Keine Session fuer {0} gefunden")]
    SessionNichtGefunden(ChannelId),

    // --- Befehls-Validierung ---
    #[error("Kein Ziel-Sprachkanal angegeben und Ausloeser ist in keinem Sprachkanal")]
    KeinZielkanal,

    #[error("Sprachkanal {0} hat keine Mitglieder")]
    LeererKanal(ChannelId),

    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    #[error("Ungueltige Steuerungs-Referenz: {0}")]
    UngueltigeSteuerung(String),

    #[error("Aktion nicht moeglich: {0}")]
    AktionNichtMoeglich(String),

    // --- Plattform ---
    #[error("Plattform-Aufruf fehlgeschlagen: {0}")]
    PlattformAufruf(String),

    // --- Konfiguration ---
    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl PomodoroError {
    /// Erstellt einen Plattform-Fehler aus einer beliebigen Nachricht
    pub fn plattform(msg: impl Into<String>) -> Self {
        Self::PlattformAufruf(msg.into())
    }

    /// Erstellt einen Eingabefehler
    pub fn eingabe(msg: impl Into<String>) -> Self {
        Self::UngueltigeEingabe(msg.into())
    }

    /// Gibt true zurueck wenn der Fehler aus der Validierung einer
    /// Benutzeraktion stammt (keine Zustandsaenderung erfolgt)
    pub fn ist_validierung(&self) -> bool {
        matches!(
            self,
            Self::BereitsAktiv(_)
                | Self::SessionNichtGefunden(_)
                | Self::KeinZielkanal
                | Self::LeererKanal(_)
                | Self::UngueltigeEingabe(_)
                | Self::UngueltigeSteuerung(_)
                | Self::AktionNichtMoeglich(_)
        )
    }

    /// Fluechtige Meldung fuer den ausloesenden Benutzer
    pub fn benutzer_meldung(&self) -> String {
        match self {
            Self::BereitsAktiv(_) => {
                "❌ In diesem Sprachkanal laeuft bereits eine Pomodoro-Session.".into()
            }
            Self::SessionNichtGefunden(_) => "❌ Session nicht gefunden.".into(),
            Self::KeinZielkanal => {
                "❌ Tritt zuerst einem Sprachkanal bei oder gib einen Kanal an.".into()
            }
            Self::LeererKanal(_) => "❌ Im angegebenen Sprachkanal ist niemand.".into(),
            Self::UngueltigeEingabe(grund) => format!("❌ Ungueltige Eingabe: {grund}"),
            Self::UngueltigeSteuerung(_) => "❌ Unbekannte Aktion.".into(),
            Self::AktionNichtMoeglich(grund) => format!("❌ {grund}"),
            Self::PlattformAufruf(_) | Self::Konfiguration(_) | Self::Anyhow(_) => {
                "❌ Es ist ein Fehler aufgetreten. Bitte erneut versuchen.".into()
            }
        }
    }
}
