//! Gateway-Protokoll zwischen Bot-Kern und Plattform-Connector
//!
//! Der Connector haelt die eigentliche Verbindung zur Chat-Plattform und
//! uebersetzt deren Ereignisse in [`GatewayEvent`]s. Der Bot antwortet mit
//! [`GatewayCall`]s (Nachrichten senden/bearbeiten, Stummschaltung, Antworten
//! auf Interaktionen).
//!
//! ## Design
//! - JSON-Serialisierung via serde, getaggte Enums
//! - Nachrichten-Handles werden vom Bot vergeben, der Connector bildet sie
//!   auf seine eigenen Nachrichten-IDs ab

use pomodoro_core::{ChannelId, MemberId, MessageHandle, TextChannelId};
use serde::{Deserialize, Serialize};

use crate::anzeige::NachrichtInhalt;

/// Kennung einer Interaktion (Slash-Befehl oder Schaltflaechenklick)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InteractionId(pub String);

impl std::fmt::Display for InteractionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "interaction:{}", self.0)
    }
}

/// Optionen des `/pomodoro`-Befehls (alle optional, Minuten bzw. Anzahl)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BefehlsOptionen {
    pub kanal: Option<ChannelId>,
    pub fokus_minuten: Option<i64>,
    pub pause_minuten: Option<i64>,
    pub zyklen: Option<i64>,
}

// ---------------------------------------------------------------------------
// Connector -> Bot
// ---------------------------------------------------------------------------

/// Ereignisse vom Connector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GatewayEvent {
    /// Connector ist mit der Plattform verbunden
    Bereit { connector_version: String },
    /// Name eines Sprachkanals (fuer die Statusanzeige)
    KanalInfo { kanal: ChannelId, name: String },
    /// Aktueller Sprachkanal eines Mitglieds (None = in keinem)
    SprachStatus {
        mitglied: MemberId,
        kanal: Option<ChannelId>,
    },
    /// `/pomodoro`-Befehl
    Befehl {
        interaktion: InteractionId,
        ausloeser: MemberId,
        text_kanal: TextChannelId,
        #[serde(default)]
        optionen: BefehlsOptionen,
    },
    /// Klick auf eine Schaltflaeche
    Schaltflaeche {
        interaktion: InteractionId,
        mitglied: MemberId,
        kennung: String,
    },
}

// ---------------------------------------------------------------------------
// Bot -> Connector
// ---------------------------------------------------------------------------

/// Aufrufe an den Connector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GatewayCall {
    NachrichtSenden {
        handle: MessageHandle,
        text_kanal: TextChannelId,
        inhalt: NachrichtInhalt,
    },
    NachrichtBearbeiten {
        handle: MessageHandle,
        inhalt: NachrichtInhalt,
    },
    StummSetzen { mitglied: MemberId, stumm: bool },
    /// Antwort auf eine Interaktion (fluechtig = nur fuer den Ausloeser sichtbar)
    Antworten {
        interaktion: InteractionId,
        text: String,
        fluechtig: bool,
    },
}
