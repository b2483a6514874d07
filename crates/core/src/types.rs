//! Gemeinsame Identifikationstypen fuer den Pomodoro-Bot
//!
//! Alle IDs verwenden das Newtype-Pattern um Verwechslungen zwischen
//! Sprachkanal, Textkanal und Mitglied zur Compilezeit auszuschliessen.
//! Die Plattform vergibt 64-Bit-Snowflakes, die Typen kapseln diese nur.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// ID eines Sprachkanals (Schluessel der Session-Registry)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChannelId(pub u64);

impl ChannelId {
    /// Gibt den inneren Snowflake zurueck
    pub fn inner(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "channel:{}", self.0)
    }
}

impl FromStr for ChannelId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self)
    }
}

/// ID eines Textkanals (Ziel fuer Status- und Phasennachrichten)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextChannelId(pub u64);

impl TextChannelId {
    /// Gibt den inneren Snowflake zurueck
    pub fn inner(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TextChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "text:{}", self.0)
    }
}

/// ID eines Server-Mitglieds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberId(pub u64);

impl MemberId {
    /// Gibt den inneren Snowflake zurueck
    pub fn inner(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "member:{}", self.0)
    }
}

/// Opaker Verweis auf eine gesendete Nachricht (fuer spaetere Bearbeitung)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageHandle(pub String);

impl MessageHandle {
    pub fn neu(wert: impl Into<String>) -> Self {
        Self(wert.into())
    }
}

impl std::fmt::Display for MessageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "message:{}", self.0)
    }
}
