//! Steuerungs-Referenzen fuer Schaltflaechen
//!
//! Jede Schaltflaeche traegt eine Kennung der Form
//! `pomodoro:<aktion>:<kanal>`. Sie wird genau einmal an der Grenze
//! (beim Empfang eines Klicks) in eine typisierte [`ControlRef`] geparst.

use pomodoro_core::ChannelId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Praefix aller Schaltflaechen-Kennungen
pub const KENNUNG_PRAEFIX: &str = "pomodoro";

/// Aktion einer Schaltflaeche
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlAction {
    Pausieren,
    Fortsetzen,
    Stoppen,
}

impl ControlAction {
    /// Kurzform in der Schaltflaechen-Kennung
    pub fn kuerzel(&self) -> &'static str {
        match self {
            Self::Pausieren => "pause",
            Self::Fortsetzen => "resume",
            Self::Stoppen => "stop",
        }
    }

    fn aus_kuerzel(s: &str) -> Option<Self> {
        match s {
            "pause" => Some(Self::Pausieren),
            "resume" => Some(Self::Fortsetzen),
            "stop" => Some(Self::Stoppen),
            _ => None,
        }
    }
}

/// Typisierte Referenz: welche Aktion fuer welchen Sprachkanal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlRef {
    pub aktion: ControlAction,
    pub kanal: ChannelId,
}

impl ControlRef {
    pub fn neu(aktion: ControlAction, kanal: ChannelId) -> Self {
        Self { aktion, kanal }
    }
}

impl std::fmt::Display for ControlRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{KENNUNG_PRAEFIX}:{}:{}",
            self.aktion.kuerzel(),
            self.kanal.inner()
        )
    }
}

/// Fehler beim Parsen einer Schaltflaechen-Kennung
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("ungueltige Schaltflaechen-Kennung '{0}'")]
pub struct KennungUngueltig(pub String);

impl FromStr for ControlRef {
    type Err = KennungUngueltig;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fehler = || KennungUngueltig(s.to_string());
        let mut teile = s.splitn(3, ':');

        if teile.next() != Some(KENNUNG_PRAEFIX) {
            return Err(fehler());
        }
        let aktion = teile
            .next()
            .and_then(ControlAction::aus_kuerzel)
            .ok_or_else(fehler)?;
        let kanal = teile
            .next()
            .and_then(|k| k.parse::<ChannelId>().ok())
            .ok_or_else(fehler)?;

        Ok(Self { aktion, kanal })
    }
}
