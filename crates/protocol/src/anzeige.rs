//! Darstellbare Nachrichteninhalte
//!
//! Der Status-Presenter erzeugt diese Strukturen, der Gateway-Connector
//! rendert sie als Embed mit Schaltflaechen. Die Typen enthalten keine
//! plattformspezifischen Details.

use serde::{Deserialize, Serialize};

use crate::steuerung::ControlRef;

/// Farbe des Status-Embeds waehrend der Fokusphase
pub const FARBE_FOKUS: u32 = 0xff6b6b;
/// Farbe des Status-Embeds waehrend der Pause (und beim Abschluss)
pub const FARBE_PAUSE: u32 = 0x00ff00;

/// Inhalt einer ausgehenden Nachricht
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NachrichtInhalt {
    /// Reiner Text (Phasenwechsel-Hinweise)
    Text { text: String },
    /// Status-Embed mit Steuerelementen
    Status(StatusView),
    /// Abschluss-Embed nach dem letzten Zyklus
    Abschluss(AbschlussView),
}

impl NachrichtInhalt {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// Stil einer Schaltflaeche
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchaltflaechenStil {
    Primaer,
    Gefahr,
}

/// Eine Schaltflaeche unter dem Status-Embed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Steuerelement {
    /// Kennung im Format `pomodoro:<aktion>:<kanal>`
    pub kennung: String,
    pub referenz: ControlRef,
    pub beschriftung: String,
    pub emoji: String,
    pub stil: SchaltflaechenStil,
}

/// Ein Feld im Status-Embed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feld {
    pub name: String,
    pub wert: String,
    pub inline: bool,
}

/// Momentaufnahme des Session-Status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusView {
    /// z.B. "🍅 Pomodoro-Timer"
    pub titel: String,
    /// z.B. "**Fokuszeit** - Zyklus 1/4"
    pub beschreibung: String,
    pub phase: String,
    pub emoji: String,
    pub farbe: u32,
    pub zyklus: String,
    pub restzeit: String,
    pub zustand: String,
    pub kanal_name: String,
    pub einstellungen: String,
    pub felder: Vec<Feld>,
    pub steuerelemente: Vec<Steuerelement>,
}

/// Abschluss-Embed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbschlussView {
    pub titel: String,
    pub beschreibung: String,
    pub farbe: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_inhalt_ist_getaggt() {
        let json = serde_json::to_string(&NachrichtInhalt::text("hallo")).unwrap();
        assert_eq!(json, r#"{"type":"text","text":"hallo"}"#);
    }

    #[test]
    fn abschluss_inhalt_serialisierung() {
        let inhalt = NachrichtInhalt::Abschluss(AbschlussView {
            titel: "fertig".into(),
            beschreibung: "gut gemacht".into(),
            farbe: FARBE_PAUSE,
        });
        let json = serde_json::to_string(&inhalt).unwrap();
        assert!(json.contains("\"type\":\"abschluss\""));
        assert!(json.contains("\"farbe\":65280"));
    }
}
