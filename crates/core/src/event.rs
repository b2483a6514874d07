//! Sprachkanal-Ereignisse
//!
//! Die Plattform meldet nur "Mitglied X ist jetzt in Kanal Y (oder keinem)".
//! Daraus wird genau ein explizites [`VoiceEvent`] abgeleitet, bevor es den
//! Membership-Router erreicht. Mute-/Deaf-Aenderungen ohne Kanalwechsel
//! erzeugen kein Ereignis.

use crate::types::{ChannelId, MemberId};
use serde::{Deserialize, Serialize};

/// Mitgliedschaftsaenderung in Sprachkanaelen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoiceEvent {
    /// Mitglied ist einem Sprachkanal beigetreten (vorher in keinem)
    Beigetreten {
        mitglied: MemberId,
        kanal: ChannelId,
    },
    /// Mitglied hat den Sprachkanal verlassen (jetzt in keinem)
    Verlassen {
        mitglied: MemberId,
        kanal: ChannelId,
    },
    /// Mitglied wurde zwischen zwei Sprachkanaelen verschoben
    Gewechselt {
        mitglied: MemberId,
        von: ChannelId,
        nach: ChannelId,
    },
}

impl VoiceEvent {
    /// Leitet das Ereignis aus altem und neuem Kanal eines Mitglieds ab
    pub fn aus_zustandswechsel(
        mitglied: MemberId,
        alt: Option<ChannelId>,
        neu: Option<ChannelId>,
    ) -> Option<Self> {
        match (alt, neu) {
            (None, Some(kanal)) => Some(Self::Beigetreten { mitglied, kanal }),
            (Some(kanal), None) => Some(Self::Verlassen { mitglied, kanal }),
            (Some(von), Some(nach)) if von != nach => Some(Self::Gewechselt {
                mitglied,
                von,
                nach,
            }),
            _ => None,
        }
    }

    /// Das betroffene Mitglied
    pub fn mitglied(&self) -> MemberId {
        match self {
            Self::Beigetreten { mitglied, .. }
            | Self::Verlassen { mitglied, .. }
            | Self::Gewechselt { mitglied, .. } => *mitglied,
        }
    }
}
