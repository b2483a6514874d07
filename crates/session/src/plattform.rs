//! Plattform-Schnittstelle
//!
//! Alles was der Session-Kern von der Chat-Plattform braucht: Nachrichten
//! senden und bearbeiten, Mitglieder stummschalten, Sprachkanal-Belegung
//! abfragen. Alle Aufrufe sind fehlbar; der Kern loggt Fehler und faehrt
//! fort, er propagiert sie nie aus einem Handler heraus.

use async_trait::async_trait;
use pomodoro_core::{ChannelId, MemberId, MessageHandle, Result, TextChannelId};
use pomodoro_protocol::NachrichtInhalt;

/// Externe Chat-Plattform (z.B. ueber die Gateway-Bruecke angebunden)
#[async_trait]
pub trait Plattform: Send + Sync + 'static {
    /// Sendet eine Nachricht und liefert einen Handle fuer spaetere Bearbeitung
    async fn nachricht_senden(
        &self,
        text_kanal: TextChannelId,
        inhalt: NachrichtInhalt,
    ) -> Result<MessageHandle>;

    /// Bearbeitet eine zuvor gesendete Nachricht in-place
    async fn nachricht_bearbeiten(&self, handle: &MessageHandle, inhalt: NachrichtInhalt)
        -> Result<()>;

    /// Setzt die serverseitige Stummschaltung eines Mitglieds
    async fn stumm_setzen(&self, mitglied: MemberId, stumm: bool) -> Result<()>;

    /// Aktuelle Mitglieder eines Sprachkanals
    async fn mitglieder_von(&self, kanal: ChannelId) -> Result<Vec<MemberId>>;

    /// Sprachkanal in dem sich ein Mitglied gerade befindet (None = keiner)
    async fn sprachkanal_von(&self, mitglied: MemberId) -> Result<Option<ChannelId>>;

    /// Anzeigename eines Sprachkanals
    async fn kanal_name(&self, kanal: ChannelId) -> Result<String>;
}
