//! Praesenz – Wer ist in welchem Sprachkanal?
//!
//! Haelt die vom Connector gemeldete Sprachkanal-Belegung und die
//! Kanalnamen. Aus jeder Statusmeldung wird durch Vergleich mit dem
//! bisherigen Kanal hoechstens ein [`VoiceEvent`] abgeleitet.

use dashmap::DashMap;
use pomodoro_core::{ChannelId, MemberId, VoiceEvent};
use std::sync::Arc;

/// Sprachkanal-Belegung und Kanalnamen
///
/// Clone teilt den inneren Zustand.
#[derive(Clone, Default)]
pub struct Praesenz {
    inner: Arc<PraesenzInner>,
}

#[derive(Default)]
struct PraesenzInner {
    /// Mitglied -> aktueller Sprachkanal
    belegung: DashMap<MemberId, ChannelId>,
    /// Sprachkanal -> Anzeigename
    namen: DashMap<ChannelId, String>,
}

impl Praesenz {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Uebernimmt eine Statusmeldung und liefert das abgeleitete Ereignis
    pub fn sprachstatus_setzen(
        &self,
        mitglied: MemberId,
        kanal: Option<ChannelId>,
    ) -> Option<VoiceEvent> {
        let alt = match kanal {
            Some(k) => self.inner.belegung.insert(mitglied, k),
            None => self.inner.belegung.remove(&mitglied).map(|(_, k)| k),
        };
        VoiceEvent::aus_zustandswechsel(mitglied, alt, kanal)
    }

    /// Mitglieder eines Sprachkanals (sortiert)
    pub fn mitglieder_von(&self, kanal: ChannelId) -> Vec<MemberId> {
        let mut mitglieder: Vec<_> = self
            .inner
            .belegung
            .iter()
            .filter(|e| *e.value() == kanal)
            .map(|e| *e.key())
            .collect();
        mitglieder.sort();
        mitglieder
    }

    pub fn sprachkanal_von(&self, mitglied: MemberId) -> Option<ChannelId> {
        self.inner.belegung.get(&mitglied).map(|k| *k)
    }

    pub fn kanal_name_setzen(&self, kanal: ChannelId, name: String) {
        self.inner.namen.insert(kanal, name);
    }

    pub fn kanal_name(&self, kanal: ChannelId) -> Option<String> {
        self.inner.namen.get(&kanal).map(|n| n.clone())
    }
}
