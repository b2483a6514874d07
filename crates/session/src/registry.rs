//! Session-Registry – Aktive Sessions pro Sprachkanal
//!
//! Hoechstens eine Session pro Sprachkanal. Die Registry wird beim
//! Prozessstart erzeugt und an Befehls-, Steuerungs- und Ereignis-Handler
//! weitergereicht. Abonnenten erfahren ueber [`SessionEreignis`] von
//! Start, Phasenwechsel und Ende einer Session.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use pomodoro_core::{ChannelId, PomodoroError, Result};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::session::{Lebenszyklus, Phase, PomodoroSession};

// ---------------------------------------------------------------------------
// Session-Ereignisse
// ---------------------------------------------------------------------------

/// Ereignisse die die Registry versendet
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEreignis {
    /// Session wurde registriert
    Gestartet { kanal: ChannelId },
    /// Session hat die Phase gewechselt
    PhaseGewechselt {
        kanal: ChannelId,
        phase: Phase,
        zyklus: u32,
    },
    /// Session ist abgeschlossen oder gestoppt
    Beendet {
        kanal: ChannelId,
        lebenszyklus: Lebenszyklus,
    },
}

/// Groesse des Broadcast-Kanals fuer Session-Ereignisse
const EREIGNIS_KANAL_GROESSE: usize = 256;

// ---------------------------------------------------------------------------
// SessionRegistry
// ---------------------------------------------------------------------------

/// Prozessweite Zuordnung Sprachkanal -> aktive Session
///
/// Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<RegistryInner>,
}

struct RegistryInner {
    sessions: DashMap<ChannelId, Arc<PomodoroSession>>,
    ereignis_tx: broadcast::Sender<SessionEreignis>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::neu()
    }
}

impl SessionRegistry {
    pub fn neu() -> Self {
        let (ereignis_tx, _) = broadcast::channel(EREIGNIS_KANAL_GROESSE);
        Self {
            inner: Arc::new(RegistryInner {
                sessions: DashMap::new(),
                ereignis_tx,
            }),
        }
    }

    /// Registriert eine Session; schlaegt fehl wenn der Kanal bereits belegt ist
    pub fn registrieren(&self, session: Arc<PomodoroSession>) -> Result<()> {
        let kanal = session.kanal();
        match self.inner.sessions.entry(kanal) {
            Entry::Occupied(_) => return Err(PomodoroError::BereitsAktiv(kanal)),
            Entry::Vacant(frei) => {
                frei.insert(session);
            }
        }

        tracing::debug!(kanal = %kanal, "Session registriert");
        self.ereignis_senden(SessionEreignis::Gestartet { kanal });
        Ok(())
    }

    /// Sucht die Session eines Sprachkanals
    pub fn suchen(&self, kanal: ChannelId) -> Option<Arc<PomodoroSession>> {
        self.inner.sessions.get(&kanal).map(|e| Arc::clone(e.value()))
    }

    /// Entfernt die Session eines Kanals (idempotent)
    pub fn abmelden(&self, kanal: ChannelId) -> Option<Arc<PomodoroSession>> {
        self.inner.sessions.remove(&kanal).map(|(_, s)| s)
    }

    /// Entfernt den Eintrag nur wenn er noch auf `session` zeigt
    pub(crate) fn abmelden_wenn(&self, kanal: ChannelId, session: &PomodoroSession) {
        let entfernt = self
            .inner
            .sessions
            .remove_if(&kanal, |_, s| std::ptr::eq(Arc::as_ptr(s), session));
        if entfernt.is_some() {
            tracing::debug!(kanal = %kanal, "Session abgemeldet");
        }
    }

    pub fn ist_aktiv(&self, kanal: ChannelId) -> bool {
        self.inner.sessions.contains_key(&kanal)
    }

    /// Anzahl aktiver Sessions
    pub fn anzahl(&self) -> usize {
        self.inner.sessions.len()
    }

    /// Kanaele mit aktiver Session
    pub fn kanaele(&self) -> Vec<ChannelId> {
        self.inner.sessions.iter().map(|e| *e.key()).collect()
    }

    /// Stoppt alle aktiven Sessions (Herunterfahren)
    ///
    /// Gibt die Anzahl gestoppter Sessions zurueck.
    pub async fn alle_stoppen(&self) -> usize {
        // Erst sammeln, keine DashMap-Referenz ueber await halten
        let sessions: Vec<_> = self
            .inner
            .sessions
            .iter()
            .map(|e| Arc::clone(e.value()))
            .collect();

        let mut gestoppt = 0;
        for session in sessions {
            if session.stoppen().await {
                gestoppt += 1;
            }
        }
        tracing::info!(gestoppt, "Alle Sessions gestoppt");
        gestoppt
    }

    /// Abonniert Session-Ereignisse
    pub fn ereignisse_abonnieren(&self) -> broadcast::Receiver<SessionEreignis> {
        self.inner.ereignis_tx.subscribe()
    }

    pub(crate) fn ereignis_senden(&self, ereignis: SessionEreignis) {
        let _ = self.inner.ereignis_tx.send(ereignis);
    }
}
