//! Session-Einstellungen
//!
//! Fokus-/Pausendauer und Zyklenanzahl, bei Session-Erstellung fixiert.
//! Befehlsoptionen werden gegen feste Grenzen validiert, fehlende Optionen
//! fallen auf die konfigurierten Standardwerte zurueck.

use pomodoro_core::{PomodoroError, Result};
use pomodoro_protocol::BefehlsOptionen;
use std::ops::RangeInclusive;
use std::time::Duration;

/// Erlaubte Fokuszeit in Minuten
pub const FOKUS_MINUTEN: RangeInclusive<i64> = 1..=120;
/// Erlaubte Pausenzeit in Minuten
pub const PAUSE_MINUTEN: RangeInclusive<i64> = 1..=60;
/// Erlaubte Zyklenanzahl
pub const ZYKLEN: RangeInclusive<i64> = 1..=10;

pub const STANDARD_FOKUS_MINUTEN: u64 = 25;
pub const STANDARD_PAUSE_MINUTEN: u64 = 5;
pub const STANDARD_ZYKLEN: u32 = 4;

/// Konfiguration einer Session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEinstellungen {
    pub fokus: Duration,
    pub pause: Duration,
    pub zyklen: u32,
}

impl Default for SessionEinstellungen {
    fn default() -> Self {
        Self {
            fokus: Duration::from_secs(STANDARD_FOKUS_MINUTEN * 60),
            pause: Duration::from_secs(STANDARD_PAUSE_MINUTEN * 60),
            zyklen: STANDARD_ZYKLEN,
        }
    }
}

impl SessionEinstellungen {
    /// Erstellt Einstellungen; alle Werte muessen positiv sein
    pub fn neu(fokus: Duration, pause: Duration, zyklen: u32) -> Result<Self> {
        if fokus.is_zero() || pause.is_zero() || zyklen == 0 {
            return Err(PomodoroError::eingabe(
                "Dauern und Zyklenanzahl muessen positiv sein",
            ));
        }
        Ok(Self {
            fokus,
            pause,
            zyklen,
        })
    }

    /// Uebernimmt die Befehlsoptionen, fehlende Werte aus `standard`
    pub fn aus_optionen(optionen: &BefehlsOptionen, standard: &Self) -> Result<Self> {
        let fokus = match optionen.fokus_minuten {
            Some(m) => minuten(pruefen("focus_time", m, &FOKUS_MINUTEN)?),
            None => standard.fokus,
        };
        let pause = match optionen.pause_minuten {
            Some(m) => minuten(pruefen("break_time", m, &PAUSE_MINUTEN)?),
            None => standard.pause,
        };
        let zyklen = match optionen.zyklen {
            Some(z) => pruefen("cycles", z, &ZYKLEN)? as u32,
            None => standard.zyklen,
        };
        Self::neu(fokus, pause, zyklen)
    }

    /// Fokuszeit in ganzen Minuten (gerundet)
    pub fn fokus_minuten(&self) -> u64 {
        gerundete_minuten(self.fokus)
    }

    /// Pausenzeit in ganzen Minuten (gerundet)
    pub fn pause_minuten(&self) -> u64 {
        gerundete_minuten(self.pause)
    }
}

fn pruefen(name: &str, wert: i64, bereich: &RangeInclusive<i64>) -> Result<u64> {
    if bereich.contains(&wert) {
        Ok(wert as u64)
    } else {
        Err(PomodoroError::eingabe(format!(
            "{name} muss zwischen {} und {} liegen (erhalten: {wert})",
            bereich.start(),
            bereich.end()
        )))
    }
}

fn minuten(m: u64) -> Duration {
    Duration::from_secs(m * 60)
}

/// Rundet auf ganze Minuten
pub fn gerundete_minuten(dauer: Duration) -> u64 {
    (dauer.as_secs() + 30) / 60
}
