//! Zeitquelle
//!
//! Die Restzeit-Berechnung einer Session basiert auf Wanduhr-Zeitstempeln
//! (`DateTime<Utc>`). Die Quelle ist austauschbar, damit Tests mit der
//! virtuellen tokio-Uhr (`start_paused`) deterministisch laufen.

use chrono::{DateTime, TimeDelta, Utc};

/// Liefert den aktuellen Zeitpunkt
pub trait Zeitquelle: Send + Sync + 'static {
    fn jetzt(&self) -> DateTime<Utc>;
}

/// Systemuhr (Produktion)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemZeit;

impl Zeitquelle for SystemZeit {
    fn jetzt(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Wanduhr, die der tokio-Uhr folgt
///
/// Bei `#[tokio::test(start_paused = true)]` rueckt diese Uhr genau so weit
/// vor wie `tokio::time::sleep` es tut. Damit stimmen geplante Timer und
/// berechnete Restzeiten ueberein.
#[derive(Debug, Clone, Copy)]
pub struct TokioZeit {
    basis_wand: DateTime<Utc>,
    basis: tokio::time::Instant,
}

impl TokioZeit {
    pub fn neu() -> Self {
        Self {
            basis_wand: Utc::now(),
            basis: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioZeit {
    fn default() -> Self {
        Self::neu()
    }
}

impl Zeitquelle for TokioZeit {
    fn jetzt(&self) -> DateTime<Utc> {
        let vergangen = tokio::time::Instant::now().duration_since(self.basis);
        self.basis_wand + TimeDelta::from_std(vergangen).unwrap_or(TimeDelta::MAX)
    }
}

/// Wandelt eine vorzeichenbehaftete Dauer in eine `std`-Dauer um.
/// Negative Werte (z.B. bei rueckwaerts laufender Uhr) werden auf Null geklemmt.
pub fn nicht_negativ(dauer: TimeDelta) -> std::time::Duration {
    dauer.to_std().unwrap_or(std::time::Duration::ZERO)
}
