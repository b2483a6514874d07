//! pomodoro-session – Session-Lebenszyklus des Pomodoro-Bots
//!
//! - [`session`]: Zustandsmaschine einer Session (Fokus/Pause, Pausieren, Stoppen)
//! - [`stummschaltung`]: verfolgt welche Mitglieder die Session stummgeschaltet hat
//! - [`registry`]: hoechstens eine Session pro Sprachkanal
//! - [`router`]: leitet Sprachkanal-Ereignisse an die zustaendige Session
//! - [`status`]: Status-Embed aus einer Momentaufnahme
//! - [`steuerung`] und [`befehl`]: Schaltflaechen und `/pomodoro`-Befehl
//!
//! Die Chat-Plattform wird ueber das [`Plattform`]-Trait angesprochen.

pub mod befehl;
pub mod einstellungen;
pub mod plattform;
pub mod registry;
pub mod router;
pub mod session;
pub mod status;
pub mod steuerung;
pub mod stummschaltung;

#[cfg(test)]
mod testutil;

pub use befehl::{BefehlsAnfrage, BefehlsHandler, SessionStart};
pub use einstellungen::SessionEinstellungen;
pub use plattform::Plattform;
pub use registry::{SessionEreignis, SessionRegistry};
pub use router::MembershipRouter;
pub use session::{
    Lebenszyklus, Phase, PomodoroSession, SessionAnsicht, SessionKontext, SessionUmgebung,
    STANDARD_AKTUALISIERUNGS_INTERVALL,
};
pub use steuerung::SteuerungsHandler;
pub use stummschaltung::MuteKoordinator;
