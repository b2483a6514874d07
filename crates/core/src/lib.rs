//! pomodoro-core – Gemeinsame Typen, Ereignisse und Fehlertypen
//!
//! Dieses Crate stellt die fundamentalen Bausteine bereit, die von allen
//! anderen Pomodoro-Crates gemeinsam genutzt werden.

pub mod error;
pub mod event;
pub mod types;
pub mod zeit;

// Re-Exporte fuer bequemen Zugriff
pub use error::{PomodoroError, Result};
pub use event::VoiceEvent;
pub use types::{ChannelId, MemberId, MessageHandle, TextChannelId};
pub use zeit::{SystemZeit, TokioZeit, Zeitquelle};
