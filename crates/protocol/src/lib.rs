//! pomodoro-protocol – Gateway-Protokoll-Definitionen
//!
//! Dieses Crate definiert alle Nachrichtentypen die zwischen Bot-Kern und
//! Plattform-Connector ausgetauscht werden, die darstellbaren Inhalte
//! (Status-Embed, Schaltflaechen) und den Frame-Codec.

pub mod anzeige;
pub mod gateway;
pub mod steuerung;
pub mod wire;

pub use anzeige::{AbschlussView, NachrichtInhalt, StatusView, Steuerelement};
pub use gateway::{BefehlsOptionen, GatewayCall, GatewayEvent, InteractionId};
pub use steuerung::{ControlAction, ControlRef};
pub use wire::{BotCodec, ConnectorCodec, FrameCodec};
