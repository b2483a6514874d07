//! Wire-Format fuer die Gateway-Verbindung
//!
//! Frame-basiertes Protokoll: Length(u32 big-endian) + JSON-Payload.
//!
//! ## Frame-Format
//!
//! ```text
//! +--------+--------+--------+--------+----...----+
//! | Laenge (u32 BE) | 4 Bytes        | Payload    |
//! +--------+--------+--------+--------+----...----+
//! ```
//!
//! Die Laenge gibt die Anzahl der Payload-Bytes an (ohne die 4 Laengen-Bytes).
//! Maximale Frame-Groesse ist konfigurierbar (Standard: 1 MB).

use bytes::{Buf, BufMut, BytesMut};
use serde::{de::DeserializeOwned, Serialize};
use std::io;
use std::marker::PhantomData;
use tokio_util::codec::{Decoder, Encoder};

use crate::gateway::{GatewayCall, GatewayEvent};

/// Standard-maximale Frame-Groesse (1 MB)
pub const DEFAULT_MAX_FRAME_SIZE: usize = 1024 * 1024;

/// Groesse des Laengen-Felds in Bytes
pub const LENGTH_FIELD_SIZE: usize = 4;

/// tokio-util Codec fuer frame-basierte TCP-Verbindungen
///
/// Dekodiert `Ein`, kodiert `Aus`. Die Bot-Seite verwendet
/// [`BotCodec`], ein Connector (oder ein Test) den gespiegelten
/// [`ConnectorCodec`].
#[derive(Debug)]
pub struct FrameCodec<Ein, Aus> {
    /// Maximale erlaubte Frame-Groesse in Bytes
    max_frame_size: usize,
    _typen: PhantomData<fn() -> (Ein, Aus)>,
}

/// Codec der Bot-Seite: liest Ereignisse, schreibt Aufrufe
pub type BotCodec = FrameCodec<GatewayEvent, GatewayCall>;

/// Codec der Connector-Seite: liest Aufrufe, schreibt Ereignisse
pub type ConnectorCodec = FrameCodec<GatewayCall, GatewayEvent>;

impl<Ein, Aus> FrameCodec<Ein, Aus> {
    /// Erstellt einen neuen `FrameCodec` mit Standard-Limits
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_MAX_FRAME_SIZE)
    }

    /// Erstellt einen `FrameCodec` mit benutzerdefinierter maximaler Frame-Groesse
    pub fn with_max_size(max_frame_size: usize) -> Self {
        Self {
            max_frame_size,
            _typen: PhantomData,
        }
    }

    /// Gibt die konfigurierte maximale Frame-Groesse zurueck
    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }
}

impl<Ein, Aus> Default for FrameCodec<Ein, Aus> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ein, Aus> Clone for FrameCodec<Ein, Aus> {
    fn clone(&self) -> Self {
        Self::with_max_size(self.max_frame_size)
    }
}

impl<Ein: DeserializeOwned, Aus> Decoder for FrameCodec<Ein, Aus> {
    type Item = Ein;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // Warte auf mindestens 4 Bytes fuer das Laengen-Feld
        if src.len() < LENGTH_FIELD_SIZE {
            return Ok(None);
        }

        let length = u32::from_be_bytes([src[0], src[1], src[2], src[3]]) as usize;

        if length > self.max_frame_size {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Frame zu gross: {} Bytes (Maximum: {} Bytes)",
                    length, self.max_frame_size
                ),
            ));
        }

        let total_size = LENGTH_FIELD_SIZE + length;
        if src.len() < total_size {
            src.reserve(total_size - src.len());
            return Ok(None);
        }

        src.advance(LENGTH_FIELD_SIZE);
        let payload = src.split_to(length);

        let message: Ein = serde_json::from_slice(&payload).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("JSON-Deserialisierung fehlgeschlagen: {}", e),
            )
        })?;

        Ok(Some(message))
    }
}

impl<Ein, Aus: Serialize> Encoder<Aus> for FrameCodec<Ein, Aus> {
    type Error = io::Error;

    fn encode(&mut self, item: Aus, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let json = serde_json::to_vec(&item).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("JSON-Serialisierung fehlgeschlagen: {}", e),
            )
        })?;

        if json.len() > self.max_frame_size {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Nachricht zu gross: {} Bytes (Maximum: {} Bytes)",
                    json.len(),
                    self.max_frame_size
                ),
            ));
        }

        dst.reserve(LENGTH_FIELD_SIZE + json.len());
        dst.put_u32(json.len() as u32);
        dst.put_slice(&json);

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pomodoro_core::{ChannelId, MemberId};

    fn sprach_status(mitglied: u64) -> GatewayEvent {
        GatewayEvent::SprachStatus {
            mitglied: MemberId(mitglied),
            kanal: Some(ChannelId(77)),
        }
    }

    #[test]
    fn connector_frame_wird_vom_bot_gelesen() {
        let mut connector = ConnectorCodec::new();
        let mut bot = BotCodec::new();

        let mut buf = BytesMut::new();
        connector.encode(sprach_status(42), &mut buf).unwrap();

        let payload_len = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
        assert_eq!(buf.len(), LENGTH_FIELD_SIZE + payload_len);

        let decoded = bot.decode(&mut buf).unwrap().expect("Ereignis erwartet");
        assert_eq!(decoded, sprach_status(42));
    }

    #[test]
    fn unvollstaendiger_frame_wartet() {
        let mut connector = ConnectorCodec::new();
        let mut bot = BotCodec::new();

        let mut buf = BytesMut::new();
        connector.encode(sprach_status(1), &mut buf).unwrap();

        let half = buf.len() / 2;
        let mut partial = buf.split_to(half);
        assert!(bot.decode(&mut partial).unwrap().is_none());
    }

    #[test]
    fn zu_grosser_frame_abgelehnt() {
        let mut bot = BotCodec::with_max_size(100);

        let mut buf = BytesMut::new();
        buf.put_u32(200);
        buf.put_slice(&[b'x'; 200]);

        assert!(bot.decode(&mut buf).is_err());
    }

    #[test]
    fn zu_grosse_nachricht_beim_encode_abgelehnt() {
        let mut bot = BotCodec::with_max_size(10);
        let call = GatewayCall::StummSetzen {
            mitglied: MemberId(1),
            stumm: true,
        };
        let mut buf = BytesMut::new();
        assert!(bot.encode(call, &mut buf).is_err());
    }

    #[test]
    fn mehrere_frames_im_buffer() {
        let mut connector = ConnectorCodec::new();
        let mut bot = BotCodec::new();
        let mut buf = BytesMut::new();

        for i in 0..3 {
            connector.encode(sprach_status(i), &mut buf).unwrap();
        }
        for i in 0..3 {
            let ev = bot.decode(&mut buf).unwrap().expect("Ereignis erwartet");
            assert_eq!(ev, sprach_status(i));
        }
        assert!(buf.is_empty());
    }

    #[test]
    fn ungueltiges_json_ist_fehler() {
        let mut bot = BotCodec::new();
        let mut buf = BytesMut::new();
        buf.put_u32(3);
        buf.put_slice(b"{{{");
        assert!(bot.decode(&mut buf).is_err());
    }
}
