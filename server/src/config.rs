//! Bot-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Bot ohne Konfigurationsdatei
//! lauffaehig ist.

use pomodoro_core::{PomodoroError, Result};
use pomodoro_protocol::{wire::DEFAULT_MAX_FRAME_SIZE, BefehlsOptionen};
use pomodoro_session::SessionEinstellungen;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Vollstaendige Bot-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Standardwerte fuer neue Sessions
    pub bot: BotEinstellungen,
    /// Connector-Anbindung
    pub gateway: GatewayEinstellungen,
    /// Observability-Einstellungen (Metriken, Health)
    pub observability: ObservabilityEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

/// Standardwerte fuer `/pomodoro` ohne Optionen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotEinstellungen {
    pub fokus_minuten: i64,
    pub pause_minuten: i64,
    pub zyklen: i64,
    /// Intervall der Status-Aktualisierung in Sekunden (0 = aus)
    pub aktualisierung_sek: u64,
}

impl Default for BotEinstellungen {
    fn default() -> Self {
        Self {
            fokus_minuten: 25,
            pause_minuten: 5,
            zyklen: 4,
            aktualisierung_sek: 10,
        }
    }
}

/// Connector-Anbindung (TCP)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayEinstellungen {
    pub bind_adresse: String,
    pub port: u16,
    /// Maximale Frame-Groesse in Bytes
    pub max_frame_groesse: usize,
}

impl Default for GatewayEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0".into(),
            port: 7070,
            max_frame_groesse: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

/// Observability-Einstellungen (Metriken + Health-Check)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityEinstellungen {
    /// Aktiviert den Observability-Server
    pub aktiviert: bool,
    pub bind_adresse: String,
    /// Port fuer Health und Metriken (Umgebungsvariable `PORT` hat Vorrang)
    pub port: u16,
}

impl Default for ObservabilityEinstellungen {
    fn default() -> Self {
        Self {
            aktiviert: true,
            bind_adresse: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl BotConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Uebernimmt `PORT` fuer den Observability-Server
    pub fn port_ueberschreiben(&mut self, port: Option<&str>) -> anyhow::Result<()> {
        if let Some(port) = port {
            self.observability.port = port
                .parse()
                .map_err(|e| anyhow::anyhow!("Ungueltiger PORT '{port}': {e}"))?;
        }
        Ok(())
    }

    /// Validierte Standard-Einstellungen fuer neue Sessions
    pub fn session_einstellungen(&self) -> Result<SessionEinstellungen> {
        let optionen = BefehlsOptionen {
            kanal: None,
            fokus_minuten: Some(self.bot.fokus_minuten),
            pause_minuten: Some(self.bot.pause_minuten),
            zyklen: Some(self.bot.zyklen),
        };
        SessionEinstellungen::aus_optionen(&optionen, &SessionEinstellungen::default())
            .map_err(|e| PomodoroError::Konfiguration(format!("[bot]: {e}")))
    }

    pub fn aktualisierungs_intervall(&self) -> Duration {
        Duration::from_secs(self.bot.aktualisierung_sek)
    }

    /// Gibt die Bind-Adresse fuer den Connector-Listener zurueck
    pub fn gateway_bind_adresse(&self) -> String {
        format!("{}:{}", self.gateway.bind_adresse, self.gateway.port)
    }

    /// Gibt die Bind-Adresse fuer den Observability-Server zurueck
    pub fn observability_bind_adresse(&self) -> String {
        format!(
            "{}:{}",
            self.observability.bind_adresse, self.observability.port
        )
    }
}
