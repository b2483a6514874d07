//! Pomodoro-Bot – Einstiegspunkt
//!
//! Laedt die Konfiguration, initialisiert das Logging, prueft die
//! Umgebung und startet den Server.

use anyhow::Result;
use pomodoro_observability::logging::{log_format_gueltig, log_level_gueltig};
use pomodoro_observability::logging_initialisieren;
use pomodoro_server::{config::BotConfig, umgebung, Server};

#[tokio::main]
async fn main() -> Result<()> {
    // Konfigurationsdatei-Pfad aus Umgebungsvariable oder Standard
    let config_pfad = std::env::var("POMODORO_CONFIG").unwrap_or_else(|_| "config.toml".into());

    // Konfiguration laden (Standardwerte falls Datei fehlt)
    let mut config = BotConfig::laden(&config_pfad)?;
    config.port_ueberschreiben(std::env::var("PORT").ok().as_deref())?;

    logging_initialisieren(&config.logging.level, &config.logging.format);
    if !log_format_gueltig(&config.logging.format) {
        tracing::warn!(format = %config.logging.format, "Unbekanntes Log-Format, verwende text");
    }
    if !log_level_gueltig(&config.logging.level) {
        tracing::debug!(
            level = %config.logging.level,
            "Log-Level wird als Filter-Direktive interpretiert"
        );
    }

    let zugang = match umgebung::pruefen_aus_env() {
        Ok(zugang) => zugang,
        Err(e) => {
            tracing::error!(fehler = %e, "Umgebung unvollstaendig, Start abgebrochen");
            return Err(e.into());
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_pfad,
        client_id = %zugang.client_id,
        "Pomodoro-Bot wird initialisiert"
    );

    let server = Server::neu(config);
    server.starten().await?;

    Ok(())
}
