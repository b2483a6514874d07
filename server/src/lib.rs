//! pomodoro-server – Bibliotheks-Root
//!
//! Deklariert alle Server-Module und stellt den oeffentlichen Einstiegspunkt
//! fuer Integrationstests bereit.

pub mod bruecke;
pub mod config;
pub mod dispatcher;
pub mod gateway;
pub mod metriken;
pub mod praesenz;
pub mod umgebung;

use anyhow::Result;
use config::BotConfig;
use pomodoro_core::SystemZeit;
use pomodoro_observability::{HealthState, PomodoroMetriken};
use pomodoro_session::{SessionRegistry, SessionUmgebung};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;

use bruecke::{GatewayBruecke, GemessenePlattform};
use dispatcher::Dispatcher;
use gateway::{GatewayKontext, GatewayServer};
use praesenz::Praesenz;

/// Haelt den Server-Zustand vor dem Binden zusammen
pub struct Server {
    pub config: BotConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: BotConfig) -> Self {
        Self { config }
    }

    /// Baut alle Komponenten auf und bindet den Gateway-Listener
    pub async fn binden(self) -> Result<GebundenerServer> {
        let standard = self.config.session_einstellungen()?;
        let metriken = PomodoroMetriken::neu()?;
        let registry = SessionRegistry::neu();

        let bruecke = GatewayBruecke::neu(Praesenz::neu());
        let umgebung = SessionUmgebung {
            plattform: Arc::new(GemessenePlattform::neu(bruecke.clone(), metriken.clone())),
            zeit: Arc::new(SystemZeit),
            registry: registry.clone(),
            aktualisierungs_intervall: self.config.aktualisierungs_intervall(),
        };

        let zaehler_registry = registry.clone();
        let health = HealthState::neu(Arc::new(move || zaehler_registry.anzahl()));

        let kontext = GatewayKontext {
            dispatcher: Dispatcher::neu(bruecke.clone(), umgebung, standard),
            bruecke,
            health: health.clone(),
            max_frame_groesse: self.config.gateway.max_frame_groesse,
        };
        let gateway = GatewayServer::binden(&self.config.gateway_bind_adresse(), kontext).await?;

        Ok(GebundenerServer {
            config: self.config,
            gateway,
            registry,
            metriken,
            health,
        })
    }

    /// Startet den Server und laeuft bis Ctrl-C / SIGTERM
    pub async fn starten(self) -> Result<()> {
        self.binden().await?.laufen(shutdown_signal()).await
    }
}

/// Server mit gebundenem Gateway-Listener
pub struct GebundenerServer {
    config: BotConfig,
    gateway: GatewayServer,
    registry: SessionRegistry,
    metriken: PomodoroMetriken,
    health: HealthState,
}

impl GebundenerServer {
    pub fn gateway_adresse(&self) -> std::io::Result<SocketAddr> {
        self.gateway.lokale_adresse()
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Laeuft bis `shutdown` abgeschlossen ist
    ///
    /// Reihenfolge beim Beenden:
    /// 1. Alle Sessions stoppen (Mitglieder freigeben)
    /// 2. Gateway-Server stoppen (ausstehende Frames werden noch gesendet)
    pub async fn laufen(self, shutdown: impl Future<Output = ()>) -> Result<()> {
        let metrik_task = metriken::metriken_verfolgen(&self.registry, self.metriken.clone());

        if self.config.observability.aktiviert {
            let addr: SocketAddr = self.config.observability_bind_adresse().parse()?;
            let health = self.health.clone();
            let metriken = self.metriken.clone();
            tokio::spawn(async move {
                if let Err(e) =
                    pomodoro_observability::observability_server_starten(addr, health, metriken)
                        .await
                {
                    tracing::error!(fehler = %e, "Observability-Server beendet");
                }
            });
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut gateway_task = tokio::spawn(self.gateway.starten(shutdown_rx));

        tracing::info!("Pomodoro-Bot laeuft. Warte auf Shutdown-Signal (Ctrl-C)...");
        tokio::select! {
            _ = shutdown => {
                tracing::info!("Shutdown-Signal empfangen, Bot wird beendet");
            }
            ergebnis = &mut gateway_task => {
                tracing::error!(?ergebnis, "Gateway-Server unerwartet beendet");
            }
        }

        tracing::debug!(kanaele = ?self.registry.kanaele(), "Aktive Sessions werden gestoppt");
        let gestoppt = self.registry.alle_stoppen().await;
        tracing::info!(sessions = gestoppt, "Aktive Sessions gestoppt");

        let _ = shutdown_tx.send(true);
        if !gateway_task.is_finished() {
            if let Err(e) = gateway_task.await {
                tracing::warn!(fehler = %e, "Gateway-Task abgebrochen");
            }
        }
        metrik_task.abort();
        tracing::info!("Pomodoro-Bot beendet");
        Ok(())
    }
}

/// Wartet auf Ctrl-C oder SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(fehler = %e, "Ctrl-C-Handler konnte nicht installiert werden");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(fehler = %e, "SIGTERM-Handler konnte nicht installiert werden");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
