//! Health-Check-Endpunkte fuer den Pomodoro-Bot
//!
//! - `GET /health`: Status, Zeitstempel, Uptime, Gateway-Verbindung, aktive Sessions
//! - `GET /`: Name, Status und Version

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Status des Health-Checks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

/// Verbindungsstatus zum Plattform-Connector
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GatewayStatus {
    Connected,
    Disconnected,
}

/// Antwort des Health-Check-Endpunkts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub gateway: GatewayStatus,
    pub active_sessions: usize,
}

/// Antwort des Wurzel-Endpunkts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoResponse {
    pub name: String,
    pub status: String,
    pub version: String,
}

/// Liefert die Anzahl aktiver Sessions
pub type SessionZaehler = Arc<dyn Fn() -> usize + Send + Sync>;

/// Geteilter Zustand fuer die Health-Handler
#[derive(Clone)]
pub struct HealthState {
    start_time: Arc<Instant>,
    gateway_verbunden: Arc<AtomicBool>,
    aktive_sessions: SessionZaehler,
}

impl HealthState {
    pub fn neu(aktive_sessions: SessionZaehler) -> Self {
        Self {
            start_time: Arc::new(Instant::now()),
            gateway_verbunden: Arc::new(AtomicBool::new(false)),
            aktive_sessions,
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn gateway_verbunden(&self) -> bool {
        self.gateway_verbunden.load(Ordering::Relaxed)
    }

    pub fn gateway_status_setzen(&self, verbunden: bool) {
        self.gateway_verbunden.store(verbunden, Ordering::Relaxed);
    }

    /// Baut die Health-Antwort aus dem aktuellen Zustand
    pub fn antwort(&self) -> HealthResponse {
        let verbunden = self.gateway_verbunden();
        HealthResponse {
            status: if verbunden {
                HealthStatus::Healthy
            } else {
                HealthStatus::Degraded
            },
            timestamp: Utc::now(),
            uptime_seconds: self.uptime_seconds(),
            gateway: if verbunden {
                GatewayStatus::Connected
            } else {
                GatewayStatus::Disconnected
            },
            active_sessions: (self.aktive_sessions)(),
        }
    }
}

/// Axum-Router fuer `/health` und `/`
pub fn health_router(state: HealthState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/", get(info_handler))
        .with_state(state)
}

/// `GET /health` – 200 auch bei degraded (Probe soll nicht failen)
async fn health_handler(State(state): State<HealthState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.antwort()))
}

async fn info_handler() -> impl IntoResponse {
    Json(InfoResponse {
        name: "Pomodoro Bot".into(),
        status: "running".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}
