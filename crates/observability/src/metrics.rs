//! Prometheus-kompatible Metriken fuer den Pomodoro-Bot
//!
//! Registrierte Metriken:
//! - `pomodoro_sessions_active` – Gauge: Aktuell laufende Sessions
//! - `pomodoro_sessions_started_total` – Counter: Gestartete Sessions
//! - `pomodoro_sessions_finished_total` – Counter: Beendete Sessions (reason)
//! - `pomodoro_phase_switches_total` – Counter: Phasenwechsel (phase)
//! - `pomodoro_platform_errors_total` – Counter: Fehlgeschlagene Plattform-Aufrufe (call)

use anyhow::Result;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Router};
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Alle Pomodoro-Prometheus-Metriken
#[derive(Clone)]
pub struct PomodoroMetriken {
    pub registry: Arc<Registry>,

    // Session-Metriken
    pub sessions_active: IntGauge,
    pub sessions_started_total: IntCounter,
    pub sessions_finished_total: IntCounterVec,
    pub phase_switches_total: IntCounterVec,

    // Plattform-Metriken
    pub platform_errors_total: IntCounterVec,
}

impl PomodoroMetriken {
    /// Erstellt und registriert alle Metriken in einer neuen Registry
    pub fn neu() -> Result<Self> {
        let registry = Registry::new();

        // --- Session-Metriken ---
        let sessions_active = IntGauge::with_opts(Opts::new(
            "pomodoro_sessions_active",
            "Anzahl aktuell laufender Pomodoro-Sessions",
        ))?;
        registry.register(Box::new(sessions_active.clone()))?;

        let sessions_started_total = IntCounter::with_opts(Opts::new(
            "pomodoro_sessions_started_total",
            "Gesamtanzahl gestarteter Sessions",
        ))?;
        registry.register(Box::new(sessions_started_total.clone()))?;

        let sessions_finished_total = IntCounterVec::new(
            Opts::new(
                "pomodoro_sessions_finished_total",
                "Gesamtanzahl beendeter Sessions",
            ),
            &["reason"],
        )?;
        registry.register(Box::new(sessions_finished_total.clone()))?;

        let phase_switches_total = IntCounterVec::new(
            Opts::new(
                "pomodoro_phase_switches_total",
                "Gesamtanzahl Phasenwechsel",
            ),
            &["phase"],
        )?;
        registry.register(Box::new(phase_switches_total.clone()))?;

        // --- Plattform-Metriken ---
        let platform_errors_total = IntCounterVec::new(
            Opts::new(
                "pomodoro_platform_errors_total",
                "Gesamtanzahl fehlgeschlagener Plattform-Aufrufe",
            ),
            &["call"],
        )?;
        registry.register(Box::new(platform_errors_total.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            sessions_active,
            sessions_started_total,
            sessions_finished_total,
            phase_switches_total,
            platform_errors_total,
        })
    }

    /// Exportiert alle Metriken im Prometheus-Textformat
    pub fn exportieren(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Axum-Router fuer den `/metrics`-Endpunkt
pub fn metrics_router(metriken: PomodoroMetriken) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metriken)
}

async fn metrics_handler(State(metriken): State<PomodoroMetriken>) -> impl IntoResponse {
    match metriken.exportieren() {
        Ok(text) => (
            StatusCode::OK,
            [(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4",
            )],
            text,
        )
            .into_response(),
        Err(err) => {
            tracing::error!("Metriken-Export fehlgeschlagen: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
