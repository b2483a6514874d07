//! Session-Metriken aus den Registry-Ereignissen
//!
//! Ein Hintergrund-Task folgt [`SessionRegistry::ereignisse_abonnieren`]
//! und fuehrt die Prometheus-Zaehler nach.

use pomodoro_observability::PomodoroMetriken;
use pomodoro_session::{Lebenszyklus, Phase, SessionEreignis, SessionRegistry};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Startet den Metrik-Task; laeuft bis zum Abbruch des Handles
pub fn metriken_verfolgen(
    registry: &SessionRegistry,
    metriken: PomodoroMetriken,
) -> JoinHandle<()> {
    let mut rx = registry.ereignisse_abonnieren();
    let registry = registry.clone();

    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ereignis) => ereignis_zaehlen(&metriken, &ereignis),
                Err(RecvError::Lagged(verpasst)) => {
                    tracing::warn!(verpasst, "Session-Ereignisse verpasst");
                }
                Err(RecvError::Closed) => break,
            }
            metriken.sessions_active.set(registry.anzahl() as i64);
        }
    })
}

fn ereignis_zaehlen(metriken: &PomodoroMetriken, ereignis: &SessionEreignis) {
    match ereignis {
        SessionEreignis::Gestartet { .. } => metriken.sessions_started_total.inc(),
        SessionEreignis::PhaseGewechselt { phase, .. } => {
            let label = match phase {
                Phase::Fokus => "focus",
                Phase::Pause => "break",
            };
            metriken.phase_switches_total.with_label_values(&[label]).inc();
        }
        SessionEreignis::Beendet { lebenszyklus, .. } => {
            let grund = match lebenszyklus {
                Lebenszyklus::Abgeschlossen => "completed",
                _ => "stopped",
            };
            metriken.sessions_finished_total.with_label_values(&[grund]).inc();
        }
    }
}
