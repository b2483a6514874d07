//! Gateway-Server – TCP-Anbindung des Plattform-Connectors
//!
//! Der Connector verbindet sich per TCP und tauscht laengenpraefixierte
//! JSON-Frames aus ([`BotCodec`]). Es ist hoechstens ein Connector
//! gleichzeitig verbunden; weitere Verbindungen werden abgelehnt.
//!
//! ## Concurrency-Modell
//! Pro Verbindung laufen zwei Pfade:
//! - Lese-Schleife: dekodiert [`GatewayEvent`]s und verarbeitet sie der
//!   Reihe nach im [`Dispatcher`]
//! - Schreib-Task: leert die Sende-Queue der [`GatewayBruecke`] in den
//!   Socket
//!
//! Die Trennung verhindert, dass ein Handler, der auf einen Platz in der
//! Sende-Queue wartet, die Lese-Schleife blockiert, die den Socket leert.

use futures_util::{SinkExt, StreamExt};
use pomodoro_observability::HealthState;
use pomodoro_protocol::{BotCodec, GatewayCall};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, watch};
use tokio_util::codec::Framed;

use crate::bruecke::GatewayBruecke;
use crate::dispatcher::Dispatcher;

/// Groesse der Sende-Queue pro Verbindung
const SENDE_QUEUE_GROESSE: usize = 256;

/// Wartezeit fuer ausstehende Frames beim Trennen
const SCHREIB_ABSCHLUSS_TIMEOUT: Duration = Duration::from_secs(2);

/// Abhaengigkeiten einer Connector-Verbindung
#[derive(Clone)]
pub struct GatewayKontext {
    pub bruecke: GatewayBruecke,
    pub dispatcher: Dispatcher,
    pub health: HealthState,
    pub max_frame_groesse: usize,
}

/// TCP-Listener fuer den Connector
pub struct GatewayServer {
    listener: TcpListener,
    kontext: GatewayKontext,
    belegt: Arc<AtomicBool>,
}

impl GatewayServer {
    /// Bindet den Listener
    pub async fn binden(bind_addr: &str, kontext: GatewayKontext) -> std::io::Result<Self> {
        let listener = TcpListener::bind(bind_addr).await?;
        Ok(Self {
            listener,
            kontext,
            belegt: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn lokale_adresse(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Akzeptiert Verbindungen bis `shutdown_rx` `true` meldet
    pub async fn starten(self, mut shutdown_rx: watch::Receiver<bool>) -> std::io::Result<()> {
        let lokale_addr = self.listener.local_addr()?;
        tracing::info!(adresse = %lokale_addr, "Gateway-Server gestartet");

        let mut verbindung: Option<tokio::task::JoinHandle<()>> = None;
        loop {
            tokio::select! {
                result = self.listener.accept() => {
                    match result {
                        Ok((stream, peer_addr)) => {
                            if self.belegt.swap(true, Ordering::AcqRel) {
                                tracing::warn!(
                                    peer = %peer_addr,
                                    "Connector bereits verbunden – Verbindung abgelehnt"
                                );
                                drop(stream);
                                continue;
                            }

                            let kontext = self.kontext.clone();
                            let belegt = Arc::clone(&self.belegt);
                            let shutdown_rx = shutdown_rx.clone();
                            verbindung = Some(tokio::spawn(async move {
                                verbindung_verarbeiten(stream, peer_addr, kontext, shutdown_rx)
                                    .await;
                                belegt.store(false, Ordering::Release);
                            }));
                        }
                        Err(e) => {
                            tracing::error!(fehler = %e, "TCP-Accept-Fehler");
                            tokio::time::sleep(Duration::from_millis(10)).await;
                        }
                    }
                }

                Ok(()) = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        tracing::info!("Gateway-Server: Shutdown-Signal empfangen");
                        break;
                    }
                }
            }
        }

        // Laufende Verbindung stellt ausstehende Frames noch zu
        if let Some(verbindung) = verbindung {
            if let Err(e) = verbindung.await {
                tracing::warn!(fehler = %e, "Verbindungs-Task abgebrochen");
            }
        }

        tracing::info!("Gateway-Server gestoppt");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Connector-Verbindung
// ---------------------------------------------------------------------------

async fn verbindung_verarbeiten(
    stream: TcpStream,
    peer_addr: SocketAddr,
    kontext: GatewayKontext,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    tracing::info!(peer = %peer_addr, "Connector verbunden");

    let framed = Framed::new(stream, BotCodec::with_max_size(kontext.max_frame_groesse));
    let (mut sink, mut stream) = framed.split();

    let (sende_tx, mut sende_rx) = mpsc::channel::<GatewayCall>(SENDE_QUEUE_GROESSE);
    let mut schreiber = tokio::spawn(async move {
        while let Some(call) = sende_rx.recv().await {
            if let Err(e) = sink.send(call).await {
                tracing::warn!(peer = %peer_addr, fehler = %e, "Senden fehlgeschlagen");
                break;
            }
        }
        let _ = sink.close().await;
    });

    kontext.bruecke.verbinden(sende_tx.clone());
    kontext.health.gateway_status_setzen(true);

    loop {
        tokio::select! {
            frame = stream.next() => {
                match frame {
                    Some(Ok(ereignis)) => {
                        tracing::trace!(peer = %peer_addr, ?ereignis, "Ereignis empfangen");
                        kontext.dispatcher.verarbeiten(ereignis).await;
                    }
                    Some(Err(e)) => {
                        tracing::warn!(peer = %peer_addr, fehler = %e, "Frame-Lesefehler");
                        break;
                    }
                    None => {
                        tracing::info!(peer = %peer_addr, "Connector hat die Verbindung getrennt");
                        break;
                    }
                }
            }

            Ok(()) = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    break;
                }
            }

            _ = &mut schreiber => {
                tracing::warn!(peer = %peer_addr, "Schreib-Task beendet");
                break;
            }
        }
    }

    kontext.bruecke.trennen(&sende_tx);
    kontext.health.gateway_status_setzen(false);
    drop(sende_tx);

    // Ausstehende Aufrufe (z.B. Freigaben beim Shutdown) noch zustellen
    if !schreiber.is_finished()
        && tokio::time::timeout(SCHREIB_ABSCHLUSS_TIMEOUT, &mut schreiber)
            .await
            .is_err()
    {
        tracing::warn!(peer = %peer_addr, "Ausstehende Frames verworfen");
        schreiber.abort();
    }

    tracing::info!(peer = %peer_addr, "Connector-Verbindung beendet");
}
