//! `/pomodoro`-Befehl
//!
//! Validiert die Anfrage, erstellt die Session und registriert sie. Der
//! Aufrufer beantwortet die Interaktion und ruft danach
//! [`PomodoroSession::starten`] auf.
//!
//! Reihenfolge der Pruefungen:
//! 1. Optionen innerhalb der Grenzen
//! 2. Zielkanal bestimmbar (explizit oder Sprachkanal des Ausloesers)
//! 3. Keine aktive Session im Zielkanal
//! 4. Zielkanal nicht leer

use pomodoro_core::{ChannelId, MemberId, PomodoroError, Result, TextChannelId};
use pomodoro_protocol::BefehlsOptionen;
use std::sync::Arc;

use crate::einstellungen::SessionEinstellungen;
use crate::session::{PomodoroSession, SessionKontext, SessionUmgebung};

/// Eingehender Befehl
#[derive(Debug, Clone)]
pub struct BefehlsAnfrage {
    pub ausloeser: MemberId,
    pub text_kanal: TextChannelId,
    pub optionen: BefehlsOptionen,
}

/// Ergebnis eines erfolgreichen Befehls
#[derive(Debug)]
pub struct SessionStart {
    /// Registriert, aber noch nicht gestartet
    pub session: Arc<PomodoroSession>,
    /// Fluechtige Bestaetigung fuer den Ausloeser
    pub bestaetigung: String,
}

#[derive(Clone)]
pub struct BefehlsHandler {
    umgebung: SessionUmgebung,
    standard: SessionEinstellungen,
}

impl BefehlsHandler {
    pub fn neu(umgebung: SessionUmgebung, standard: SessionEinstellungen) -> Self {
        Self { umgebung, standard }
    }

    pub async fn ausfuehren(&self, anfrage: BefehlsAnfrage) -> Result<SessionStart> {
        let einstellungen = SessionEinstellungen::aus_optionen(&anfrage.optionen, &self.standard)?;
        let kanal = self.zielkanal(&anfrage).await?;

        let registry = &self.umgebung.registry;
        if registry.ist_aktiv(kanal) {
            return Err(PomodoroError::BereitsAktiv(kanal));
        }

        let plattform = self.umgebung.plattform.as_ref();
        if plattform.mitglieder_von(kanal).await?.is_empty() {
            return Err(PomodoroError::LeererKanal(kanal));
        }

        let kanal_name = match plattform.kanal_name(kanal).await {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!(kanal = %kanal, fehler = %e, "Kanalname nicht verfuegbar");
                kanal.to_string()
            }
        };

        let session = PomodoroSession::neu(
            SessionKontext {
                kanal,
                kanal_name: kanal_name.clone(),
                text_kanal: anfrage.text_kanal,
                ausloeser: anfrage.ausloeser,
            },
            einstellungen,
            self.umgebung.clone(),
        );
        registry.registrieren(Arc::clone(&session))?;

        tracing::info!(
            kanal = %kanal,
            ausloeser = %anfrage.ausloeser,
            "Pomodoro-Befehl angenommen"
        );
        Ok(SessionStart {
            session,
            bestaetigung: bestaetigung(&kanal_name, &anfrage.optionen),
        })
    }

    async fn zielkanal(&self, anfrage: &BefehlsAnfrage) -> Result<ChannelId> {
        if let Some(kanal) = anfrage.optionen.kanal {
            return Ok(kanal);
        }
        self.umgebung
            .plattform
            .sprachkanal_von(anfrage.ausloeser)
            .await?
            .ok_or(PomodoroError::KeinZielkanal)
    }
}

/// Bestaetigungstext; nennt nur explizit gesetzte Optionen
fn bestaetigung(kanal_name: &str, optionen: &BefehlsOptionen) -> String {
    let mut gesetzt = Vec::new();
    if let Some(m) = optionen.fokus_minuten {
        gesetzt.push(format!("Fokuszeit: {m} Min."));
    }
    if let Some(m) = optionen.pause_minuten {
        gesetzt.push(format!("Pausenzeit: {m} Min."));
    }
    if let Some(z) = optionen.zyklen {
        gesetzt.push(format!("Zyklen: {z}"));
    }

    let mut text = format!("🍅 Pomodoro-Session in {kanal_name} startet!");
    if !gesetzt.is_empty() {
        text.push_str(&format!("\nEinstellungen: {}", gesetzt.join(", ")));
    }
    text
}
