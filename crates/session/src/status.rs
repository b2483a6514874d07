//! Status-Presenter
//!
//! Reine Funktionen von einer [`SessionAnsicht`] auf darstellbare Inhalte.
//! Kein I/O.

use pomodoro_protocol::anzeige::{
    AbschlussView, Feld, SchaltflaechenStil, StatusView, Steuerelement, FARBE_FOKUS, FARBE_PAUSE,
};
use pomodoro_protocol::{ControlAction, ControlRef};

use crate::session::{Lebenszyklus, Phase, SessionAnsicht};

/// Formatiert Millisekunden als `m:ss` (abgerundet, nie negativ)
pub fn zeit_formatieren(ms: i64) -> String {
    let ms = ms.max(0);
    let minuten = ms / 60_000;
    let sekunden = (ms % 60_000) / 1000;
    format!("{minuten}:{sekunden:02}")
}

/// Erzeugt das Status-Embed samt Steuerelementen
pub fn darstellen(ansicht: &SessionAnsicht) -> StatusView {
    let (phase, emoji, farbe) = match ansicht.phase {
        Phase::Fokus => ("Fokuszeit", "🍅", FARBE_FOKUS),
        Phase::Pause => ("Pausenzeit", "☕", FARBE_PAUSE),
    };
    let pausiert = ansicht.lebenszyklus == Lebenszyklus::Pausiert;

    let zyklus = format!("Zyklus {}/{}", ansicht.zyklus, ansicht.zyklen);
    let restzeit = zeit_formatieren(ansicht.restzeit_ms);
    let zustand = if pausiert { "⏸️ Pausiert" } else { "▶️ Laeuft" }.to_string();
    let einstellungen = format!(
        "Fokus: {} Min. / Pause: {} Min.",
        ansicht.einstellungen.fokus_minuten(),
        ansicht.einstellungen.pause_minuten()
    );

    let felder = vec![
        feld("Restzeit", &restzeit),
        feld("Status", &zustand),
        feld("Sprachkanal", &ansicht.kanal_name),
        feld("Einstellungen", &einstellungen),
    ];

    let umschalten = if pausiert {
        steuerelement(
            ControlAction::Fortsetzen,
            ansicht,
            "Fortsetzen",
            "▶️",
            SchaltflaechenStil::Primaer,
        )
    } else {
        steuerelement(
            ControlAction::Pausieren,
            ansicht,
            "Pausieren",
            "⏸️",
            SchaltflaechenStil::Primaer,
        )
    };
    let stopp = steuerelement(
        ControlAction::Stoppen,
        ansicht,
        "Stoppen",
        "⏹️",
        SchaltflaechenStil::Gefahr,
    );

    StatusView {
        titel: format!("{emoji} Pomodoro-Timer"),
        beschreibung: format!("**{phase}** - {zyklus}"),
        phase: phase.to_string(),
        emoji: emoji.to_string(),
        farbe,
        zyklus,
        restzeit,
        zustand,
        kanal_name: ansicht.kanal_name.clone(),
        einstellungen,
        felder,
        steuerelemente: vec![umschalten, stopp],
    }
}

/// Abschluss-Embed nach dem letzten Zyklus
pub fn abschluss() -> AbschlussView {
    AbschlussView {
        titel: "🎉 Pomodoro-Session abgeschlossen!".into(),
        beschreibung: "Gut gemacht! Alle Zyklen sind geschafft.".into(),
        farbe: FARBE_PAUSE,
    }
}

pub fn fokus_hinweis(zyklus: u32, minuten: u64) -> String {
    format!("🍅 Zyklus {zyklus}: Fokus beginnt ({minuten} Min.)")
}

pub fn pause_hinweis(zyklus: u32, minuten: u64) -> String {
    format!("☕ Zyklus {zyklus}: Pause beginnt ({minuten} Min.)")
}

fn feld(name: &str, wert: &str) -> Feld {
    Feld {
        name: name.into(),
        wert: wert.into(),
        inline: true,
    }
}

fn steuerelement(
    aktion: ControlAction,
    ansicht: &SessionAnsicht,
    beschriftung: &str,
    emoji: &str,
    stil: SchaltflaechenStil,
) -> Steuerelement {
    let referenz = ControlRef::neu(aktion, ansicht.kanal);
    Steuerelement {
        kennung: referenz.to_string(),
        referenz,
        beschriftung: beschriftung.into(),
        emoji: emoji.into(),
        stil,
    }
}
