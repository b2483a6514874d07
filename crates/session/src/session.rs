//! Pomodoro-Session (Zustandsmaschine)
//!
//! Eine Session gehoert genau einem Sprachkanal. Sie wechselt zwischen
//! Fokus- und Pausenphasen, schaltet Mitglieder beim Fokusbeginn stumm
//! und in der Pause wieder frei.
//!
//! ## Nebenlaeufigkeit
//!
//! Der veraenderliche Zustand liegt hinter einem `tokio::sync::Mutex`, der
//! ueber die Plattform-Aufrufe hinweg gehalten wird. Damit laufen Handler
//! derselben Session (Timer, Schaltflaechen, Sprachereignisse) nie
//! gleichzeitig. Phasen-Timer und Aktualisierungs-Ticker sind eigene Tasks,
//! die nur eine schwache Referenz auf die Session halten.
//!
//! ## Restzeit
//!
//! `restzeit = rest_bei_phasenstart - (bezug - phase_gestartet_am)`, wobei
//! `bezug` waehrend einer Pause der Pausenzeitpunkt ist. Beim Fortsetzen
//! wird `phase_gestartet_am` um die Pausendauer nach vorne geschoben.

use chrono::{DateTime, TimeDelta, Utc};
use pomodoro_core::zeit::nicht_negativ;
use pomodoro_core::{ChannelId, MemberId, MessageHandle, TextChannelId, Zeitquelle};
use pomodoro_protocol::NachrichtInhalt;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::einstellungen::SessionEinstellungen;
use crate::plattform::Plattform;
use crate::registry::{SessionEreignis, SessionRegistry};
use crate::status;
use crate::stummschaltung::MuteKoordinator;

/// Standard-Intervall fuer die periodische Status-Aktualisierung
pub const STANDARD_AKTUALISIERUNGS_INTERVALL: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Zustandstypen
// ---------------------------------------------------------------------------

/// Aktuelle Phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Fokus,
    Pause,
}

/// Lebenszyklus einer Session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lebenszyklus {
    Laufend,
    Pausiert,
    Abgeschlossen,
    Gestoppt,
}

impl Lebenszyklus {
    /// Abgeschlossen und Gestoppt sind endgueltig
    pub fn ist_terminal(&self) -> bool {
        matches!(self, Self::Abgeschlossen | Self::Gestoppt)
    }
}

/// Unveraenderliche Angaben zur Session
#[derive(Debug, Clone)]
pub struct SessionKontext {
    pub kanal: ChannelId,
    pub kanal_name: String,
    pub text_kanal: TextChannelId,
    pub ausloeser: MemberId,
}

/// Abhaengigkeiten einer Session
#[derive(Clone)]
pub struct SessionUmgebung {
    pub plattform: Arc<dyn Plattform>,
    pub zeit: Arc<dyn Zeitquelle>,
    pub registry: SessionRegistry,
    pub aktualisierungs_intervall: Duration,
}

/// Momentaufnahme fuer den Status-Presenter
#[derive(Debug, Clone, PartialEq)]
pub struct SessionAnsicht {
    pub kanal: ChannelId,
    pub kanal_name: String,
    pub phase: Phase,
    pub zyklus: u32,
    pub zyklen: u32,
    pub lebenszyklus: Lebenszyklus,
    /// Restzeit der aktuellen Phase in Millisekunden (kann negativ sein)
    pub restzeit_ms: i64,
    pub einstellungen: SessionEinstellungen,
}

struct SessionZustand {
    phase: Phase,
    zyklus: u32,
    lebenszyklus: Lebenszyklus,
    gestartet: bool,
    phase_gestartet_am: DateTime<Utc>,
    rest_bei_phasenstart: TimeDelta,
    pausiert_am: Option<DateTime<Utc>>,
    stumm: MuteKoordinator,
    status_nachricht: Option<MessageHandle>,
    phasen_timer: Option<JoinHandle<()>>,
    aktualisierung: Option<JoinHandle<()>>,
    /// Wird bei jeder Planung und jedem Abbruch erhoeht
    timer_generation: u64,
}

impl SessionZustand {
    fn restzeit(&self, jetzt: DateTime<Utc>) -> TimeDelta {
        let bezug = self.pausiert_am.unwrap_or(jetzt);
        let vergangen = (bezug - self.phase_gestartet_am).max(TimeDelta::zero());
        self.rest_bei_phasenstart - vergangen
    }

    fn phasen_timer_abbrechen(&mut self) {
        self.timer_generation += 1;
        if let Some(timer) = self.phasen_timer.take() {
            timer.abort();
        }
    }
}

fn delta(dauer: Duration) -> TimeDelta {
    TimeDelta::from_std(dauer).unwrap_or(TimeDelta::MAX)
}

// ---------------------------------------------------------------------------
// PomodoroSession
// ---------------------------------------------------------------------------

/// Timer- und Stummschaltungs-Zustandsmaschine eines Sprachkanals
pub struct PomodoroSession {
    kontext: SessionKontext,
    einstellungen: SessionEinstellungen,
    umgebung: SessionUmgebung,
    zustand: Mutex<SessionZustand>,
    selbst: Weak<PomodoroSession>,
}

impl std::fmt::Debug for PomodoroSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PomodoroSession")
            .field("kanal", &self.kontext.kanal)
            .field("einstellungen", &self.einstellungen)
            .finish_non_exhaustive()
    }
}

impl PomodoroSession {
    /// Erstellt eine Session im Zustand Fokus (laufend), Zyklus 1
    ///
    /// Die Session tut nichts bis [`PomodoroSession::starten`] aufgerufen wird.
    pub fn neu(
        kontext: SessionKontext,
        einstellungen: SessionEinstellungen,
        umgebung: SessionUmgebung,
    ) -> Arc<Self> {
        let jetzt = umgebung.zeit.jetzt();
        Arc::new_cyclic(|selbst| Self {
            zustand: Mutex::new(SessionZustand {
                phase: Phase::Fokus,
                zyklus: 1,
                lebenszyklus: Lebenszyklus::Laufend,
                gestartet: false,
                phase_gestartet_am: jetzt,
                rest_bei_phasenstart: delta(einstellungen.fokus),
                pausiert_am: None,
                stumm: MuteKoordinator::neu(),
                status_nachricht: None,
                phasen_timer: None,
                aktualisierung: None,
                timer_generation: 0,
            }),
            kontext,
            einstellungen,
            umgebung,
            selbst: selbst.clone(),
        })
    }

    pub fn kanal(&self) -> ChannelId {
        self.kontext.kanal
    }

    pub fn einstellungen(&self) -> &SessionEinstellungen {
        &self.einstellungen
    }

    fn plattform(&self) -> &dyn Plattform {
        self.umgebung.plattform.as_ref()
    }

    // -----------------------------------------------------------------------
    // Operationen
    // -----------------------------------------------------------------------

    /// Startet die Session
    ///
    /// Schaltet alle Mitglieder stumm, sendet die Status-Nachricht, plant
    /// den ersten Phasenwechsel und startet die periodische Aktualisierung.
    pub async fn starten(&self) {
        let mut z = self.zustand.lock().await;
        if z.gestartet || z.lebenszyklus.ist_terminal() {
            return;
        }
        z.gestartet = true;

        let mitglieder = self.mitglieder_abfragen().await;
        let stumm = z.stumm.alle_stummschalten(self.plattform(), &mitglieder).await;

        z.phase_gestartet_am = self.umgebung.zeit.jetzt();
        z.rest_bei_phasenstart = delta(self.einstellungen.fokus);

        let inhalt = NachrichtInhalt::Status(status::darstellen(&self.ansicht_aus(&z)));
        match self
            .plattform()
            .nachricht_senden(self.kontext.text_kanal, inhalt)
            .await
        {
            Ok(handle) => z.status_nachricht = Some(handle),
            Err(e) => {
                tracing::warn!(
                    kanal = %self.kontext.kanal,
                    fehler = %e,
                    "Status-Nachricht konnte nicht gesendet werden"
                );
            }
        }

        self.phasen_timer_planen(&mut z, self.einstellungen.fokus);
        self.aktualisierung_starten(&mut z);

        tracing::info!(
            kanal = %self.kontext.kanal,
            ausloeser = %self.kontext.ausloeser,
            stummgeschaltet = stumm,
            fokus_min = self.einstellungen.fokus_minuten(),
            pause_min = self.einstellungen.pause_minuten(),
            zyklen = self.einstellungen.zyklen,
            "Pomodoro-Session gestartet"
        );
    }

    /// Pausiert den Timer; false wenn bereits pausiert oder beendet
    pub async fn pausieren(&self) -> bool {
        let mut z = self.zustand.lock().await;
        if !z.gestartet || z.lebenszyklus != Lebenszyklus::Laufend {
            return false;
        }

        z.phasen_timer_abbrechen();
        z.pausiert_am = Some(self.umgebung.zeit.jetzt());
        z.lebenszyklus = Lebenszyklus::Pausiert;

        tracing::info!(kanal = %self.kontext.kanal, "Session pausiert");
        true
    }

    /// Setzt einen pausierten Timer fort; false wenn nicht pausiert
    pub async fn fortsetzen(&self) -> bool {
        let mut z = self.zustand.lock().await;
        if z.lebenszyklus != Lebenszyklus::Pausiert {
            return false;
        }

        let jetzt = self.umgebung.zeit.jetzt();
        if let Some(pausiert_am) = z.pausiert_am.take() {
            let pausendauer = (jetzt - pausiert_am).max(TimeDelta::zero());
            z.phase_gestartet_am += pausendauer;
        }
        z.lebenszyklus = Lebenszyklus::Laufend;

        let rest = nicht_negativ(z.restzeit(jetzt));
        self.phasen_timer_planen(&mut z, rest);

        tracing::info!(
            kanal = %self.kontext.kanal,
            rest_ms = rest.as_millis() as u64,
            "Session fortgesetzt"
        );
        true
    }

    /// Stoppt die Session endgueltig; false wenn sie bereits beendet ist
    pub async fn stoppen(&self) -> bool {
        let mut z = self.zustand.lock().await;
        if z.lebenszyklus.ist_terminal() {
            return false;
        }

        z.lebenszyklus = Lebenszyklus::Gestoppt;
        let freigegeben = z.stumm.alle_freigeben(self.plattform()).await;
        self.aufraeumen(&mut z);

        tracing::info!(kanal = %self.kontext.kanal, freigegeben, "Session gestoppt");
        true
    }

    /// Bearbeitet die Status-Nachricht mit dem aktuellen Stand
    pub async fn status_aktualisieren(&self) {
        let z = self.zustand.lock().await;
        if z.lebenszyklus.ist_terminal() {
            return;
        }
        self.status_bearbeiten(&z).await;
    }

    /// Ein Mitglied hat den Sprachkanal betreten
    ///
    /// Waehrend der Fokusphase (auch pausiert) wird es stummgeschaltet.
    pub async fn mitglied_beigetreten(&self, mitglied: MemberId) {
        let mut z = self.zustand.lock().await;
        if z.lebenszyklus.ist_terminal() || z.phase != Phase::Fokus {
            return;
        }
        if z.stumm.stummschalten(self.plattform(), mitglied).await {
            tracing::debug!(
                kanal = %self.kontext.kanal,
                mitglied = %mitglied,
                "Beigetretenes Mitglied stummgeschaltet"
            );
        }
    }

    /// Ein Mitglied hat den Sprachkanal verlassen
    pub async fn mitglied_verlassen(&self, mitglied: MemberId) {
        let mut z = self.zustand.lock().await;
        if z.stumm.freigeben(self.plattform(), mitglied).await {
            tracing::debug!(
                kanal = %self.kontext.kanal,
                mitglied = %mitglied,
                "Mitglied beim Verlassen freigegeben"
            );
        }
    }

    /// Aktuelle Momentaufnahme
    pub async fn ansicht(&self) -> SessionAnsicht {
        let z = self.zustand.lock().await;
        self.ansicht_aus(&z)
    }

    pub async fn lebenszyklus(&self) -> Lebenszyklus {
        self.zustand.lock().await.lebenszyklus
    }

    /// Von dieser Session stummgeschaltete Mitglieder
    pub async fn stumme_mitglieder(&self) -> Vec<MemberId> {
        self.zustand.lock().await.stumm.mitglieder().collect()
    }

    // -----------------------------------------------------------------------
    // Phasenwechsel
    // -----------------------------------------------------------------------

    async fn phasen_timer_abgelaufen(&self, generation: u64) {
        let mut z = self.zustand.lock().await;
        if z.timer_generation != generation || z.lebenszyklus != Lebenszyklus::Laufend {
            return;
        }
        // Eigener Handle: nur loesen, dieser Task laeuft gerade
        drop(z.phasen_timer.take());
        self.phase_wechseln(&mut z).await;
    }

    async fn phase_wechseln(&self, z: &mut SessionZustand) {
        let hinweis = match z.phase {
            Phase::Fokus => {
                z.phase = Phase::Pause;
                z.stumm.alle_freigeben(self.plattform()).await;
                z.rest_bei_phasenstart = delta(self.einstellungen.pause);
                status::pause_hinweis(z.zyklus, self.einstellungen.pause_minuten())
            }
            Phase::Pause => {
                let naechster = z.zyklus + 1;
                if naechster > self.einstellungen.zyklen {
                    self.abschliessen(z).await;
                    return;
                }
                z.zyklus = naechster;
                z.phase = Phase::Fokus;
                let mitglieder = self.mitglieder_abfragen().await;
                z.stumm.alle_stummschalten(self.plattform(), &mitglieder).await;
                z.rest_bei_phasenstart = delta(self.einstellungen.fokus);
                status::fokus_hinweis(z.zyklus, self.einstellungen.fokus_minuten())
            }
        };

        if let Err(e) = self
            .plattform()
            .nachricht_senden(self.kontext.text_kanal, NachrichtInhalt::text(hinweis))
            .await
        {
            tracing::warn!(
                kanal = %self.kontext.kanal,
                fehler = %e,
                "Phasen-Hinweis konnte nicht gesendet werden"
            );
        }

        z.phase_gestartet_am = self.umgebung.zeit.jetzt();
        self.status_bearbeiten(z).await;

        let dauer = match z.phase {
            Phase::Fokus => self.einstellungen.fokus,
            Phase::Pause => self.einstellungen.pause,
        };
        self.phasen_timer_planen(z, dauer);

        tracing::info!(
            kanal = %self.kontext.kanal,
            phase = ?z.phase,
            zyklus = z.zyklus,
            "Phasenwechsel"
        );
        self.umgebung
            .registry
            .ereignis_senden(SessionEreignis::PhaseGewechselt {
                kanal: self.kontext.kanal,
                phase: z.phase,
                zyklus: z.zyklus,
            });
    }

    async fn abschliessen(&self, z: &mut SessionZustand) {
        z.lebenszyklus = Lebenszyklus::Abgeschlossen;
        z.stumm.alle_freigeben(self.plattform()).await;

        if let Err(e) = self
            .plattform()
            .nachricht_senden(
                self.kontext.text_kanal,
                NachrichtInhalt::Abschluss(status::abschluss()),
            )
            .await
        {
            tracing::warn!(
                kanal = %self.kontext.kanal,
                fehler = %e,
                "Abschluss-Nachricht konnte nicht gesendet werden"
            );
        }

        self.aufraeumen(z);
        tracing::info!(
            kanal = %self.kontext.kanal,
            zyklen = self.einstellungen.zyklen,
            "Pomodoro-Session abgeschlossen"
        );
    }

    /// Bricht alle geplanten Arbeiten ab und meldet die Session ab
    fn aufraeumen(&self, z: &mut SessionZustand) {
        z.phasen_timer_abbrechen();
        if let Some(ticker) = z.aktualisierung.take() {
            ticker.abort();
        }
        self.umgebung
            .registry
            .abmelden_wenn(self.kontext.kanal, self);
        self.umgebung.registry.ereignis_senden(SessionEreignis::Beendet {
            kanal: self.kontext.kanal,
            lebenszyklus: z.lebenszyklus,
        });
    }

    // -----------------------------------------------------------------------
    // Timer
    // -----------------------------------------------------------------------

    fn phasen_timer_planen(&self, z: &mut SessionZustand, dauer: Duration) {
        z.phasen_timer_abbrechen();
        let generation = z.timer_generation;
        let session = self.selbst.clone();

        z.phasen_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(dauer).await;
            if let Some(session) = session.upgrade() {
                session.phasen_timer_abgelaufen(generation).await;
            }
        }));
    }

    fn aktualisierung_starten(&self, z: &mut SessionZustand) {
        let intervall = self.umgebung.aktualisierungs_intervall;
        if intervall.is_zero() {
            return;
        }
        let session = self.selbst.clone();

        z.aktualisierung = Some(tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval_at(tokio::time::Instant::now() + intervall, intervall);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(session) = session.upgrade() else {
                    break;
                };
                if !session.periodisch_aktualisieren().await {
                    break;
                }
            }
        }));
    }

    /// Ein Tick der periodischen Aktualisierung; false beendet den Ticker
    async fn periodisch_aktualisieren(&self) -> bool {
        let z = self.zustand.lock().await;
        if z.lebenszyklus.ist_terminal() {
            return false;
        }
        if z.lebenszyklus == Lebenszyklus::Pausiert {
            return true;
        }
        if z.restzeit(self.umgebung.zeit.jetzt()) <= TimeDelta::zero() {
            return true;
        }
        self.status_bearbeiten(&z).await;
        true
    }

    // -----------------------------------------------------------------------
    // Hilfsfunktionen
    // -----------------------------------------------------------------------

    async fn mitglieder_abfragen(&self) -> Vec<MemberId> {
        match self.plattform().mitglieder_von(self.kontext.kanal).await {
            Ok(mitglieder) => mitglieder,
            Err(e) => {
                tracing::warn!(
                    kanal = %self.kontext.kanal,
                    fehler = %e,
                    "Mitgliederliste nicht verfuegbar"
                );
                Vec::new()
            }
        }
    }

    async fn status_bearbeiten(&self, z: &SessionZustand) {
        let Some(handle) = z.status_nachricht.as_ref() else {
            return;
        };
        let inhalt = NachrichtInhalt::Status(status::darstellen(&self.ansicht_aus(z)));
        if let Err(e) = self.plattform().nachricht_bearbeiten(handle, inhalt).await {
            tracing::warn!(
                kanal = %self.kontext.kanal,
                fehler = %e,
                "Status-Nachricht konnte nicht aktualisiert werden"
            );
        }
    }

    fn ansicht_aus(&self, z: &SessionZustand) -> SessionAnsicht {
        SessionAnsicht {
            kanal: self.kontext.kanal,
            kanal_name: self.kontext.kanal_name.clone(),
            phase: z.phase,
            zyklus: z.zyklus,
            zyklen: self.einstellungen.zyklen,
            lebenszyklus: z.lebenszyklus,
            restzeit_ms: z.restzeit(self.umgebung.zeit.jetzt()).num_milliseconds(),
            einstellungen: self.einstellungen,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{self, TestPlattform, KANAL};

    const MINUTE: Duration = Duration::from_secs(60);

    fn aufbau(
        fokus: u64,
        pause: u64,
        zyklen: u32,
    ) -> (Arc<TestPlattform>, SessionRegistry, Arc<PomodoroSession>) {
        let p = TestPlattform::neu();
        p.betreten(MemberId(1), KANAL);
        p.betreten(MemberId(2), KANAL);
        let registry = SessionRegistry::neu();
        let s = testutil::session(&p, &registry, testutil::einstellungen(fokus, pause, zyklen));
        (p, registry, s)
    }

    /// Laesst die virtuelle Uhr vorlaufen und gibt gespawnten Tasks Zeit
    async fn vorspulen(dauer: Duration) {
        tokio::time::sleep(dauer).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn starten_schaltet_stumm_und_sendet_status() {
        let (p, _r, s) = aufbau(25, 5, 4);
        s.starten().await;

        let mut stumm = s.stumme_mitglieder().await;
        stumm.sort();
        assert_eq!(stumm, vec![MemberId(1), MemberId(2)]);
        assert!(p
            .aufrufe()
            .iter()
            .any(|a| matches!(a, testutil::Aufruf::Gesendet(_, NachrichtInhalt::Status(_)))));

        let a = s.ansicht().await;
        assert_eq!(a.phase, Phase::Fokus);
        assert_eq!(a.zyklus, 1);
        assert_eq!(a.restzeit_ms, 25 * 60_000);
    }

    #[tokio::test(start_paused = true)]
    async fn ein_zyklus_endet_nach_der_pause() {
        let (p, registry, s) = aufbau(1, 1, 1);
        s.starten().await;

        vorspulen(MINUTE).await;
        let a = s.ansicht().await;
        assert_eq!(a.phase, Phase::Pause);
        assert_eq!(a.zyklus, 1);
        assert!(s.stumme_mitglieder().await.is_empty());

        vorspulen(MINUTE).await;
        assert_eq!(s.lebenszyklus().await, Lebenszyklus::Abgeschlossen);
        assert!(!registry.ist_aktiv(KANAL));
        assert!(p.abschluss_gesendet());

        // kein zweiter Fokus
        let texte = p.texte();
        assert_eq!(texte, vec!["☕ Zyklus 1: Pause beginnt (1 Min.)".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn phasen_wechseln_abwechselnd_bis_zum_abschluss() {
        let (p, _r, s) = aufbau(2, 1, 3);
        s.starten().await;

        for zyklus in 1..=3u32 {
            vorspulen(2 * MINUTE).await;
            let a = s.ansicht().await;
            assert_eq!((a.phase, a.zyklus), (Phase::Pause, zyklus));

            vorspulen(MINUTE).await;
            if zyklus < 3 {
                let a = s.ansicht().await;
                assert_eq!((a.phase, a.zyklus), (Phase::Fokus, zyklus + 1));
            }
        }
        assert_eq!(s.lebenszyklus().await, Lebenszyklus::Abgeschlossen);
        assert_eq!(s.ansicht().await.zyklus, 3);

        let texte = p.texte();
        assert_eq!(texte.len(), 5);
        assert!(texte[0].starts_with("☕ Zyklus 1"));
        assert!(texte[1].starts_with("🍅 Zyklus 2"));
        assert!(texte[4].starts_with("☕ Zyklus 3"));
    }

    #[tokio::test(start_paused = true)]
    async fn fokusbeginn_schaltet_gesamten_kanal_stumm() {
        let (p, _r, s) = aufbau(1, 1, 2);
        s.starten().await;
        vorspulen(MINUTE).await;

        p.betreten(MemberId(3), KANAL);
        vorspulen(MINUTE).await;

        let mut stumm = s.stumme_mitglieder().await;
        stumm.sort();
        assert_eq!(stumm, vec![MemberId(1), MemberId(2), MemberId(3)]);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_und_sofortiges_fortsetzen_aendert_restzeit_nicht() {
        let (_p, _r, s) = aufbau(25, 5, 4);
        s.starten().await;
        vorspulen(Duration::from_secs(100)).await;

        let vorher = s.ansicht().await.restzeit_ms;
        assert!(s.pausieren().await);
        assert!(s.fortsetzen().await);
        assert_eq!(s.ansicht().await.restzeit_ms, vorher);
    }

    #[tokio::test(start_paused = true)]
    async fn pausen_verlaengern_die_phase_exakt() {
        let (_p, _r, s) = aufbau(10, 5, 1);
        s.starten().await;

        // 3 + 4 + 3 = 10 Minuten Laufzeit, dazwischen 20 + 7 Minuten Pause
        vorspulen(3 * MINUTE).await;
        assert!(s.pausieren().await);
        vorspulen(20 * MINUTE).await;
        assert_eq!(s.ansicht().await.restzeit_ms, 7 * 60_000);
        assert_eq!(s.ansicht().await.phase, Phase::Fokus);

        assert!(s.fortsetzen().await);
        vorspulen(4 * MINUTE).await;
        assert!(s.pausieren().await);
        vorspulen(7 * MINUTE).await;
        assert!(s.fortsetzen().await);

        vorspulen(3 * MINUTE - Duration::from_secs(1)).await;
        assert_eq!(s.ansicht().await.phase, Phase::Fokus);
        vorspulen(Duration::from_secs(1)).await;
        assert_eq!(s.ansicht().await.phase, Phase::Pause);
    }

    #[tokio::test(start_paused = true)]
    async fn pausieren_und_fortsetzen_melden_ungueltige_uebergaenge() {
        let (_p, _r, s) = aufbau(25, 5, 4);
        s.starten().await;

        assert!(!s.fortsetzen().await);
        assert!(s.pausieren().await);
        assert!(!s.pausieren().await);
        assert_eq!(s.lebenszyklus().await, Lebenszyklus::Pausiert);

        s.stoppen().await;
        assert!(!s.pausieren().await);
        assert!(!s.fortsetzen().await);
    }

    #[tokio::test(start_paused = true)]
    async fn pausierte_session_wechselt_keine_phase() {
        let (_p, _r, s) = aufbau(1, 1, 1);
        s.starten().await;
        assert!(s.pausieren().await);

        vorspulen(10 * MINUTE).await;
        let a = s.ansicht().await;
        assert_eq!(a.phase, Phase::Fokus);
        assert_eq!(a.lebenszyklus, Lebenszyklus::Pausiert);
    }

    #[tokio::test(start_paused = true)]
    async fn doppeltes_stoppen_gibt_nur_einmal_frei() {
        let (p, registry, s) = aufbau(25, 5, 4);
        s.starten().await;
        p.aufrufe_leeren();

        assert!(s.stoppen().await);
        assert!(!s.stoppen().await);

        let freigaben: Vec<_> = p.stumm_aufrufe().into_iter().filter(|(_, st)| !st).collect();
        assert_eq!(freigaben.len(), 2);
        assert_eq!(s.lebenszyklus().await, Lebenszyklus::Gestoppt);
        assert!(!registry.ist_aktiv(KANAL));
    }

    #[tokio::test(start_paused = true)]
    async fn gestoppte_session_plant_nichts_mehr() {
        let (p, _r, s) = aufbau(1, 1, 2);
        s.starten().await;
        s.stoppen().await;
        p.aufrufe_leeren();

        vorspulen(10 * MINUTE).await;
        assert!(p.aufrufe().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn periodische_aktualisierung_nur_wenn_laufend() {
        let (p, _r, s) = aufbau(25, 5, 4);
        s.starten().await;

        vorspulen(Duration::from_secs(30)).await;
        assert_eq!(p.anzahl_bearbeitet(), 3);

        s.pausieren().await;
        vorspulen(Duration::from_secs(60)).await;
        assert_eq!(p.anzahl_bearbeitet(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn keine_aktualisierung_bei_abgelaufener_restzeit() {
        let (p, _r, s) = aufbau(25, 5, 4);
        s.starten().await;
        {
            // Phase laeuft weiter, Timer hat aber noch nicht gewechselt
            let mut z = s.zustand.lock().await;
            z.phasen_timer_abbrechen();
            z.rest_bei_phasenstart = TimeDelta::zero();
        }
        let vorher = p.anzahl_bearbeitet();

        assert!(s.periodisch_aktualisieren().await);
        assert_eq!(p.anzahl_bearbeitet(), vorher);

        vorspulen(Duration::from_secs(30)).await;
        assert_eq!(p.anzahl_bearbeitet(), vorher);
        assert_eq!(s.lebenszyklus().await, Lebenszyklus::Laufend);

        s.stoppen().await;
    }

    #[tokio::test(start_paused = true)]
    async fn fehlgeschlagene_bearbeitung_haelt_timer_nicht_an() {
        let (p, _r, s) = aufbau(1, 1, 1);
        p.bearbeiten_fehlschlagen();
        s.starten().await;

        vorspulen(2 * MINUTE).await;
        assert_eq!(s.lebenszyklus().await, Lebenszyklus::Abgeschlossen);
    }

    #[tokio::test(start_paused = true)]
    async fn beitritt_in_fokus_und_pause() {
        let (p, _r, s) = aufbau(1, 1, 2);
        s.starten().await;

        p.betreten(MemberId(7), KANAL);
        s.mitglied_beigetreten(MemberId(7)).await;
        assert!(s.stumme_mitglieder().await.contains(&MemberId(7)));

        p.verlassen(MemberId(7));
        s.mitglied_verlassen(MemberId(7)).await;
        assert!(!s.stumme_mitglieder().await.contains(&MemberId(7)));
        assert_eq!(p.stumm_aufrufe().last(), Some(&(MemberId(7), false)));

        vorspulen(MINUTE).await;
        assert_eq!(s.ansicht().await.phase, Phase::Pause);

        p.aufrufe_leeren();
        p.betreten(MemberId(7), KANAL);
        s.mitglied_beigetreten(MemberId(7)).await;
        assert!(p.stumm_aufrufe().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn beitritt_in_pausierter_fokusphase_schaltet_stumm() {
        let (_p, _r, s) = aufbau(25, 5, 4);
        s.starten().await;
        s.pausieren().await;

        s.mitglied_beigetreten(MemberId(9)).await;
        assert!(s.stumme_mitglieder().await.contains(&MemberId(9)));
    }
}
