//! Stummschaltungs-Koordinator
//!
//! Merkt sich welche Mitglieder *diese* Session stummgeschaltet hat.
//! Freigegeben wird nur wer in dieser Menge steht, Mitglieder die von
//! anderer Stelle stummgeschaltet wurden bleiben unberuehrt.
//!
//! Fehler einzelner Mitglieder werden geloggt und brechen den Durchlauf
//! nie ab.

use pomodoro_core::MemberId;
use std::collections::BTreeSet;

use crate::plattform::Plattform;

/// Verfolgt die von einer Session gesetzten Stummschaltungen
#[derive(Debug, Default)]
pub struct MuteKoordinator {
    stumm: BTreeSet<MemberId>,
}

impl MuteKoordinator {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Schaltet alle uebergebenen Mitglieder stumm
    ///
    /// Gibt die Anzahl erfolgreicher Stummschaltungen zurueck.
    pub async fn alle_stummschalten(
        &mut self,
        plattform: &dyn Plattform,
        mitglieder: &[MemberId],
    ) -> usize {
        let mut erfolgreich = 0;
        for &mitglied in mitglieder {
            if self.stummschalten(plattform, mitglied).await {
                erfolgreich += 1;
            }
        }
        erfolgreich
    }

    /// Gibt alle verfolgten Mitglieder frei
    ///
    /// Mitglieder die in keinem Sprachkanal mehr sind werden uebersprungen.
    /// Die Menge ist danach immer leer, auch wenn einzelne Freigaben
    /// fehlgeschlagen sind.
    pub async fn alle_freigeben(&mut self, plattform: &dyn Plattform) -> usize {
        let mitglieder = std::mem::take(&mut self.stumm);
        let mut erfolgreich = 0;

        for mitglied in mitglieder {
            match plattform.sprachkanal_von(mitglied).await {
                Ok(Some(_)) => {}
                Ok(None) => {
                    tracing::debug!(
                        mitglied = %mitglied,
                        "Nicht mehr im Sprachkanal, Freigabe uebersprungen"
                    );
                    continue;
                }
                Err(e) => {
                    tracing::warn!(mitglied = %mitglied, fehler = %e, "Mitglied nicht aufloesbar");
                    continue;
                }
            }

            match plattform.stumm_setzen(mitglied, false).await {
                Ok(()) => erfolgreich += 1,
                Err(e) => {
                    tracing::warn!(mitglied = %mitglied, fehler = %e, "Freigabe fehlgeschlagen");
                }
            }
        }
        erfolgreich
    }

    /// Schaltet ein einzelnes Mitglied stumm; true bei Erfolg
    pub async fn stummschalten(&mut self, plattform: &dyn Plattform, mitglied: MemberId) -> bool {
        match plattform.stumm_setzen(mitglied, true).await {
            Ok(()) => {
                self.stumm.insert(mitglied);
                true
            }
            Err(e) => {
                tracing::warn!(mitglied = %mitglied, fehler = %e, "Stummschaltung fehlgeschlagen");
                false
            }
        }
    }

    /// Gibt ein einzelnes Mitglied frei, sofern diese Session es stummgeschaltet hat
    pub async fn freigeben(&mut self, plattform: &dyn Plattform, mitglied: MemberId) -> bool {
        if !self.stumm.contains(&mitglied) {
            return false;
        }
        match plattform.stumm_setzen(mitglied, false).await {
            Ok(()) => {
                self.stumm.remove(&mitglied);
                true
            }
            Err(e) => {
                tracing::warn!(mitglied = %mitglied, fehler = %e, "Freigabe fehlgeschlagen");
                false
            }
        }
    }

    pub fn ist_stumm(&self, mitglied: MemberId) -> bool {
        self.stumm.contains(&mitglied)
    }

    pub fn anzahl(&self) -> usize {
        self.stumm.len()
    }

    pub fn mitglieder(&self) -> impl Iterator<Item = MemberId> + '_ {
        self.stumm.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{TestPlattform, KANAL};

    #[tokio::test]
    async fn stummschalten_isoliert_fehler() {
        let p = TestPlattform::neu();
        p.stumm_fehler_fuer(MemberId(2));
        let mut k = MuteKoordinator::neu();

        let n = k
            .alle_stummschalten(p.as_ref(), &[MemberId(1), MemberId(2), MemberId(3)])
            .await;

        assert_eq!(n, 2);
        assert!(k.ist_stumm(MemberId(1)));
        assert!(!k.ist_stumm(MemberId(2)));
        assert!(k.ist_stumm(MemberId(3)));
        assert_eq!(p.stumm_aufrufe().len(), 3);
    }

    #[tokio::test]
    async fn alle_freigeben_leert_menge_trotz_fehlern() {
        let p = TestPlattform::neu();
        for i in 1..=3 {
            p.betreten(MemberId(i), KANAL);
        }
        let mut k = MuteKoordinator::neu();
        k.alle_stummschalten(p.as_ref(), &[MemberId(1), MemberId(2), MemberId(3)])
            .await;

        p.stumm_fehler_fuer(MemberId(2));
        p.aufrufe_leeren();
        let n = k.alle_freigeben(p.as_ref()).await;

        assert_eq!(n, 2);
        assert_eq!(k.anzahl(), 0);
        assert_eq!(p.stumm_aufrufe().len(), 3);
    }

    #[tokio::test]
    async fn verlassene_mitglieder_werden_nicht_freigegeben() {
        let p = TestPlattform::neu();
        p.betreten(MemberId(1), KANAL);
        let mut k = MuteKoordinator::neu();
        k.alle_stummschalten(p.as_ref(), &[MemberId(1), MemberId(2)])
            .await;

        p.aufrufe_leeren();
        k.alle_freigeben(p.as_ref()).await;

        assert_eq!(p.stumm_aufrufe(), vec![(MemberId(1), false)]);
        assert_eq!(k.anzahl(), 0);
    }

    #[tokio::test]
    async fn freigeben_nur_fuer_eigene_stummschaltungen() {
        let p = TestPlattform::neu();
        let mut k = MuteKoordinator::neu();

        assert!(!k.freigeben(p.as_ref(), MemberId(9)).await);
        assert!(p.stumm_aufrufe().is_empty());
    }

    #[tokio::test]
    async fn fehlgeschlagene_freigabe_bleibt_verfolgt() {
        let p = TestPlattform::neu();
        let mut k = MuteKoordinator::neu();
        k.stummschalten(p.as_ref(), MemberId(4)).await;

        p.stumm_fehler_fuer(MemberId(4));
        assert!(!k.freigeben(p.as_ref(), MemberId(4)).await);
        assert!(k.ist_stumm(MemberId(4)));
    }
}
