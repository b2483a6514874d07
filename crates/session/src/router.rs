//! Membership-Router
//!
//! Leitet Sprachkanal-Ereignisse an die Session des betroffenen Kanals
//! weiter. Ein Wechsel wird als Verlassen des alten und Betreten des
//! neuen Kanals behandelt.

use pomodoro_core::{ChannelId, MemberId, VoiceEvent};

use crate::registry::SessionRegistry;

/// Verteilt [`VoiceEvent`]s an die zustaendigen Sessions
#[derive(Clone)]
pub struct MembershipRouter {
    registry: SessionRegistry,
}

impl MembershipRouter {
    pub fn neu(registry: SessionRegistry) -> Self {
        Self { registry }
    }

    pub async fn verarbeiten(&self, ereignis: VoiceEvent) {
        tracing::trace!(mitglied = %ereignis.mitglied(), ?ereignis, "Sprachereignis");
        match ereignis {
            VoiceEvent::Beigetreten { mitglied, kanal } => {
                self.beigetreten(mitglied, kanal).await;
            }
            VoiceEvent::Verlassen { mitglied, kanal } => {
                self.verlassen(mitglied, kanal).await;
            }
            VoiceEvent::Gewechselt {
                mitglied,
                von,
                nach,
            } => {
                self.verlassen(mitglied, von).await;
                self.beigetreten(mitglied, nach).await;
            }
        }
    }

    async fn beigetreten(&self, mitglied: MemberId, kanal: ChannelId) {
        if let Some(session) = self.registry.suchen(kanal) {
            session.mitglied_beigetreten(mitglied).await;
        }
    }

    async fn verlassen(&self, mitglied: MemberId, kanal: ChannelId) {
        if let Some(session) = self.registry.suchen(kanal) {
            session.mitglied_verlassen(mitglied).await;
        }
    }
}
