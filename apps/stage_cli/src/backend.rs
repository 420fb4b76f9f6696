//! In-memory stage backend for the demo: one object plays all three
//! collaborator roles so the engine can be exercised end to end without a
//! media server.

use std::{collections::HashMap, sync::Arc};

use anyhow::bail;
use async_trait::async_trait;
use shared::domain::{ParticipantId, ParticipantProfile, SeatIndex};
use stage_backend::{
    DirectoryEvent, MembershipEvent, ParticipantDirectory, StageControlPlane, StageMembership,
};
use tokio::sync::{broadcast, Mutex};
use tracing::info;

const EVENT_CHANNEL_CAPACITY: usize = 64;

pub struct InMemoryStage {
    local_participant: ParticipantId,
    seats: Mutex<HashMap<SeatIndex, ParticipantId>>,
    profiles: Mutex<HashMap<ParticipantId, ParticipantProfile>>,
    membership_events: broadcast::Sender<MembershipEvent>,
    directory_events: broadcast::Sender<DirectoryEvent>,
}

impl InMemoryStage {
    pub fn new(local_participant: ParticipantId) -> Arc<Self> {
        let (membership_events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (directory_events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            local_participant,
            seats: Mutex::new(HashMap::new()),
            profiles: Mutex::new(HashMap::new()),
            membership_events,
            directory_events,
        })
    }

    pub async fn seat_participant(&self, seat: SeatIndex, participant_id: ParticipantId) {
        self.seats
            .lock()
            .await
            .insert(seat, participant_id.clone());
        let _ = self.membership_events.send(MembershipEvent::SeatClaimed {
            seat,
            participant_id,
        });
    }

    pub async fn release_seat(&self, seat: SeatIndex) {
        if self.seats.lock().await.remove(&seat).is_some() {
            let _ = self
                .membership_events
                .send(MembershipEvent::SeatReleased { seat });
        }
    }

    pub async fn upsert_profile(&self, profile: ParticipantProfile) {
        let participant_id = profile.participant_id.clone();
        self.profiles
            .lock()
            .await
            .insert(participant_id.clone(), profile);
        let _ = self
            .directory_events
            .send(DirectoryEvent::ProfileUpdated { participant_id });
    }

    pub async fn set_muted(&self, participant_id: &ParticipantId, muted: bool) {
        self.update_profile(participant_id, |profile| profile.audio_muted = muted)
            .await;
    }

    pub async fn set_speaking(&self, participant_id: &ParticipantId, speaking: bool) {
        self.update_profile(participant_id, |profile| profile.speaking = speaking)
            .await;
    }

    async fn update_profile(
        &self,
        participant_id: &ParticipantId,
        apply: impl FnOnce(&mut ParticipantProfile),
    ) {
        let mut profiles = self.profiles.lock().await;
        let Some(profile) = profiles.get_mut(participant_id) else {
            return;
        };
        apply(profile);
        drop(profiles);
        let _ = self.directory_events.send(DirectoryEvent::ProfileUpdated {
            participant_id: participant_id.clone(),
        });
    }

    async fn local_seat(&self) -> Option<SeatIndex> {
        let seats = self.seats.lock().await;
        seats
            .iter()
            .find(|(_, occupant)| **occupant == self.local_participant)
            .map(|(seat, _)| *seat)
    }
}

#[async_trait]
impl StageMembership for InMemoryStage {
    async fn occupant_at(&self, seat: SeatIndex) -> Option<ParticipantId> {
        self.seats.lock().await.get(&seat).cloned()
    }

    fn subscribe_events(&self) -> broadcast::Receiver<MembershipEvent> {
        self.membership_events.subscribe()
    }
}

#[async_trait]
impl ParticipantDirectory for InMemoryStage {
    async fn profile(&self, participant_id: &ParticipantId) -> Option<ParticipantProfile> {
        self.profiles.lock().await.get(participant_id).cloned()
    }

    fn subscribe_events(&self) -> broadcast::Receiver<DirectoryEvent> {
        self.directory_events.subscribe()
    }
}

#[async_trait]
impl StageControlPlane for InMemoryStage {
    async fn request_seat_change(&self, seat: SeatIndex) -> anyhow::Result<()> {
        if self.seats.lock().await.contains_key(&seat) {
            bail!("seat {} is already taken", seat.0);
        }
        if let Some(current) = self.local_seat().await {
            self.release_seat(current).await;
        }
        info!(seat = seat.0, "demo stage: local participant moved");
        self.seat_participant(seat, self.local_participant.clone())
            .await;
        Ok(())
    }

    async fn request_publish(&self, seat: SeatIndex) -> anyhow::Result<()> {
        if self.seats.lock().await.contains_key(&seat) {
            bail!("seat {} is already taken", seat.0);
        }
        info!(seat = seat.0, "demo stage: local participant publishing");
        self.seat_participant(seat, self.local_participant.clone())
            .await;
        Ok(())
    }
}
