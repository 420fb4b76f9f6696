//! Seams to the externally-owned stage backend: who sits where, who the
//! participants are, and the command channel for claiming seats. The host
//! application wires real implementations; this crate only defines the
//! capabilities the presentation core consumes.

use async_trait::async_trait;
use shared::domain::{ParticipantId, ParticipantProfile, SeatIndex};
use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipEvent {
    SeatClaimed {
        seat: SeatIndex,
        participant_id: ParticipantId,
    },
    SeatReleased {
        seat: SeatIndex,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryEvent {
    ProfileUpdated { participant_id: ParticipantId },
    ProfileRemoved { participant_id: ParticipantId },
}

/// Current seat assignments of the live session. Absence is state, not an
/// error: an unknown or out-of-range seat reads as unoccupied.
#[async_trait]
pub trait StageMembership: Send + Sync {
    async fn occupant_at(&self, seat: SeatIndex) -> Option<ParticipantId>;
    fn subscribe_events(&self) -> broadcast::Receiver<MembershipEvent>;
}

/// Directory lookup for participant metadata. A seat whose occupant has no
/// directory entry yet renders as pending until `ProfileUpdated` arrives.
#[async_trait]
pub trait ParticipantDirectory: Send + Sync {
    async fn profile(&self, participant_id: &ParticipantId) -> Option<ParticipantProfile>;
    fn subscribe_events(&self) -> broadcast::Receiver<DirectoryEvent>;
}

/// Commands issued on behalf of the local user. Completion and failure
/// feedback are the backend's concern; callers dispatch and move on.
#[async_trait]
pub trait StageControlPlane: Send + Sync {
    async fn request_seat_change(&self, seat: SeatIndex) -> anyhow::Result<()>;
    async fn request_publish(&self, seat: SeatIndex) -> anyhow::Result<()>;
}
