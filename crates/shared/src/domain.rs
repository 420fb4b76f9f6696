use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::avatar::AvatarColors;

/// Opaque identity assigned by the media backend to a stage participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub String);

/// Position of a seat within a stage grid, row-major from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeatIndex(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantProfile {
    pub participant_id: ParticipantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub audio_muted: bool,
    pub speaking: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<AvatarColors>,
    pub joined_at: DateTime<Utc>,
}

impl ParticipantProfile {
    /// Name shown on a taken seat; falls back to the backend identity.
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.participant_id.0)
    }
}

/// The local user's relationship to the stage. Hosts never claim audio
/// seats; a seated user moves instead of publishing again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocalSeating {
    pub is_host: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seat: Option<SeatIndex>,
}

impl LocalSeating {
    pub fn audience() -> Self {
        Self::default()
    }

    pub fn host() -> Self {
        Self {
            is_host: true,
            seat: None,
        }
    }

    pub fn seated(seat: SeatIndex) -> Self {
        Self {
            is_host: false,
            seat: Some(seat),
        }
    }

    pub fn is_on_stage(&self) -> bool {
        self.seat.is_some()
    }
}
