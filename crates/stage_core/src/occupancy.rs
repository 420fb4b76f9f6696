//! Per-seat occupancy: the three-way state sampled from the membership and
//! directory collaborators, and the immutable snapshot handed to renderers.

use serde::{Deserialize, Serialize};
use shared::domain::{ParticipantId, ParticipantProfile, SeatIndex};

use crate::grid::GridDimensions;

/// Exactly one of these holds per seat at any sampling instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum SeatOccupancy {
    /// No occupant bound to the seat.
    Empty,
    /// An occupant claimed the seat but the directory has not caught up yet.
    Pending(ParticipantId),
    /// Occupant and directory metadata both present.
    Occupied(ParticipantProfile),
}

impl SeatOccupancy {
    pub fn resolve(
        occupant: Option<ParticipantId>,
        profile: Option<ParticipantProfile>,
    ) -> Self {
        match (occupant, profile) {
            (None, _) => Self::Empty,
            (Some(participant_id), None) => Self::Pending(participant_id),
            (Some(_), Some(profile)) => Self::Occupied(profile),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn occupant(&self) -> Option<&ParticipantId> {
        match self {
            Self::Empty => None,
            Self::Pending(participant_id) => Some(participant_id),
            Self::Occupied(profile) => Some(&profile.participant_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatState {
    pub index: SeatIndex,
    pub occupancy: SeatOccupancy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub seats: Vec<SeatState>,
}

/// One sampling of the whole stage. Structurally comparable so renderers
/// and tests can diff consecutive snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSnapshot {
    pub dimensions: GridDimensions,
    pub rows: Vec<SnapshotRow>,
}

impl StageSnapshot {
    pub fn seats(&self) -> impl Iterator<Item = &SeatState> {
        self.rows.iter().flat_map(|row| row.seats.iter())
    }

    pub fn seat(&self, index: SeatIndex) -> Option<&SeatState> {
        self.seats().find(|seat| seat.index == index)
    }
}
