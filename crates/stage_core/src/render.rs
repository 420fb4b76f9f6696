//! Render decisions as plain data. A view layer (terminal, GUI, whatever)
//! draws these; nothing here touches a UI toolkit.

use serde::{Deserialize, Serialize};
use shared::avatar::Rgb;
use shared::domain::LocalSeating;

use crate::occupancy::{SeatOccupancy, SeatState, StageSnapshot};

/// Opacity applied to the placeholder avatar rectangles.
pub const PLACEHOLDER_OPACITY: f32 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatBorder {
    Idle,
    Speaking,
}

/// Exactly one of placeholder or color composite is shown per avatar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AvatarVisual {
    Placeholder { opacity: f32 },
    Composite { bottom: Rgb, left: Rgb, right: Rgb },
}

impl AvatarVisual {
    /// The dimmed stand-in drawn until a participant has avatar colors.
    pub fn placeholder() -> Self {
        Self::Placeholder {
            opacity: PLACEHOLDER_OPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "seat", rename_all = "snake_case")]
pub enum SeatVisual {
    /// Free seat; `joinable` gates the join affordance (hosts never claim
    /// audio seats).
    Empty { joinable: bool },
    /// Claimed seat waiting on directory data: placeholder avatar plus a
    /// loading marker.
    Pending { avatar: AvatarVisual },
    Occupied {
        avatar: AvatarVisual,
        muted: bool,
        border: SeatBorder,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display_name: Option<String>,
    },
}

/// Decides what one seat looks like given its sampled state and the local
/// user's standing.
pub fn seat_visual(state: &SeatState, local: &LocalSeating) -> SeatVisual {
    match &state.occupancy {
        SeatOccupancy::Empty => SeatVisual::Empty {
            joinable: !local.is_host,
        },
        SeatOccupancy::Pending(_) => SeatVisual::Pending {
            avatar: AvatarVisual::placeholder(),
        },
        SeatOccupancy::Occupied(profile) => SeatVisual::Occupied {
            avatar: profile
                .avatar
                .map(|colors| AvatarVisual::Composite {
                    bottom: colors.bottom,
                    left: colors.left,
                    right: colors.right,
                })
                .unwrap_or_else(AvatarVisual::placeholder),
            muted: profile.audio_muted,
            border: if profile.speaking {
                SeatBorder::Speaking
            } else {
                SeatBorder::Idle
            },
            display_name: Some(profile.display_name().to_string()),
        },
    }
}

/// Render decisions for the whole snapshot, row by row.
pub fn stage_visuals(snapshot: &StageSnapshot, local: &LocalSeating) -> Vec<Vec<SeatVisual>> {
    snapshot
        .rows
        .iter()
        .map(|row| {
            row.seats
                .iter()
                .map(|seat| seat_visual(seat, local))
                .collect()
        })
        .collect()
}
