//! Row-major seat grid construction. Building a grid is pure and
//! deterministic; occupancy is sampled from the caller-supplied lookup and
//! never mutated here.

use serde::{Deserialize, Serialize};
use shared::domain::{ParticipantId, SeatIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDimensions {
    pub rows: u32,
    pub columns: u32,
}

impl GridDimensions {
    /// The stock audio stage layout: three rows of four seats.
    pub const AUDIO_STAGE: Self = Self {
        rows: 3,
        columns: 4,
    };

    pub fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    pub fn capacity(&self) -> u32 {
        self.rows * self.columns
    }

    pub fn contains(&self, seat: SeatIndex) -> bool {
        seat.0 < self.capacity()
    }

    /// `(row, column)` of a seat, or `None` when the seat is outside the
    /// grid or the grid is degenerate. For view layers that address seats
    /// by cell instead of walking the rows.
    pub fn position(&self, seat: SeatIndex) -> Option<(u32, u32)> {
        if self.columns == 0 || !self.contains(seat) {
            return None;
        }
        Some((seat.0 / self.columns, seat.0 % self.columns))
    }

    pub fn seat_indices(&self) -> impl Iterator<Item = SeatIndex> {
        (0..self.capacity()).map(SeatIndex)
    }
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self::AUDIO_STAGE
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub index: SeatIndex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupant: Option<ParticipantId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatRow {
    pub seats: Vec<Seat>,
}

/// Builds `dims.rows` rows of `dims.columns` seats with indices assigned
/// row-major from zero, sampling `occupant_at` once per seat. Degenerate
/// dimensions (zero rows or columns) yield an empty vec.
pub fn build_seat_rows(
    dims: GridDimensions,
    occupant_at: impl Fn(SeatIndex) -> Option<ParticipantId>,
) -> Vec<SeatRow> {
    if dims.capacity() == 0 {
        return Vec::new();
    }
    let mut rows = Vec::with_capacity(dims.rows as usize);
    let mut index = 0u32;
    for _ in 0..dims.rows {
        let mut seats = Vec::with_capacity(dims.columns as usize);
        for _ in 0..dims.columns {
            let seat_index = SeatIndex(index);
            seats.push(Seat {
                index: seat_index,
                occupant: occupant_at(seat_index),
            });
            index += 1;
        }
        rows.push(SeatRow { seats });
    }
    rows
}
