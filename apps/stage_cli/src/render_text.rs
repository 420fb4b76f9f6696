//! Terminal rendering of the seat grid: one bracketed cell per seat,
//! consuming the render model's decisions.
//!
//! Cell legend: `+` joinable empty seat, `-` empty seat (host view),
//! `..` pending occupant, otherwise the display name. Muted occupants get
//! a trailing `[m]`, speaking occupants are wrapped in `*`.

use shared::domain::LocalSeating;
use stage_core::{stage_visuals, SeatBorder, SeatVisual, StageSnapshot};

pub fn render_stage(
    snapshot: &StageSnapshot,
    local: &LocalSeating,
    cell_width: usize,
) -> String {
    let mut out = String::new();
    for row in stage_visuals(snapshot, local) {
        for visual in row {
            let label = cell_label(&visual, cell_width);
            out.push_str(&format!("[{label:^cell_width$}]"));
        }
        out.push('\n');
    }
    out
}

fn cell_label(visual: &SeatVisual, cell_width: usize) -> String {
    match visual {
        SeatVisual::Empty { joinable: true } => "+".to_string(),
        SeatVisual::Empty { joinable: false } => "-".to_string(),
        SeatVisual::Pending { .. } => "..".to_string(),
        SeatVisual::Occupied {
            muted,
            border,
            display_name,
            ..
        } => {
            let mut label = display_name.clone().unwrap_or_else(|| "?".to_string());
            if *muted {
                label.push_str("[m]");
            }
            if *border == SeatBorder::Speaking {
                label = format!("*{label}*");
            }
            if label.chars().count() > cell_width {
                label = label.chars().take(cell_width).collect();
            }
            label
        }
    }
}

#[cfg(test)]
mod tests {
    use shared::domain::{ParticipantId, SeatIndex};
    use stage_core::{GridDimensions, SeatOccupancy, SeatState, SnapshotRow};

    use super::*;

    fn snapshot_with(occupancies: Vec<Vec<SeatOccupancy>>) -> StageSnapshot {
        let columns = occupancies.first().map(|row| row.len()).unwrap_or(0) as u32;
        let mut index = 0u32;
        let rows = occupancies
            .into_iter()
            .map(|row| SnapshotRow {
                seats: row
                    .into_iter()
                    .map(|occupancy| {
                        let seat = SeatState {
                            index: SeatIndex(index),
                            occupancy,
                        };
                        index += 1;
                        seat
                    })
                    .collect(),
            })
            .collect::<Vec<_>>();
        StageSnapshot {
            dimensions: GridDimensions::new(rows.len() as u32, columns),
            rows,
        }
    }

    #[test]
    fn renders_empty_and_pending_cells() {
        let snapshot = snapshot_with(vec![vec![
            SeatOccupancy::Empty,
            SeatOccupancy::Pending(ParticipantId("u1".to_string())),
        ]]);

        let audience_view = render_stage(&snapshot, &LocalSeating::audience(), 4);
        assert_eq!(audience_view, "[ +  ][ .. ]\n");

        let host_view = render_stage(&snapshot, &LocalSeating::host(), 4);
        assert_eq!(host_view, "[ -  ][ .. ]\n");
    }

    #[test]
    fn occupied_cells_show_name_mute_and_speaking_markers() {
        use chrono::Utc;
        use shared::domain::ParticipantProfile;

        let mut profile = ParticipantProfile {
            participant_id: ParticipantId("guest-7".to_string()),
            username: Some("ana".to_string()),
            audio_muted: true,
            speaking: false,
            avatar: None,
            joined_at: Utc::now(),
        };
        let snapshot = snapshot_with(vec![vec![SeatOccupancy::Occupied(profile.clone())]]);
        let rendered = render_stage(&snapshot, &LocalSeating::audience(), 8);
        assert_eq!(rendered, "[ ana[m] ]\n");

        profile.audio_muted = false;
        profile.speaking = true;
        let snapshot = snapshot_with(vec![vec![SeatOccupancy::Occupied(profile)]]);
        let rendered = render_stage(&snapshot, &LocalSeating::audience(), 8);
        assert_eq!(rendered, "[ *ana*  ]\n");
    }

    #[test]
    fn long_names_are_truncated_to_the_cell() {
        use chrono::Utc;
        use shared::domain::ParticipantProfile;

        let profile = ParticipantProfile {
            participant_id: ParticipantId("guest-7".to_string()),
            username: Some("a-very-long-username".to_string()),
            audio_muted: false,
            speaking: false,
            avatar: None,
            joined_at: Utc::now(),
        };
        let snapshot = snapshot_with(vec![vec![SeatOccupancy::Occupied(profile)]]);
        let rendered = render_stage(&snapshot, &LocalSeating::audience(), 6);
        assert_eq!(rendered, "[a-very]\n");
    }
}
