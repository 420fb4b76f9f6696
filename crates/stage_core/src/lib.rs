use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use shared::domain::{LocalSeating, ParticipantId, ParticipantProfile, SeatIndex};
use stage_backend::{
    DirectoryEvent, MembershipEvent, ParticipantDirectory, StageControlPlane, StageMembership,
};
use tokio::{
    sync::{broadcast, Mutex, RwLock},
    task::JoinHandle,
};
use tracing::{info, warn};

pub mod grid;
pub mod occupancy;
pub mod render;

pub use grid::{build_seat_rows, GridDimensions, Seat, SeatRow};
pub use occupancy::{SeatOccupancy, SeatState, SnapshotRow, StageSnapshot};
pub use render::{seat_visual, stage_visuals, AvatarVisual, SeatBorder, SeatVisual};

const STAGE_EVENT_CHANNEL_CAPACITY: usize = 64;

/// Placeholder membership source: a permanently empty stage with a silent
/// event stream. Lets the engine run before the host wires a real backend.
pub struct MissingStageMembership {
    events: broadcast::Sender<MembershipEvent>,
}

impl Default for MissingStageMembership {
    fn default() -> Self {
        let (events, _) = broadcast::channel(1);
        Self { events }
    }
}

#[async_trait]
impl StageMembership for MissingStageMembership {
    async fn occupant_at(&self, _seat: SeatIndex) -> Option<ParticipantId> {
        None
    }

    fn subscribe_events(&self) -> broadcast::Receiver<MembershipEvent> {
        self.events.subscribe()
    }
}

/// Placeholder directory: knows nobody, so claimed seats stay pending.
pub struct MissingParticipantDirectory {
    events: broadcast::Sender<DirectoryEvent>,
}

impl Default for MissingParticipantDirectory {
    fn default() -> Self {
        let (events, _) = broadcast::channel(1);
        Self { events }
    }
}

#[async_trait]
impl ParticipantDirectory for MissingParticipantDirectory {
    async fn profile(&self, _participant_id: &ParticipantId) -> Option<ParticipantProfile> {
        None
    }

    fn subscribe_events(&self) -> broadcast::Receiver<DirectoryEvent> {
        self.events.subscribe()
    }
}

pub struct MissingStageControlPlane;

#[async_trait]
impl StageControlPlane for MissingStageControlPlane {
    async fn request_seat_change(&self, seat: SeatIndex) -> anyhow::Result<()> {
        Err(anyhow!("stage control plane unavailable for seat {}", seat.0))
    }

    async fn request_publish(&self, seat: SeatIndex) -> anyhow::Result<()> {
        Err(anyhow!("stage control plane unavailable for seat {}", seat.0))
    }
}

#[derive(Debug, Clone)]
pub enum StageEvent {
    SnapshotUpdated(StageSnapshot),
    Error(String),
}

/// Which control-plane command an empty-seat tap turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatCommand {
    ChangeSeat(SeatIndex),
    Publish(SeatIndex),
}

/// Hosts never take audio seats. A seated user moves; everyone else starts
/// publishing into the tapped seat.
pub fn seat_command_for(local: &LocalSeating, seat: SeatIndex) -> Option<SeatCommand> {
    if local.is_host {
        return None;
    }
    if local.is_on_stage() {
        Some(SeatCommand::ChangeSeat(seat))
    } else {
        Some(SeatCommand::Publish(seat))
    }
}

/// Binds the seat grid to the externally-owned collaborators: samples seat
/// assignments and directory profiles into immutable [`StageSnapshot`]s and
/// republishes one on every collaborator event. Owns no stage state itself.
pub struct StageEngine {
    dimensions: GridDimensions,
    membership: Arc<dyn StageMembership>,
    directory: Arc<dyn ParticipantDirectory>,
    control_plane: Arc<dyn StageControlPlane>,
    local: RwLock<LocalSeating>,
    pump_tasks: Mutex<Vec<JoinHandle<()>>>,
    events: broadcast::Sender<StageEvent>,
}

impl StageEngine {
    pub fn new(dimensions: GridDimensions) -> Arc<Self> {
        Self::new_with_dependencies(
            dimensions,
            Arc::new(MissingStageMembership::default()),
            Arc::new(MissingParticipantDirectory::default()),
            Arc::new(MissingStageControlPlane),
        )
    }

    pub fn new_with_dependencies(
        dimensions: GridDimensions,
        membership: Arc<dyn StageMembership>,
        directory: Arc<dyn ParticipantDirectory>,
        control_plane: Arc<dyn StageControlPlane>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(STAGE_EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            dimensions,
            membership,
            directory,
            control_plane,
            local: RwLock::new(LocalSeating::audience()),
            pump_tasks: Mutex::new(Vec::new()),
            events,
        })
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<StageEvent> {
        self.events.subscribe()
    }

    pub async fn local_seating(&self) -> LocalSeating {
        *self.local.read().await
    }

    pub async fn set_local_seating(&self, local: LocalSeating) {
        *self.local.write().await = local;
    }

    /// Samples both collaborators into a fresh snapshot. Pure with respect
    /// to engine state; safe to call at any time.
    pub async fn snapshot(&self) -> StageSnapshot {
        let mut assignments: Vec<Option<ParticipantId>> =
            Vec::with_capacity(self.dimensions.capacity() as usize);
        for seat in self.dimensions.seat_indices() {
            assignments.push(self.membership.occupant_at(seat).await);
        }

        let seat_rows = grid::build_seat_rows(self.dimensions, |seat| {
            assignments.get(seat.0 as usize).cloned().flatten()
        });

        let mut rows = Vec::with_capacity(seat_rows.len());
        for row in seat_rows {
            let mut seats = Vec::with_capacity(row.seats.len());
            for seat in row.seats {
                let profile = match &seat.occupant {
                    Some(participant_id) => self.directory.profile(participant_id).await,
                    None => None,
                };
                seats.push(SeatState {
                    index: seat.index,
                    occupancy: SeatOccupancy::resolve(seat.occupant, profile),
                });
            }
            rows.push(SnapshotRow { seats });
        }

        StageSnapshot {
            dimensions: self.dimensions,
            rows,
        }
    }

    /// Starts the collaborator event pumps and publishes an initial
    /// snapshot. Restarting replaces any previous pumps.
    pub async fn start(self: &Arc<Self>) {
        let mut tasks = self.pump_tasks.lock().await;
        for task in tasks.drain(..) {
            task.abort();
        }
        tasks.push(self.spawn_membership_pump());
        tasks.push(self.spawn_directory_pump());
        drop(tasks);

        self.publish_snapshot().await;
    }

    pub async fn shutdown(&self) {
        let mut tasks = self.pump_tasks.lock().await;
        for task in tasks.drain(..) {
            task.abort();
        }
    }

    /// Resolves the tapped empty seat into a control-plane command and
    /// dispatches it fire-and-forget. Failure feedback stays with the
    /// backend; this layer only logs it.
    pub async fn claim_seat(&self, seat: SeatIndex) -> Option<SeatCommand> {
        let local = self.local_seating().await;
        let Some(command) = seat_command_for(&local, seat) else {
            info!(seat = seat.0, "stage: seat claim ignored for host");
            return None;
        };

        let control_plane = Arc::clone(&self.control_plane);
        tokio::spawn(async move {
            let outcome = match command {
                SeatCommand::ChangeSeat(seat) => control_plane.request_seat_change(seat).await,
                SeatCommand::Publish(seat) => control_plane.request_publish(seat).await,
            };
            if let Err(err) = outcome {
                warn!(seat = seat.0, "stage: seat command failed: {err}");
            }
        });

        Some(command)
    }

    async fn publish_snapshot(&self) {
        let snapshot = self.snapshot().await;
        let _ = self.events.send(StageEvent::SnapshotUpdated(snapshot));
    }

    fn spawn_membership_pump(self: &Arc<Self>) -> JoinHandle<()> {
        let mut events = self.membership.subscribe_events();
        let engine = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        match &event {
                            MembershipEvent::SeatClaimed {
                                seat,
                                participant_id,
                            } => info!(
                                seat = seat.0,
                                participant = %participant_id.0,
                                "stage: seat claimed"
                            ),
                            MembershipEvent::SeatReleased { seat } => {
                                info!(seat = seat.0, "stage: seat released");
                            }
                        }
                        engine.publish_snapshot().await;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "stage: membership events lagged; resampling");
                        let _ = engine.events.send(StageEvent::Error(format!(
                            "membership events lagged by {skipped}"
                        )));
                        engine.publish_snapshot().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    fn spawn_directory_pump(self: &Arc<Self>) -> JoinHandle<()> {
        let mut events = self.directory.subscribe_events();
        let engine = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        match &event {
                            DirectoryEvent::ProfileUpdated { participant_id } => info!(
                                participant = %participant_id.0,
                                "stage: directory profile updated"
                            ),
                            DirectoryEvent::ProfileRemoved { participant_id } => info!(
                                participant = %participant_id.0,
                                "stage: directory profile removed"
                            ),
                        }
                        engine.publish_snapshot().await;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "stage: directory events lagged; resampling");
                        let _ = engine.events.send(StageEvent::Error(format!(
                            "directory events lagged by {skipped}"
                        )));
                        engine.publish_snapshot().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
