use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use shared::avatar::AvatarColors;
use shared::domain::{LocalSeating, ParticipantId, ParticipantProfile, SeatIndex};
use stage_core::{StageEngine, StageEvent, StageSnapshot};
use tokio::{
    sync::broadcast,
    time::{timeout, Duration},
};
use tracing::warn;

mod backend;
mod config;
mod render_text;

use backend::InMemoryStage;
use config::Settings;

/// Walks an in-memory audio stage through a scripted session and renders
/// every snapshot the engine publishes.
#[derive(Parser, Debug)]
struct Args {
    /// Settings file; `./stage.toml` is picked up by default when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    rows: Option<u32>,
    #[arg(long)]
    columns: Option<u32>,
    /// Additionally dump the final snapshot as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let mut settings = config::load_settings(args.config.as_deref())?;
    if let Some(rows) = args.rows {
        settings.rows = rows;
    }
    if let Some(columns) = args.columns {
        settings.columns = columns;
    }

    let local_participant = ParticipantId(settings.local_participant_id.clone());
    let stage = InMemoryStage::new(local_participant);
    let engine = StageEngine::new_with_dependencies(
        settings.dimensions(),
        stage.clone(),
        stage.clone(),
        stage.clone(),
    );
    engine.set_local_seating(settings.local_seating()).await;

    let mut events = engine.subscribe_events();
    engine.start().await;

    let mut latest = next_snapshot(&mut events).await?;
    print_stage("stage opens", &latest, &engine, &settings).await;

    // A remote guest claims a seat before the directory knows them: the
    // seat goes through its pending phase on screen.
    let guest = ParticipantId("guest-7".to_string());
    if settings.dimensions().contains(SeatIndex(5)) {
        stage.seat_participant(SeatIndex(5), guest.clone()).await;
        latest = next_snapshot(&mut events).await?;
        print_stage("guest-7 claims seat 5", &latest, &engine, &settings).await;
    }

    stage
        .upsert_profile(ParticipantProfile {
            participant_id: guest.clone(),
            username: Some("ana".to_string()),
            audio_muted: false,
            speaking: false,
            avatar: Some(AvatarColors::from_hex("#FF1102", "#FFF001", "#01F0F1")?),
            joined_at: Utc::now(),
        })
        .await;
    latest = next_snapshot(&mut events).await?;
    print_stage("directory catches up", &latest, &engine, &settings).await;

    stage.set_speaking(&guest, true).await;
    latest = next_snapshot(&mut events).await?;
    print_stage("ana speaks", &latest, &engine, &settings).await;

    stage.set_muted(&guest, true).await;
    latest = next_snapshot(&mut events).await?;
    print_stage("ana mutes", &latest, &engine, &settings).await;

    if !settings.local_is_host && settings.dimensions().capacity() >= 3 {
        engine.claim_seat(SeatIndex(0)).await;
        latest = next_snapshot(&mut events).await?;
        engine
            .set_local_seating(LocalSeating::seated(SeatIndex(0)))
            .await;
        print_stage("local user publishes into seat 0", &latest, &engine, &settings).await;

        // Moving seats releases the old one first, so two snapshots land.
        engine.claim_seat(SeatIndex(2)).await;
        let _ = next_snapshot(&mut events).await?;
        latest = next_snapshot(&mut events).await?;
        engine
            .set_local_seating(LocalSeating::seated(SeatIndex(2)))
            .await;
        print_stage("local user moves to seat 2", &latest, &engine, &settings).await;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&latest)?);
    }

    engine.shutdown().await;
    Ok(())
}

async fn next_snapshot(
    events: &mut broadcast::Receiver<StageEvent>,
) -> Result<StageSnapshot> {
    loop {
        let event = timeout(Duration::from_secs(2), events.recv()).await??;
        match event {
            StageEvent::SnapshotUpdated(snapshot) => return Ok(snapshot),
            StageEvent::Error(message) => warn!("stage event stream reported: {message}"),
        }
    }
}

async fn print_stage(
    caption: &str,
    snapshot: &StageSnapshot,
    engine: &StageEngine,
    settings: &Settings,
) {
    let local = engine.local_seating().await;
    println!("== {caption}");
    print!(
        "{}",
        render_text::render_stage(snapshot, &local, settings.seat_cell_width)
    );
}
