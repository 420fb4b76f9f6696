use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;
use shared::domain::LocalSeating;
use stage_core::GridDimensions;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub rows: u32,
    pub columns: u32,
    pub seat_cell_width: usize,
    pub local_participant_id: String,
    pub local_is_host: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rows: GridDimensions::AUDIO_STAGE.rows,
            columns: GridDimensions::AUDIO_STAGE.columns,
            seat_cell_width: 12,
            local_participant_id: "local-speaker".into(),
            local_is_host: false,
        }
    }
}

impl Settings {
    pub fn dimensions(&self) -> GridDimensions {
        GridDimensions::new(self.rows, self.columns)
    }

    pub fn local_seating(&self) -> LocalSeating {
        if self.local_is_host {
            LocalSeating::host()
        } else {
            LocalSeating::audience()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    rows: Option<u32>,
    columns: Option<u32>,
    seat_cell_width: Option<usize>,
    local_participant_id: Option<String>,
    local_is_host: Option<bool>,
}

/// Defaults, overlaid by `stage.toml` (or an explicit config path, which
/// must then parse), overlaid by `STAGE__*` environment variables.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match config_path {
        Some(path) => (path, true),
        None => (Path::new("stage.toml"), false),
    };
    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
            apply_file_settings(&mut settings, file_cfg);
        }
        Err(err) if required => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()));
        }
        Err(_) => {}
    }

    apply_env_overrides(&mut settings);
    Ok(settings)
}

fn apply_file_settings(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.rows {
        settings.rows = v;
    }
    if let Some(v) = file_cfg.columns {
        settings.columns = v;
    }
    if let Some(v) = file_cfg.seat_cell_width {
        settings.seat_cell_width = v;
    }
    if let Some(v) = file_cfg.local_participant_id {
        settings.local_participant_id = v;
    }
    if let Some(v) = file_cfg.local_is_host {
        settings.local_is_host = v;
    }
}

fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(v) = std::env::var("STAGE__ROWS") {
        if let Ok(parsed) = v.parse::<u32>() {
            settings.rows = parsed;
        }
    }
    if let Ok(v) = std::env::var("STAGE__COLUMNS") {
        if let Ok(parsed) = v.parse::<u32>() {
            settings.columns = parsed;
        }
    }
    if let Ok(v) = std::env::var("STAGE__SEAT_CELL_WIDTH") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.seat_cell_width = parsed;
        }
    }
    if let Ok(v) = std::env::var("STAGE__LOCAL_PARTICIPANT_ID") {
        settings.local_participant_id = v;
    }
    if let Ok(v) = std::env::var("STAGE__LOCAL_IS_HOST") {
        if let Ok(parsed) = v.parse::<bool>() {
            settings.local_is_host = parsed;
        }
    }
}
