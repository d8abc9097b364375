use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::config::{Grid, BASE_TICKS_PER_SECOND};
use crate::food::SpawnPolicy;

const USER_SETTINGS_APP_DIR: &str = "grid-snake";
const USER_SETTINGS_FILE_NAME: &str = "settings.json";

/// Failure to load user settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Tunable game settings. Every field is optional in the JSON file.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub grid_width: u16,
    pub grid_height: u16,
    pub cell_size: u16,
    pub ticks_per_second: u32,
    pub avoid_occupied_spawn: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let grid = Grid::default();
        Self {
            grid_width: grid.width,
            grid_height: grid.height,
            cell_size: grid.cell_size,
            ticks_per_second: BASE_TICKS_PER_SECOND,
            avoid_occupied_spawn: false,
        }
    }
}

/// Optional overrides collected from the command line.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct SettingsOverrides {
    pub grid_width: Option<u16>,
    pub grid_height: Option<u16>,
    pub ticks_per_second: Option<u32>,
    pub avoid_occupied_spawn: bool,
}

impl Settings {
    /// Loads settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let settings: Self = serde_json::from_str(&raw).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Returns settings with command-line values taking precedence.
    #[must_use]
    pub fn with_overrides(mut self, overrides: SettingsOverrides) -> Self {
        if let Some(width) = overrides.grid_width {
            self.grid_width = width;
        }
        if let Some(height) = overrides.grid_height {
            self.grid_height = height;
        }
        if let Some(rate) = overrides.ticks_per_second {
            self.ticks_per_second = rate;
        }
        self.avoid_occupied_spawn |= overrides.avoid_occupied_spawn;
        self
    }

    /// Rejects zero-sized grids and a zero tick rate.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(SettingsError::Invalid(format!(
                "grid must be at least 1x1, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if self.cell_size == 0 {
            return Err(SettingsError::Invalid("cell_size must be positive".to_owned()));
        }
        if self.ticks_per_second == 0 {
            return Err(SettingsError::Invalid(
                "ticks_per_second must be positive".to_owned(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_width, self.grid_height, self.cell_size)
    }

    #[must_use]
    pub fn spawn_policy(&self) -> SpawnPolicy {
        if self.avoid_occupied_spawn {
            SpawnPolicy::AvoidOccupied
        } else {
            SpawnPolicy::Anywhere
        }
    }
}

/// Returns `<config_dir>/grid-snake/settings.json`, when a config dir exists.
#[must_use]
pub fn user_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config_dir| {
        config_dir
            .join(USER_SETTINGS_APP_DIR)
            .join(USER_SETTINGS_FILE_NAME)
    })
}
