use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};
use thiserror::Error;

const APP_DIR_NAME: &str = "grid-snake";
const LOG_FILE_NAME: &str = "grid-snake.log";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("a logger is already installed")]
    AlreadyInstalled(#[from] log::SetLoggerError),
}

/// Returns the platform-correct log file path.
#[must_use]
pub fn default_log_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(LOG_FILE_NAME);
    base
}

/// Installs a file logger. The terminal belongs to the game while it runs,
/// so log output never goes to stdout or stderr.
///
/// `LevelFilter::Off` installs nothing.
pub fn init_logging(path: &Path, level: LevelFilter) -> Result<(), LoggingError> {
    if level == LevelFilter::Off {
        return Ok(());
    }

    let io_error = |source: io::Error| LoggingError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
    }
    let file = File::create(path).map_err(io_error)?;

    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();
    WriteLogger::init(level, config, file)?;
    Ok(())
}
