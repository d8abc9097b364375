use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;

use crate::config::{HARMFUL_PENALTY, NOURISHING_REWARD};

const APP_DIR_NAME: &str = "grid-snake";
const SCORE_FILE_NAME: &str = "highscore.txt";

/// Running score of one session. May go negative.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct ScoreTracker {
    value: i32,
}

impl ScoreTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_nourishing(&mut self) {
        self.value = self.value.saturating_add(NOURISHING_REWARD);
    }

    /// Deducts the harmful penalty without any floor.
    pub fn apply_harmful(&mut self) {
        self.value = self.value.saturating_sub(HARMFUL_PENALTY);
    }

    #[must_use]
    pub fn value(self) -> i32 {
        self.value
    }
}

/// Failure to read or write the persisted high score.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to access high score record {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("high score record {} is not a non-negative integer: {contents:?}", path.display())]
    Corrupt { path: PathBuf, contents: String },
}

/// Stable storage for the best score across sessions.
pub trait HighScoreStore {
    /// Returns the stored high score, `0` when nothing has been stored yet.
    fn load(&self) -> Result<u32, PersistenceError>;

    /// Overwrites the stored high score.
    fn save(&mut self, high_score: u32) -> Result<(), PersistenceError>;

    /// Stores `score` when it is strictly greater than the stored value.
    ///
    /// A corrupt record counts as `0` and is overwritten by the next positive
    /// score. Returns the high score in effect afterwards.
    fn update_if_higher(&mut self, score: i32) -> Result<u32, PersistenceError> {
        let stored = match self.load() {
            Ok(stored) => stored,
            Err(error @ PersistenceError::Corrupt { .. }) => {
                warn!("{error}; treating it as 0");
                0
            }
            Err(error) => return Err(error),
        };
        let Ok(candidate) = u32::try_from(score) else {
            return Ok(stored);
        };

        if candidate > stored {
            self.save(candidate)?;
            info!("new high score {candidate} (previous {stored})");
            return Ok(candidate);
        }

        Ok(stored)
    }
}

/// Returns the platform-correct high score file path.
#[must_use]
pub fn high_score_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(SCORE_FILE_NAME);
    base
}

/// High score kept as a plain decimal string in a text file.
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at [`high_score_path`].
    #[must_use]
    pub fn at_default_path() -> Self {
        Self::new(high_score_path())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&self) -> Result<u32, PersistenceError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(self.io_error(e)),
        };

        raw.trim()
            .parse::<u32>()
            .map_err(|_| PersistenceError::Corrupt {
                path: self.path.clone(),
                contents: raw,
            })
    }

    fn save(&mut self, high_score: u32) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        fs::write(&self.path, high_score.to_string()).map_err(|e| self.io_error(e))
    }
}

/// In-process store, used when no file should be touched.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryHighScoreStore {
    high_score: u32,
}

impl MemoryHighScoreStore {
    #[must_use]
    pub fn with_high_score(high_score: u32) -> Self {
        Self { high_score }
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&self) -> Result<u32, PersistenceError> {
        Ok(self.high_score)
    }

    fn save(&mut self, high_score: u32) -> Result<(), PersistenceError> {
        self.high_score = high_score;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{
        FileHighScoreStore, HighScoreStore, MemoryHighScoreStore, PersistenceError, ScoreTracker,
    };

    #[test]
    fn nourishing_adds_one_and_harmful_removes_five() {
        let mut score = ScoreTracker::new();

        score.apply_nourishing();
        score.apply_nourishing();
        assert_eq!(score.value(), 2);

        score.apply_harmful();
        assert_eq!(score.value(), -3);
    }

    #[test]
    fn file_store_round_trip() {
        let path = unique_test_path("round_trip");
        let mut store = FileHighScoreStore::new(&path);

        store.save(42).expect("score save should succeed");
        let loaded = store.load().expect("load should succeed");

        assert_eq!(loaded, 42);
        assert_eq!(
            fs::read_to_string(&path).expect("record should exist"),
            "42"
        );
        cleanup_test_path(&path);
    }

    #[test]
    fn missing_record_reads_as_zero() {
        let path = unique_test_path("missing");
        // Deliberately do not create the file.
        let store = FileHighScoreStore::new(&path);

        assert_eq!(store.load().expect("missing file should return Ok(0)"), 0);
    }

    #[test]
    fn malformed_record_is_reported_as_corrupt() {
        let path = unique_test_path("malformed");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(&path, "-7").expect("test file write should succeed");

        let result = FileHighScoreStore::new(&path).load();
        assert!(matches!(result, Err(PersistenceError::Corrupt { .. })));

        cleanup_test_path(&path);
    }

    #[test]
    fn update_only_overwrites_strictly_higher_scores() {
        let path = unique_test_path("update");
        let mut store = FileHighScoreStore::new(&path);

        assert_eq!(store.update_if_higher(12).expect("update should succeed"), 12);
        assert_eq!(store.update_if_higher(12).expect("update should succeed"), 12);
        assert_eq!(store.update_if_higher(3).expect("update should succeed"), 12);
        assert_eq!(store.update_if_higher(-20).expect("update should succeed"), 12);
        assert_eq!(store.update_if_higher(19).expect("update should succeed"), 19);
        assert_eq!(store.load().expect("load should succeed"), 19);

        cleanup_test_path(&path);
    }

    #[test]
    fn negative_score_never_creates_a_record() {
        let path = unique_test_path("negative");
        let mut store = FileHighScoreStore::new(&path);

        assert_eq!(store.update_if_higher(-5).expect("update should succeed"), 0);
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_record_is_replaced_by_next_score() {
        for (label, contents) in [("empty", ""), ("garbage", "not a number")] {
            let path = unique_test_path(label);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("test parent directory should be creatable");
            }
            fs::write(&path, contents).expect("test file write should succeed");
            let mut store = FileHighScoreStore::new(&path);

            assert_eq!(store.update_if_higher(7).expect("update should succeed"), 7);
            assert_eq!(store.load().expect("record should be repaired"), 7);

            cleanup_test_path(&path);
        }
    }

    #[test]
    fn corrupt_record_survives_a_negative_score() {
        let path = unique_test_path("corrupt_negative");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(&path, "").expect("test file write should succeed");
        let mut store = FileHighScoreStore::new(&path);

        assert_eq!(store.update_if_higher(-5).expect("update should succeed"), 0);

        cleanup_test_path(&path);
    }

    #[test]
    fn memory_store_keeps_maximum() {
        let mut store = MemoryHighScoreStore::default();

        for score in [4, 9, 2, -1, 7] {
            store.update_if_higher(score).expect("memory store never fails");
        }

        assert_eq!(store.load().expect("memory store never fails"), 9);
    }

    fn unique_test_path(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join("grid-snake-score-tests")
            .join(format!("{label}-{nanos}.txt"))
    }

    fn cleanup_test_path(path: &PathBuf) {
        let _ = fs::remove_file(path);
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir(parent);
        }
    }
}
