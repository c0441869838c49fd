//! Local persisted state.
//!
//! A single JSON file holds a stable device id plus the last score and
//! last attempt timestamp per quiz id. This backs the catalog badges and
//! the "time to revisit" nudge.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Revisit nudge threshold: one week since the last attempt.
pub const REVISIT_AFTER_MS: i64 = 7 * 24 * 60 * 60 * 1000;

#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "score store IO error: {}", e),
            StoreError::Parse(e) => write!(f, "score store is corrupt: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Parse(e) => Some(e),
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Parse(err)
    }
}

/// Outcome of one finished attempt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Score on the 0–10 scale, one decimal.
    pub score: f64,
    /// Unix millis of the attempt.
    pub at_ms: i64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    device_id: String,
    #[serde(default)]
    attempts: HashMap<String, AttemptRecord>,
}

/// File-backed score history.
pub struct ScoreStore {
    path: PathBuf,
    data: StoreData,
}

impl ScoreStore {
    /// Open the store, creating a fresh one (with a new device id) when the
    /// file does not exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let data = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => StoreData {
                device_id: Uuid::new_v4().to_string(),
                attempts: HashMap::new(),
            },
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, data })
    }

    pub fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Stable per-installation id, used as the ranking document key.
    pub fn device_id(&self) -> &str {
        &self.data.device_id
    }

    /// Record a finished attempt and persist immediately.
    pub fn record(&mut self, quiz_id: &str, score: f64) -> Result<(), StoreError> {
        let record = AttemptRecord {
            score: (score * 10.0).round() / 10.0,
            at_ms: Utc::now().timestamp_millis(),
        };
        self.data.attempts.insert(quiz_id.to_string(), record);
        self.save()
    }

    pub fn last(&self, quiz_id: &str) -> Option<AttemptRecord> {
        self.data.attempts.get(quiz_id).copied()
    }

    /// Snapshot of the whole attempt history, for the catalog badges.
    pub fn attempts(&self) -> HashMap<String, AttemptRecord> {
        self.data.attempts.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("drive-quiz-test-{}.json", Uuid::new_v4()))
    }

    #[test]
    fn fresh_store_has_device_id_and_no_attempts() {
        let path = temp_path();
        let store = ScoreStore::open(&path).unwrap();
        assert!(!store.device_id().is_empty());
        assert!(store.last("anything").is_none());
    }

    #[test]
    fn record_roundtrips_through_the_file() {
        let path = temp_path();
        let device_id;
        {
            let mut store = ScoreStore::open(&path).unwrap();
            device_id = store.device_id().to_string();
            store.record("quiz-1", 7.345).unwrap();
        }

        let store = ScoreStore::open(&path).unwrap();
        assert_eq!(store.device_id(), device_id);
        let rec = store.last("quiz-1").unwrap();
        assert_eq!(rec.score, 7.3);
        assert!(rec.at_ms > 0);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn recorded_timestamp_is_current() {
        let path = temp_path();
        let mut store = ScoreStore::open(&path).unwrap();
        let before = Utc::now().timestamp_millis();
        store.record("quiz-1", 5.0).unwrap();
        let after = Utc::now().timestamp_millis();

        let rec = store.last("quiz-1").unwrap();
        assert!((before..=after).contains(&rec.at_ms));

        fs::remove_file(&path).unwrap();
    }
}
