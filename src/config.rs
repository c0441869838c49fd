//! Runtime configuration.
//!
//! Remote access is keyed by the same values the original deployment used:
//! a Drive API key plus folder id for the keyed catalog, or a public index
//! file id, plus an optional ranking store URL. The binary fills this from
//! CLI flags with environment fallbacks.

use std::path::PathBuf;

use crate::prepare::PrepareConfig;

pub const ENV_API_KEY: &str = "GOOGLE_API_KEY";
pub const ENV_FOLDER_ID: &str = "DRIVE_FOLDER_ID";
pub const ENV_INDEX_FILE_ID: &str = "DRIVE_INDEX_FILE_ID";
pub const ENV_RANKING_URL: &str = "RANKING_API_BASE";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub folder_id: Option<String>,
    pub index_file_id: Option<String>,
    pub ranking_url: Option<String>,
    /// Display name used for the ranking profile.
    pub display_name: String,
    /// Path of the local score store.
    pub data_file: PathBuf,
    /// Local quiz file to open directly, skipping the remote catalog.
    pub quiz_file: Option<PathBuf>,
    /// Leaderboard size.
    pub top_n: usize,
    /// When false, prepare attempts without difficulty tiers (the original
    /// pre-tier behavior with a flat countdown).
    pub tiered: bool,
    pub prepare: PrepareConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            folder_id: None,
            index_file_id: None,
            ranking_url: None,
            display_name: "Player".to_string(),
            data_file: PathBuf::from("drive-quiz-scores.json"),
            quiz_file: None,
            top_n: 10,
            tiered: true,
            prepare: PrepareConfig::default(),
        }
    }
}

impl Config {
    pub fn has_drive_api(&self) -> bool {
        non_empty(&self.api_key) && non_empty(&self.folder_id)
    }

    pub fn has_public_index(&self) -> bool {
        non_empty(&self.index_file_id)
    }

    pub fn has_catalog_source(&self) -> bool {
        self.has_drive_api() || self.has_public_index()
    }
}

fn non_empty(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

/// A flag value, or the environment variable when the flag is absent.
pub fn or_env(flag: Option<String>, var: &str) -> Option<String> {
    flag.or_else(|| std::env::var(var).ok()).filter(|v| !v.is_empty())
}
