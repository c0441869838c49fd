//! Cloud user profile and leaderboard.
//!
//! The store is a plain REST document API: one user document per device
//! id holding a display name, optional photo URL and a cumulative score,
//! plus a descending-score ranking query bounded to a top-N count.

use serde::{Deserialize, Serialize};

use super::NetError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub uuid: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub score: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingEntry {
    pub name: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub score: u64,
    /// 1-based leaderboard position, assigned on receipt.
    #[serde(default)]
    pub position: usize,
}

/// Client for the users/ranking store.
pub struct RankingClient {
    http: reqwest::Client,
    base_url: Option<String>,
}

impl RankingClient {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.filter(|u| !u.is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    fn base(&self) -> Result<&str, NetError> {
        self.base_url
            .as_deref()
            .map(|u| u.trim_end_matches('/'))
            .ok_or(NetError::NotConfigured("ranking store"))
    }

    /// Fetch a user document; `None` when the user has no profile yet.
    pub async fn fetch_profile(&self, uuid: &str) -> Result<Option<UserProfile>, NetError> {
        let url = format!("{}/users/{}", self.base()?, uuid);
        let response = self.http.get(&url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(response.error_for_status()?.json().await?))
    }

    /// Create or replace the user document. Score is kept for an existing
    /// profile; only name and photo are taken from the argument.
    pub async fn upsert_profile(&self, profile: &UserProfile) -> Result<UserProfile, NetError> {
        let merged = match self.fetch_profile(&profile.uuid).await? {
            Some(existing) => UserProfile {
                score: existing.score,
                ..profile.clone()
            },
            None => profile.clone(),
        };
        let url = format!("{}/users/{}", self.base()?, merged.uuid);
        self.http
            .put(&url)
            .json(&merged)
            .send()
            .await?
            .error_for_status()?;
        Ok(merged)
    }

    /// Add an attempt's hits to the cumulative score. Read-modify-write;
    /// a missing profile gets created with just the delta.
    pub async fn add_score(&self, uuid: &str, name: &str, delta: u64) -> Result<u64, NetError> {
        let mut profile = self.fetch_profile(uuid).await?.unwrap_or(UserProfile {
            uuid: uuid.to_string(),
            name: name.to_string(),
            photo_url: None,
            score: 0,
        });
        profile.score += delta;
        let url = format!("{}/users/{}", self.base()?, uuid);
        self.http
            .put(&url)
            .json(&profile)
            .send()
            .await?
            .error_for_status()?;
        log::debug!("cumulative score for {} is now {}", uuid, profile.score);
        Ok(profile.score)
    }

    /// Fetch the descending-score leaderboard, bounded to `top_n` entries.
    pub async fn fetch_ranking(&self, top_n: usize) -> Result<Vec<RankingEntry>, NetError> {
        let url = format!("{}/ranking?top={}", self.base()?, top_n);
        let mut entries: Vec<RankingEntry> = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        // Defend against an unsorted or oversized reply.
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(top_n);
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.position = i + 1;
        }
        Ok(entries)
    }
}
