//! Remote sources: the Drive-backed quiz catalog and the ranking store.

mod drive;
mod ranking;

pub use drive::DriveClient;
pub use ranking::{RankingClient, RankingEntry, UserProfile};

/// Error talking to a remote source.
///
/// Callers convert these to a user-visible string; there are no retries.
#[derive(Debug)]
pub enum NetError {
    /// The required keys/ids for this source are missing.
    NotConfigured(&'static str),
    Http(reqwest::Error),
}

impl std::fmt::Display for NetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetError::NotConfigured(what) => write!(f, "{} is not configured", what),
            NetError::Http(e) => match e.status() {
                Some(status) => write!(f, "HTTP {}", status.as_u16()),
                None => write!(f, "network error: {}", e),
            },
        }
    }
}

impl std::error::Error for NetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NetError::NotConfigured(_) => None,
            NetError::Http(e) => Some(e),
        }
    }
}

impl From<reqwest::Error> for NetError {
    fn from(err: reqwest::Error) -> Self {
        NetError::Http(err)
    }
}
