use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::episode::EpisodeMatch;

/// The persisted "current episode" record for a show/user pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedEpisode {
    pub show: String,
    pub user: String,
    pub matched: EpisodeMatch,
    pub watched_at: DateTime<Utc>,
}

impl WatchedEpisode {
    pub fn new(show: impl Into<String>, user: impl Into<String>, matched: EpisodeMatch) -> Self {
        Self {
            show: show.into(),
            user: user.into(),
            matched,
            watched_at: Utc::now(),
        }
    }
}

/// The opaque pointer-storage contract. The resolution core only consumes
/// `read` results and produces new records; it never calls the store
/// itself.
pub trait PointerStore {
    fn read(&self, show: &str, user: &str) -> Result<Option<WatchedEpisode>>;
    fn write(&self, episode: &WatchedEpisode) -> Result<()>;
}

/// Pointer store backed by a single JSON document, keyed by `user/show`.
#[derive(Debug, Clone)]
pub struct JsonPointerStore {
    path: PathBuf,
}

impl JsonPointerStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> Result<HashMap<String, WatchedEpisode>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read pointer file {:?}", self.path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("malformed pointer file {:?}", self.path))
    }

    fn key(show: &str, user: &str) -> String {
        format!("{}/{}", user, show)
    }
}

impl PointerStore for JsonPointerStore {
    fn read(&self, show: &str, user: &str) -> Result<Option<WatchedEpisode>> {
        Ok(self.load()?.remove(&Self::key(show, user)))
    }

    fn write(&self, episode: &WatchedEpisode) -> Result<()> {
        let mut pointers = self.load()?;
        pointers.insert(Self::key(&episode.show, &episode.user), episode.clone());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&pointers)?;
        fs::write(&self.path, content)
            .with_context(|| format!("failed to write pointer file {:?}", self.path))?;
        debug!("stored pointer {} for {}/{}", episode.matched, episode.user, episode.show);
        Ok(())
    }
}
