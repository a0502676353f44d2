use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::probe::DEFAULT_PROBE_TIMEOUT;

/// Configuration for library probing and pointer storage
#[derive(Debug, Clone)]
pub struct Config {
    pub probe_timeout: Duration,
    pub user: String,
    pub pointer_file: PathBuf,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            probe_timeout: env::var("NEXTEP_PROBE_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_PROBE_TIMEOUT),
            user: env::var("NEXTEP_USER").unwrap_or_else(|_| "default".to_string()),
            pointer_file: env::var("NEXTEP_POINTER_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("nextep-pointers.json")),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            user: "default".to_string(),
            pointer_file: PathBuf::from("nextep-pointers.json"),
        }
    }
}
