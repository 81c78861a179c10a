// ABOUTME: Log retrieval configuration.
// ABOUTME: Output directory and polling parameters for tail log downloads.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_output")]
    pub output: PathBuf,

    #[serde(default = "default_interval", with = "humantime_serde")]
    pub interval: Duration,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_output() -> PathBuf {
    PathBuf::from("./")
}

fn default_interval() -> Duration {
    Duration::from_secs(2)
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

impl Default for LogsConfig {
    fn default() -> Self {
        LogsConfig {
            output: default_output(),
            interval: default_interval(),
            timeout: default_timeout(),
        }
    }
}
