// ABOUTME: Environment convergence polling configuration.
// ABOUTME: Defines how often and how long to wait for an environment to become ready.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct ConvergenceConfig {
    #[serde(default = "default_interval", with = "humantime_serde")]
    pub interval: Duration,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_interval() -> Duration {
    Duration::from_secs(20)
}

fn default_timeout() -> Duration {
    Duration::from_secs(10 * 60)
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        ConvergenceConfig {
            interval: default_interval(),
            timeout: default_timeout(),
        }
    }
}
