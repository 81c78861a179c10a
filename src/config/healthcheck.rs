// ABOUTME: Health page check configuration.
// ABOUTME: Defines path, scheme, expected body, and polling parameters with defaults.

use serde::Deserialize;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct HealthcheckConfig {
    /// Path of the health page; health checking is skipped when absent.
    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub scheme: Scheme,

    /// Expected response body, compared after a 200 status.
    #[serde(default)]
    pub expect: Option<ExpectedBody>,

    #[serde(default = "default_interval", with = "humantime_serde")]
    pub interval: Duration,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Http => write!(f, "http"),
            Scheme::Https => write!(f, "https"),
        }
    }
}

/// Expected health page body: an exact string or a regular expression.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ExpectedBody {
    Literal(String),
    Pattern { pattern: String },
}

fn default_interval() -> Duration {
    Duration::from_secs(10)
}

fn default_timeout() -> Duration {
    Duration::from_secs(5 * 60)
}

impl Default for HealthcheckConfig {
    fn default() -> Self {
        HealthcheckConfig {
            path: None,
            scheme: Scheme::default(),
            expect: None,
            interval: default_interval(),
            timeout: default_timeout(),
        }
    }
}
