// ABOUTME: Deployment type configuration.
// ABOUTME: Supports in-place, swap-to-new (blue-green), and manual deploys.

use serde::de::{self, Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeployType {
    /// Update the running environment to the new version.
    #[default]
    InPlace,
    /// Launch a fresh environment, verify it, then swap hostnames.
    SwapToNew,
    /// Publish the version only; leave environments untouched.
    Manual,
}

impl FromStr for DeployType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in-place" | "inPlace" => Ok(DeployType::InPlace),
            "swap-to-new" | "swapToNew" => Ok(DeployType::SwapToNew),
            "manual" => Ok(DeployType::Manual),
            _ => Err(format!(
                "unknown deploy type: {} (expected in-place, swap-to-new, or manual)",
                s
            )),
        }
    }
}

impl fmt::Display for DeployType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployType::InPlace => write!(f, "in-place"),
            DeployType::SwapToNew => write!(f, "swap-to-new"),
            DeployType::Manual => write!(f, "manual"),
        }
    }
}

impl<'de> Deserialize<'de> for DeployType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

impl DeployType {
    /// Whether a missing target environment should abort the deployment.
    pub fn requires_environment(&self) -> bool {
        !matches!(self, DeployType::Manual)
    }
}
