// ABOUTME: AWS credential configuration.
// ABOUTME: Resolves access keys from literals or environment variables.

use super::EnvValue;
use crate::error::Result;
use crate::platform::AwsCredentials;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default = "default_access_key_id")]
    pub access_key_id: EnvValue,

    #[serde(default = "default_secret_access_key")]
    pub secret_access_key: EnvValue,

    #[serde(default = "default_session_token")]
    pub session_token: EnvValue,
}

fn default_access_key_id() -> EnvValue {
    EnvValue::from_env("AWS_ACCESS_KEY_ID")
}

fn default_secret_access_key() -> EnvValue {
    EnvValue::from_env("AWS_SECRET_ACCESS_KEY")
}

fn default_session_token() -> EnvValue {
    EnvValue::from_env("AWS_SESSION_TOKEN")
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        CredentialsConfig {
            access_key_id: default_access_key_id(),
            secret_access_key: default_secret_access_key(),
            session_token: default_session_token(),
        }
    }
}

impl CredentialsConfig {
    /// Resolve the key pair; the session token is optional.
    pub fn resolve(&self) -> Result<AwsCredentials> {
        Ok(AwsCredentials {
            access_key_id: self.access_key_id.resolve()?,
            secret_access_key: self.secret_access_key.resolve()?,
            session_token: self.session_token.resolve().ok(),
        })
    }
}
