// ABOUTME: Synthesizes unique environment names for blue-green deployments.
// ABOUTME: Sanitizes the application name and appends a timestamp-derived suffix.

use super::name::{ApplicationName, EnvironmentName};

/// Maximum environment name length accepted by the platform.
pub const MAX_ENVIRONMENT_NAME_LEN: usize = 23;

/// Minimum suffix length below which uniqueness is no longer meaningful.
const MIN_UNIQUE_SUFFIX_LEN: usize = 3;

/// A synthesized environment name plus the notices raised while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedName {
    pub name: EnvironmentName,
    /// Characters outside `[A-Za-z0-9-]` were removed from the application name.
    pub stripped_invalid_chars: bool,
    /// The application name leaves fewer than three characters for the suffix.
    pub low_uniqueness: bool,
}

/// Strip everything that is not an ASCII letter, digit, or dash.
pub fn sanitize(application: &str) -> String {
    application
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}

/// Build `sanitize(application) + suffix`, where the suffix is the
/// low-order digits of `timestamp_millis` filling the space left under
/// [`MAX_ENVIRONMENT_NAME_LEN`].
pub fn generate_environment_name(
    application: &ApplicationName,
    timestamp_millis: i64,
) -> GeneratedName {
    let mut prefix = sanitize(application.as_str());
    let stripped_invalid_chars = prefix.len() != application.as_str().len();
    let low_uniqueness = prefix.len() > MAX_ENVIRONMENT_NAME_LEN - MIN_UNIQUE_SUFFIX_LEN;

    // Sanitized text is pure ASCII, so byte truncation is char-safe.
    prefix.truncate(MAX_ENVIRONMENT_NAME_LEN);

    let available = MAX_ENVIRONMENT_NAME_LEN - prefix.len();
    let digits = timestamp_millis.unsigned_abs().to_string();
    let suffix = &digits[digits.len().saturating_sub(available)..];

    GeneratedName {
        name: EnvironmentName::new(format!("{prefix}{suffix}")),
        stripped_invalid_chars,
        low_uniqueness,
    }
}
