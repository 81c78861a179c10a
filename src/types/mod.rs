// ABOUTME: Type-safe names and validated domain types.
// ABOUTME: Uses phantom types to prevent name confusion at compile time.

mod environment_name;
mod name;

pub use environment_name::{
    GeneratedName, MAX_ENVIRONMENT_NAME_LEN, generate_environment_name, sanitize,
};
pub use name::{
    ApplicationName, EnvironmentId, EnvironmentName, Name, TemplateName, VersionLabel,
};
