// ABOUTME: Library root for ebdeploy - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod logs;
pub mod output;
pub mod platform;
pub mod types;
