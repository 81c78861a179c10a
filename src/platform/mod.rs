// ABOUTME: Control-plane abstraction for the application hosting platform.
// ABOUTME: Capability traits, snapshot types, errors, and the AWS implementation.

mod aws;
mod error;
pub mod traits;

pub use aws::{AwsCredentials, AwsPlatform, AwsSettings};
pub use error::{HttpClientSnafu, HttpSnafu, PlatformError, PlatformErrorKind};
pub use traits::*;
