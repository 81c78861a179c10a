// ABOUTME: Phantom-typed names and identifiers for control-plane resources.
// ABOUTME: Prevents accidental swapping of application, environment, version, and template names.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Marker types for phantom type parameters.
/// Using empty enums prevents instantiation and requires no trait bounds.
pub enum ApplicationMarker {}
pub enum EnvironmentMarker {}
pub enum EnvironmentIdMarker {}
pub enum VersionMarker {}
pub enum TemplateMarker {}

/// A type-safe name that prevents accidental mixing of different resource names.
///
/// Every control-plane call takes several plain strings (application,
/// environment, version label, template). Wrapping them in `Name<T>` makes
/// passing an `ApplicationName` where an `EnvironmentName` is expected a
/// compile error instead of a confusing provider-side failure.
#[must_use = "names reference remote resources and should not be ignored"]
pub struct Name<T> {
    value: String,
    _marker: PhantomData<T>,
}

impl<T> Name<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_inner(self) -> String {
        self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

// Manual trait implementations that don't require T to implement the trait.
// This is necessary because T is only used as a phantom type marker.

impl<T> std::fmt::Debug for Name<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Name").field(&self.value).finish()
    }
}

impl<T> Clone for Name<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T> PartialEq for Name<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Name<T> {}

impl<T> Hash for Name<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> std::fmt::Display for Name<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> Serialize for Name<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Name<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::new(value))
    }
}

pub type ApplicationName = Name<ApplicationMarker>;
pub type EnvironmentName = Name<EnvironmentMarker>;
pub type EnvironmentId = Name<EnvironmentIdMarker>;
pub type VersionLabel = Name<VersionMarker>;
pub type TemplateName = Name<TemplateMarker>;
