// ABOUTME: Diagnostics accumulator for non-fatal warnings during deployment.
// ABOUTME: Collects warnings that shouldn't fail a deployment but should be shown to users.

/// Collects non-fatal warnings during deployment operations.
#[derive(Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// No health page path is configured.
    pub fn health_check_disabled() -> Self {
        Self {
            kind: WarningKind::HealthCheckDisabled,
            message: "\"health.path\" is not set, it is recommended to set one".to_string(),
        }
    }

    /// The application name leaves little room for a unique suffix.
    pub fn low_name_uniqueness(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::LowNameUniqueness,
            message: message.into(),
        }
    }

    /// Characters were stripped while deriving an environment name.
    pub fn name_sanitized(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::NameSanitized,
            message: message.into(),
        }
    }

    /// The target environment does not exist but the deploy type tolerates it.
    pub fn environment_absent(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::EnvironmentAbsent,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Health checking is skipped because no path is configured.
    HealthCheckDisabled,
    /// Synthesized environment names may collide.
    LowNameUniqueness,
    /// Invalid characters removed from the application name.
    NameSanitized,
    /// Target environment missing under a manual deploy.
    EnvironmentAbsent,
}
