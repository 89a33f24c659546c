//! Validator settings schema, defaults, and range validation.

use data_annotations_shared::{ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound accepted for `maxFailures`.
pub const MAX_FAILURES_LIMIT: u32 = 10_000;

/// Settings consumed by the validation orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ValidatorSettings {
    /// Evaluate every rule; when false only "required" rules run.
    pub validate_all_members: bool,
    /// Stop walking members after the first member that failed.
    pub stop_on_first_failure: bool,
    /// Cap on the number of collected failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_failures: Option<u32>,
}

impl Default for ValidatorSettings {
    fn default() -> Self {
        Self {
            validate_all_members: true,
            stop_on_first_failure: false,
            max_failures: None,
        }
    }
}

impl ValidatorSettings {
    /// Validate range constraints.
    pub const fn validate(self) -> Result<Self, SettingsError> {
        if let Some(max) = self.max_failures {
            if max == 0 || max > MAX_FAILURES_LIMIT {
                return Err(SettingsError::MaxFailuresOutOfRange { value: max });
            }
        }
        Ok(self)
    }

    /// Set `validateAllMembers`.
    #[must_use]
    pub const fn with_validate_all_members(mut self, value: bool) -> Self {
        self.validate_all_members = value;
        self
    }

    /// Set `stopOnFirstFailure`.
    #[must_use]
    pub const fn with_stop_on_first_failure(mut self, value: bool) -> Self {
        self.stop_on_first_failure = value;
        self
    }

    /// Set `maxFailures`.
    #[must_use]
    pub const fn with_max_failures(mut self, value: Option<u32>) -> Self {
        self.max_failures = value;
        self
    }
}

/// Range violations in validator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsError {
    /// `maxFailures` must be within `1..=MAX_FAILURES_LIMIT`.
    MaxFailuresOutOfRange {
        /// Rejected value.
        value: u32,
    },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxFailuresOutOfRange { .. } => write!(
                formatter,
                "maxFailures must be between 1 and {MAX_FAILURES_LIMIT}"
            ),
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<SettingsError> for ErrorEnvelope {
    fn from(error: SettingsError) -> Self {
        let envelope = Self::expected(ErrorCode::new("config", "out_of_range"), error.to_string());
        match error {
            SettingsError::MaxFailuresOutOfRange { value } => envelope
                .with_metadata("field", "maxFailures")
                .with_metadata("value", value.to_string()),
        }
    }
}
