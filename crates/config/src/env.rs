//! Environment variable parsing and env-to-settings merging.
//!
//! Env parsing is strict: a present but invalid value fails fast instead of
//! silently falling back to the default.

use crate::schema::ValidatorSettings;
use data_annotations_shared::{ErrorCode, ErrorEnvelope};
use std::collections::BTreeMap;
use std::fmt;

/// Env var: override for `validateAllMembers`.
pub const ENV_VALIDATE_ALL_MEMBERS: &str = "DATA_ANNOTATIONS_VALIDATE_ALL_MEMBERS";
/// Env var: override for `stopOnFirstFailure`.
pub const ENV_STOP_ON_FIRST_FAILURE: &str = "DATA_ANNOTATIONS_STOP_ON_FIRST_FAILURE";
/// Env var: override for `maxFailures`.
pub const ENV_MAX_FAILURES: &str = "DATA_ANNOTATIONS_MAX_FAILURES";

/// Parsed env overrides for validator settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsEnv {
    /// Override for `validateAllMembers`.
    pub validate_all_members: Option<bool>,
    /// Override for `stopOnFirstFailure`.
    pub stop_on_first_failure: Option<bool>,
    /// Override for `maxFailures`.
    pub max_failures: Option<u32>,
}

impl SettingsEnv {
    /// Parse overrides from an explicit key/value map.
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            validate_all_members: parse_optional_bool(map, ENV_VALIDATE_ALL_MEMBERS)?,
            stop_on_first_failure: parse_optional_bool(map, ENV_STOP_ON_FIRST_FAILURE)?,
            max_failures: parse_optional_u32(map, ENV_MAX_FAILURES)?,
        })
    }

    /// Parse overrides from the process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let mut map = BTreeMap::new();
        for name in [
            ENV_VALIDATE_ALL_MEMBERS,
            ENV_STOP_ON_FIRST_FAILURE,
            ENV_MAX_FAILURES,
        ] {
            if let Ok(value) = std::env::var(name) {
                map.insert(name.to_string(), value);
            }
        }
        Self::from_map(&map)
    }

    /// Returns true when no override is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.validate_all_members.is_none()
            && self.stop_on_first_failure.is_none()
            && self.max_failures.is_none()
    }
}

/// Apply env overrides on top of settings and validate the result.
pub fn apply_env_overrides(
    mut settings: ValidatorSettings,
    env: &SettingsEnv,
) -> Result<ValidatorSettings, ErrorEnvelope> {
    if let Some(value) = env.validate_all_members {
        settings.validate_all_members = value;
    }
    if let Some(value) = env.stop_on_first_failure {
        settings.stop_on_first_failure = value;
    }
    if let Some(value) = env.max_failures {
        settings.max_failures = Some(value);
    }

    settings.validate().map_err(ErrorEnvelope::from)
}

/// Validation failures when parsing env variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Boolean env var had an invalid value.
    InvalidBool {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Integer env var had an invalid value.
    InvalidInt {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("config", "empty_env_var"),
            Self::InvalidBool { .. } => ErrorCode::new("config", "invalid_env_bool"),
            Self::InvalidInt { .. } => ErrorCode::new("config", "invalid_env_int"),
        }
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} must be non-empty"),
            Self::InvalidBool { var, .. } => write!(formatter, "{var} must be a boolean"),
            Self::InvalidInt { var, .. } => write!(formatter, "{var} must be an integer"),
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let envelope = Self::expected(error.error_code(), error.to_string());

        match error {
            EnvParseError::EmptyValue { var } => envelope.with_metadata("env_var", var),
            EnvParseError::InvalidBool { var, value } | EnvParseError::InvalidInt { var, value } => {
                envelope
                    .with_metadata("env_var", var)
                    .with_metadata("value", value)
            },
        }
    }
}

fn parse_optional_bool(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<bool>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(EnvParseError::InvalidBool {
            var,
            value: raw.clone(),
        }),
    }
}

fn parse_optional_u32(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<u32>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| EnvParseError::InvalidInt {
            var,
            value: raw.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn empty_map_yields_no_overrides() -> Result<(), EnvParseError> {
        let env = SettingsEnv::from_map(&BTreeMap::new())?;
        assert!(env.is_empty());
        Ok(())
    }

    #[test]
    fn bool_aliases_are_accepted() -> Result<(), EnvParseError> {
        let env = SettingsEnv::from_map(&env_map(&[
            (ENV_VALIDATE_ALL_MEMBERS, "off"),
            (ENV_STOP_ON_FIRST_FAILURE, " YES "),
        ]))?;
        assert_eq!(env.validate_all_members, Some(false));
        assert_eq!(env.stop_on_first_failure, Some(true));
        Ok(())
    }

    #[test]
    fn invalid_values_fail_fast() {
        let error = SettingsEnv::from_map(&env_map(&[(ENV_VALIDATE_ALL_MEMBERS, "maybe")]));
        assert_eq!(
            error,
            Err(EnvParseError::InvalidBool {
                var: ENV_VALIDATE_ALL_MEMBERS,
                value: "maybe".to_string(),
            })
        );

        let error = SettingsEnv::from_map(&env_map(&[(ENV_MAX_FAILURES, "  ")]));
        assert_eq!(
            error,
            Err(EnvParseError::EmptyValue {
                var: ENV_MAX_FAILURES
            })
        );

        let envelope = ErrorEnvelope::from(EnvParseError::InvalidInt {
            var: ENV_MAX_FAILURES,
            value: "many".to_string(),
        });
        assert!(envelope.has_code("config", "invalid_env_int"));
        assert_eq!(
            envelope.metadata.get("env_var").map(String::as_str),
            Some(ENV_MAX_FAILURES)
        );
    }

    #[test]
    fn overrides_are_validated_after_merge() {
        let env = SettingsEnv {
            max_failures: Some(0),
            ..SettingsEnv::default()
        };
        let result = apply_env_overrides(ValidatorSettings::default(), &env);
        assert!(matches!(result, Err(error) if error.has_code("config", "out_of_range")));
    }
}
