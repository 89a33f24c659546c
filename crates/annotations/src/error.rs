//! Contract violations raised synchronously by constructors and setters.

use data_annotations_shared::{ErrorCode, ErrorEnvelope};
use std::fmt;

/// Invalid-argument failures.
///
/// These are raised at the point of violation and never deferred. A value
/// that fails a rule is not an `ArgumentError`; see [`crate::ValidationResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    /// A required argument was absent.
    Null {
        /// Parameter name.
        param: &'static str,
    },
    /// A string argument was empty.
    Empty {
        /// Parameter name.
        param: &'static str,
    },
    /// A string argument was absent, empty, or whitespace only.
    NullOrWhitespace {
        /// Parameter name.
        param: &'static str,
    },
    /// A numeric argument was outside its allowed range.
    OutOfRange {
        /// Parameter name.
        param: &'static str,
        /// Rejected value.
        value: String,
    },
}

impl ArgumentError {
    /// Name of the offending parameter.
    #[must_use]
    pub const fn param(&self) -> &'static str {
        match self {
            Self::Null { param }
            | Self::Empty { param }
            | Self::NullOrWhitespace { param }
            | Self::OutOfRange { param, .. } => param,
        }
    }

    fn error_code(&self) -> ErrorCode {
        match self {
            Self::Null { .. } => ErrorCode::new("argument", "null"),
            Self::Empty { .. } => ErrorCode::new("argument", "empty"),
            Self::NullOrWhitespace { .. } => ErrorCode::new("argument", "null_or_whitespace"),
            Self::OutOfRange { .. } => ErrorCode::new("argument", "out_of_range"),
        }
    }
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null { param } => write!(formatter, "{param} must be present"),
            Self::Empty { param } => write!(formatter, "{param} must be non-empty"),
            Self::NullOrWhitespace { param } => {
                write!(formatter, "{param} must not be empty or whitespace")
            },
            Self::OutOfRange { param, value } => {
                write!(formatter, "{param} is out of range ({value})")
            },
        }
    }
}

impl std::error::Error for ArgumentError {}

impl From<ArgumentError> for ErrorEnvelope {
    fn from(error: ArgumentError) -> Self {
        let mut envelope =
            Self::expected(error.error_code(), error.to_string()).with_metadata("param", error.param());
        if let ArgumentError::OutOfRange { value, .. } = error {
            envelope = envelope.with_metadata("value", value);
        }
        envelope
    }
}

/// Require a string that is present and not blank.
pub(crate) fn non_blank(
    value: Option<&str>,
    param: &'static str,
) -> Result<String, ArgumentError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.to_owned()),
        _ => Err(ArgumentError::NullOrWhitespace { param }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_errors_map_into_envelopes() {
        let envelope = ErrorEnvelope::from(ArgumentError::Null { param: "instance" });
        assert!(envelope.has_code("argument", "null"));
        assert_eq!(
            envelope.metadata.get("param").map(String::as_str),
            Some("instance")
        );

        let envelope = ErrorEnvelope::from(ArgumentError::OutOfRange {
            param: "order",
            value: "-2".to_string(),
        });
        assert!(envelope.has_code("argument", "out_of_range"));
        assert_eq!(envelope.metadata.get("value").map(String::as_str), Some("-2"));
    }

    #[test]
    fn non_blank_rejects_whitespace() {
        assert_eq!(
            non_blank(Some("  "), "name"),
            Err(ArgumentError::NullOrWhitespace { param: "name" })
        );
        assert_eq!(
            non_blank(None, "name"),
            Err(ArgumentError::NullOrWhitespace { param: "name" })
        );
        assert_eq!(non_blank(Some("Orders"), "name"), Ok("Orders".to_string()));
    }
}
