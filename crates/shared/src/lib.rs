//! # data-annotations-shared
//!
//! Shared error envelope and result types for the data-annotations workspace.
//!
//! Every other crate converts its domain errors into an [`ErrorEnvelope`] so
//! callers see one structured shape regardless of where a failure started.
//!
//! ## Design Principles
//!
//! 1. **No workspace dependencies** - This crate only depends on external crates
//! 2. **Serde-compatible** - All public types support serialization

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod errors;

pub use errors::{ErrorClass, ErrorCode, ErrorEnvelope, ErrorKind, ErrorMetadata, Result};

/// Returns the shared crate version.
#[must_use]
pub const fn shared_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::errors::{ErrorClass, ErrorCode, ErrorEnvelope, ErrorKind};

    #[test]
    fn shared_error_types_are_available() {
        let error = ErrorEnvelope::expected(ErrorCode::invalid_argument(), "invalid");
        assert_eq!(error.kind, ErrorKind::Expected);
        assert_eq!(error.class, ErrorClass::NonRetriable);
    }

    #[test]
    fn shared_crate_version_is_non_empty() {
        assert!(!super::shared_crate_version().is_empty());
    }
}
