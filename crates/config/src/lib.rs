//! # data-annotations-config
//!
//! Settings schema, validation, and loading for the validation orchestrator.
//! This crate depends on `shared` only.

/// Environment variable parsing and merging.
pub mod env;
/// Settings loading helpers (env + file).
pub mod load;
/// Settings schema types and range checks.
pub mod schema;

pub use env::{
    ENV_MAX_FAILURES, ENV_STOP_ON_FIRST_FAILURE, ENV_VALIDATE_ALL_MEMBERS, EnvParseError,
    SettingsEnv, apply_env_overrides,
};
pub use load::{
    ConfigFormat, load_settings_from_path, load_settings_from_sources, load_settings_std_env,
    to_pretty_json, to_pretty_toml,
};
pub use schema::{MAX_FAILURES_LIMIT, SettingsError, ValidatorSettings};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_annotations_shared::shared_crate_version;

    #[test]
    fn config_crate_compiles() {
        let version = config_crate_version();
        assert!(!version.is_empty());
    }

    #[test]
    fn config_can_use_shared() {
        assert!(!shared_crate_version().is_empty());
    }
}
