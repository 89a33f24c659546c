//! Settings loading helpers (env + file).
//!
//! The loader is responsible for deterministic merge order and surfacing
//! user-facing errors as typed `ErrorEnvelope`s.

use crate::{SettingsEnv, ValidatorSettings, apply_env_overrides};
use data_annotations_shared::{ErrorClass, ErrorCode, ErrorEnvelope};
use std::path::Path;
use tracing::debug;

/// Serialized settings formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON document.
    Json,
    /// TOML document.
    Toml,
}

/// Load validator settings using a deterministic precedence order.
///
/// Precedence (highest wins):
/// - env overrides (`SettingsEnv`)
/// - settings document (`input`)
/// - defaults (`ValidatorSettings::default()`)
pub fn load_settings_from_sources(
    input: Option<&str>,
    format: ConfigFormat,
    env: &SettingsEnv,
) -> Result<ValidatorSettings, ErrorEnvelope> {
    let settings = match input {
        None => ValidatorSettings::default(),
        Some(input) => parse_settings(input, format)?,
    };

    debug!(
        from_document = input.is_some(),
        env_overrides = !env.is_empty(),
        "loading validator settings"
    );

    // env is applied last and also validates the resulting settings.
    apply_env_overrides(settings, env)
}

/// Load validator settings from an optional file path.
pub fn load_settings_from_path(
    path: Option<&Path>,
    env: &SettingsEnv,
) -> Result<ValidatorSettings, ErrorEnvelope> {
    let Some(path) = path else {
        return load_settings_from_sources(None, ConfigFormat::Json, env);
    };

    let format = detect_config_format(path)?;
    let text = read_settings_file(path)?;
    load_settings_from_sources(Some(&text), format, env)
}

/// Load validator settings from std env and an optional file path.
pub fn load_settings_std_env(path: Option<&Path>) -> Result<ValidatorSettings, ErrorEnvelope> {
    let env = SettingsEnv::from_std_env().map_err(ErrorEnvelope::from)?;
    load_settings_from_path(path, &env)
}

/// Serialize settings as deterministic pretty JSON (with trailing newline).
pub fn to_pretty_json(settings: &ValidatorSettings) -> Result<String, ErrorEnvelope> {
    let mut output = serde_json::to_string_pretty(settings).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::internal(),
            format!("failed to serialize settings: {error}"),
            ErrorClass::NonRetriable,
        )
    })?;
    output.push('\n');
    Ok(output)
}

/// Serialize settings as deterministic pretty TOML (with trailing newline).
pub fn to_pretty_toml(settings: &ValidatorSettings) -> Result<String, ErrorEnvelope> {
    let mut output = toml::to_string_pretty(settings).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::new("config", "serialize_toml"),
            format!("failed to serialize settings TOML: {error}"),
            ErrorClass::NonRetriable,
        )
    })?;
    output.push('\n');
    Ok(output)
}

fn parse_settings(input: &str, format: ConfigFormat) -> Result<ValidatorSettings, ErrorEnvelope> {
    match format {
        ConfigFormat::Json => serde_json::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_json"),
                format!("invalid settings JSON: {error}"),
            )
            .with_metadata("source", "settings")
        }),
        ConfigFormat::Toml => toml::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_toml"),
                format!("invalid settings TOML: {error}"),
            )
            .with_metadata("source", "settings")
        }),
    }
}

fn read_settings_file(path: &Path) -> Result<String, ErrorEnvelope> {
    std::fs::read_to_string(path).map_err(|error| {
        let code = match error.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::new("config", "settings_file_not_found"),
            std::io::ErrorKind::PermissionDenied => {
                ErrorCode::new("config", "settings_file_permission_denied")
            },
            _ => ErrorCode::new("config", "settings_file_io"),
        };

        ErrorEnvelope::expected(code, format!("failed to read settings file: {error}"))
            .with_metadata("path", path.to_string_lossy().to_string())
    })
}

fn detect_config_format(path: &Path) -> Result<ConfigFormat, ErrorEnvelope> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        None | Some("json") => Ok(ConfigFormat::Json),
        Some("toml") => Ok(ConfigFormat::Toml),
        Some(other) => Err(ErrorEnvelope::expected(
            ErrorCode::new("config", "unsupported_format"),
            "unsupported settings format; use .json or .toml",
        )
        .with_metadata("extension", other.to_string())),
    }
}
