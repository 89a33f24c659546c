//! Accepted-suffix rule for file-name-like strings.

use super::string_value;
use crate::rule::{RuleBuilder, RuleOptions, ValidationRule};
use std::any::Any;

/// Extensions accepted when none are configured.
pub const DEFAULT_EXTENSIONS: &str = "png,jpg,jpeg,gif";

const DEFAULT_ERROR_MESSAGE: &str =
    "The {0} field only accepts files with the following extensions: {1}";

/// Accepts strings whose suffix appears in a configured list.
///
/// A null value is valid. A value that is not a string, or a string that
/// cannot be read as a path, is invalid.
#[derive(Debug, Clone)]
pub struct FileExtensionsRule {
    options: RuleOptions,
    extensions: Option<String>,
    normalized: Vec<String>,
}

impl FileExtensionsRule {
    /// Rule accepting [`DEFAULT_EXTENSIONS`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_extensions(None::<&str>)
    }

    /// Rule accepting a comma-separated list. Unset or blank falls back to
    /// [`DEFAULT_EXTENSIONS`].
    pub fn with_extensions<'a>(extensions: impl Into<Option<&'a str>>) -> Self {
        let extensions = extensions.into().map(str::to_owned);
        let normalized = normalize_extensions(effective(extensions.as_deref()));
        Self {
            options: RuleOptions::default(),
            extensions,
            normalized,
        }
    }

    /// The configured list, or the default when unset or blank.
    #[must_use]
    pub fn extensions(&self) -> &str {
        effective(self.extensions.as_deref())
    }

    /// Accepted suffixes, each with a leading dot, in configured order.
    #[must_use]
    pub fn normalized_extensions(&self) -> &[String] {
        &self.normalized
    }

    fn accepts(&self, file_name: &str) -> bool {
        extension_of(file_name).is_some_and(|extension| {
            self.normalized
                .iter()
                .any(|accepted| *accepted == extension)
        })
    }
}

impl Default for FileExtensionsRule {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleBuilder for FileExtensionsRule {
    fn options_mut(&mut self) -> &mut RuleOptions {
        &mut self.options
    }
}

impl ValidationRule for FileExtensionsRule {
    fn name(&self) -> &'static str {
        "file_extensions"
    }

    fn is_valid(&self, value: Option<&dyn Any>) -> bool {
        let Some(value) = value else {
            return true;
        };
        string_value(value).is_some_and(|file_name| self.accepts(file_name))
    }

    fn options(&self) -> &RuleOptions {
        &self.options
    }

    fn default_error_message(&self) -> &str {
        DEFAULT_ERROR_MESSAGE
    }

    fn message_arguments(&self) -> Vec<String> {
        vec![self.normalized.join(", ")]
    }
}

fn effective(extensions: Option<&str>) -> &str {
    match extensions {
        Some(list) if !list.trim().is_empty() => list,
        _ => DEFAULT_EXTENSIONS,
    }
}

/// Strip spaces and dots, lower-case, split on commas, and prefix each token
/// with a single dot.
#[must_use]
pub fn normalize_extensions(list: &str) -> Vec<String> {
    let stripped: String = list
        .chars()
        .filter(|character| *character != ' ' && *character != '.')
        .collect::<String>()
        .to_lowercase();
    stripped.split(',').map(|token| format!(".{token}")).collect()
}

/// Lower-cased suffix including its dot; empty when there is none.
///
/// Returns `None` when the string contains characters that are never valid in
/// a path.
fn extension_of(path: &str) -> Option<String> {
    if path
        .chars()
        .any(|character| matches!(character, '"' | '<' | '>' | '|') || u32::from(character) < 32)
    {
        return None;
    }
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let extension = match file_name.rsplit_once('.') {
        Some((_, suffix)) if !suffix.is_empty() => format!(".{suffix}"),
        _ => String::new(),
    };
    Some(extension.to_lowercase())
}
