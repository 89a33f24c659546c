//! Display-related member metadata.

use serde::{Deserialize, Serialize};

/// Human-facing label for a member.
///
/// This is the record a [`crate::ValidationContext`] consults when it resolves
/// the display name of the member under validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayAttribute {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl DisplayAttribute {
    /// Label with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
        }
    }

    /// Attach a longer description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The configured label, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The configured description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Formatting options for how a member's value is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayFormat {
    /// Format string applied to the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_format_string: Option<String>,
    /// Text rendered when the value is null.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub null_display_text: Option<String>,
    /// Convert empty strings to null on input.
    pub convert_empty_string_to_null: bool,
    /// Apply `data_format_string` in edit mode too.
    pub apply_format_in_edit_mode: bool,
    /// HTML-encode the rendered value.
    pub html_encode: bool,
}

impl Default for DisplayFormat {
    fn default() -> Self {
        Self {
            data_format_string: None,
            null_display_text: None,
            convert_empty_string_to_null: true,
            apply_format_in_edit_mode: false,
            html_encode: true,
        }
    }
}

impl DisplayFormat {
    /// Set the format string.
    #[must_use]
    pub fn data_format_string(mut self, format: impl Into<String>) -> Self {
        self.data_format_string = Some(format.into());
        self
    }

    /// Set the null display text.
    #[must_use]
    pub fn null_display_text(mut self, text: impl Into<String>) -> Self {
        self.null_display_text = Some(text.into());
        self
    }

    /// Render `null_display_text` when the value is null, otherwise hand the
    /// value back untouched.
    #[must_use]
    pub fn render_null<'a>(&'a self, value: Option<&'a str>) -> Option<&'a str> {
        let value = if self.convert_empty_string_to_null {
            value.filter(|text| !text.is_empty())
        } else {
            value
        };
        value.or(self.null_display_text.as_deref())
    }
}
