//! Value-must-be-present rule.

use super::string_value;
use crate::rule::{RuleBuilder, RuleOptions, ValidationRule};
use std::any::Any;

const DEFAULT_ERROR_MESSAGE: &str = "The {0} field is required.";

/// Fails on null, and on empty or whitespace-only strings unless
/// `allow_empty_strings` is set.
#[derive(Debug, Clone, Default)]
pub struct RequiredRule {
    options: RuleOptions,
    allow_empty_strings: bool,
}

impl RequiredRule {
    /// Rule rejecting null and blank strings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept empty and whitespace-only strings.
    #[must_use]
    pub const fn allow_empty_strings(mut self) -> Self {
        self.allow_empty_strings = true;
        self
    }

    /// True when blank strings are accepted.
    #[must_use]
    pub const fn allows_empty_strings(&self) -> bool {
        self.allow_empty_strings
    }
}

impl RuleBuilder for RequiredRule {
    fn options_mut(&mut self) -> &mut RuleOptions {
        &mut self.options
    }
}

impl ValidationRule for RequiredRule {
    fn name(&self) -> &'static str {
        "required"
    }

    fn is_valid(&self, value: Option<&dyn Any>) -> bool {
        let Some(value) = value else {
            return false;
        };
        if self.allow_empty_strings {
            return true;
        }
        string_value(value).is_none_or(|text| !text.trim().is_empty())
    }

    fn options(&self) -> &RuleOptions {
        &self.options
    }

    fn default_error_message(&self) -> &str {
        DEFAULT_ERROR_MESSAGE
    }

    fn is_required_rule(&self) -> bool {
        true
    }
}
