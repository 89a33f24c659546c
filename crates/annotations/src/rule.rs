//! The validation rule contract.

use crate::context::ValidationContext;
use crate::result::{ValidationOutcome, ValidationResult};
use std::any::Any;
use std::fmt;

/// Options shared by every rule variant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleOptions {
    error_message: Option<String>,
    order: Option<i32>,
}

impl RuleOptions {
    /// Override message that supersedes the rule's default template.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Ordering hint; lower runs first.
    #[must_use]
    pub const fn order(&self) -> Option<i32> {
        self.order
    }

    pub(crate) fn set_error_message(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    pub(crate) const fn set_order(&mut self, order: i32) {
        self.order = Some(order);
    }
}

/// A stateless check against a single member value.
///
/// `value` is `None` when the member holds no value. Rules never mutate
/// themselves during evaluation, so one instance can serve any number of
/// concurrent validation passes.
pub trait ValidationRule: fmt::Debug + Send + Sync {
    /// Stable rule name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Returns true when `value` passes the check.
    fn is_valid(&self, value: Option<&dyn Any>) -> bool;

    /// Shared options (override message, ordering hint).
    fn options(&self) -> &RuleOptions;

    /// Template used when no override message is set. `{0}` is the display name.
    fn default_error_message(&self) -> &str;

    /// Rule-specific template arguments following the display name.
    fn message_arguments(&self) -> Vec<String> {
        Vec::new()
    }

    /// True for rules that implement "value must be present".
    fn is_required_rule(&self) -> bool {
        false
    }

    /// The active template: the override message, else the default.
    fn error_message_template(&self) -> &str {
        self.options()
            .error_message()
            .unwrap_or_else(|| self.default_error_message())
    }

    /// Format the active template for the given display name.
    fn format_error_message(&self, name: &str) -> String {
        let mut arguments = vec![name.to_owned()];
        arguments.extend(self.message_arguments());
        format_template(self.error_message_template(), &arguments)
    }

    /// Context-aware check. The default defers to [`ValidationRule::is_valid`]
    /// and reports the member under validation.
    fn check(
        &self,
        value: Option<&dyn Any>,
        context: &ValidationContext<'_>,
    ) -> ValidationOutcome {
        if self.is_valid(value) {
            return ValidationResult::SUCCESS;
        }
        Some(ValidationResult::unformatted(context.member_name()))
    }

    /// Evaluate the rule, filling in the formatted message when the check
    /// produced a failure without one.
    fn validate(
        &self,
        value: Option<&dyn Any>,
        context: &ValidationContext<'_>,
    ) -> ValidationOutcome {
        let mut result = self.check(value, context)?;
        if result.error_message().is_none_or(str::is_empty) {
            result.set_error_message(Some(self.format_error_message(context.display_name())));
        }
        Some(result)
    }
}

/// Builder helpers for configuring a rule before it is shared.
pub trait RuleBuilder: Sized {
    /// Mutable access to the rule's options.
    fn options_mut(&mut self) -> &mut RuleOptions;

    /// Override the error message template.
    #[must_use]
    fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.options_mut().set_error_message(message);
        self
    }

    /// Set the ordering hint.
    #[must_use]
    fn with_order(mut self, order: i32) -> Self {
        self.options_mut().set_order(order);
        self
    }
}

/// Substitute positional `{N}` placeholders. Unknown placeholders are kept.
pub fn format_template(template: &str, arguments: &[String]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;
    while let Some((before, after)) = rest.split_once('{') {
        output.push_str(before);
        let substituted = after.split_once('}').and_then(|(index, tail)| {
            let argument = arguments.get(index.parse::<usize>().ok()?)?;
            Some((argument, tail))
        });
        match substituted {
            Some((argument, tail)) => {
                output.push_str(argument);
                rest = tail;
            },
            None => {
                output.push('{');
                rest = after;
            },
        }
    }
    output.push_str(rest);
    output
}
