//! Outcome of a single rule evaluation.

use crate::error::ArgumentError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of evaluating a rule: `None` is success, `Some` carries the failure.
pub type ValidationOutcome = Option<ValidationResult>;

/// Failure record produced by a rule or by an orchestrator.
///
/// Success is never represented by a `ValidationResult`; it is the absence of
/// one ([`ValidationResult::SUCCESS`]). Two results with the same content are
/// not considered equal; group them through [`ValidationResult::error_key`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
    member_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_key: Option<String>,
}

impl ValidationResult {
    /// The success sentinel.
    pub const SUCCESS: ValidationOutcome = None;

    /// Failure with a message and no affected members.
    pub fn new(error_message: impl Into<String>) -> Self {
        Self::build(Some(error_message.into()), Vec::new(), None)
    }

    /// Failure with a message and the affected members.
    ///
    /// The error key is derived from the member names, sorted and joined
    /// with `", "`. No key is derived when the list is empty.
    pub fn with_member_names<I, S>(error_message: impl Into<String>, member_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(Some(error_message.into()), collect(member_names), None)
    }

    /// Failure with an optional message, the affected members, and an explicit
    /// error key.
    ///
    /// A present `error_key` always wins over the derived one.
    pub fn with_error_key<I, S>(
        error_message: Option<impl Into<String>>,
        member_names: I,
        error_key: Option<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(error_message.map(Into::into), collect(member_names), error_key)
    }

    /// Failure without a message; the evaluating rule supplies its formatted
    /// default message.
    pub fn unformatted<I, S>(member_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(None, collect(member_names), None)
    }

    /// Copy an existing result's message, members, and error key.
    pub fn copy_of<'a>(source: impl Into<Option<&'a Self>>) -> Result<Self, ArgumentError> {
        let Some(source) = source.into() else {
            return Err(ArgumentError::Null {
                param: "validation_result",
            });
        };
        Ok(Self {
            error_message: source.error_message.clone(),
            member_names: source.member_names.clone(),
            error_key: source.error_key.clone(),
        })
    }

    fn build(
        error_message: Option<String>,
        member_names: Vec<String>,
        error_key: Option<String>,
    ) -> Self {
        let error_key = error_key.or_else(|| derive_error_key(&member_names));
        Self {
            error_message,
            member_names,
            error_key,
        }
    }

    /// Affected member names in the order supplied. May be empty.
    #[must_use]
    pub fn member_names(&self) -> &[String] {
        &self.member_names
    }

    /// The error message, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Replace the error message.
    pub fn set_error_message(&mut self, error_message: Option<String>) {
        self.error_message = error_message;
    }

    /// The grouping key, if any.
    #[must_use]
    pub fn error_key(&self) -> Option<&str> {
        self.error_key.as_deref()
    }

    /// Replace the grouping key.
    pub fn set_error_key(&mut self, error_key: Option<String>) {
        self.error_key = error_key;
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        // An empty message is still a message.
        match &self.error_message {
            Some(message) => formatter.write_str(message),
            None => formatter.write_str(std::any::type_name::<Self>()),
        }
    }
}

fn collect<I, S>(member_names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    member_names.into_iter().map(Into::into).collect()
}

fn derive_error_key(member_names: &[String]) -> Option<String> {
    if member_names.is_empty() {
        return None;
    }
    let mut sorted: Vec<&str> = member_names.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    Some(sorted.join(", "))
}
