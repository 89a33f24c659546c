//! Orchestration of rules over members and objects.

use crate::context::ValidationContext;
use crate::result::ValidationResult;
use crate::rule::ValidationRule;
use data_annotations_config::{SettingsError, ValidatorSettings};
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Runs the rules attached to a subject's members and collects failures.
///
/// Validation covers a single object; nested values are not walked.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    settings: ValidatorSettings,
}

impl Validator {
    /// Validator with range-checked settings.
    pub const fn new(settings: ValidatorSettings) -> Result<Self, SettingsError> {
        match settings.validate() {
            Ok(settings) => Ok(Self { settings }),
            Err(error) => Err(error),
        }
    }

    /// Active settings.
    #[must_use]
    pub const fn settings(&self) -> &ValidatorSettings {
        &self.settings
    }

    /// Evaluate `rules` against `value`.
    ///
    /// Rules run in ascending order hint; rules without a hint run last and
    /// ties keep their declaration order.
    pub fn validate_value(
        &self,
        value: Option<&dyn Any>,
        context: &ValidationContext<'_>,
        rules: &[Arc<dyn ValidationRule>],
    ) -> Vec<ValidationResult> {
        self.evaluate(value, context, rules, self.failure_limit())
    }

    /// Point the context at `member`, read its value, and evaluate the rules
    /// attached to it. Unknown members have no rules and always pass.
    pub fn validate_member(
        &self,
        context: &mut ValidationContext<'_>,
        member: &str,
    ) -> Vec<ValidationResult> {
        self.validate_member_within(context, member, self.failure_limit())
    }

    /// Validate every member of the subject in declaration order.
    ///
    /// Leaves the context's member name at the last member evaluated.
    pub fn validate_object(&self, context: &mut ValidationContext<'_>) -> Vec<ValidationResult> {
        let Some(metadata) = context.type_metadata().cloned() else {
            debug!(
                type_name = context.object_type_name(),
                "no metadata registered; nothing to validate"
            );
            return Vec::new();
        };

        let limit = self.failure_limit();
        let mut results = Vec::new();
        for member in metadata.members() {
            if member.rules().is_empty() {
                continue;
            }
            let remaining = limit.saturating_sub(results.len());
            if remaining == 0 {
                debug!(
                    type_name = metadata.type_name(),
                    failures = results.len(),
                    "failure limit reached"
                );
                break;
            }
            let failures = self.validate_member_within(context, member.name(), remaining);
            let failed = !failures.is_empty();
            results.extend(failures);
            if failed && self.settings.stop_on_first_failure {
                debug!(
                    type_name = metadata.type_name(),
                    member = member.name(),
                    "stopping after first failing member"
                );
                break;
            }
        }

        debug!(
            type_name = metadata.type_name(),
            failures = results.len(),
            "validated object"
        );
        results
    }

    /// Validate the object, appending failures to `results`. Returns true when
    /// no failure was found.
    pub fn try_validate_object(
        &self,
        context: &mut ValidationContext<'_>,
        results: &mut Vec<ValidationResult>,
    ) -> bool {
        let failures = self.validate_object(context);
        let valid = failures.is_empty();
        results.extend(failures);
        valid
    }

    fn validate_member_within(
        &self,
        context: &mut ValidationContext<'_>,
        member: &str,
        limit: usize,
    ) -> Vec<ValidationResult> {
        context.set_member_name(Some(member));
        let value = context.object_instance().member_value(member);
        let Some(metadata) = context.type_metadata().cloned() else {
            return Vec::new();
        };
        let Some(member_metadata) = metadata.member(member) else {
            trace!(
                type_name = metadata.type_name(),
                member,
                "member has no metadata"
            );
            return Vec::new();
        };
        self.evaluate(value, context, member_metadata.rules(), limit)
    }

    fn evaluate(
        &self,
        value: Option<&dyn Any>,
        context: &ValidationContext<'_>,
        rules: &[Arc<dyn ValidationRule>],
        limit: usize,
    ) -> Vec<ValidationResult> {
        let mut ordered: Vec<&Arc<dyn ValidationRule>> = rules
            .iter()
            .filter(|rule| self.settings.validate_all_members || rule.is_required_rule())
            .collect();
        ordered.sort_by_key(|rule| {
            let order = rule.options().order();
            (order.is_none(), order.unwrap_or_default())
        });

        let mut results = Vec::new();
        for rule in ordered {
            if results.len() >= limit {
                break;
            }
            if let Some(failure) = rule.validate(value, context) {
                debug!(
                    type_name = context.object_type_name(),
                    member = context.member_name().unwrap_or_default(),
                    rule = rule.name(),
                    "rule failed"
                );
                results.push(failure);
            } else {
                trace!(
                    member = context.member_name().unwrap_or_default(),
                    rule = rule.name(),
                    "rule passed"
                );
            }
        }
        results
    }

    fn failure_limit(&self) -> usize {
        self.settings
            .max_failures
            .map_or(usize::MAX, |max| usize::try_from(max).unwrap_or(usize::MAX))
    }
}

/// Group failures by error key. Failures without a key share the `None` group.
pub fn group_by_error_key(
    results: &[ValidationResult],
) -> BTreeMap<Option<String>, Vec<&ValidationResult>> {
    let mut groups: BTreeMap<Option<String>, Vec<&ValidationResult>> = BTreeMap::new();
    for result in results {
        groups
            .entry(result.error_key().map(str::to_owned))
            .or_default()
            .push(result);
    }
    groups
}
