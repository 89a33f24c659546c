//! Integration tests for validation results produced by rules and callers.

use data_annotations::{
    ArgumentError, FileExtensionsRule, RequiredRule, RuleBuilder, Subject, ValidationContext,
    ValidationResult, ValidationRule,
};
use data_annotations_shared::{ErrorCode, ErrorEnvelope, Result};

fn expected_failure() -> ErrorEnvelope {
    ErrorEnvelope::invariant(ErrorCode::internal(), "expected the rule to fail")
}

struct Form;

impl Subject for Form {}

#[test]
fn constructor_arities_derive_keys() {
    let message_only = ValidationResult::new("msg");
    assert!(message_only.member_names().is_empty());
    assert_eq!(message_only.error_key(), None);

    let with_members = ValidationResult::with_member_names("msg", ["b", "a"]);
    assert_eq!(with_members.error_key(), Some("a, b"));

    let with_key =
        ValidationResult::with_error_key(Some("msg"), ["b", "a"], Some("custom".to_string()));
    assert_eq!(with_key.error_key(), Some("custom"));
    assert_eq!(with_key.member_names(), ["b", "a"]);

    let without_message =
        ValidationResult::with_error_key(None::<String>, ["Name"], Some("form".to_string()));
    assert_eq!(without_message.error_message(), None);
    assert_eq!(without_message.error_key(), Some("form"));
    assert_eq!(without_message.member_names(), ["Name"]);
}

#[test]
fn copies_are_independent() -> Result<()> {
    let source = ValidationResult::with_member_names("msg", ["Name"]);
    let mut copy = ValidationResult::copy_of(&source)?;
    copy.set_error_message(Some("other".to_string()));
    assert_eq!(source.error_message(), Some("msg"));
    assert_eq!(copy.error_key(), Some("Name"));

    assert_eq!(
        ValidationResult::copy_of(None::<&ValidationResult>).err(),
        Some(ArgumentError::Null {
            param: "validation_result"
        })
    );
    Ok(())
}

#[test]
fn rule_failures_name_the_member_under_validation() -> Result<()> {
    let subject = Form;
    let mut context = ValidationContext::new(&subject as &dyn Subject)?;
    context.set_member_name(Some("Email"));

    let Some(failure) = RequiredRule::new().validate(None, &context) else {
        return Err(expected_failure());
    };
    assert_eq!(failure.member_names(), ["Email"]);
    assert_eq!(failure.error_key(), Some("Email"));
    assert_eq!(failure.error_message(), Some("The Email field is required."));
    assert_eq!(failure.to_string(), "The Email field is required.");
    Ok(())
}

#[test]
fn rule_failures_without_member_have_no_key() -> Result<()> {
    let subject = Form;
    let context = ValidationContext::new(&subject as &dyn Subject)?;
    let rule = FileExtensionsRule::new().with_error_message("{0}: {1}");
    let value = 7_u16;

    let Some(failure) = rule.validate(Some(&value), &context) else {
        return Err(expected_failure());
    };
    assert!(failure.member_names().is_empty());
    assert_eq!(failure.error_key(), None);
    assert_eq!(
        failure.error_message(),
        Some("Form: .png, .jpg, .jpeg, .gif")
    );
    Ok(())
}

#[test]
fn null_values_pass_non_required_rules() -> Result<()> {
    let subject = Form;
    let context = ValidationContext::new(&subject as &dyn Subject)?;
    assert!(FileExtensionsRule::new().validate(None, &context).is_none());
    assert!(
        FileExtensionsRule::with_extensions("txt")
            .validate(None, &context)
            .is_none()
    );
    Ok(())
}
