//! Integration tests for object validation driven by derived metadata.

use data_annotations::{
    Annotated, Subject, ValidationContext, ValidationResult, Validator, ValidatorSettings,
    group_by_error_key,
};
use data_annotations_config::{ConfigFormat, SettingsEnv, load_settings_from_sources};
use data_annotations_shared::Result;
use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Annotated)]
struct Profile {
    #[annotate(member = "Name", required)]
    name: String,
    #[annotate(member = "Avatar", display = "Profile picture", file_extensions)]
    avatar: Option<String>,
    #[annotate(member = "Resume", required, file_extensions = "pdf")]
    resume: Option<String>,
}

fn invalid_profile() -> Profile {
    Profile {
        name: "  ".to_string(),
        avatar: Some("me.bmp".to_string()),
        resume: None,
    }
}

fn valid_profile() -> Profile {
    Profile {
        name: "Grace".to_string(),
        avatar: None,
        resume: Some("cv.PDF".to_string()),
    }
}

fn validator(settings: ValidatorSettings) -> Result<Validator> {
    Ok(Validator::new(settings)?)
}

fn messages(results: &[ValidationResult]) -> Vec<&str> {
    results
        .iter()
        .filter_map(ValidationResult::error_message)
        .collect()
}

#[test]
fn every_failing_member_is_reported_in_declaration_order() -> Result<()> {
    let profile = invalid_profile();
    let mut context = ValidationContext::new(&profile as &dyn Subject)?;
    let results = Validator::default().validate_object(&mut context);
    assert_eq!(
        messages(&results),
        [
            "The Name field is required.",
            "The Profile picture field only accepts files with the following extensions: .png, .jpg, .jpeg, .gif",
            "The Resume field is required.",
        ]
    );
    let keys: Vec<Option<&str>> = results.iter().map(ValidationResult::error_key).collect();
    assert_eq!(keys, [Some("Name"), Some("Avatar"), Some("Resume")]);
    Ok(())
}

#[test]
fn valid_objects_pass() -> Result<()> {
    let profile = valid_profile();
    let mut context = ValidationContext::new(&profile as &dyn Subject)?;
    let mut results = Vec::new();
    assert!(Validator::default().try_validate_object(&mut context, &mut results));
    assert!(results.is_empty());
    Ok(())
}

#[test]
fn try_validate_object_appends_failures() -> Result<()> {
    let profile = invalid_profile();
    let mut context = ValidationContext::new(&profile as &dyn Subject)?;
    let mut results = vec![ValidationResult::new("existing")];
    assert!(!Validator::default().try_validate_object(&mut context, &mut results));
    assert_eq!(results.len(), 4);
    assert_eq!(results[0].error_message(), Some("existing"));
    Ok(())
}

#[test]
fn stop_on_first_failure_ends_the_walk() -> Result<()> {
    let profile = invalid_profile();
    let mut context = ValidationContext::new(&profile as &dyn Subject)?;
    let results = validator(ValidatorSettings::default().with_stop_on_first_failure(true))?
        .validate_object(&mut context);
    assert_eq!(messages(&results), ["The Name field is required."]);
    assert_eq!(context.member_name(), Some("Name"));
    Ok(())
}

#[test]
fn max_failures_caps_collected_results() -> Result<()> {
    let profile = invalid_profile();
    let mut context = ValidationContext::new(&profile as &dyn Subject)?;
    let results = validator(ValidatorSettings::default().with_max_failures(Some(2)))?
        .validate_object(&mut context);
    assert_eq!(results.len(), 2);
    Ok(())
}

#[test]
fn required_only_mode_skips_other_rules() -> Result<()> {
    let profile = invalid_profile();
    let mut context = ValidationContext::new(&profile as &dyn Subject)?;
    let results = validator(ValidatorSettings::default().with_validate_all_members(false))?
        .validate_object(&mut context);
    assert_eq!(
        messages(&results),
        ["The Name field is required.", "The Resume field is required."]
    );
    Ok(())
}

#[test]
fn validate_member_points_the_context_at_the_member() -> Result<()> {
    let profile = invalid_profile();
    let mut context = ValidationContext::new(&profile as &dyn Subject)?;
    let validator = Validator::default();

    let results = validator.validate_member(&mut context, "Avatar");
    assert_eq!(context.member_name(), Some("Avatar"));
    assert_eq!(context.display_name(), "Profile picture");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].member_names(), ["Avatar"]);

    assert!(validator.validate_member(&mut context, "Unknown").is_empty());
    assert_eq!(context.display_name(), "Unknown");
    Ok(())
}

#[test]
fn failures_group_by_error_key() -> Result<()> {
    let profile = invalid_profile();
    let mut context = ValidationContext::new(&profile as &dyn Subject)?;
    let validator = Validator::default();
    let mut results = validator.validate_object(&mut context);
    results.extend(validator.validate_member(&mut context, "Name"));

    let groups = group_by_error_key(&results);
    assert_eq!(groups.len(), 3);
    assert_eq!(groups.get(&Some("Name".to_string())).map(Vec::len), Some(2));
    assert!(!groups.contains_key(&None));
    Ok(())
}

#[test]
fn settings_loaded_from_config_drive_the_validator() -> Result<()> {
    let env_map = BTreeMap::from([(
        "DATA_ANNOTATIONS_MAX_FAILURES".to_string(),
        "1".to_string(),
    )]);
    let env = SettingsEnv::from_map(&env_map)?;
    let settings = load_settings_from_sources(
        Some(r#"{ "validateAllMembers": true, "maxFailures": 50 }"#),
        ConfigFormat::Json,
        &env,
    )?;
    assert_eq!(settings.max_failures, Some(1));

    let profile = invalid_profile();
    let mut context = ValidationContext::new(&profile as &dyn Subject)?;
    let results = validator(settings)?.validate_object(&mut context);
    assert_eq!(messages(&results), ["The Name field is required."]);
    Ok(())
}

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn failures_are_traced_with_structured_fields() -> Result<()> {
    let buffer = SharedBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || writer.clone())
        .finish();

    let profile = invalid_profile();
    let mut context = ValidationContext::new(&profile as &dyn Subject)?;
    let results = tracing::subscriber::with_default(subscriber, || {
        Validator::default().validate_object(&mut context)
    });
    assert_eq!(results.len(), 3);

    let output = buffer.contents();
    assert!(output.contains("rule failed"));
    assert!(output.contains(r#""rule":"file_extensions""#));
    assert!(output.contains(r#""member":"Avatar""#));
    assert!(output.contains("validated object"));
    Ok(())
}
