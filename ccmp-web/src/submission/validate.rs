//! Client-side style form validation, run before any network call

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use super::forms::FormSpec;
use super::FormFields;

/// Shown when required fields are blank
pub const REQUIRED_FIELDS_MESSAGE: &str = "请填写所有必填字段 / Please fill in all required fields";

/// Shown when the email field is filled but malformed
pub const INVALID_EMAIL_MESSAGE: &str = "请输入有效的邮箱地址 / Please enter a valid email address";

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{} ({})", user_message(.flagged, .invalid_email), .flagged.join(", "))]
pub struct ValidationError {
    /// Fields to highlight, in form order
    pub flagged: Vec<String>,
    /// The email field was filled but malformed
    pub invalid_email: bool,
}

impl ValidationError {
    pub fn message(&self) -> &'static str {
        user_message(&self.flagged, &self.invalid_email)
    }
}

/// The malformed-email message only when the email is the sole problem
fn user_message(flagged: &[String], invalid_email: &bool) -> &'static str {
    if *invalid_email && flagged.len() == 1 {
        INVALID_EMAIL_MESSAGE
    } else {
        REQUIRED_FIELDS_MESSAGE
    }
}

/// Check that an address looks like `local@domain.tld`
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Validate submitted fields against a form definition
pub fn validate(form: &FormFields, spec: &FormSpec) -> Result<(), ValidationError> {
    let mut flagged: Vec<String> = spec
        .required_fields()
        .filter(|name| form.get(*name).map_or(true, |v| v.trim().is_empty()))
        .map(str::to_string)
        .collect();

    let mut invalid_email = false;
    if let Some(email_field) = spec.email_field {
        if let Some(value) = form.get(email_field).filter(|v| !v.is_empty()) {
            if !is_valid_email(value) {
                invalid_email = true;
                if !flagged.iter().any(|f| f == email_field) {
                    flagged.push(email_field.to_string());
                }
            }
        }
    }

    if flagged.is_empty() {
        return Ok(());
    }

    // Keep form order so the first flagged field is the first on the page
    flagged.sort_by_key(|name| spec.fields.iter().position(|f| f.name == name));

    Err(ValidationError {
        flagged,
        invalid_email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::forms::{APPLICATION_FORM, STORY_FORM};

    fn complete_application() -> FormFields {
        [
            ("name", "Li Hua"),
            ("email", "lihua@example.com"),
            ("university", "Tsinghua"),
            ("major", "CS"),
            ("degree", "硕士 Master"),
            ("location", "Beijing"),
            ("current_status", "Student"),
            ("interest_topics", "Career switching"),
            ("preferred_meeting", "线上 Online"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_complete_form_passes() {
        assert!(validate(&complete_application(), &APPLICATION_FORM).is_ok());
    }

    #[test]
    fn test_empty_email_is_flagged_as_required() {
        let mut form = complete_application();
        form.insert("email".to_string(), String::new());

        let err = validate(&form, &APPLICATION_FORM).unwrap_err();
        assert_eq!(err.flagged, vec!["email"]);
        assert!(!err.invalid_email);
        assert_eq!(err.message(), REQUIRED_FIELDS_MESSAGE);
    }

    #[test]
    fn test_whitespace_only_counts_as_blank() {
        let mut form = complete_application();
        form.insert("major".to_string(), "  \n ".to_string());
        form.remove("location");

        let err = validate(&form, &APPLICATION_FORM).unwrap_err();
        assert_eq!(err.flagged, vec!["major", "location"]);
    }

    #[test]
    fn test_malformed_email_is_flagged() {
        let mut form = complete_application();
        form.insert("email".to_string(), "not-an-email".to_string());

        let err = validate(&form, &APPLICATION_FORM).unwrap_err();
        assert_eq!(err.flagged, vec!["email"]);
        assert!(err.invalid_email);
        assert_eq!(err.message(), INVALID_EMAIL_MESSAGE);
    }

    #[test]
    fn test_flags_keep_form_order() {
        let mut form = complete_application();
        form.insert("email".to_string(), "a@b".to_string());
        form.remove("name");

        let err = validate(&form, &APPLICATION_FORM).unwrap_err();
        assert_eq!(err.flagged, vec!["name", "email"]);
        assert_eq!(err.message(), REQUIRED_FIELDS_MESSAGE);
        assert_eq!(err.to_string(), format!("{} (name, email)", REQUIRED_FIELDS_MESSAGE));
    }

    #[test]
    fn test_display_uses_email_message_when_only_email_is_wrong() {
        let mut form = complete_application();
        form.insert("email".to_string(), "not-an-email".to_string());

        let err: Box<dyn std::error::Error> = Box::new(validate(&form, &APPLICATION_FORM).unwrap_err());
        assert_eq!(err.to_string(), format!("{} (email)", INVALID_EMAIL_MESSAGE));
    }

    #[test]
    fn test_optional_fields_may_be_absent() {
        let form = complete_application();
        assert!(!form.contains_key("phone"));
        assert!(validate(&form, &APPLICATION_FORM).is_ok());
    }

    #[test]
    fn test_story_form_validation() {
        let form: FormFields = [("submitter_name", "Ann"), ("submitter_email", "ann@x.org")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let err = validate(&form, &STORY_FORM).unwrap_err();
        assert_eq!(err.flagged, vec!["story_title", "story_content"]);
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("@c.d"));
        assert!(!is_valid_email("a@@c.d"));
    }
}
