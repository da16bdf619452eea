//! Write-only record payloads for the applications and story submission tables

use ccmp_common::time;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::FormFields;

/// Initial status of a new application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ApplicationStatus {
    #[serde(rename = "待处理")]
    Pending,
}

/// Initial status of a new story proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StoryStatus {
    #[serde(rename = "待审核")]
    UnderReview,
}

/// A record payload built from submitted form fields
pub trait Submission: Serialize + Sized {
    fn from_form(form: &FormFields, now: DateTime<Utc>) -> Self;

    /// Field map sent as the record's `fields`
    fn to_fields(&self) -> Result<Map<String, Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(serde::ser::Error::custom(format!(
                "submission serialized to non-object: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub university: String,
    pub major: String,
    pub degree: String,
    pub location: String,
    pub current_status: String,
    pub interest_topics: String,
    pub career_direction: String,
    pub preferred_meeting: String,
    pub preferred_time: String,
    pub message: String,
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorySubmission {
    pub submitter_name: String,
    pub submitter_email: String,
    pub story_title: String,
    pub story_content: String,
    pub allow_publish: bool,
    pub anonymous: bool,
    /// `YYYY-MM-DD`
    pub submission_date: String,
    pub status: StoryStatus,
}

/// Field value, or `""` when absent
fn value(form: &FormFields, name: &str) -> String {
    form.get(name).map(|v| v.trim().to_string()).unwrap_or_default()
}

/// HTML checkbox semantics: checked iff the submitted value is "on"
fn checked(form: &FormFields, name: &str) -> bool {
    form.get(name).map_or(false, |v| v == "on")
}

impl Submission for ApplicationSubmission {
    fn from_form(form: &FormFields, _now: DateTime<Utc>) -> Self {
        Self {
            name: value(form, "name"),
            email: value(form, "email"),
            phone: value(form, "phone"),
            university: value(form, "university"),
            major: value(form, "major"),
            degree: value(form, "degree"),
            location: value(form, "location"),
            current_status: value(form, "current_status"),
            interest_topics: value(form, "interest_topics"),
            career_direction: value(form, "career_direction"),
            preferred_meeting: value(form, "preferred_meeting"),
            preferred_time: value(form, "preferred_time"),
            message: value(form, "message"),
            status: ApplicationStatus::Pending,
        }
    }
}

impl Submission for StorySubmission {
    fn from_form(form: &FormFields, now: DateTime<Utc>) -> Self {
        Self {
            submitter_name: value(form, "submitter_name"),
            submitter_email: value(form, "submitter_email"),
            story_title: value(form, "story_title"),
            story_content: form.get("story_content").cloned().unwrap_or_default(),
            allow_publish: checked(form, "allow_publish"),
            anonymous: checked(form, "anonymous"),
            submission_date: time::ymd(now),
            status: StoryStatus::UnderReview,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn form(pairs: &[(&str, &str)]) -> FormFields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_application_optional_fields_become_empty_strings() {
        let submission = ApplicationSubmission::from_form(
            &form(&[("name", " Li "), ("email", "li@example.com")]),
            now(),
        );
        let fields = submission.to_fields().unwrap();

        assert_eq!(fields["name"], json!("Li"));
        assert_eq!(fields["phone"], json!(""));
        assert_eq!(fields["message"], json!(""));
        assert_eq!(fields["status"], json!("待处理"));
        assert_eq!(fields.len(), 14);
    }

    #[test]
    fn test_story_checkboxes_and_date() {
        let submission = StorySubmission::from_form(
            &form(&[
                ("submitter_name", "Ann"),
                ("story_content", "  line one\nline two "),
                ("allow_publish", "on"),
                ("anonymous", "off"),
            ]),
            now(),
        );

        assert!(submission.allow_publish);
        assert!(!submission.anonymous);
        assert_eq!(submission.story_content, "  line one\nline two ");
        assert_eq!(submission.submission_date, "2025-09-01");

        let fields = submission.to_fields().unwrap();
        assert_eq!(fields["status"], json!("待审核"));
        assert_eq!(fields["allow_publish"], json!(true));
        assert_eq!(fields["anonymous"], json!(false));
    }

    #[test]
    fn test_unchecked_boxes_are_absent_and_false() {
        let submission = StorySubmission::from_form(&form(&[]), now());
        assert!(!submission.allow_publish);
        assert!(!submission.anonymous);
    }
}
