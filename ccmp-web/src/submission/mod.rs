//! Submission pipeline: validate → begin → create → outcome
//!
//! Validation failures never reach the network. Remote failures restore the
//! submit control to its pre-submit state and are reported with one generic
//! message; there is no automatic retry.

pub mod control;
pub mod forms;
pub mod payload;
pub mod validate;

pub use control::{InFlightForms, SubmitControl};
pub use forms::{FormSpec, APPLICATION_FORM, STORY_FORM};
pub use payload::{ApplicationSubmission, StorySubmission, Submission};
pub use validate::{validate, ValidationError};

use ccmp_common::airtable::{RecordId, RecordStore, RemoteError};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{info, warn};

/// Submitted form fields by name
pub type FormFields = HashMap<String, String>;

/// Shown for every remote failure, whatever the cause
pub const SUBMISSION_FAILED_MESSAGE: &str =
    "提交失败，请稍后重试 / Submission failed, please try again later";

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Form is already being submitted")]
    InFlight,

    #[error("Remote store error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Could not encode submission: {0}")]
    Encode(String),
}

/// Run one submission of `form` into `table`
///
/// `control` is left enabled with its original label whatever the outcome,
/// except when it was already in flight (then it is not touched).
///
/// The HTTP handlers build a fresh control per request, so there `begin()`
/// never refuses and [`SubmissionError::InFlight`] is not produced; duplicate
/// posts of one form instance are refused earlier by
/// [`InFlightForms::try_begin`]. The branch covers callers that keep one
/// control across attempts.
pub async fn submit_form<S: Submission>(
    store: &dyn RecordStore,
    table: &str,
    spec: &FormSpec,
    form: &FormFields,
    control: &mut SubmitControl,
    now: DateTime<Utc>,
) -> Result<RecordId, SubmissionError> {
    validate(form, spec)?;

    if !control.begin() {
        return Err(SubmissionError::InFlight);
    }

    let fields = match S::from_form(form, now).to_fields() {
        Ok(fields) => fields,
        Err(e) => {
            control.restore();
            return Err(SubmissionError::Encode(e.to_string()));
        }
    };

    let result = store.create(table, fields).await;
    control.restore();

    match result {
        Ok(record_id) => {
            info!(form = spec.dom_id, record_id = %record_id, "Submission stored");
            Ok(record_id)
        }
        Err(e) => {
            warn!(form = spec.dom_id, error = %e, "Submission failed");
            Err(SubmissionError::Remote(e))
        }
    }
}
