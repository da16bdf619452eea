//! Form submission endpoints
//!
//! Both endpoints accept `application/x-www-form-urlencoded` bodies with the
//! form's field names plus the hidden `form_token`.

use axum::{extract::State, http::StatusCode, Form, Json};
use serde::Serialize;
use tracing::warn;

use crate::error::{ApiError, ApiResult};
use crate::submission::{
    submit_form, ApplicationSubmission, FormFields, FormSpec, StorySubmission, Submission,
    SubmitControl, APPLICATION_FORM, STORY_FORM,
};
use crate::AppState;

/// Hidden field identifying the form instance
pub const FORM_TOKEN_FIELD: &str = "form_token";

pub const APPLICATION_SUCCESS_MESSAGE: &str = "申请提交成功！/ Application submitted successfully";

pub const STORY_SUCCESS_MESSAGE: &str =
    "故事提交成功！我们会在审核后发布。\nThank you for sharing your story!";

/// Response for a stored submission
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub record_id: String,
    pub message: String,
    /// Submit button state to apply after the outcome
    pub submit_button: SubmitControl,
}

/// POST /api/applications
pub async fn post_application(
    State(state): State<AppState>,
    Form(form): Form<FormFields>,
) -> ApiResult<(StatusCode, Json<SubmissionResponse>)> {
    let table = state.settings.tables.applications.clone();
    handle::<ApplicationSubmission>(&state, &table, &APPLICATION_FORM, form, APPLICATION_SUCCESS_MESSAGE)
        .await
}

/// POST /api/story-submissions
pub async fn post_story_submission(
    State(state): State<AppState>,
    Form(form): Form<FormFields>,
) -> ApiResult<(StatusCode, Json<SubmissionResponse>)> {
    let table = state.settings.tables.story_submissions.clone();
    handle::<StorySubmission>(&state, &table, &STORY_FORM, form, STORY_SUCCESS_MESSAGE).await
}

async fn handle<S: Submission>(
    state: &AppState,
    table: &str,
    spec: &FormSpec,
    mut form: FormFields,
    success_message: &str,
) -> ApiResult<(StatusCode, Json<SubmissionResponse>)> {
    // Held until the remote call resolves; a second post of the same form
    // instance meanwhile is refused
    let _guard = match form.remove(FORM_TOKEN_FIELD).filter(|t| !t.trim().is_empty()) {
        Some(token) => match state.in_flight.try_begin(&token) {
            Some(guard) => Some(guard),
            None => {
                return Err(ApiError::Conflict(
                    "Form is already being submitted".to_string(),
                ))
            }
        },
        None => None,
    };

    // Per-request control; duplicate posts were already refused by the token guard
    let mut control = SubmitControl::new(spec);
    let result = submit_form::<S>(
        state.store.as_ref(),
        table,
        spec,
        &form,
        &mut control,
        ccmp_common::time::now(),
    )
    .await;

    match result {
        Ok(record_id) => Ok((
            StatusCode::CREATED,
            Json(SubmissionResponse {
                success: true,
                record_id,
                message: success_message.to_string(),
                submit_button: control,
            }),
        )),
        Err(e) => {
            let err = ApiError::from(e);
            if let ApiError::SubmissionFailed(ref remote) = err {
                warn!(form = spec.dom_id, "Error submitting form: {}", remote);
                state.record_error(format!("{}: {}", spec.dom_id, remote)).await;
            }
            Err(err)
        }
    }
}
