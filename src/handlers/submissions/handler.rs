//! Submission handler implementations

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::{error::AppResult, state::AppState};

use super::{
    request::CreateSubmissionRequest,
    response::{CreateSubmissionResponse, SubmissionStatusResponse},
};

/// Create a new submission
pub async fn create_submission(
    State(state): State<AppState>,
    Json(payload): Json<CreateSubmissionRequest>,
) -> AppResult<(StatusCode, Json<CreateSubmissionResponse>)> {
    payload.validate()?;

    let id = state.intake().submit(
        &payload.contest_id,
        &payload.question_id,
        &payload.user_handle,
        payload.source_code,
        &payload.language,
    )?;

    Ok((
        StatusCode::ACCEPTED,
        Json(CreateSubmissionResponse {
            id,
            message: "Submission received and queued for judging".to_string(),
            status: "queued".to_string(),
        }),
    ))
}

/// Get the status of a submission
pub async fn get_submission_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SubmissionStatusResponse>> {
    let submission = state.submissions().get(&id)?;
    Ok(Json(submission.into()))
}
