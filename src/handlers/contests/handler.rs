//! Contest handler implementations

use std::collections::HashSet;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Contest, Question, TestCase},
    state::AppState,
};

use super::{
    request::CreateContestRequest,
    response::{ContestResponse, LeaderboardResponse},
};

/// Create a contest with its questions (management path)
pub async fn create_contest(
    State(state): State<AppState>,
    Json(payload): Json<CreateContestRequest>,
) -> AppResult<(StatusCode, Json<ContestResponse>)> {
    payload.validate()?;

    let mut seen = HashSet::new();
    for question in &payload.questions {
        if !seen.insert(question.id.as_str()) {
            return Err(AppError::Validation(format!(
                "Duplicate question id '{}'",
                question.id
            )));
        }
    }

    let contest = Contest {
        id: payload.id.clone(),
        title: payload.title,
        owner: payload.owner,
        questions: payload.questions.iter().map(|q| q.id.clone()).collect(),
        start_time: payload.start_time,
        duration_secs: payload.duration_secs,
        archived: false,
        created_at: Utc::now(),
    };

    let questions = payload
        .questions
        .into_iter()
        .map(|q| Question {
            id: q.id,
            contest_id: payload.id.clone(),
            statement_ref: q.statement_ref,
            test_cases: q
                .test_cases
                .into_iter()
                .map(|tc| TestCase {
                    input: tc.input,
                    expected_output: tc.expected_output,
                    weight: tc.weight,
                })
                .collect(),
        })
        .collect();

    state.registry().insert_contest(contest.clone(), questions)?;

    Ok((StatusCode::CREATED, Json(to_response(contest))))
}

/// Get a contest with its computed lifecycle state
pub async fn get_contest(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ContestResponse>> {
    let contest = state.registry().get_contest(&id)?;
    Ok(Json(to_response(contest)))
}

/// Archive a closed contest (explicit management action)
pub async fn archive_contest(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ContestResponse>> {
    let contest = state.registry().archive_contest(&id)?;
    Ok(Json(to_response(contest)))
}

/// Ranked leaderboard for a contest
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<LeaderboardResponse>> {
    // surface NotFound for unknown contests rather than an empty board
    state.registry().get_contest(&id)?;

    let entries = state.leaderboard().ranking(&id);
    Ok(Json(LeaderboardResponse {
        contest_id: id,
        entries,
        updated_at: Utc::now(),
    }))
}

fn to_response(contest: Contest) -> ContestResponse {
    let state = contest.state_at(Utc::now());
    ContestResponse {
        end_time: contest.end_time(),
        id: contest.id,
        title: contest.title,
        owner: contest.owner,
        state,
        start_time: contest.start_time,
        duration_secs: contest.duration_secs,
        questions: contest.questions,
    }
}
