//! Contest handlers

pub mod handler;
pub mod request;
pub mod response;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Contest routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::create_contest))
        .route("/{id}", get(handler::get_contest))
        .route("/{id}/archive", post(handler::archive_contest))
        .route("/{id}/leaderboard", get(handler::get_leaderboard))
}
