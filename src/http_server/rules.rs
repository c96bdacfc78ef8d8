//! Handlers for rule-collection endpoints in the HTTP server.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};

use super::{ApiError, ApiState};
use crate::models::rule::CreateRule;

/// Retrieves all rules from the database and returns them as a JSON array.
pub async fn get_rules(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let rules = state.repo.get_rules().await?;
    Ok((StatusCode::OK, Json(rules)))
}

/// Creates a new rule based on the provided payload and echoes the stored
/// record, including its generated identifier and timestamp.
pub async fn create_rule(
    State(state): State<ApiState>,
    Json(payload): Json<CreateRule>,
) -> Result<impl IntoResponse, ApiError> {
    let new_rule = payload
        .into_new_rule()
        .ok_or_else(|| ApiError::BadRequest("All fields are required.".to_string()))?;

    let rule = state.repo.create_rule(new_rule).await?;

    Ok((StatusCode::OK, Json(rule)))
}
