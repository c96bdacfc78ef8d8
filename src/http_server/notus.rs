//! Handler for the Notus decoded-event webhook endpoint.
//!
//! The signing secret lives on the matched rule's action, so the rule
//! lookup necessarily precedes signature verification: find the rule by its
//! provider subscription identifier, extract the secret, then verify.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde_json::json;

use super::{ApiError, ApiState};
use crate::{
    models::{action::ActionKind, event::NotusPayload},
    notification::discord,
    webhook::signature,
};

/// Receives a signed Notus webhook and dispatches an alert for the rule
/// registered under the payload's subscription identifier.
pub async fn notus_webhook(
    State(state): State<ApiState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let payload: NotusPayload = serde_json::from_slice(&body).map_err(|error| {
        tracing::error!(error = %error, "Failed to parse webhook JSON body.");
        ApiError::BadRequest("Invalid JSON body".to_string())
    })?;

    // Storage failures here predate any response commitment and surface
    // as 500 rather than being swallowed.
    let rule = state.repo.find_rule_by_subscription_id(&payload.subscription_id).await?;

    let Some(rule) = rule else {
        tracing::warn!(subscription_id = %payload.subscription_id, "No rule found for subscription.");
        return Err(ApiError::NotFound("Rule or secret not found".to_string()));
    };
    let Some(secret) = rule.action.as_ref().and_then(|action| action.webhook_secret.as_deref())
    else {
        tracing::warn!(rule_id = rule.id, "Rule has no action secret for verification.");
        return Err(ApiError::NotFound("Rule or secret not found".to_string()));
    };

    let id = headers.get("svix-id").and_then(|value| value.to_str().ok());
    let timestamp = headers.get("svix-timestamp").and_then(|value| value.to_str().ok());
    let signature_header = headers.get("svix-signature").and_then(|value| value.to_str().ok());
    if !signature::verify_svix(secret, id, timestamp, signature_header, &body) {
        return Err(ApiError::Unauthorized);
    }

    // The secret came off the action, so it is present here by construction.
    if let Some(action) = rule.action.as_ref() {
        match &action.kind {
            ActionKind::DiscordWebhook => {
                let message = discord::decoded_event_alert(&payload);
                if let Err(error) = state.dispatcher.dispatch(&action.target_url, &message).await {
                    tracing::error!(error = %error, rule_id = rule.id, "Failed to deliver alert.");
                }
            }
            ActionKind::Unsupported(kind) => {
                tracing::warn!(rule_id = rule.id, kind = %kind, "Unsupported action kind for rule; skipping.");
            }
        }
    }

    Ok((StatusCode::OK, Json(json!({ "success": true }))))
}
