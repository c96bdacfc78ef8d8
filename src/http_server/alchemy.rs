//! Handler for the Alchemy mined-transactions webhook endpoint.
//!
//! Verification uses the process-wide signing secret, so it happens before
//! the body is parsed or storage is touched. Matching is by address
//! membership: each transaction's from/to addresses are compared
//! case-insensitively against every rule's monitored contract address.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde_json::json;

use super::{ApiError, ApiState};
use crate::{
    models::{action::ActionKind, event::AlchemyPayload},
    notification::discord,
    webhook::{NotifiedRules, signature},
};

/// Header carrying the hex-encoded HMAC of the request body.
const SIGNATURE_HEADER: &str = "x-alchemy-signature";

/// Receives a signed Alchemy webhook, matches its transactions against
/// stored rules and dispatches one alert per matched rule.
pub async fn alchemy_webhook(
    State(state): State<ApiState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers.get(SIGNATURE_HEADER).and_then(|value| value.to_str().ok());
    let secret = state.config.alchemy_signing_secret.as_deref();
    if !signature::verify_global_hmac(secret, signature, &body) {
        return Err(ApiError::Unauthorized);
    }

    let payload: AlchemyPayload = serde_json::from_slice(&body).map_err(|error| {
        tracing::error!(error = %error, "Failed to parse webhook JSON body.");
        ApiError::BadRequest("Invalid JSON body".to_string())
    })?;

    let transactions = &payload.event.data.block.transactions;
    if transactions.is_empty() {
        tracing::warn!("Webhook payload missing transaction activity.");
        return Err(ApiError::BadRequest("Webhook payload missing activity".to_string()));
    }

    // One block can carry several transactions touching the same monitored
    // address; each rule fires at most once per request.
    let mut notified = NotifiedRules::new();

    for tx in transactions {
        let involved = tx.involved_addresses();
        if involved.is_empty() {
            continue;
        }
        tracing::debug!(tx_hash = ?tx.hash, addresses = ?involved, "Matching transaction.");

        // A storage failure for one transaction must not abort the rest.
        let rules = match state.repo.find_rules_for_addresses(&involved).await {
            Ok(rules) => rules,
            Err(error) => {
                tracing::error!(error = %error, tx_hash = ?tx.hash, "Failed to query rules for transaction.");
                continue;
            }
        };

        if rules.is_empty() {
            tracing::debug!(tx_hash = ?tx.hash, "No matching rules for transaction.");
            continue;
        }

        for rule in rules {
            if notified.contains(rule.id) {
                continue;
            }
            let Some(action) = rule.action.as_ref() else {
                continue;
            };

            match &action.kind {
                ActionKind::DiscordWebhook => {
                    let message = discord::transaction_alert(&rule.name, &payload.event, tx);
                    if let Err(error) = state.dispatcher.dispatch(&action.target_url, &message).await
                    {
                        // Delivery failure stays on our side of the fence;
                        // the provider still gets its acknowledgement.
                        tracing::error!(error = %error, rule_id = rule.id, "Failed to deliver alert.");
                    }
                    notified.insert(rule.id);
                }
                ActionKind::Unsupported(kind) => {
                    tracing::warn!(rule_id = rule.id, kind = %kind, "Unsupported action kind for rule; skipping.");
                }
            }
        }
    }

    tracing::info!(notified_rules = notified.len(), "Webhook processing finished.");
    Ok((StatusCode::OK, Json(json!({ "success": true }))))
}
