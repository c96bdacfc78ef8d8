//! HTTP server module.
//!
//! Exposes the rule collection endpoints and the two inbound webhook
//! receivers. Both webhook handlers run the same linear pipeline —
//! receive, verify, parse, match, dispatch, acknowledge — with
//! per-provider verification and matching strategies.

mod alchemy;
pub mod error;
mod notus;
mod rules;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

pub use error::ApiError;

use crate::{config::AppConfig, notification::AlertDispatcher, persistence::traits::RuleRepository};

/// Shared state for API handlers.
///
/// Storage and dispatch are injected as trait objects so tests can run the
/// full router against fake implementations.
#[derive(Clone)]
pub struct ApiState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Rule storage.
    pub repo: Arc<dyn RuleRepository>,
    /// Outbound alert delivery.
    pub dispatcher: Arc<dyn AlertDispatcher>,
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Builds the API router with all routes.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/rules", get(rules::get_rules).post(rules::create_rule))
        .route("/webhooks/alchemy", post(alchemy::alchemy_webhook))
        .route("/webhooks/notus", post(notus::notus_webhook))
        .with_state(state)
}

/// Runs the HTTP server based on the provided application configuration.
pub async fn run_server_from_config(
    config: Arc<AppConfig>,
    repo: Arc<dyn RuleRepository>,
    dispatcher: Arc<dyn AlertDispatcher>,
) {
    let addr: SocketAddr =
        config.server.listen_address.parse().expect("Invalid server.listen_address format");

    let app = build_router(ApiState { config, repo, dispatcher });

    let listener = tokio::net::TcpListener::bind(addr).await.expect("Failed to bind address");
    tracing::info!(listen_address = %addr, "HTTP server listening.");

    axum::serve(listener, app.into_make_service()).await.expect("Server failed");
}
