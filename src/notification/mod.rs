//! Alert dispatch to user-configured notification targets.
//!
//! The dispatcher is a fire-and-forget HTTP POST with a bounded timeout.
//! Delivery failures are reported to the caller as errors so they can be
//! logged, but the webhook pipeline never propagates them back to the
//! upstream provider; a failed Discord delivery must not cause the provider
//! to retry the inbound event.

pub mod discord;
pub mod error;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use url::Url;

use crate::config::DispatchClientConfig;
use error::NotificationError;

/// Delivers a rendered alert message to a notification target.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AlertDispatcher: Send + Sync {
    /// Posts the JSON message to the target URL. Returns an error for
    /// network failures and non-success responses.
    async fn dispatch(
        &self,
        target_url: &Url,
        message: &serde_json::Value,
    ) -> Result<(), NotificationError>;
}

/// Dispatches alerts as Discord webhook POSTs.
#[derive(Debug, Clone)]
pub struct DiscordWebhookDispatcher {
    client: reqwest::Client,
}

impl DiscordWebhookDispatcher {
    /// Creates a dispatcher with timeouts from the given configuration.
    /// No retries: the upstream provider acknowledgement must not wait on
    /// repeated delivery attempts.
    pub fn new(config: &DispatchClientConfig) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AlertDispatcher for DiscordWebhookDispatcher {
    #[tracing::instrument(skip(self, message), level = "debug")]
    async fn dispatch(
        &self,
        target_url: &Url,
        message: &serde_json::Value,
    ) -> Result<(), NotificationError> {
        let response = self.client.post(target_url.clone()).json(message).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::NotifyFailed(format!(
                "Webhook returned {}: {}",
                status, body
            )));
        }

        tracing::debug!("Alert delivered successfully.");
        Ok(())
    }
}
