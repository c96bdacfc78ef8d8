use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{deserialize_duration_from_seconds, serialize_duration_to_seconds};

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}

/// Configuration for the outbound alert-dispatch HTTP client.
///
/// The upstream notification providers enforce their own response-time limit
/// on webhook acknowledgement, so outbound deliveries are bounded rather than
/// left to suspend indefinitely. Deliveries are never retried.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DispatchClientConfig {
    /// Total timeout for a single delivery request
    #[serde(
        default = "default_request_timeout",
        deserialize_with = "deserialize_duration_from_seconds",
        serialize_with = "serialize_duration_to_seconds"
    )]
    pub request_timeout: Duration,

    /// Timeout for establishing connections
    #[serde(
        default = "default_connect_timeout",
        deserialize_with = "deserialize_duration_from_seconds",
        serialize_with = "serialize_duration_to_seconds"
    )]
    pub connect_timeout: Duration,
}

impl Default for DispatchClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}
