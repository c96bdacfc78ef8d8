//! Configuration module for Sentinel.

mod app_config;
mod helpers;
mod http;
mod server;

pub use app_config::AppConfig;
pub use helpers::{deserialize_duration_from_seconds, serialize_duration_to_seconds};
pub use http::DispatchClientConfig;
pub use server::ServerConfig;
