#![warn(missing_docs)]
//! Sentinel is a webhook alerting service: it stores user-defined monitoring
//! rules and forwards signed on-chain event notifications from upstream
//! providers to each rule's Discord webhook.

pub mod config;
pub mod http_server;
pub mod models;
pub mod notification;
pub mod persistence;
pub mod webhook;
