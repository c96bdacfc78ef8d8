//! Data models for Sentinel.

pub mod action;
pub mod event;
pub mod rule;

pub use action::{Action, ActionKind};
pub use event::{AlchemyPayload, DecodedParam, MinedTransaction, NotusPayload};
pub use rule::{CreateRule, NewRule, Rule};
