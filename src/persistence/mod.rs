//! Storage layer for rules and their actions.

pub mod error;
pub mod sqlite;
pub mod traits;

pub use sqlite::SqliteRuleRepository;
