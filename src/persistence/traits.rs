//! Storage interface for rules and actions.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::{
    models::rule::{NewRule, Rule},
    persistence::error::PersistenceError,
};

/// Storage interface for monitoring rules.
///
/// Handlers receive this as an injected trait object so tests can substitute
/// fake storage.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RuleRepository: Send + Sync {
    /// Retrieves all stored rules.
    async fn get_rules(&self) -> Result<Vec<Rule>, PersistenceError>;

    /// Persists a new rule and returns the stored record.
    async fn create_rule(&self, rule: NewRule) -> Result<Rule, PersistenceError>;

    /// Retrieves every rule whose monitored contract address matches any of
    /// the given addresses, case-insensitively. Callers pass addresses
    /// already lower-cased. Each rule is returned with its action attached.
    async fn find_rules_for_addresses(
        &self,
        addresses: &[String],
    ) -> Result<Vec<Rule>, PersistenceError>;

    /// Retrieves the single rule registered under the given provider
    /// subscription identifier, with its action attached.
    async fn find_rule_by_subscription_id(
        &self,
        subscription_id: &str,
    ) -> Result<Option<Rule>, PersistenceError>;
}
