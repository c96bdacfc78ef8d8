//! This module provides a concrete implementation of the RuleRepository using
//! SQLite.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{
    QueryBuilder, Row, SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow},
};
use url::Url;

use crate::{
    models::{
        action::{Action, ActionKind},
        rule::{NewRule, Rule},
    },
    persistence::{error::PersistenceError, traits::RuleRepository},
};

/// Columns selected for a rule joined with its optional action.
const RULE_COLUMNS: &str = "r.rule_id, r.name, r.owner_address, r.network_id, \
     r.contract_address, r.event_name, r.subscription_id, r.created_at, \
     a.kind, a.target_url, a.webhook_secret";

/// SQL query constants for rule operations
mod rule_sql {
    use super::RULE_COLUMNS;

    /// Select all rules with their actions
    pub fn select_rules() -> String {
        format!(
            "SELECT {RULE_COLUMNS} FROM rules r \
             LEFT JOIN actions a ON a.rule_id = r.rule_id \
             ORDER BY r.rule_id"
        )
    }

    /// Select a single rule by its ID
    pub fn select_rule_by_id() -> String {
        format!(
            "SELECT {RULE_COLUMNS} FROM rules r \
             LEFT JOIN actions a ON a.rule_id = r.rule_id \
             WHERE r.rule_id = ?"
        )
    }

    /// Select the rule registered under a provider subscription identifier
    pub fn select_rule_by_subscription_id() -> String {
        format!(
            "SELECT {RULE_COLUMNS} FROM rules r \
             LEFT JOIN actions a ON a.rule_id = r.rule_id \
             WHERE r.subscription_id = ?"
        )
    }

    /// Insert a new rule
    pub const INSERT_RULE: &str = "INSERT INTO rules \
         (name, owner_address, network_id, contract_address, event_name, subscription_id) \
         VALUES (?, ?, ?, ?, ?, ?)";
}

/// A concrete implementation of the RuleRepository using SQLite.
pub struct SqliteRuleRepository {
    /// The SQLite connection pool used for database operations.
    pool: SqlitePool,
}

impl SqliteRuleRepository {
    /// Creates a new instance of SqliteRuleRepository with the provided
    /// database URL. This will create the database file if it does not
    /// exist.
    #[tracing::instrument(level = "info")]
    pub async fn new(database_url: &str) -> Result<Self, PersistenceError> {
        tracing::debug!(database_url, "Attempting to connect to SQLite database.");
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| PersistenceError::InvalidInput(e.to_string()))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);
        // In-memory SQLite gives every new connection its own database, so
        // those pools are capped at a single connection.
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new().max_connections(1)
        } else {
            SqlitePoolOptions::new()
        };
        let pool = pool_options.connect_with(options).await.map_err(|e| {
            PersistenceError::OperationFailed(format!("Failed to connect to database: {}", e))
        })?;
        tracing::info!(database_url, "Successfully connected to SQLite database.");
        Ok(Self { pool })
    }

    /// Runs database migrations.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn run_migrations(&self) -> Result<(), PersistenceError> {
        tracing::debug!("Running database migrations.");
        sqlx::migrate!("./migrations").run(&self.pool).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to run database migrations.");
            PersistenceError::MigrationError(e.to_string())
        })?;
        tracing::info!("Database migrations completed successfully.");
        Ok(())
    }

    /// Gets access to the underlying connection pool for advanced operations.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the connection pool gracefully.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn close(&self) {
        tracing::debug!("Closing SQLite connection pool.");
        self.pool.close().await;
        tracing::info!("SQLite connection pool closed successfully.");
    }

    /// Helper to execute database queries with consistent error handling
    async fn execute_query_with_error_handling<F, T, E>(
        &self,
        operation: &str,
        query_fn: F,
    ) -> Result<T, PersistenceError>
    where
        F: std::future::Future<Output = Result<T, E>>,
        E: std::error::Error,
    {
        query_fn.await.map_err(|e| {
            tracing::error!(error = %e, operation = %operation, "Database operation failed.");
            PersistenceError::OperationFailed(e.to_string())
        })
    }
}

/// Maps a joined rule/action row to the domain model.
fn map_rule_row(row: &SqliteRow) -> Result<Rule, PersistenceError> {
    let created_at: NaiveDateTime = row
        .try_get("created_at")
        .map_err(|e| PersistenceError::OperationFailed(e.to_string()))?;

    // The LEFT JOIN leaves every action column NULL when the rule owns no
    // action; `kind` is NOT NULL in the actions table, so it discriminates.
    let kind: Option<String> =
        row.try_get("kind").map_err(|e| PersistenceError::OperationFailed(e.to_string()))?;
    let action = match kind {
        Some(kind) => {
            let target_url: String = row
                .try_get("target_url")
                .map_err(|e| PersistenceError::OperationFailed(e.to_string()))?;
            let target_url = Url::parse(&target_url).map_err(|e| {
                PersistenceError::InvalidInput(format!("Stored action URL is invalid: {}", e))
            })?;
            let webhook_secret: Option<String> = row
                .try_get("webhook_secret")
                .map_err(|e| PersistenceError::OperationFailed(e.to_string()))?;
            Some(Action { kind: ActionKind::parse(&kind), target_url, webhook_secret })
        }
        None => None,
    };

    Ok(Rule {
        id: row.try_get("rule_id").map_err(|e| PersistenceError::OperationFailed(e.to_string()))?,
        name: row.try_get("name").map_err(|e| PersistenceError::OperationFailed(e.to_string()))?,
        owner_address: row
            .try_get("owner_address")
            .map_err(|e| PersistenceError::OperationFailed(e.to_string()))?,
        network_id: row
            .try_get("network_id")
            .map_err(|e| PersistenceError::OperationFailed(e.to_string()))?,
        contract_address: row
            .try_get("contract_address")
            .map_err(|e| PersistenceError::OperationFailed(e.to_string()))?,
        event_name: row
            .try_get("event_name")
            .map_err(|e| PersistenceError::OperationFailed(e.to_string()))?,
        subscription_id: row
            .try_get("subscription_id")
            .map_err(|e| PersistenceError::OperationFailed(e.to_string()))?,
        created_at: DateTime::from_naive_utc_and_offset(created_at, Utc),
        action,
    })
}

#[async_trait]
impl RuleRepository for SqliteRuleRepository {
    /// Retrieves all stored rules.
    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_rules(&self) -> Result<Vec<Rule>, PersistenceError> {
        let rows = self
            .execute_query_with_error_handling(
                "query all rules",
                sqlx::query(&rule_sql::select_rules()).fetch_all(&self.pool),
            )
            .await?;

        rows.iter().map(map_rule_row).collect()
    }

    /// Persists a new rule and returns the stored record.
    #[tracing::instrument(skip(self, rule), level = "debug")]
    async fn create_rule(&self, rule: NewRule) -> Result<Rule, PersistenceError> {
        let result = self
            .execute_query_with_error_handling(
                "insert rule",
                sqlx::query(rule_sql::INSERT_RULE)
                    .bind(&rule.name)
                    .bind(&rule.owner_address)
                    .bind(&rule.network_id)
                    .bind(&rule.contract_address)
                    .bind(&rule.event_name)
                    .bind(&rule.subscription_id)
                    .execute(&self.pool),
            )
            .await?;

        let rule_id = result.last_insert_rowid();
        let row = self
            .execute_query_with_error_handling(
                "query created rule",
                sqlx::query(&rule_sql::select_rule_by_id())
                    .bind(rule_id)
                    .fetch_one(&self.pool),
            )
            .await?;

        let rule = map_rule_row(&row)?;
        tracing::info!(rule_id = rule.id, name = %rule.name, "Rule created.");
        Ok(rule)
    }

    /// Retrieves every rule monitoring any of the given addresses.
    #[tracing::instrument(skip(self), level = "debug")]
    async fn find_rules_for_addresses(
        &self,
        addresses: &[String],
    ) -> Result<Vec<Rule>, PersistenceError> {
        if addresses.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new(format!(
            "SELECT {RULE_COLUMNS} FROM rules r \
             LEFT JOIN actions a ON a.rule_id = r.rule_id \
             WHERE LOWER(r.contract_address) IN ("
        ));
        let mut separated = query.separated(", ");
        for address in addresses {
            separated.push_bind(address);
        }
        query.push(") ORDER BY r.rule_id");

        let rows = self
            .execute_query_with_error_handling(
                "query rules by addresses",
                query.build().fetch_all(&self.pool),
            )
            .await?;

        rows.iter().map(map_rule_row).collect()
    }

    /// Retrieves the rule registered under a provider subscription identifier.
    #[tracing::instrument(skip(self), level = "debug")]
    async fn find_rule_by_subscription_id(
        &self,
        subscription_id: &str,
    ) -> Result<Option<Rule>, PersistenceError> {
        let row = self
            .execute_query_with_error_handling(
                "query rule by subscription id",
                sqlx::query(&rule_sql::select_rule_by_subscription_id())
                    .bind(subscription_id)
                    .fetch_optional(&self.pool),
            )
            .await?;

        row.as_ref().map(map_rule_row).transpose()
    }
}
