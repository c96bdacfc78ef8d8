//! This module defines the `Rule` structure, which represents a stored user
//! intent to be alerted about activity on a given contract address.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::action::Action;

/// A user-defined monitoring intent.
///
/// A rule is created once and is immutable thereafter; its `contract_address`
/// is compared case-insensitively against on-chain addresses, which carry no
/// guaranteed casing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Unique identifier for the rule (assigned by the database)
    pub id: i64,

    /// Display name of the rule
    pub name: String,

    /// Wallet address of the rule's owner
    pub owner_address: String,

    /// The blockchain network this rule is associated with (e.g. ETH_SEPOLIA)
    pub network_id: String,

    /// The contract address this rule is monitoring
    pub contract_address: String,

    /// The contract event this rule is interested in
    pub event_name: String,

    /// Subscription identifier issued by the upstream notification provider.
    /// Empty when the rule was created without registering a subscription.
    #[serde(rename = "notusSubscriptionId", default)]
    pub subscription_id: String,

    /// Timestamp when the rule was created
    pub created_at: DateTime<Utc>,

    /// The notification action owned by this rule, if one is configured.
    /// Loaded from storage alongside the rule; never exposed over the API.
    #[serde(skip)]
    pub action: Option<Action>,
}

/// The fields required to create a new rule.
#[derive(Debug, Clone)]
pub struct NewRule {
    /// Display name of the rule
    pub name: String,
    /// Wallet address of the rule's owner
    pub owner_address: String,
    /// The blockchain network the rule targets
    pub network_id: String,
    /// The contract address to monitor
    pub contract_address: String,
    /// The contract event of interest
    pub event_name: String,
    /// Optional provider subscription identifier
    pub subscription_id: String,
}

/// The request payload for creating a rule.
///
/// All fields are optional at the deserialization boundary so that a missing
/// field surfaces as a validation failure (400) rather than a rejected body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRule {
    /// Display name of the rule
    pub name: Option<String>,
    /// Wallet address of the rule's owner
    pub owner_address: Option<String>,
    /// The blockchain network the rule targets
    pub network_id: Option<String>,
    /// The contract address to monitor
    pub contract_address: Option<String>,
    /// The contract event of interest
    pub event_name: Option<String>,
    /// Optional provider subscription identifier
    #[serde(rename = "notusSubscriptionId")]
    pub subscription_id: Option<String>,
}

impl CreateRule {
    /// Validates the payload, returning `NewRule` only if every required
    /// field is present.
    pub fn into_new_rule(self) -> Option<NewRule> {
        Some(NewRule {
            name: self.name?,
            owner_address: self.owner_address?,
            network_id: self.network_id?,
            contract_address: self.contract_address?,
            event_name: self.event_name?,
            subscription_id: self.subscription_id.unwrap_or_default(),
        })
    }
}
