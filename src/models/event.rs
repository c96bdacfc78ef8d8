//! Transient representations of inbound provider payloads.
//!
//! These are parsed per request and never persisted. Each provider sends a
//! differently shaped body; both reduce to "one or more activities with
//! participant addresses and a transaction hash".

use serde::Deserialize;

/// The payload posted by Alchemy's `alchemy_minedTransactions` webhook.
///
/// The nested levels all default so that a structurally valid but empty
/// payload surfaces as "missing activity" rather than a parse failure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AlchemyPayload {
    /// The event envelope.
    #[serde(default)]
    pub event: AlchemyEvent,
}

/// The event envelope of an Alchemy payload.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AlchemyEvent {
    /// Network identifier, e.g. `ETH_SEPOLIA`.
    #[serde(default)]
    pub network: String,
    /// The event data container.
    #[serde(default)]
    pub data: AlchemyEventData,
}

/// The data container of an Alchemy event.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AlchemyEventData {
    /// The mined block the event describes.
    #[serde(default)]
    pub block: AlchemyBlock,
}

/// The block section of an Alchemy mined-transactions event.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AlchemyBlock {
    /// The transactions that matched the upstream address filter.
    #[serde(default)]
    pub transactions: Vec<MinedTransaction>,
}

/// One mined transaction inside an Alchemy payload.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MinedTransaction {
    /// Transaction hash
    pub hash: Option<String>,
    /// Sender address
    pub from: Option<String>,
    /// Recipient address (for contract interactions, the contract)
    pub to: Option<String>,
    /// Block number as a hex quantity, e.g. `0x54a398`
    pub block_number: Option<String>,
    /// Transferred native value as a hex quantity in wei
    pub value: Option<String>,
}

impl MinedTransaction {
    /// Collects the lower-cased set of addresses involved in this
    /// transaction. Monitored contracts are matched against these.
    pub fn involved_addresses(&self) -> Vec<String> {
        [self.from.as_deref(), self.to.as_deref()]
            .into_iter()
            .flatten()
            .map(|addr| addr.to_lowercase())
            .collect()
    }
}

/// The payload posted by the Notus webhook for a decoded contract event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotusPayload {
    /// Provider subscription identifier mapping back to a local rule
    pub subscription_id: String,
    /// The decoded event data
    pub data: NotusEventData,
    /// Network identifier
    #[serde(default)]
    pub network_id: String,
    /// The emitting contract address
    #[serde(default)]
    pub address: String,
}

/// The data section of a Notus payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotusEventData {
    /// The decoded log entry
    pub log: DecodedLog,
    /// Hash of the transaction that emitted the log
    #[serde(default)]
    pub tx_hash: String,
}

/// A decoded event log.
#[derive(Debug, Clone, Deserialize)]
pub struct DecodedLog {
    /// The event name, e.g. `Transfer`
    #[serde(default)]
    pub name: String,
    /// The decoded event parameters
    #[serde(default)]
    pub params: Vec<DecodedParam>,
}

/// One decoded event parameter.
#[derive(Debug, Clone, Deserialize)]
pub struct DecodedParam {
    /// Parameter name
    pub name: String,
    /// Parameter value; providers send strings for most Solidity types but
    /// numbers and booleans occur as well.
    #[serde(default)]
    pub value: serde_json::Value,
}

impl DecodedParam {
    /// Renders the parameter value without JSON string quoting.
    pub fn display_value(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
