//! Discord message builders for alert notifications.
//!
//! Each inbound provider carries a differently shaped payload, so there is
//! one builder per provider. Both produce a Discord webhook body with a
//! `content` line and a single embed.

use chrono::Utc;
use serde_json::{Value, json};

use crate::models::event::{AlchemyEvent, MinedTransaction, NotusPayload};

/// Decimals of the native currency (wei per ETH).
const NATIVE_TOKEN_DECIMALS: u32 = 18;

/// The only network with a supported block explorer.
const EXPLORER_NETWORK: &str = "ETH_SEPOLIA";

/// Embed color for mined-transaction alerts.
const TRANSACTION_EMBED_COLOR: u32 = 3447003;

/// Embed color for decoded-event alerts.
const EVENT_EMBED_COLOR: u32 = 15105570;

/// Derives an explorer link for a transaction hash.
///
/// Only the supported test network gets a real link; every other network
/// gets a placeholder.
pub fn explorer_tx_url(network: &str, tx_hash: &str) -> String {
    if network == EXPLORER_NETWORK && !tx_hash.is_empty() {
        format!("https://sepolia.etherscan.io/tx/{}", tx_hash)
    } else {
        "#".to_string()
    }
}

/// Parses an EVM quantity, either `0x`-prefixed hex or decimal.
pub fn parse_quantity(value: &str) -> Option<u128> {
    if let Some(hex_digits) = value.strip_prefix("0x") {
        u128::from_str_radix(hex_digits, 16).ok()
    } else {
        value.parse().ok()
    }
}

/// Converts a value from the smallest on-chain unit to a decimal display
/// string using integer arithmetic, e.g. `1_500_000_000_000_000_000` wei with
/// 18 decimals renders as `1.5`.
pub fn format_units(value: u128, decimals: u32) -> String {
    let divisor = 10u128.pow(decimals);
    let whole = value / divisor;
    let fraction = value % divisor;
    if fraction == 0 {
        return whole.to_string();
    }
    let fraction = format!("{:0width$}", fraction, width = decimals as usize);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}

/// Renders a transaction's native value in ETH, defaulting to zero when the
/// payload carries no parseable value.
fn display_native_value(tx: &MinedTransaction) -> String {
    tx.value
        .as_deref()
        .and_then(parse_quantity)
        .map(|wei| format_units(wei, NATIVE_TOKEN_DECIMALS))
        .unwrap_or_else(|| "0".to_string())
}

/// Renders a hex block number as `#<decimal>`.
fn display_block_number(tx: &MinedTransaction) -> String {
    tx.block_number
        .as_deref()
        .and_then(|raw| raw.strip_prefix("0x"))
        .and_then(|digits| u64::from_str_radix(digits, 16).ok())
        .map(|num| format!("#{}", num))
        .unwrap_or_else(|| "N/A".to_string())
}

/// Builds the Discord message for a mined-transaction alert (Alchemy).
pub fn transaction_alert(rule_name: &str, event: &AlchemyEvent, tx: &MinedTransaction) -> Value {
    let tx_field = match tx.hash.as_deref() {
        Some(hash) => {
            format!("[View on explorer]({})", explorer_tx_url(&event.network, hash))
        }
        None => "N/A".to_string(),
    };

    json!({
        "content": format!("🚨 **SENTINEL ALERT ({})** 🚨", rule_name),
        "embeds": [
            {
                "title": "`Transaction Detected`",
                "description": "A transaction was detected involving the monitored address.",
                "color": TRANSACTION_EMBED_COLOR,
                "fields": [
                    { "name": "Network", "value": non_empty(&event.network), "inline": true },
                    { "name": "Block", "value": display_block_number(tx), "inline": true },
                    { "name": "From", "value": code_or_na(tx.from.as_deref()), "inline": false },
                    { "name": "To", "value": code_or_na(tx.to.as_deref()), "inline": false },
                    { "name": "Value (ETH)", "value": format!("{} ETH", display_native_value(tx)), "inline": true },
                    { "name": "Transaction", "value": tx_field, "inline": false },
                ],
                "footer": { "text": "Sentinel Pro" },
                "timestamp": Utc::now().to_rfc3339(),
            }
        ],
    })
}

/// Builds the Discord message for a decoded contract event alert (Notus).
pub fn decoded_event_alert(payload: &NotusPayload) -> Value {
    let log = &payload.data.log;

    let mut fields = vec![
        json!({ "name": "Network", "value": non_empty(&payload.network_id), "inline": true }),
        json!({ "name": "Contract", "value": code_or_na(Some(&payload.address)), "inline": false }),
    ];
    for param in &log.params {
        fields.push(json!({
            "name": param.name,
            "value": format!("`{}`", param.display_value()),
            "inline": true,
        }));
    }
    fields.push(json!({
        "name": "Transaction",
        "value": format!(
            "[View on explorer]({})",
            explorer_tx_url(&payload.network_id, &payload.data.tx_hash)
        ),
        "inline": false,
    }));

    json!({
        "content": "🚨 **SENTINEL ALERT** 🚨",
        "embeds": [
            {
                "title": format!("Event detected: `{}`", log.name),
                "color": EVENT_EMBED_COLOR,
                "fields": fields,
                "footer": { "text": "Sentinel Pro" },
                "timestamp": Utc::now().to_rfc3339(),
            }
        ],
    })
}

fn non_empty(value: &str) -> String {
    if value.is_empty() { "N/A".to_string() } else { value.to_string() }
}

fn code_or_na(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => format!("`{}`", v),
        _ => "N/A".to_string(),
    }
}
