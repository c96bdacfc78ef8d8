//! Signature verification for inbound provider webhooks.
//!
//! Two schemes are supported:
//!
//! - A global-secret scheme (Alchemy): one hex-encoded HMAC-SHA256 of the raw
//!   body in a single header, verified against a process-wide secret.
//! - A per-rule multi-header scheme (Svix, used by Notus): an id, a timestamp
//!   and a list of versioned base64 signatures over `{id}.{timestamp}.{body}`,
//!   verified against a secret stored on the rule's action.
//!
//! Both verifiers fail closed: any missing input, undecodable signature or
//! unusable secret rejects the request. Comparison goes through
//! [`hmac::Mac::verify_slice`], which is constant-time and rejects
//! mismatched-length inputs without inspecting content.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use sha2::Sha256;

/// HMAC SHA256 type alias
type HmacSha256 = Hmac<Sha256>;

/// The only signature-list version the Svix scheme evaluates.
const SVIX_SIGNATURE_VERSION: &str = "v1";

/// Verifies a global-secret webhook signature over the raw request body.
///
/// `signature` is the hex-encoded HMAC-SHA256 carried in the provider's
/// signature header. Returns `false` when the header or secret is missing,
/// the secret is empty, or the signature does not decode or match.
pub fn verify_global_hmac(secret: Option<&str>, signature: Option<&str>, body: &[u8]) -> bool {
    let (Some(secret), Some(signature)) = (secret, signature) else {
        tracing::warn!("Webhook signature or signing secret missing.");
        return false;
    };

    // `HmacSha256::new_from_slice` accepts empty keys, so reject explicitly.
    if secret.is_empty() {
        tracing::warn!("Webhook signing secret is empty.");
        return false;
    }

    let Ok(provided) = hex::decode(signature) else {
        tracing::warn!("Webhook signature is not valid hex.");
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);

    // Constant-time comparison; a length mismatch is just "not equal".
    mac.verify_slice(&provided).is_ok()
}

/// Verifies a Svix-style multi-header webhook signature.
///
/// The signed content is `{id}.{timestamp}.{body}`. The comparison key is the
/// base64-decoded remainder of `secret` after its `whsec_`-style prefix. The
/// signature header holds space-separated `{version},{base64}` entries; only
/// `v1` entries are evaluated and any single match succeeds. Entries that do
/// not decode, or whose length does not match, are skipped rather than fatal.
pub fn verify_svix(
    secret: &str,
    id: Option<&str>,
    timestamp: Option<&str>,
    signature_header: Option<&str>,
    body: &[u8],
) -> bool {
    let (Some(id), Some(timestamp), Some(signature_header)) = (id, timestamp, signature_header)
    else {
        tracing::warn!("Webhook headers missing for signature verification.");
        return false;
    };

    if secret.is_empty() {
        tracing::warn!("Webhook signing secret is empty.");
        return false;
    }

    let Some((_, encoded_key)) = secret.split_once('_') else {
        tracing::warn!("Webhook signing secret has no prefix segment.");
        return false;
    };
    let Ok(key) = BASE64.decode(encoded_key) else {
        tracing::warn!("Webhook signing secret is not valid base64.");
        return false;
    };

    for entry in signature_header.split(' ') {
        let Some((version, provided_b64)) = entry.split_once(',') else {
            continue;
        };
        if version != SVIX_SIGNATURE_VERSION {
            continue;
        }
        let Ok(provided) = BASE64.decode(provided_b64) else {
            continue;
        };

        let Ok(mut mac) = HmacSha256::new_from_slice(&key) else {
            return false;
        };
        mac.update(id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(body);

        if mac.verify_slice(&provided).is_ok() {
            return true;
        }
    }

    tracing::warn!("Webhook signature verification failed.");
    false
}
