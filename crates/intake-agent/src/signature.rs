//! Webhook signature verification.
//!
//! The chat platform signs each delivery with a hex-encoded HMAC-SHA256
//! over the exact raw body. Comparison goes through `Mac::verify_slice`,
//! which is constant-time; an empty signature or empty secret always fails.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verify `signature` (hex) against the raw request `body`.
pub fn verify_signature(body: &[u8], signature: &str, secret: &str) -> bool {
    let signature = signature.trim();
    if signature.is_empty() || secret.is_empty() {
        return false;
    }
    let Ok(signature_bytes) = hex::decode(signature) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&signature_bytes).is_ok()
}

/// Hex HMAC-SHA256 of `body`: the client side of the scheme, used by the
/// simulator and tests to produce valid deliveries.
pub fn sign(body: &[u8], secret: &str) -> Option<String> {
    if secret.is_empty() {
        return None;
    }
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(body);
    Some(hex::encode(mac.finalize().into_bytes()))
}
