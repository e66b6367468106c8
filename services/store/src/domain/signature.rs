//! Mercado Pago webhook signature verification.
//!
//! The `x-signature` header is a comma-separated list of `key=value` pairs
//! carrying `ts` and `v1`. `v1` is the lowercase hex HMAC-SHA256, keyed by the
//! webhook secret, of the manifest `id:<dataId>;request-id:<requestId>;ts:<ts>;`.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Split the signature header into its pairs.
///
/// Parts are trimmed and split on the first `=`; pairs with an empty key or
/// value are dropped. Later duplicates win.
pub fn parse_signature_header(header: &str) -> Vec<(&str, &str)> {
    let mut pairs: Vec<(&str, &str)> = Vec::new();
    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            continue;
        }
        pairs.retain(|(k, _)| *k != key);
        pairs.push((key, value));
    }
    pairs
}

pub fn signature_manifest(data_id: &str, request_id: &str, ts: &str) -> String {
    format!("id:{data_id};request-id:{request_id};ts:{ts};")
}

fn is_lower_hex(s: &str) -> bool {
    s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Verify a webhook signature. Comparison is constant time.
///
/// Returns `false` when `ts` or `v1` is missing, when `v1` is not lowercase
/// hex, or when the MAC does not match.
pub fn verify_signature(header: &str, request_id: &str, data_id: &str, secret: &str) -> bool {
    let pairs = parse_signature_header(header);
    let find = |name: &str| pairs.iter().find(|(k, _)| *k == name).map(|(_, v)| *v);
    let (Some(ts), Some(v1)) = (find("ts"), find("v1")) else {
        return false;
    };
    if !is_lower_hex(v1) {
        return false;
    }
    let Ok(expected) = hex::decode(v1) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(signature_manifest(data_id, request_id, ts).as_bytes());
    mac.verify_slice(&expected).is_ok()
}

/// Compute the `v1` value for a manifest.
pub fn sign_manifest(data_id: &str, request_id: &str, ts: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(signature_manifest(data_id, request_id, ts).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
