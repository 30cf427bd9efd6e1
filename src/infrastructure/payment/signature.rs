//! Webhook signature verification
//!
//! The gateway signs the raw callback body with HMAC-SHA256 over the shared
//! callback secret and sends the hex digest in a header. Verification runs
//! against the raw bytes, before any JSON parsing.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Check a hex-encoded HMAC-SHA256 signature against the raw body.
pub fn verify_signature(secret: &str, body: &[u8], provided: &str) -> bool {
    let Ok(expected) = hex::decode(provided.trim()) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);

    // verify_slice is constant-time
    mac.verify_slice(&expected).is_ok()
}

/// Hex HMAC-SHA256 digest of a body, used by tests and local tooling.
pub fn sign(secret: &str, body: &[u8]) -> String {
    // HMAC accepts keys of any length
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac key");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_signature_verifies() {
        let secret = "whsec_test";
        let body = br#"{"external_id":"abc","status":"PAID"}"#;
        let sig = sign(secret, body);
        assert!(verify_signature(secret, body, &sig));
    }

    #[test]
    fn tampered_body_fails() {
        let secret = "whsec_test";
        let sig = sign(secret, b"original");
        assert!(!verify_signature(secret, b"tampered", &sig));
    }

    #[test]
    fn wrong_secret_fails() {
        let body = b"payload";
        let sig = sign("secret-a", body);
        assert!(!verify_signature("secret-b", body, &sig));
    }

    #[test]
    fn malformed_hex_fails() {
        assert!(!verify_signature("s", b"payload", "not-hex!"));
        assert!(!verify_signature("s", b"payload", ""));
    }

    #[test]
    fn signature_tolerates_surrounding_whitespace() {
        let secret = "whsec_test";
        let body = b"payload";
        let sig = format!("  {}\n", sign(secret, body));
        assert!(verify_signature(secret, body, &sig));
    }
}
