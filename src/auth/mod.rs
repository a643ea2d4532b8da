//! Time-windowed HMAC-signed authentication tokens.
//!
//! A token is `base64("{unix_ts}|{hex hmac-sha256(secret, unix_ts)}")`.
//! Tokens are stateless: validity is a pure function of wall-clock time and
//! the shared secret, with no server-side session record. Two tokens issued
//! in the same second are bit-identical; uniqueness is not a requirement,
//! only time-bounded validity.
//!
//! Verification never distinguishes "expired" from "forged" to the caller;
//! both are just invalid. The signature comparison is constant-time.

use crate::core::config::AuthConfig;
use crate::core::errors::{MaskError, MaskResult};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Decoded token contents, prior to any verification. Intended for
/// diagnostics (the inspection CLI), not for authentication decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenParts {
    /// Unix timestamp the token was issued at.
    pub issued_at: u64,
    /// Hex-encoded HMAC-SHA256 signature over the decimal timestamp.
    pub signature_hex: String,
}

/// Issues and verifies time-windowed signed tokens.
#[derive(Debug, Clone)]
pub struct AuthTokenService {
    config: AuthConfig,
}

impl AuthTokenService {
    /// Creates a token service.
    ///
    /// # Errors
    ///
    /// Returns `MaskError::ConfigError` if the configuration is invalid.
    pub fn new(config: AuthConfig) -> MaskResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configured validity window in seconds.
    pub fn validity_secs(&self) -> u64 {
        self.config.validity_secs
    }

    /// Issues a token for the current wall-clock time.
    pub fn issue(&self) -> MaskResult<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| MaskError::invalid_input("system clock is before the unix epoch"))?
            .as_secs();
        Ok(self.issue_at(now))
    }

    /// Issues a token for an explicit timestamp.
    pub fn issue_at(&self, issued_at: u64) -> String {
        let signature = self.sign(issued_at);
        let token = format!("{}|{}", issued_at, signature);
        BASE64.encode(token.as_bytes())
    }

    /// Verifies a token against the given wall-clock time.
    ///
    /// Returns `false` for any malformed, expired, future-dated, or forged
    /// token. No further detail is surfaced: distinguishing "expired" from
    /// "forged" would leak signature validity to an attacker probing with
    /// stale timestamps.
    pub fn verify(&self, token: &str, now: u64) -> bool {
        let Some(parts) = decode_token(token) else {
            return false;
        };

        // A future-dated timestamp and an expired one are both rejected by
        // the same window check (clock-skew and replay control in one).
        if now < parts.issued_at {
            return false;
        }
        if now - parts.issued_at > self.config.validity_secs {
            return false;
        }

        let expected = self.sign(parts.issued_at);
        constant_time_eq(expected.as_bytes(), parts.signature_hex.as_bytes())
    }

    /// Computes the hex HMAC-SHA256 signature over the decimal timestamp.
    fn sign(&self, issued_at: u64) -> String {
        let mut mac = HmacSha256::new_from_slice(self.config.secret.as_bytes())
            .expect("hmac accepts keys of any length");
        mac.update(issued_at.to_string().as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

/// Splits a token into its parts without verifying anything.
///
/// Returns `None` for tokens that are not base64, not UTF-8, missing the
/// separator, or carrying a non-numeric timestamp.
pub fn decode_token(token: &str) -> Option<TokenParts> {
    let decoded = BASE64.decode(token.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (timestamp, signature) = decoded.split_once('|')?;
    let issued_at: u64 = timestamp.parse().ok()?;
    Some(TokenParts {
        issued_at,
        signature_hex: signature.to_string(),
    })
}

/// Fixed-time byte-wise equality. The length check short-circuits, which
/// leaks only the length of the supplied signature, not its contents.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str, validity_secs: u64) -> AuthTokenService {
        AuthTokenService::new(AuthConfig {
            secret: secret.to_string(),
            validity_secs,
        })
        .unwrap()
    }

    #[test]
    fn round_trip_verifies_at_issue_time() {
        let service = service("test-secret", 300);
        let token = service.issue_at(1_700_000_000);
        assert!(service.verify(&token, 1_700_000_000));
    }

    #[test]
    fn verifies_within_window_rejects_after() {
        let service = service("test-secret", 300);
        let token = service.issue_at(1_700_000_000);
        assert!(service.verify(&token, 1_700_000_000 + 300));
        assert!(!service.verify(&token, 1_700_000_000 + 301));
    }

    #[test]
    fn rejects_future_dated_token() {
        let service = service("test-secret", 300);
        let token = service.issue_at(1_700_000_100);
        assert!(!service.verify(&token, 1_700_000_000));
    }

    #[test]
    fn rejects_wrong_secret() {
        let issuer = service("secret-a", 300);
        let verifier = service("secret-b", 300);
        let token = issuer.issue_at(1_700_000_000);
        assert!(!verifier.verify(&token, 1_700_000_000));
    }

    #[test]
    fn rejects_malformed_tokens() {
        let service = service("test-secret", 300);
        assert!(!service.verify("not base64 at all!!!", 1_700_000_000));
        assert!(!service.verify(&BASE64.encode("no separator"), 1_700_000_000));
        assert!(!service.verify(&BASE64.encode("notanumber|abcd"), 1_700_000_000));
        assert!(!service.verify("", 1_700_000_000));
    }

    #[test]
    fn rejects_tampered_timestamp() {
        let service = service("test-secret", 300);
        let token = service.issue_at(1_700_000_000);
        let decoded = decode_token(&token).unwrap();
        // Re-pack with a bumped timestamp but the old signature.
        let forged = BASE64.encode(
            format!("{}|{}", decoded.issued_at + 60, decoded.signature_hex).as_bytes(),
        );
        assert!(!service.verify(&forged, 1_700_000_050));
    }

    #[test]
    fn tokens_for_same_second_are_identical() {
        let service = service("test-secret", 300);
        assert_eq!(service.issue_at(42), service.issue_at(42));
    }

    #[test]
    fn decode_exposes_parts_without_verifying() {
        let service = service("test-secret", 300);
        let token = service.issue_at(1_700_000_000);
        let parts = decode_token(&token).unwrap();
        assert_eq!(parts.issued_at, 1_700_000_000);
        assert_eq!(parts.signature_hex.len(), 64);
    }
}
