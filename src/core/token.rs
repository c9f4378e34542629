//! Verification tokens attached to records on status changes
//!
//! A token is `0x` followed by a fixed-length lowercase alphanumeric body.
//! Two sources are provided:
//! - [`DigestTokens`]: SHA-256 of the record payload, hex-encoded and truncated.
//!   The same payload always yields the same token, so a record can be re-checked.
//! - [`RandomTokens`]: random body with no relation to the record.

use rand::distr::{Alphanumeric, SampleString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::Write;

/// Default length of the token body (excluding `0x`)
pub const DEFAULT_TOKEN_LENGTH: usize = 16;

/// Longest body a digest can fill (64 hex chars)
pub const MAX_TOKEN_LENGTH: usize = 64;

/// Opaque verification token (`0x` + body)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationToken(String);

impl VerificationToken {
    /// Wrap an existing token string, e.g. one loaded from a workspace
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Token body without the `0x` prefix
    pub fn body(&self) -> &str {
        self.0.strip_prefix("0x").unwrap_or(&self.0)
    }
}

impl std::fmt::Display for VerificationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of verification tokens
pub trait TokenSource: Send + Sync {
    /// Issue a token for the serialized record payload
    fn issue(&self, payload: &[u8]) -> VerificationToken;

    /// Check a token against a payload; `None` when the source cannot tell
    fn verify(&self, payload: &[u8], token: &VerificationToken) -> Option<bool>;
}

/// Content-addressed tokens derived from SHA-256
#[derive(Debug, Clone)]
pub struct DigestTokens {
    length: usize,
}

impl DigestTokens {
    pub fn new(length: usize) -> Self {
        Self {
            length: length.clamp(1, MAX_TOKEN_LENGTH),
        }
    }
}

impl Default for DigestTokens {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_LENGTH)
    }
}

impl TokenSource for DigestTokens {
    fn issue(&self, payload: &[u8]) -> VerificationToken {
        let digest = Sha256::digest(payload);
        let mut body = String::with_capacity(MAX_TOKEN_LENGTH);
        for byte in digest.iter() {
            let _ = write!(body, "{:02x}", byte);
        }
        body.truncate(self.length);
        VerificationToken(format!("0x{}", body))
    }

    fn verify(&self, payload: &[u8], token: &VerificationToken) -> Option<bool> {
        Some(self.issue(payload) == *token)
    }
}

/// Random placeholder tokens with no cryptographic meaning
#[derive(Debug, Clone)]
pub struct RandomTokens {
    length: usize,
}

impl RandomTokens {
    pub fn new(length: usize) -> Self {
        Self {
            length: length.clamp(1, MAX_TOKEN_LENGTH),
        }
    }
}

impl Default for RandomTokens {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_LENGTH)
    }
}

impl TokenSource for RandomTokens {
    fn issue(&self, _payload: &[u8]) -> VerificationToken {
        let body = Alphanumeric.sample_string(&mut rand::rng(), self.length);
        VerificationToken(format!("0x{}", body.to_lowercase()))
    }

    fn verify(&self, _payload: &[u8], _token: &VerificationToken) -> Option<bool> {
        None
    }
}
