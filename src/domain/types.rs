//! Address and signature value types
//!
//! Both types are validated against their canonical hex patterns at
//! construction, so any value that reaches the crypto or ledger layers is
//! already well-formed:
//!
//! - `Address`: `0x` + 40 hex characters (20 bytes), case-insensitive input,
//!   canonical lowercase output
//! - `SignatureBytes`: `0x` + 130 hex characters (65 bytes, `r || s || v`)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error type for value parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid address: expected 0x followed by 40 hex characters")]
    InvalidAddress,

    #[error("invalid signature: expected 0x followed by 130 hex characters")]
    InvalidSignature,
}

/// Decode a strict `0x`-prefixed hex string of exactly `len` bytes.
fn decode_prefixed_hex(s: &str, len: usize) -> Option<Vec<u8>> {
    let rest = s.strip_prefix("0x")?;
    if rest.len() != len * 2 || !rest.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    hex::decode(rest).ok()
}

// ============================================================================
// Address
// ============================================================================

/// A 20-byte account address.
///
/// Comparison and hashing are over the raw bytes, so mixed-case inputs that
/// name the same account compare equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 20]);

impl Address {
    /// Parse from the canonical pattern `^0x[0-9a-fA-F]{40}$`.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let bytes = decode_prefixed_hex(s, 20).ok_or(ParseError::InvalidAddress)?;
        let mut out = [0u8; 20];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }

    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Canonical lowercase `0x`-prefixed hex form.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl FromStr for Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// SignatureBytes
// ============================================================================

/// A 65-byte ECDSA signature (`r || s || v`).
///
/// Only the shape is checked here; whether the bytes decode to a point
/// recoverable on the curve is the crypto layer's concern.
#[derive(Clone, PartialEq, Eq)]
pub struct SignatureBytes([u8; 65]);

impl SignatureBytes {
    /// Parse from the canonical pattern `^0x[0-9a-fA-F]{130}$`.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let bytes = decode_prefixed_hex(s, 65).ok_or(ParseError::InvalidSignature)?;
        let mut out = [0u8; 65];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }

    /// Raw signature bytes.
    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    /// Canonical lowercase `0x`-prefixed hex form.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl From<[u8; 65]> for SignatureBytes {
    fn from(bytes: [u8; 65]) -> Self {
        Self(bytes)
    }
}

impl FromStr for SignatureBytes {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SignatureBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for SignatureBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignatureBytes({})", self.to_hex())
    }
}

impl Serialize for SignatureBytes {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SignatureBytes {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Tests
// ============================================================================
