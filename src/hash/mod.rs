//! SHA-256 digest primitives shared by the four engines.
//!
//! Two compositions exist and no others:
//!
//! * leaf: `SHA256(canonical(value) || salt)`
//! * node: `SHA256(d₁ || d₂ || … || dₙ)` over child digests in declaration
//!   order, with no domain separator and no length prefix.
//!
//! Hex is always lowercase. These choices are the interoperability surface
//! of the commitment format and must be preserved verbatim.

use core::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use crate::record::SaltBytes;

/// Length in bytes of every digest.
pub const DIGEST_LEN: usize = 32;

/// A 32-byte SHA-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Constructs a digest from raw bytes.
    pub const fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the raw digest bytes.
    pub const fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hex encoding, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Decodes a 64-character hex digest.
    ///
    /// # Errors
    ///
    /// [`DigestParseError::Length`] when the input is not 64 characters,
    /// [`DigestParseError::Encoding`] when it is not valid hex.
    pub fn from_hex(text: &str) -> Result<Self, DigestParseError> {
        if text.len() != DIGEST_LEN * 2 {
            return Err(DigestParseError::Length { got: text.len() });
        }
        let bytes = hex::decode(text).map_err(|_| DigestParseError::Encoding)?;
        let mut out = [0u8; DIGEST_LEN];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest(0x{self})")
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Reasons a hex digest failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestParseError {
    /// Wrong character count for a 32-byte digest.
    Length { got: usize },
    /// Not valid hexadecimal.
    Encoding,
}

/// Computes the SHA-256 digest of a byte payload.
pub fn sha256(input: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(input);
    Digest(hasher.finalize().into())
}

/// Leaf hash: `SHA256(canonical(value) || salt)`.
pub fn leaf_hash(canonical: &[u8], salt: &SaltBytes) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(canonical);
    hasher.update(salt);
    Digest(hasher.finalize().into())
}

/// Node hash: SHA-256 over child digests concatenated in declaration
/// order.
pub fn node_hash(children: &[Digest]) -> Digest {
    let mut hasher = Sha256::new();
    for child in children {
        hasher.update(child.as_bytes());
    }
    Digest(hasher.finalize().into())
}
