//! Chain hash type for transaction identification.
//!
//! A `Hash` is a 32-byte digest stored in internal (hashing) byte order and
//! displayed as byte-reversed hex, matching Bitcoin's convention for
//! transaction IDs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::hash::sha256d;
use crate::util::reverse_hash;
use crate::PrimitivesError;

/// Size of a Hash in bytes.
pub const HASH_SIZE: usize = 32;

/// Maximum hex string length for a Hash (64 hex characters).
pub const MAX_HASH_STRING_SIZE: usize = HASH_SIZE * 2;

/// A 32-byte hash in internal byte order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Hash([u8; HASH_SIZE]);

impl Hash {
    /// Create a Hash from a raw 32-byte array in internal order.
    pub fn new(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(bytes)
    }

    /// Create a Hash from bytes given in display order.
    pub fn from_display_bytes(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(reverse_hash(bytes))
    }

    /// Create a Hash from a byte slice in internal order.
    ///
    /// # Returns
    /// `Ok(Hash)` if the slice is 32 bytes, or `InvalidHash` otherwise.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let arr: [u8; HASH_SIZE] = bytes.try_into().map_err(|_| {
            PrimitivesError::InvalidHash(format!(
                "invalid hash length of {}, want {}",
                bytes.len(),
                HASH_SIZE
            ))
        })?;
        Ok(Hash(arr))
    }

    /// Parse a hash from its display (byte-reversed) hex form.
    ///
    /// The string must be exactly 64 hex characters.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.len() != MAX_HASH_STRING_SIZE {
            return Err(PrimitivesError::InvalidHash(format!(
                "hash string must be {} characters, got {}",
                MAX_HASH_STRING_SIZE,
                hex_str.len()
            )));
        }
        let mut display = [0u8; HASH_SIZE];
        hex::decode_to_slice(hex_str, &mut display)?;
        Ok(Hash::from_display_bytes(display))
    }

    /// Access the internal byte array.
    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    /// Return the bytes in display order.
    pub fn to_display_bytes(&self) -> [u8; HASH_SIZE] {
        reverse_hash(self.0)
    }
}

/// Display the hash as byte-reversed hex.
impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_display_bytes()))
    }
}

impl FromStr for Hash {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hash::from_hex(s)
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Hash::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Compute double SHA-256 of the input and return the result as a Hash.
pub fn double_hash_h(data: &[u8]) -> Hash {
    Hash(sha256d(data))
}
