//! secp256k1 private key.
//!
//! Wraps a k256 signing key and adds the encodings used by wallets:
//! raw 32-byte scalars, hex and WIF (Base58Check with a network prefix).

use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;
use zeroize::Zeroize;

use crate::base58;
use crate::ec::public_key::PublicKey;
use crate::ec::signature::Signature;
use crate::PrimitivesError;

/// Length of a serialized private key scalar in bytes.
const PRIVATE_KEY_BYTES_LEN: usize = 32;

/// WIF version byte for mainnet keys.
pub const WIF_MAINNET_PREFIX: u8 = 0x80;

/// WIF version byte for testnet keys.
pub const WIF_TESTNET_PREFIX: u8 = 0xef;

/// Suffix byte marking a WIF key whose public key is used compressed.
const COMPRESS_MAGIC: u8 = 0x01;

/// A secp256k1 private key used to sign transaction digests.
#[derive(Clone, Debug)]
pub struct PrivateKey {
    inner: SigningKey,
}

impl PrivateKey {
    /// Generate a new random private key from the OS random number generator.
    pub fn new() -> Self {
        PrivateKey {
            inner: SigningKey::random(&mut OsRng),
        }
    }

    /// Create a private key from a raw big-endian 32-byte scalar.
    ///
    /// # Returns
    /// `InvalidPrivateKey` when the slice is not 32 bytes, or the scalar is
    /// zero or not below the curve order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != PRIVATE_KEY_BYTES_LEN {
            return Err(PrimitivesError::InvalidPrivateKey(format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_BYTES_LEN,
                bytes.len()
            )));
        }
        let inner = SigningKey::from_bytes(bytes.into())
            .map_err(|e| PrimitivesError::InvalidPrivateKey(e.to_string()))?;
        Ok(PrivateKey { inner })
    }

    /// Create a private key from a 64-character hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.is_empty() {
            return Err(PrimitivesError::InvalidPrivateKey(
                "private key hex is empty".to_string(),
            ));
        }
        let mut bytes = hex::decode(hex_str)?;
        let key = Self::from_bytes(&bytes);
        bytes.zeroize();
        key
    }

    /// Create a private key from a WIF string.
    ///
    /// Both mainnet (`0x80`) and testnet (`0xef`) prefixes are accepted, with
    /// or without the compression suffix.
    pub fn from_wif(wif: &str) -> Result<Self, PrimitivesError> {
        let mut payload = base58::check_decode(wif).map_err(|e| match e {
            PrimitivesError::ChecksumMismatch => e,
            other => PrimitivesError::InvalidWif(other.to_string()),
        })?;

        let result = match payload.as_slice() {
            [prefix, key @ ..] if *prefix == WIF_MAINNET_PREFIX || *prefix == WIF_TESTNET_PREFIX => {
                match key.len() {
                    33 if key[32] == COMPRESS_MAGIC => Self::from_bytes(&key[..32]),
                    33 => Err(PrimitivesError::InvalidWif(
                        "invalid compression flag".to_string(),
                    )),
                    32 => Self::from_bytes(key),
                    n => Err(PrimitivesError::InvalidWif(format!(
                        "invalid payload length {}",
                        n + 1
                    ))),
                }
            }
            [prefix, ..] => Err(PrimitivesError::InvalidWif(format!(
                "unknown network prefix 0x{:02x}",
                prefix
            ))),
            [] => Err(PrimitivesError::InvalidWif("empty payload".to_string())),
        };

        payload.zeroize();
        result
    }

    /// Encode as a compressed mainnet WIF string.
    pub fn to_wif(&self) -> String {
        self.to_wif_prefix(WIF_MAINNET_PREFIX)
    }

    /// Encode as a compressed WIF string with the given network prefix.
    pub fn to_wif_prefix(&self, prefix: u8) -> String {
        let mut payload = Vec::with_capacity(PRIVATE_KEY_BYTES_LEN + 2);
        payload.push(prefix);
        payload.extend_from_slice(&self.to_bytes());
        payload.push(COMPRESS_MAGIC);
        let encoded = base58::check_encode(&payload);
        payload.zeroize();
        encoded
    }

    /// Serialize the scalar as 32 big-endian bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.inner.to_bytes());
        out
    }

    /// Serialize the scalar as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Derive the matching public key.
    pub fn pub_key(&self) -> PublicKey {
        PublicKey::from_k256_verifying_key(self.inner.verifying_key())
    }

    /// Sign a 32-byte digest with an RFC6979 deterministic nonce.
    ///
    /// The resulting signature is low-S normalized.
    pub fn sign(&self, digest: &[u8]) -> Result<Signature, PrimitivesError> {
        Signature::sign(digest, self)
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.inner
    }
}

impl Default for PrivateKey {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for PrivateKey {}
