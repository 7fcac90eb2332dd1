/// Bitcoin transaction SDK - Cryptographic primitives, hashing, and wire codec.
///
/// This crate provides the foundational building blocks for the SDK:
/// - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Hash160)
/// - Chain hash type for transaction identification
/// - CompactSize varint encoding and little-endian reader/writer
/// - Base58Check encoding/decoding
/// - secp256k1 private/public keys and DER-encoded ECDSA signatures

pub mod hash;
pub mod chainhash;
pub mod util;
pub mod base58;
pub mod ec;

mod error;
pub use error::PrimitivesError;
