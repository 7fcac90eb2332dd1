/// Elliptic curve cryptography on secp256k1.
///
/// Private keys (raw, hex and WIF), SEC1 public keys and low-S ECDSA
/// signatures with strict DER encoding. No curve state is held globally;
/// every operation goes through the k256 types owned by each key.

pub mod private_key;
pub mod public_key;
pub mod signature;

pub use private_key::PrivateKey;
pub use public_key::PublicKey;
pub use signature::Signature;
