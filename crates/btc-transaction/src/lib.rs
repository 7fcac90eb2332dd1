/// Legacy Bitcoin transactions: building, signing and verification.
///
/// Provides the transaction model and its wire encoding, the legacy
/// signature hash, P2PKH signing and verification, a builder that turns
/// UTXOs and payees into a signed transaction, and one-call helpers.

pub mod transaction;
pub mod input;
pub mod output;
pub mod sighash;
pub mod template;
pub mod signer;
pub mod builder;
pub mod helpers;
pub mod utxo;
pub mod config;

mod error;
pub use error::TransactionError;
pub use transaction::Transaction;
pub use input::TxIn;
pub use output::TxOut;
pub use builder::TransactionBuilder;
pub use config::TxConfig;
pub use utxo::Utxo;
pub use helpers::{
    calculate_transaction_fee, create_multi_key_transaction, create_simple_transaction,
    validate_transaction,
};
pub use signer::{parse_private_key, sign_input, verify_input};

#[cfg(test)]
mod tests;
