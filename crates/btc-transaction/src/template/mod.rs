//! Script templates for spending outputs.
//!
//! A template turns a private key into the unlocking script for one input,
//! and knows how large that script will be before it is signed so fees can
//! be estimated up front.

pub mod p2pkh;

use btc_script::Script;

use crate::transaction::Transaction;
use crate::TransactionError;

/// A strategy that produces unlocking scripts.
pub trait UnlockingScriptTemplate {
    /// Produce the unlocking script for `input_index`.
    ///
    /// # Arguments
    /// * `tx` - The transaction being signed.
    /// * `input_index` - The input to sign.
    /// * `script_code` - Locking script of the output that input spends.
    ///
    /// # Returns
    /// The unlocking script. The transaction is not modified.
    fn sign(
        &self,
        tx: &Transaction,
        input_index: usize,
        script_code: &Script,
    ) -> Result<Script, TransactionError>;

    /// Upper-bound byte length of the unlocking script, used for fee
    /// estimation before signing.
    fn estimate_length(&self) -> usize;
}
