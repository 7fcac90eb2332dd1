//! Spendable outputs supplied by a wallet or indexer.

use btc_primitives::chainhash::Hash;
use btc_script::Script;
use serde::{Deserialize, Serialize};

use crate::TransactionError;

/// An unspent transaction output.
///
/// `tx_hash` is kept in display order, the order block explorers and
/// indexers print txids in, and serializes as that hex string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    /// Id of the transaction that created the output, display order.
    #[serde(with = "hex")]
    pub tx_hash: [u8; 32],
    /// Index of the output within that transaction.
    pub output_index: u32,
    /// Value in satoshis.
    pub amount: u64,
    /// The output's locking script.
    pub script_pub_key: Script,
    /// The address the output pays, as reported by the indexer.
    pub address: String,
}

impl Utxo {
    /// Build a UTXO from the hex txid and locking script an indexer returns.
    pub fn from_hex(
        txid_hex: &str,
        output_index: u32,
        amount: u64,
        script_hex: &str,
        address: &str,
    ) -> Result<Self, TransactionError> {
        let txid = Hash::from_hex(txid_hex)?;
        Ok(Utxo {
            tx_hash: txid.to_display_bytes(),
            output_index,
            amount,
            script_pub_key: Script::from_hex(script_hex)?,
            address: address.to_string(),
        })
    }

    /// The txid as a chain hash.
    pub fn txid(&self) -> Hash {
        Hash::from_display_bytes(self.tx_hash)
    }
}

/// Σ amounts, failing instead of wrapping.
pub(crate) fn total_amount<'a, I>(utxos: I) -> Result<u64, TransactionError>
where
    I: IntoIterator<Item = &'a Utxo>,
{
    utxos.into_iter().try_fold(0u64, |acc, u| {
        acc.checked_add(u.amount).ok_or(TransactionError::AmountOverflow)
    })
}
