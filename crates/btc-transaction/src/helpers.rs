//! One-call flows on top of [`TransactionBuilder`] and the signer.

use btc_primitives::ec::PrivateKey;
use btc_script::{Address, Network};
use tracing::{debug, warn};

use crate::builder::TransactionBuilder;
use crate::config::TxConfig;
use crate::signer;
use crate::transaction::Transaction;
use crate::utxo::Utxo;
use crate::TransactionError;

/// Spend `from_utxos`, all locked to `from_key`, paying `amount` to
/// `to_address` and the change back to `from_key`'s P2PKH address.
///
/// The fee is `fee_per_byte` times the builder's size estimate, which
/// includes the change output.
///
/// # Arguments
/// * `from_key` - Signs every input.
/// * `from_utxos` - Outputs to spend.
/// * `to_address` - Payee address.
/// * `amount` - Satoshis to the payee.
/// * `fee_per_byte` - Fee rate in satoshis per byte.
/// * `testnet` - Network of the payee and change addresses.
pub fn create_simple_transaction(
    from_key: &PrivateKey,
    from_utxos: &[Utxo],
    to_address: &str,
    amount: u64,
    fee_per_byte: u64,
    testnet: bool,
) -> Result<Transaction, TransactionError> {
    let network = Network::from_testnet(testnet);
    let change_address = Address::from_public_key(&from_key.pub_key(), network);
    let keys = vec![from_key.clone(); from_utxos.len()];
    send_with_change(
        network,
        &keys,
        from_utxos,
        to_address,
        amount,
        fee_per_byte,
        &change_address.to_string(),
    )
}

/// Spend `utxos[i]` with `keys[i]`, paying `amount` to `to_address` and the
/// change to `change_address`.
///
/// Every input carries its own single-key P2PKH signature; no shared
/// multi-signature script is involved. The network is taken from
/// `change_address`, and `to_address` must be on the same one.
///
/// # Returns
/// `KeyCountMismatch` unless there is exactly one key per UTXO, or
/// `InvalidAddress` for an unparsable or cross-network address.
pub fn create_multi_key_transaction(
    keys: &[PrivateKey],
    utxos: &[Utxo],
    to_address: &str,
    amount: u64,
    fee_per_byte: u64,
    change_address: &str,
) -> Result<Transaction, TransactionError> {
    if keys.len() != utxos.len() {
        return Err(TransactionError::KeyCountMismatch {
            keys: keys.len(),
            inputs: utxos.len(),
        });
    }
    let network = Address::from_string(change_address)
        .map_err(|e| TransactionError::InvalidAddress(format!("{}: {}", change_address, e)))?
        .network;
    send_with_change(network, keys, utxos, to_address, amount, fee_per_byte, change_address)
}

fn send_with_change(
    network: Network,
    keys: &[PrivateKey],
    utxos: &[Utxo],
    to_address: &str,
    amount: u64,
    fee_per_byte: u64,
    change_address: &str,
) -> Result<Transaction, TransactionError> {
    let mut builder = TransactionBuilder::with_config(TxConfig {
        network,
        ..TxConfig::default()
    });
    for utxo in utxos {
        builder.add_utxo(utxo.clone());
    }
    builder
        .add_output(to_address, amount)?
        .set_change_address(change_address)?;
    builder.calculate_fee(fee_per_byte)?;
    builder.sign_transaction(keys)
}

/// Check that input `i` spends `utxos[i]` and carries a valid signature for
/// its locking script.
///
/// # Returns
/// The first failure: `UtxoInputMismatch`, `OutpointMismatch { index }`,
/// `MalformedScriptSig { index, .. }` or `InvalidSignature { index }`.
pub fn validate_transaction(tx: &Transaction, utxos: &[Utxo]) -> Result<(), TransactionError> {
    if tx.inputs.len() != utxos.len() {
        warn!(inputs = tx.inputs.len(), utxos = utxos.len(), "input and utxo counts differ");
        return Err(TransactionError::UtxoInputMismatch {
            inputs: tx.inputs.len(),
            utxos: utxos.len(),
        });
    }

    for (index, (input, utxo)) in tx.inputs.iter().zip(utxos).enumerate() {
        if input.prev_tx != utxo.tx_hash || input.prev_index != utxo.output_index {
            warn!(
                index,
                spends = %format!("{}:{}", input.prev_tx_hash(), input.prev_index),
                utxo = %format!("{}:{}", utxo.txid(), utxo.output_index),
                "input does not spend its utxo"
            );
            return Err(TransactionError::OutpointMismatch { index });
        }

        if !signer::verify_input(tx, index, &utxo.script_pub_key)? {
            warn!(index, "signature does not verify");
            return Err(TransactionError::InvalidSignature { index });
        }
    }

    debug!(txid = %tx.id(), inputs = tx.inputs.len(), "transaction valid");
    Ok(())
}

/// `Σutxo − Σoutputs`, floored at zero.
pub fn calculate_transaction_fee(tx: &Transaction, utxos: &[Utxo]) -> u64 {
    let amounts: Vec<u64> = utxos.iter().map(|u| u.amount).collect();
    tx.fee(&amounts)
}
