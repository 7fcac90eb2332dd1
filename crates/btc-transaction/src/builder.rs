//! Incremental transaction construction.
//!
//! A [`TransactionBuilder`] accumulates inputs (each paired with the UTXO it
//! spends), outputs, a fee and an optional change address. [`build`] checks
//! the accumulated state and returns an unsigned [`Transaction`];
//! [`sign_transaction`] consumes the builder, adds change and signs every
//! input.
//!
//! [`build`]: TransactionBuilder::build
//! [`sign_transaction`]: TransactionBuilder::sign_transaction

use btc_primitives::ec::PrivateKey;
use btc_script::{Address, Network, Script};
use tracing::debug;

use crate::config::TxConfig;
use crate::input::TxIn;
use crate::output::TxOut;
use crate::sighash::SIGHASH_ALL;
use crate::signer;
use crate::template::p2pkh::{self as p2pkh_template, ESTIMATED_INPUT_SIZE};
use crate::transaction::Transaction;
use crate::utxo::{self, Utxo};
use crate::TransactionError;

/// Version, locktime and the two count varints, rounded up.
const ESTIMATED_OVERHEAD: usize = 10;

/// Amount, script length byte and a P2PKH locking script.
const ESTIMATED_P2PKH_OUTPUT_SIZE: usize = 8 + 1 + 25;

/// Accumulates the parts of a transaction before signing.
///
/// `inputs[i]` spends `utxos[i]`; the two lists are always pushed together.
#[derive(Clone, Debug)]
pub struct TransactionBuilder {
    inputs: Vec<TxIn>,
    utxos: Vec<Utxo>,
    outputs: Vec<TxOut>,
    fee: u64,
    version: u32,
    locktime: u32,
    sequence: u32,
    network: Network,
    change_address: Option<Address>,
}

impl TransactionBuilder {
    /// An empty builder with the default [`TxConfig`].
    pub fn new() -> Self {
        Self::with_config(TxConfig::default())
    }

    /// An empty builder taking version, locktime, input sequence and network
    /// from `config`.
    pub fn with_config(config: TxConfig) -> Self {
        TransactionBuilder {
            inputs: Vec::new(),
            utxos: Vec::new(),
            outputs: Vec::new(),
            fee: 0,
            version: config.version,
            locktime: config.locktime,
            sequence: config.sequence,
            network: config.network,
            change_address: None,
        }
    }

    // -----------------------------------------------------------------
    // Inputs and outputs
    // -----------------------------------------------------------------

    /// Spend `prev_hash:prev_index`, funded by `utxo`.
    ///
    /// `prev_hash` is in display order, like [`Utxo::tx_hash`].
    pub fn add_input(&mut self, prev_hash: [u8; 32], prev_index: u32, utxo: Utxo) -> &mut Self {
        let mut input = TxIn::new(prev_hash, prev_index);
        input.sequence = self.sequence;
        self.inputs.push(input);
        self.utxos.push(utxo);
        self
    }

    /// Spend `utxo` at its own outpoint.
    pub fn add_utxo(&mut self, utxo: Utxo) -> &mut Self {
        self.add_input(utxo.tx_hash, utxo.output_index, utxo)
    }

    /// Pay `amount` satoshis to a P2PKH address.
    ///
    /// # Returns
    /// `InvalidAddress` if `address` is not a valid Base58Check P2PKH address
    /// or belongs to a different network than the builder.
    pub fn add_output(&mut self, address: &str, amount: u64) -> Result<&mut Self, TransactionError> {
        let address = self.parse_address(address)?;
        Ok(self.add_output_script(p2pkh_template::lock(&address), amount))
    }

    /// Pay `amount` satoshis to an already-built locking script.
    pub fn add_output_script(&mut self, script_pub_key: Script, amount: u64) -> &mut Self {
        self.outputs.push(TxOut::new(amount, script_pub_key));
        self
    }

    // -----------------------------------------------------------------
    // Fee, change and header fields
    // -----------------------------------------------------------------

    /// Set an absolute fee in satoshis.
    pub fn set_fee(&mut self, fee: u64) -> &mut Self {
        self.fee = fee;
        self
    }

    /// The fee currently set.
    pub fn fee(&self) -> u64 {
        self.fee
    }

    /// Estimated signed size in bytes.
    ///
    /// Each input counts as a 148-byte P2PKH spend, each output as
    /// `8 + 1 + len(script)`, plus a P2PKH change output when a change
    /// address is set. Script-sigs shorter or longer than the estimate make
    /// the real size differ by a few bytes.
    pub fn estimate_size(&self) -> usize {
        let outputs: usize = self
            .outputs
            .iter()
            .map(|o| 8 + 1 + o.script_pub_key.len())
            .sum();
        let change = if self.change_address.is_some() {
            ESTIMATED_P2PKH_OUTPUT_SIZE
        } else {
            0
        };
        ESTIMATED_OVERHEAD + self.inputs.len() * ESTIMATED_INPUT_SIZE + outputs + change
    }

    /// Set the fee to `estimate_size() * fee_per_byte` and return it.
    pub fn calculate_fee(&mut self, fee_per_byte: u64) -> Result<u64, TransactionError> {
        let size = self.estimate_size();
        let fee = (size as u64)
            .checked_mul(fee_per_byte)
            .ok_or(TransactionError::AmountOverflow)?;
        debug!(estimated_size = size, fee_per_byte, fee, "calculated fee");
        self.fee = fee;
        Ok(fee)
    }

    /// Send change to `address`, which must be on the builder's network.
    pub fn set_change_address(&mut self, address: &str) -> Result<&mut Self, TransactionError> {
        self.change_address = Some(self.parse_address(address)?);
        Ok(self)
    }

    /// Set the transaction locktime.
    pub fn set_locktime(&mut self, locktime: u32) -> &mut Self {
        self.locktime = locktime;
        self
    }

    /// Set the transaction version.
    pub fn set_version(&mut self, version: u32) -> &mut Self {
        self.version = version;
        self
    }

    /// Network every output and change address must belong to.
    pub fn network(&self) -> Network {
        self.network
    }

    // -----------------------------------------------------------------
    // Build and sign
    // -----------------------------------------------------------------

    /// Check the accumulated state and produce the unsigned transaction.
    ///
    /// # Returns
    /// `NoInputs`, `NoOutputs`, `UtxoInputMismatch` or `InsufficientFunds`
    /// (checked in that order) when the state cannot make a valid spend.
    pub fn build(&self) -> Result<Transaction, TransactionError> {
        if self.inputs.is_empty() {
            return Err(TransactionError::NoInputs);
        }
        if self.outputs.is_empty() {
            return Err(TransactionError::NoOutputs);
        }
        if self.inputs.len() != self.utxos.len() {
            return Err(TransactionError::UtxoInputMismatch {
                inputs: self.inputs.len(),
                utxos: self.utxos.len(),
            });
        }

        let available = utxo::total_amount(&self.utxos)?;
        let required = self.required_amount()?;
        if available < required {
            return Err(TransactionError::InsufficientFunds {
                required,
                available,
            });
        }

        debug!(
            inputs = self.inputs.len(),
            outputs = self.outputs.len(),
            fee = self.fee,
            "built transaction"
        );

        Ok(Transaction {
            version: self.version,
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
            locktime: self.locktime,
        })
    }

    /// Add change, build, and sign input `i` with `private_keys[i]` under
    /// SIGHASH_ALL.
    ///
    /// Change is `Σutxo − Σoutputs − fee`; when positive it is paid to the
    /// change address as a final output.
    ///
    /// # Returns
    /// The fully signed transaction, `MissingChangeAddress` when change is
    /// owed and no change address was set, or `KeyCountMismatch` unless
    /// exactly one key per input was given.
    pub fn sign_transaction(
        mut self,
        private_keys: &[PrivateKey],
    ) -> Result<Transaction, TransactionError> {
        let estimated = self.estimate_size();

        let available = utxo::total_amount(&self.utxos)?;
        let required = self.required_amount()?;
        if let Some(change) = available.checked_sub(required).filter(|c| *c > 0) {
            let script = match &self.change_address {
                Some(address) => p2pkh_template::lock(address),
                None => return Err(TransactionError::MissingChangeAddress(change)),
            };
            debug!(change, "adding change output");
            self.outputs.push(TxOut::new(change, script));
        }

        let mut tx = self.build()?;

        if private_keys.len() != tx.inputs.len() {
            return Err(TransactionError::KeyCountMismatch {
                keys: private_keys.len(),
                inputs: tx.inputs.len(),
            });
        }

        for (index, (key, utxo)) in private_keys.iter().zip(&self.utxos).enumerate() {
            signer::sign_input(&mut tx, index, key, &utxo.script_pub_key, SIGHASH_ALL)?;
        }

        debug!(
            txid = %tx.id(),
            estimated_size = estimated,
            actual_size = tx.size(),
            "signed transaction"
        );
        Ok(tx)
    }

    fn required_amount(&self) -> Result<u64, TransactionError> {
        self.outputs
            .iter()
            .try_fold(self.fee, |acc, o| acc.checked_add(o.amount))
            .ok_or(TransactionError::AmountOverflow)
    }

    fn parse_address(&self, address: &str) -> Result<Address, TransactionError> {
        let parsed = Address::from_string(address)
            .map_err(|e| TransactionError::InvalidAddress(format!("{}: {}", address, e)))?;
        if parsed.network != self.network {
            return Err(TransactionError::InvalidAddress(format!(
                "{}: {:?} address on a {:?} builder",
                address, parsed.network, self.network
            )));
        }
        Ok(parsed)
    }
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
