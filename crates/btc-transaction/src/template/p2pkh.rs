//! Pay-to-public-key-hash template.
//!
//! Locking: `OP_DUP OP_HASH160 <hash160(pubkey)> OP_EQUALVERIFY OP_CHECKSIG`.
//! Unlocking: `<DER signature || sighash byte> <compressed pubkey>`.

use btc_primitives::ec::PrivateKey;
use btc_script::{p2pkh, Address, Script};

use crate::sighash::{self, SIGHASH_ALL};
use crate::template::UnlockingScriptTemplate;
use crate::transaction::Transaction;
use crate::TransactionError;

/// Estimated unlocking script length: push(72-byte DER + sighash byte) plus
/// push(33-byte compressed key).
pub const ESTIMATED_SCRIPT_SIG_LEN: usize = 1 + 72 + 1 + 33;

/// Estimated serialized size of a signed P2PKH input:
/// outpoint (36) + script length (1) + script-sig (107) + sequence (4).
pub const ESTIMATED_INPUT_SIZE: usize = 36 + 1 + ESTIMATED_SCRIPT_SIG_LEN + 4;

/// The P2PKH locking script paying `address`.
pub fn lock(address: &Address) -> Script {
    address.script_pub_key()
}

/// A P2PKH unlocker signing with `private_key`. `sighash_type` defaults to
/// `SIGHASH_ALL`.
pub fn unlock(private_key: PrivateKey, sighash_type: Option<u32>) -> P2PKH {
    P2PKH {
        private_key,
        sighash_type: sighash_type.unwrap_or(SIGHASH_ALL),
    }
}

/// P2PKH signing template: a private key and the sighash type to sign with.
pub struct P2PKH {
    private_key: PrivateKey,
    sighash_type: u32,
}

impl P2PKH {
    /// The sighash type this unlocker signs with.
    pub fn sighash_type(&self) -> u32 {
        self.sighash_type
    }
}

impl UnlockingScriptTemplate for P2PKH {
    fn sign(
        &self,
        tx: &Transaction,
        input_index: usize,
        script_code: &Script,
    ) -> Result<Script, TransactionError> {
        // The script-sig carries the type as a single byte; a wider type
        // would sign a digest that no verifier can reproduce.
        let type_byte = u8::try_from(self.sighash_type).map_err(|_| {
            TransactionError::SigningError(format!(
                "sighash type {:#x} does not fit in one byte",
                self.sighash_type
            ))
        })?;
        let digest = sighash::signature_hash(tx, input_index, script_code, self.sighash_type)?;

        let signature = self
            .private_key
            .sign(&digest)
            .map_err(|e| TransactionError::SigningError(e.to_string()))?;

        let der = signature.to_der();
        let mut sig_buf = Vec::with_capacity(der.len() + 1);
        sig_buf.extend_from_slice(&der);
        sig_buf.push(type_byte);

        Ok(p2pkh::create_script_sig(&sig_buf, &self.private_key.pub_key())?)
    }

    fn estimate_length(&self) -> usize {
        ESTIMATED_SCRIPT_SIG_LEN
    }
}
