//! Input signing and verification for P2PKH spends.

use btc_primitives::ec::PrivateKey;
use btc_primitives::hash::hash160;
use btc_script::{p2pkh, Script, ScriptError};
use tracing::debug;

use crate::sighash;
use crate::template::p2pkh as p2pkh_template;
use crate::template::UnlockingScriptTemplate;
use crate::transaction::Transaction;
use crate::TransactionError;

/// Sign input `input_index` and store the resulting P2PKH script-sig on it.
///
/// # Arguments
/// * `tx` - The transaction. Only `tx.inputs[input_index].script_sig` changes.
/// * `input_index` - The input to sign.
/// * `private_key` - Key whose public key hash the spent output pays.
/// * `script_pub_key` - Locking script of the spent output, used as script code.
/// * `sighash_type` - Sighash type, committed to and appended to the signature.
///   Types above `0xff` are rejected with `SigningError`.
pub fn sign_input(
    tx: &mut Transaction,
    input_index: usize,
    private_key: &PrivateKey,
    script_pub_key: &Script,
    sighash_type: u32,
) -> Result<(), TransactionError> {
    let unlocker = p2pkh_template::unlock(private_key.clone(), Some(sighash_type));
    let script_sig = unlocker.sign(tx, input_index, script_pub_key)?;

    debug!(
        input = input_index,
        sighash_type,
        script_sig_len = script_sig.len(),
        "signed input"
    );

    tx.inputs[input_index].script_sig = script_sig;
    Ok(())
}

/// Check the signature on input `input_index` against `script_pub_key`.
///
/// The digest is recomputed with the sighash type recovered from the
/// script-sig, so inputs signed with any type verify.
///
/// # Returns
/// `Ok(false)` for a signature that does not verify, or whose public key
/// does not hash to a P2PKH `script_pub_key`. `MalformedScriptSig` when the
/// script-sig is not two pushes of a strict DER signature and a public key.
pub fn verify_input(
    tx: &Transaction,
    input_index: usize,
    script_pub_key: &Script,
) -> Result<bool, TransactionError> {
    let input = tx
        .inputs
        .get(input_index)
        .ok_or(TransactionError::InputIndexOutOfRange {
            index: input_index,
            count: tx.inputs.len(),
        })?;

    let parsed = p2pkh::parse_script_sig(&input.script_sig).map_err(|e| {
        TransactionError::MalformedScriptSig {
            index: input_index,
            reason: match e {
                ScriptError::MalformedScriptSig(reason) => reason,
                other => other.to_string(),
            },
        }
    })?;

    if script_pub_key.is_p2pkh() {
        let expected = script_pub_key.public_key_hash()?;
        if hash160(&parsed.public_key_bytes) != expected {
            debug!(input = input_index, "public key does not match locking script");
            return Ok(false);
        }
    }

    let digest = sighash::signature_hash(
        tx,
        input_index,
        script_pub_key,
        u32::from(parsed.sighash_type),
    )?;

    Ok(parsed.public_key.verify(&digest, &parsed.signature))
}

/// Parse a private key given as WIF or as 64 hex characters.
pub fn parse_private_key(encoded: &str) -> Result<PrivateKey, TransactionError> {
    let encoded = encoded.trim();
    if encoded.len() == 64 && encoded.bytes().all(|b| b.is_ascii_hexdigit()) {
        return PrivateKey::from_hex(encoded)
            .map_err(|e| TransactionError::KeyDerivation(e.to_string()));
    }
    PrivateKey::from_wif(encoded).map_err(|e| TransactionError::KeyDerivation(e.to_string()))
}
