//! Legacy signature hash.
//!
//! Computes the digest an input's ECDSA signature commits to. The preimage is
//! a modified copy of the transaction: every script-sig is cleared, the
//! signed input carries the script code of the output it spends, and the
//! sighash type decides which other inputs and outputs stay committed.

use btc_primitives::hash::sha256d;
use btc_primitives::util::BtcWriter;
use btc_script::Script;

use crate::transaction::Transaction;
use crate::TransactionError;

// -----------------------------------------------------------------------
// Sighash flag constants
// -----------------------------------------------------------------------

/// Sign all inputs and all outputs (the default).
pub const SIGHASH_ALL: u32 = 0x01;

/// Sign all inputs but no outputs.
pub const SIGHASH_NONE: u32 = 0x02;

/// Sign all inputs and only the output at the signed input's index.
pub const SIGHASH_SINGLE: u32 = 0x03;

/// Combined with a base type: commit to the signed input only.
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;

/// Mask extracting the base type (ALL, NONE, SINGLE).
pub const SIGHASH_MASK: u32 = 0x1f;

/// Compute the legacy signature hash for one input.
///
/// # Arguments
/// * `tx`           - The transaction being signed. Not modified.
/// * `input_index`  - Index of the input being signed.
/// * `script_code`  - Locking script of the output that input spends.
/// * `sighash_type` - Base type, optionally OR'd with `SIGHASH_ANYONECANPAY`.
///
/// # Returns
/// The 32-byte double-SHA256 digest, `InputIndexOutOfRange` for a bad index,
/// or `SighashSingleIndexExceedsOutputs` when SINGLE has no matching output.
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    script_code: &Script,
    sighash_type: u32,
) -> Result<[u8; 32], TransactionError> {
    let preimage = calc_preimage(tx, input_index, script_code, sighash_type)?;
    Ok(sha256d(&preimage))
}

/// The byte string [`signature_hash`] double-hashes: the serialized
/// modified transaction followed by `sighash_type` as u32 LE.
pub fn calc_preimage(
    tx: &Transaction,
    input_index: usize,
    script_code: &Script,
    sighash_type: u32,
) -> Result<Vec<u8>, TransactionError> {
    if input_index >= tx.inputs.len() {
        return Err(TransactionError::InputIndexOutOfRange {
            index: input_index,
            count: tx.inputs.len(),
        });
    }

    let mut copy = tx.clone();
    for input in copy.inputs.iter_mut() {
        input.script_sig = Script::new();
    }
    copy.inputs[input_index].script_sig = script_code.clone();

    match sighash_type & SIGHASH_MASK {
        SIGHASH_NONE => {
            copy.outputs.clear();
            zero_other_sequences(&mut copy, input_index);
        }
        SIGHASH_SINGLE => {
            if input_index >= copy.outputs.len() {
                return Err(TransactionError::SighashSingleIndexExceedsOutputs {
                    index: input_index,
                    outputs: copy.outputs.len(),
                });
            }
            copy.outputs.truncate(input_index + 1);
            zero_other_sequences(&mut copy, input_index);
        }
        // ALL, and any unrecognised base type, commits to everything.
        _ => {}
    }

    if sighash_type & SIGHASH_ANYONECANPAY != 0 {
        let signed = copy.inputs.swap_remove(input_index);
        copy.inputs = vec![signed];
    }

    let mut writer = BtcWriter::with_capacity(256);
    copy.write_to(&mut writer);
    writer.write_u32_le(sighash_type);
    Ok(writer.into_bytes())
}

fn zero_other_sequences(tx: &mut Transaction, input_index: usize) {
    for (i, input) in tx.inputs.iter_mut().enumerate() {
        if i != input_index {
            input.sequence = 0;
        }
    }
}
