//! Transaction input spending a previous output.
//!
//! Holds the outpoint being spent, the unlocking script (empty until the
//! input is signed) and the sequence number, and reads/writes the Bitcoin
//! wire format.

use btc_primitives::chainhash::Hash;
use btc_primitives::util::{reverse_hash, BtcReader, BtcWriter};
use btc_script::Script;

use crate::TransactionError;

/// Default sequence number: final, no relative locktime.
pub const DEFAULT_SEQUENCE_NUMBER: u32 = 0xFFFF_FFFF;

/// A single transaction input.
///
/// # Wire format
///
/// | Field       | Size                         |
/// |-------------|------------------------------|
/// | prev_tx     | 32 bytes, reversed           |
/// | prev_index  | 4 bytes (LE)                 |
/// | script len  | VarInt                       |
/// | script_sig  | variable                     |
/// | sequence    | 4 bytes (LE)                 |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxIn {
    /// Txid of the output being spent, display order.
    pub prev_tx: [u8; 32],
    /// Index of the output being spent.
    pub prev_index: u32,
    /// Unlocking script. Empty until signed.
    pub script_sig: Script,
    /// Sequence number.
    pub sequence: u32,
}

impl TxIn {
    /// An unsigned input spending `prev_tx:prev_index` with the default
    /// sequence.
    pub fn new(prev_tx: [u8; 32], prev_index: u32) -> Self {
        TxIn {
            prev_tx,
            prev_index,
            script_sig: Script::new(),
            sequence: DEFAULT_SEQUENCE_NUMBER,
        }
    }

    /// The spent txid as a chain hash.
    pub fn prev_tx_hash(&self) -> Hash {
        Hash::from_display_bytes(self.prev_tx)
    }

    /// Read one input from `reader`.
    pub fn read_from(reader: &mut BtcReader) -> Result<Self, TransactionError> {
        let wire = |field: &str, e: btc_primitives::PrimitivesError| {
            TransactionError::SerializationError(format!("reading {}: {}", field, e))
        };

        let prev_tx = reverse_hash(reader.read_array().map_err(|e| wire("prev tx", e))?);
        let prev_index = reader.read_u32_le().map_err(|e| wire("prev index", e))?;
        let script_len = reader.read_varint().map_err(|e| wire("script length", e))?;
        let script_len = usize::try_from(script_len.value()).map_err(|_| {
            TransactionError::SerializationError("script length overflows usize".to_string())
        })?;
        let script = reader
            .read_bytes(script_len)
            .map_err(|e| wire("script-sig", e))?;
        let sequence = reader.read_u32_le().map_err(|e| wire("sequence", e))?;

        Ok(TxIn {
            prev_tx,
            prev_index,
            script_sig: Script::from_bytes(script),
            sequence,
        })
    }

    /// Append this input's wire encoding to `writer`.
    pub fn write_to(&self, writer: &mut BtcWriter) {
        writer.write_bytes(&reverse_hash(self.prev_tx));
        writer.write_u32_le(self.prev_index);
        writer.write_var_bytes(self.script_sig.to_bytes());
        writer.write_u32_le(self.sequence);
    }

    /// The input's wire encoding.
    pub fn serialize(&self) -> Vec<u8> {
        let mut writer = BtcWriter::with_capacity(41 + self.script_sig.len());
        self.write_to(&mut writer);
        writer.into_bytes()
    }
}
