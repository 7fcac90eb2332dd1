//! Transaction output: an amount and the script that locks it.

use btc_primitives::util::{BtcReader, BtcWriter};
use btc_script::Script;

use crate::TransactionError;

/// A single transaction output.
///
/// # Wire format
///
/// | Field          | Size          |
/// |----------------|---------------|
/// | amount         | 8 bytes (LE)  |
/// | script length  | VarInt        |
/// | script_pub_key | variable      |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxOut {
    /// Value in satoshis.
    pub amount: u64,
    /// Locking script.
    pub script_pub_key: Script,
}

impl TxOut {
    /// Create an output.
    pub fn new(amount: u64, script_pub_key: Script) -> Self {
        TxOut {
            amount,
            script_pub_key,
        }
    }

    /// Read one output from `reader`.
    pub fn read_from(reader: &mut BtcReader) -> Result<Self, TransactionError> {
        let wire = |field: &str, e: btc_primitives::PrimitivesError| {
            TransactionError::SerializationError(format!("reading {}: {}", field, e))
        };

        let amount = reader.read_u64_le().map_err(|e| wire("amount", e))?;
        let script_len = reader.read_varint().map_err(|e| wire("script length", e))?;
        let script_len = usize::try_from(script_len.value()).map_err(|_| {
            TransactionError::SerializationError("script length overflows usize".to_string())
        })?;
        let script = reader
            .read_bytes(script_len)
            .map_err(|e| wire("script-pubkey", e))?;

        Ok(TxOut::new(amount, Script::from_bytes(script)))
    }

    /// Append this output's wire encoding to `writer`.
    pub fn write_to(&self, writer: &mut BtcWriter) {
        writer.write_u64_le(self.amount);
        writer.write_var_bytes(self.script_pub_key.to_bytes());
    }

    /// The output's wire encoding.
    pub fn serialize(&self) -> Vec<u8> {
        let mut writer = BtcWriter::with_capacity(9 + self.script_pub_key.len());
        self.write_to(&mut writer);
        writer.into_bytes()
    }
}
