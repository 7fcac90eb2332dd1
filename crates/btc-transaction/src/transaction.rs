//! Legacy Bitcoin transaction.
//!
//! A version, ordered inputs and outputs, and a locktime, with the standard
//! (non-witness) wire encoding and txid computation.

use btc_primitives::chainhash::{double_hash_h, Hash};
use btc_primitives::util::{BtcReader, BtcWriter, VarInt};

use crate::input::TxIn;
use crate::output::TxOut;
use crate::TransactionError;

/// A transaction. Input and output order is significant.
///
/// # Wire format
///
/// | Field        | Size                 |
/// |--------------|----------------------|
/// | version      | 4 bytes (LE)         |
/// | input count  | VarInt               |
/// | inputs       | variable (per input) |
/// | output count | VarInt               |
/// | outputs      | variable             |
/// | locktime     | 4 bytes (LE)         |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Transaction format version.
    pub version: u32,
    /// Ordered inputs.
    pub inputs: Vec<TxIn>,
    /// Ordered outputs.
    pub outputs: Vec<TxOut>,
    /// Block height or timestamp before which the transaction is not final.
    pub locktime: u32,
}

impl Transaction {
    /// An empty version-1 transaction.
    pub fn new() -> Self {
        Transaction {
            version: 1,
            inputs: Vec::new(),
            outputs: Vec::new(),
            locktime: 0,
        }
    }

    // -----------------------------------------------------------------
    // Deserialization
    // -----------------------------------------------------------------

    /// Parse a transaction from a hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| TransactionError::SerializationError(format!("invalid hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Parse a transaction from raw bytes.
    ///
    /// # Arguments
    /// * `bytes` - Exactly one serialized transaction.
    ///
    /// # Returns
    /// `SerializationError` if the data is truncated or has trailing bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = BtcReader::new(bytes);
        let tx = Self::read_from(&mut reader)?;
        if reader.remaining() != 0 {
            return Err(TransactionError::SerializationError(format!(
                "trailing {} bytes after transaction",
                reader.remaining()
            )));
        }
        Ok(tx)
    }

    /// Read a transaction from `reader`, leaving any following bytes unread.
    pub fn read_from(reader: &mut BtcReader) -> Result<Self, TransactionError> {
        let wire = |field: &str, e: btc_primitives::PrimitivesError| {
            TransactionError::SerializationError(format!("reading {}: {}", field, e))
        };

        let version = reader.read_u32_le().map_err(|e| wire("version", e))?;

        let input_count = reader.read_varint().map_err(|e| wire("input count", e))?;
        // Every input is at least 41 bytes, so a count larger than what is
        // left cannot be honest.
        let mut inputs = Vec::with_capacity(bounded_capacity(input_count, reader.remaining() / 41));
        for _ in 0..input_count.value() {
            inputs.push(TxIn::read_from(reader)?);
        }

        let output_count = reader.read_varint().map_err(|e| wire("output count", e))?;
        let mut outputs = Vec::with_capacity(bounded_capacity(output_count, reader.remaining() / 9));
        for _ in 0..output_count.value() {
            outputs.push(TxOut::read_from(reader)?);
        }

        let locktime = reader.read_u32_le().map_err(|e| wire("locktime", e))?;

        Ok(Transaction {
            version,
            inputs,
            outputs,
            locktime,
        })
    }

    // -----------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------

    /// Append the wire encoding to `writer`.
    pub fn write_to(&self, writer: &mut BtcWriter) {
        writer.write_u32_le(self.version);

        writer.write_varint(VarInt::from(self.inputs.len()));
        for input in &self.inputs {
            input.write_to(writer);
        }

        writer.write_varint(VarInt::from(self.outputs.len()));
        for output in &self.outputs {
            output.write_to(writer);
        }

        writer.write_u32_le(self.locktime);
    }

    /// The wire encoding. Deterministic: equal transactions give equal bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let mut writer = BtcWriter::with_capacity(256);
        self.write_to(&mut writer);
        writer.into_bytes()
    }

    /// Alias of [`serialize`](Self::serialize).
    pub fn to_bytes(&self) -> Vec<u8> {
        self.serialize()
    }

    /// The wire encoding as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.serialize())
    }

    // -----------------------------------------------------------------
    // Identity and size
    // -----------------------------------------------------------------

    /// sha256d of the serialization.
    ///
    /// The returned [`Hash`] holds the digest in internal (wire) order, the
    /// form inputs reference on the wire. Its `Display` and
    /// [`Hash::to_display_bytes`] give the byte-reversed txid; use [`id`]
    /// for the hex string.
    ///
    /// [`id`]: Self::id
    pub fn hash(&self) -> Hash {
        double_hash_h(&self.serialize())
    }

    /// The txid as the 64-character hex string explorers show.
    pub fn id(&self) -> String {
        self.hash().to_string()
    }

    /// Serialized length in bytes.
    pub fn size(&self) -> usize {
        self.serialize().len()
    }

    /// Virtual size. Legacy transactions carry no witness, so this equals
    /// [`size`](Self::size).
    pub fn vsize(&self) -> usize {
        self.size()
    }

    // -----------------------------------------------------------------
    // Amounts
    // -----------------------------------------------------------------

    /// Σ output amounts, saturating at `u64::MAX`.
    pub fn total_output_amount(&self) -> u64 {
        self.outputs
            .iter()
            .fold(0u64, |acc, o| acc.saturating_add(o.amount))
    }

    /// Fee paid given the amounts of the outputs being spent: Σ inputs minus
    /// Σ outputs, floored at zero and clamped to `u64::MAX`.
    ///
    /// Both sums are taken in `u128`, so large inputs never overflow before
    /// the outputs are subtracted.
    pub fn fee(&self, input_amounts: &[u64]) -> u64 {
        let inputs: u128 = input_amounts.iter().map(|a| u128::from(*a)).sum();
        let outputs: u128 = self.outputs.iter().map(|o| u128::from(o.amount)).sum();
        u64::try_from(inputs.saturating_sub(outputs)).unwrap_or(u64::MAX)
    }
}

fn bounded_capacity(count: VarInt, limit: usize) -> usize {
    usize::try_from(count.value()).map_or(limit, |n| n.min(limit))
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
