/// Error types for transaction operations.
///
/// Every variant is a value or precondition error: none is transient, so a
/// caller either fixes its inputs or aborts. Variants that concern a single
/// input carry its index.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// A payee or change address could not be parsed.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The UTXOs do not cover the outputs plus the fee.
    #[error("insufficient funds: need {required} satoshis, have {available}")]
    InsufficientFunds {
        /// Σ outputs + fee.
        required: u64,
        /// Σ UTXO amounts.
        available: u64,
    },

    /// The builder has no inputs.
    #[error("transaction has no inputs")]
    NoInputs,

    /// The builder has no outputs.
    #[error("transaction has no outputs")]
    NoOutputs,

    /// Inputs and their paired UTXOs are not index-aligned.
    #[error("{inputs} inputs but {utxos} utxos")]
    UtxoInputMismatch {
        /// Number of inputs.
        inputs: usize,
        /// Number of UTXOs.
        utxos: usize,
    },

    /// One private key per input is required.
    #[error("{keys} private keys for {inputs} inputs")]
    KeyCountMismatch {
        /// Number of keys supplied.
        keys: usize,
        /// Number of inputs.
        inputs: usize,
    },

    /// The ECDSA primitive failed to sign a digest.
    #[error("signing error: {0}")]
    SigningError(String),

    /// A private key could not be parsed.
    #[error("key derivation error: {0}")]
    KeyDerivation(String),

    /// An input's script-sig is not a well-formed P2PKH script-sig.
    #[error("input {index}: malformed script-sig: {reason}")]
    MalformedScriptSig {
        /// The offending input.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// An input index past the end of the input list.
    #[error("input index {index} out of range (tx has {count} inputs)")]
    InputIndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of inputs.
        count: usize,
    },

    /// SIGHASH_SINGLE on an input with no output at the same index.
    #[error("SIGHASH_SINGLE input {index} has no matching output (tx has {outputs} outputs)")]
    SighashSingleIndexExceedsOutputs {
        /// The input being signed.
        index: usize,
        /// The number of outputs.
        outputs: usize,
    },

    /// Change is owed but no change address was set.
    #[error("change of {0} satoshis but no change address set")]
    MissingChangeAddress(u64),

    /// An input does not spend the outpoint of its paired UTXO.
    #[error("input {index} does not spend its paired utxo")]
    OutpointMismatch {
        /// The offending input.
        index: usize,
    },

    /// An input's signature does not verify.
    #[error("input {index} has an invalid signature")]
    InvalidSignature {
        /// The offending input.
        index: usize,
    },

    /// A sum of amounts does not fit in 64 bits.
    #[error("amount overflow")]
    AmountOverflow,

    /// Binary or hex (de)serialization failed.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// An underlying script error (forwarded from `btc-script`).
    #[error("script error: {0}")]
    Script(#[from] btc_script::ScriptError),

    /// An underlying primitives error (forwarded from `btc-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] btc_primitives::PrimitivesError),
}
