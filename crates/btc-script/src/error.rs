/// Error types for script operations.
///
/// Covers push-data decoding, address parsing and P2PKH script-sig
/// structure problems.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// Invalid hex string.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// A push opcode was passed to `append_opcodes`.
    #[error("use append_push_data for push data opcodes: {0}")]
    InvalidOpcodeType(String),

    /// Invalid address string.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Address version byte is neither the mainnet nor the testnet P2PKH prefix.
    #[error("unsupported address version 0x{0:02x}")]
    UnsupportedAddress(u8),

    /// Script is empty when a non-empty script was expected.
    #[error("script is empty")]
    EmptyScript,

    /// Script is not a P2PKH locking script.
    #[error("not a P2PKH")]
    NotP2PKH,

    /// A push announces more bytes than the script contains.
    #[error("not enough data")]
    DataTooSmall,

    /// Push data exceeds the maximum encodable size.
    #[error("data too big")]
    DataTooBig,

    /// A script-sig is not `<signature+sighash> <public key>`.
    #[error("malformed P2PKH script-sig: {0}")]
    MalformedScriptSig(String),

    /// Error from the primitives crate.
    #[error("primitives error: {0}")]
    Primitives(#[from] btc_primitives::PrimitivesError),
}
