//! Opcode constants for the script forms this crate builds and reads.
//!
//! Only the push opcodes and the P2PKH template opcodes carry names; every
//! other byte is rendered by value in error messages.

/// Push an empty byte vector.
pub const OP_0: u8 = 0x00;
/// Alias of `OP_0`.
pub const OP_FALSE: u8 = 0x00;
/// Direct push of one byte.
pub const OP_DATA_1: u8 = 0x01;
/// Direct push of twenty bytes (a Hash160).
pub const OP_DATA_20: u8 = 0x14;
/// Direct push of thirty-three bytes (a compressed public key).
pub const OP_DATA_33: u8 = 0x21;
/// Largest direct push length.
pub const OP_DATA_75: u8 = 0x4b;
/// Next byte is the push length.
pub const OP_PUSHDATA1: u8 = 0x4c;
/// Next two bytes (LE) are the push length.
pub const OP_PUSHDATA2: u8 = 0x4d;
/// Next four bytes (LE) are the push length.
pub const OP_PUSHDATA4: u8 = 0x4e;
/// Push the number -1.
pub const OP_1NEGATE: u8 = 0x4f;
/// Push the number 1.
pub const OP_1: u8 = 0x51;
/// Alias of `OP_1`.
pub const OP_TRUE: u8 = 0x51;
/// Push the number 16.
pub const OP_16: u8 = 0x60;
/// Mark the output as unspendable.
pub const OP_RETURN: u8 = 0x6a;
/// Duplicate the top stack item.
pub const OP_DUP: u8 = 0x76;
/// Compare the top two items for equality.
pub const OP_EQUAL: u8 = 0x87;
/// `OP_EQUAL` followed by `OP_VERIFY`.
pub const OP_EQUALVERIFY: u8 = 0x88;
/// RIPEMD160(SHA256(x)) of the top item.
pub const OP_HASH160: u8 = 0xa9;
/// Check a signature against the transaction digest.
pub const OP_CHECKSIG: u8 = 0xac;
/// Check several signatures against several keys.
pub const OP_CHECKMULTISIG: u8 = 0xae;

/// Canonical name of a non-push opcode.
///
/// Unnamed opcodes render as `OP_UNKNOWN<byte>`.
pub fn opcode_to_string(op: u8) -> String {
    let name = match op {
        OP_0 => "OP_0",
        OP_PUSHDATA1 => "OP_PUSHDATA1",
        OP_PUSHDATA2 => "OP_PUSHDATA2",
        OP_PUSHDATA4 => "OP_PUSHDATA4",
        OP_1NEGATE => "OP_1NEGATE",
        OP_1..=OP_16 => return format!("OP_{}", op - OP_1 + 1),
        OP_RETURN => "OP_RETURN",
        OP_DUP => "OP_DUP",
        OP_EQUAL => "OP_EQUAL",
        OP_EQUALVERIFY => "OP_EQUALVERIFY",
        OP_HASH160 => "OP_HASH160",
        OP_CHECKSIG => "OP_CHECKSIG",
        OP_CHECKMULTISIG => "OP_CHECKMULTISIG",
        _ => return format!("OP_UNKNOWN{}", op),
    };
    name.to_string()
}
