//! Script chunk parsing and push-data encoding.
//!
//! A chunk is either a bare opcode or a push opcode with the bytes it pushes.

use crate::opcodes::*;
use crate::ScriptError;

/// A single parsed element of a script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptChunk {
    /// The opcode byte. For direct pushes (1-75 bytes) this is the length.
    pub op: u8,
    /// The pushed bytes, when `op` is a push opcode.
    pub data: Option<Vec<u8>>,
}

/// Decode raw script bytes into chunks.
///
/// # Returns
/// The chunks in order, or `DataTooSmall` when a push runs past the end.
pub fn decode_script(bytes: &[u8]) -> Result<Vec<ScriptChunk>, ScriptError> {
    let mut chunks = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        chunks.push(read_chunk(bytes, &mut pos)?);
    }
    Ok(chunks)
}

/// Read the chunk starting at `*pos` and advance past it.
pub(crate) fn read_chunk(bytes: &[u8], pos: &mut usize) -> Result<ScriptChunk, ScriptError> {
    let op = bytes[*pos];
    let (header, length) = match op {
        OP_DATA_1..=OP_DATA_75 => (1, op as usize),
        OP_PUSHDATA1 => (2, read_le(bytes, *pos + 1, 1)?),
        OP_PUSHDATA2 => (3, read_le(bytes, *pos + 1, 2)?),
        OP_PUSHDATA4 => (5, read_le(bytes, *pos + 1, 4)?),
        _ => {
            *pos += 1;
            return Ok(ScriptChunk { op, data: None });
        }
    };

    let start = *pos + header;
    let end = start.checked_add(length).ok_or(ScriptError::DataTooSmall)?;
    if end > bytes.len() {
        return Err(ScriptError::DataTooSmall);
    }
    *pos = end;
    Ok(ScriptChunk {
        op,
        data: Some(bytes[start..end].to_vec()),
    })
}

/// Little-endian length field of `width` bytes at `at`.
fn read_le(bytes: &[u8], at: usize, width: usize) -> Result<usize, ScriptError> {
    let field = bytes.get(at..at + width).ok_or(ScriptError::DataTooSmall)?;
    Ok(field
        .iter()
        .rev()
        .fold(0usize, |acc, &b| (acc << 8) | b as usize))
}

/// Minimal push prefix for a payload of `data_len` bytes.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ScriptError> {
    let prefix = match data_len {
        0..=0x4b => vec![data_len as u8],
        0x4c..=0xff => vec![OP_PUSHDATA1, data_len as u8],
        0x100..=0xffff => {
            let mut buf = vec![OP_PUSHDATA2];
            buf.extend_from_slice(&(data_len as u16).to_le_bytes());
            buf
        }
        _ => {
            let len = u32::try_from(data_len).map_err(|_| ScriptError::DataTooBig)?;
            let mut buf = vec![OP_PUSHDATA4];
            buf.extend_from_slice(&len.to_le_bytes());
            buf
        }
    };
    Ok(prefix)
}
