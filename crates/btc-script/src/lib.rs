/// Bitcoin script handling for P2PKH transactions.
///
/// Provides the `Script` type, opcode constants, push-data chunking,
/// P2PKH addresses and P2PKH script-sig construction and parsing.

pub mod script;
pub mod opcodes;
pub mod chunk;
pub mod address;
pub mod p2pkh;

mod error;
pub use error::ScriptError;
pub use script::Script;
pub use address::{Address, Network};
pub use chunk::ScriptChunk;
pub use p2pkh::P2pkhScriptSig;
