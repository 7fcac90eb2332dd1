//! Builder configuration.

use btc_script::Network;
use serde::{Deserialize, Serialize};

use crate::input::DEFAULT_SEQUENCE_NUMBER;

/// Defaults applied by a [`TransactionBuilder`](crate::builder::TransactionBuilder).
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use btc_transaction::TxConfig;
///
/// let config: TxConfig = serde_json::from_str(r#"{"network": "testnet"}"#).unwrap();
/// assert_eq!(config.version, 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TxConfig {
    /// Transaction version.
    pub version: u32,
    /// Transaction locktime.
    pub locktime: u32,
    /// Sequence number given to every new input.
    pub sequence: u32,
    /// Network that output and change addresses must belong to.
    pub network: Network,
}

impl Default for TxConfig {
    fn default() -> Self {
        Self {
            version: 1,
            locktime: 0,
            sequence: DEFAULT_SEQUENCE_NUMBER,
            network: Network::Mainnet,
        }
    }
}
