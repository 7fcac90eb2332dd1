/// P2PKH address handling.
///
/// Parses and produces Base58Check P2PKH addresses for mainnet and testnet,
/// and resolves an address to the locking script that pays it.

use std::fmt;
use std::str::FromStr;

use btc_primitives::base58;
use btc_primitives::ec::PublicKey;
use btc_primitives::PrimitivesError;
use serde::{Deserialize, Serialize};

use crate::opcodes::*;
use crate::{Script, ScriptError};

/// Mainnet P2PKH address version byte.
const MAINNET_P2PKH: u8 = 0x00;
/// Testnet P2PKH address version byte.
const TESTNET_P2PKH: u8 = 0x6f;

/// Network an address or key belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Mainnet; addresses start with `1`.
    #[default]
    Mainnet,
    /// Testnet; addresses start with `m` or `n`.
    Testnet,
}

impl Network {
    /// Select a network from a testnet flag.
    pub fn from_testnet(testnet: bool) -> Self {
        if testnet {
            Network::Testnet
        } else {
            Network::Mainnet
        }
    }

    /// P2PKH address version byte.
    pub fn p2pkh_prefix(self) -> u8 {
        match self {
            Network::Mainnet => MAINNET_P2PKH,
            Network::Testnet => TESTNET_P2PKH,
        }
    }

    /// WIF private key version byte.
    pub fn wif_prefix(self) -> u8 {
        match self {
            Network::Mainnet => btc_primitives::ec::private_key::WIF_MAINNET_PREFIX,
            Network::Testnet => btc_primitives::ec::private_key::WIF_TESTNET_PREFIX,
        }
    }
}

/// A P2PKH address: a public key hash on a given network.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address {
    /// RIPEMD160(SHA256(public key)).
    pub public_key_hash: [u8; 20],
    /// The network the address belongs to.
    pub network: Network,
}

impl Address {
    /// Parse a Base58Check address string.
    ///
    /// # Returns
    /// `InvalidAddress` for bad characters, checksum or length, or
    /// `UnsupportedAddress` for a version byte other than the P2PKH prefixes.
    pub fn from_string(addr: &str) -> Result<Self, ScriptError> {
        let payload = base58::check_decode(addr).map_err(|e| match e {
            PrimitivesError::ChecksumMismatch => {
                ScriptError::InvalidAddress(format!("checksum mismatch for '{}'", addr))
            }
            _ => ScriptError::InvalidAddress(format!("bad encoding for '{}'", addr)),
        })?;

        if payload.len() != 21 {
            return Err(ScriptError::InvalidAddress(format!(
                "invalid length {} for '{}'",
                payload.len(),
                addr
            )));
        }

        let network = match payload[0] {
            MAINNET_P2PKH => Network::Mainnet,
            TESTNET_P2PKH => Network::Testnet,
            other => return Err(ScriptError::UnsupportedAddress(other)),
        };

        let mut public_key_hash = [0u8; 20];
        public_key_hash.copy_from_slice(&payload[1..]);
        Ok(Address {
            public_key_hash,
            network,
        })
    }

    /// Address for a public key hash.
    pub fn from_public_key_hash(hash: &[u8; 20], network: Network) -> Self {
        Address {
            public_key_hash: *hash,
            network,
        }
    }

    /// P2PKH address of a public key (compressed encoding).
    pub fn from_public_key(pub_key: &PublicKey, network: Network) -> Self {
        Self::from_public_key_hash(&pub_key.hash160(), network)
    }

    /// Recover the address paid by a P2PKH locking script.
    pub fn from_script(script: &Script, network: Network) -> Result<Self, ScriptError> {
        Ok(Self::from_public_key_hash(&script.public_key_hash()?, network))
    }

    /// `OP_DUP OP_HASH160 <pkh> OP_EQUALVERIFY OP_CHECKSIG`.
    pub fn script_pub_key(&self) -> Script {
        let mut bytes = Vec::with_capacity(25);
        bytes.extend_from_slice(&[OP_DUP, OP_HASH160, OP_DATA_20]);
        bytes.extend_from_slice(&self.public_key_hash);
        bytes.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
        Script::from(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut payload = Vec::with_capacity(21);
        payload.push(self.network.p2pkh_prefix());
        payload.extend_from_slice(&self.public_key_hash);
        write!(f, "{}", base58::check_encode(&payload))
    }
}

impl FromStr for Address {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::from_string(s)
    }
}
