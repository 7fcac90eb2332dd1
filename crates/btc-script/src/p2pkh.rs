//! P2PKH unlocking scripts.
//!
//! A P2PKH script-sig is exactly two pushes: the DER signature with its
//! sighash byte appended, then the SEC1 public key.

use btc_primitives::ec::{PublicKey, Signature};

use crate::{Script, ScriptError};

/// The parts recovered from a P2PKH script-sig.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct P2pkhScriptSig {
    /// The ECDSA signature.
    pub signature: Signature,
    /// The sighash type byte that followed the DER bytes.
    pub sighash_type: u8,
    /// The public key, parsed.
    pub public_key: PublicKey,
    /// The public key bytes exactly as pushed, so Hash160 matches the
    /// locking script even for uncompressed keys.
    pub public_key_bytes: Vec<u8>,
}

/// Build `push(sig_with_type) || push(compressed public key)`.
pub fn create_script_sig(sig_with_type: &[u8], public_key: &PublicKey) -> Result<Script, ScriptError> {
    let mut script = Script::new();
    script.append_push_data(sig_with_type)?;
    script.append_push_data(&public_key.to_compressed())?;
    Ok(script)
}

/// Split a P2PKH script-sig into signature, sighash type and public key.
///
/// # Returns
/// `MalformedScriptSig` unless the script is exactly two data pushes, the
/// first a strict DER signature plus one sighash byte and the second a valid
/// SEC1 public key.
pub fn parse_script_sig(script: &Script) -> Result<P2pkhScriptSig, ScriptError> {
    let chunks = script
        .chunks()
        .map_err(|e| ScriptError::MalformedScriptSig(e.to_string()))?;

    let (sig_push, key_push) = match chunks.as_slice() {
        [sig, key] => match (&sig.data, &key.data) {
            (Some(sig), Some(key)) => (sig, key),
            _ => {
                return Err(ScriptError::MalformedScriptSig(
                    "expected two data pushes".to_string(),
                ))
            }
        },
        other => {
            return Err(ScriptError::MalformedScriptSig(format!(
                "expected 2 chunks, found {}",
                other.len()
            )))
        }
    };

    let (signature, sighash_type) = Signature::from_der_with_sighash(sig_push)
        .map_err(|e| ScriptError::MalformedScriptSig(e.to_string()))?;
    let public_key = PublicKey::from_bytes(key_push)
        .map_err(|e| ScriptError::MalformedScriptSig(e.to_string()))?;

    Ok(P2pkhScriptSig {
        signature,
        sighash_type,
        public_key,
        public_key_bytes: key_push.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use btc_primitives::ec::PrivateKey;
    use btc_primitives::hash::sha256d;

    fn signed_push(key: &PrivateKey, sighash: u8) -> Vec<u8> {
        let mut sig = key.sign(&sha256d(b"preimage")).unwrap().to_der();
        sig.push(sighash);
        sig
    }

    #[test]
    fn test_create_then_parse() {
        let key = PrivateKey::new();
        let push = signed_push(&key, 0x41);
        let script = create_script_sig(&push, &key.pub_key()).unwrap();
        assert!(script.len() <= 1 + 73 + 1 + 33);
        assert_eq!(script.to_bytes()[0] as usize, push.len());

        let parsed = parse_script_sig(&script).unwrap();
        assert_eq!(parsed.sighash_type, 0x41);
        assert_eq!(parsed.public_key, key.pub_key());
        assert_eq!(parsed.public_key_bytes, key.pub_key().to_compressed().to_vec());
        assert!(parsed
            .public_key
            .verify(&sha256d(b"preimage"), &parsed.signature));
    }

    #[test]
    fn test_parse_keeps_uncompressed_key_bytes() {
        let key = PrivateKey::new();
        let mut script = Script::new();
        script.append_push_data(&signed_push(&key, 0x01)).unwrap();
        script.append_push_data(&key.pub_key().to_uncompressed()).unwrap();
        let parsed = parse_script_sig(&script).unwrap();
        assert_eq!(parsed.public_key_bytes.len(), 65);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let key = PrivateKey::new();
        let push = signed_push(&key, 0x01);

        assert!(matches!(
            parse_script_sig(&Script::new()),
            Err(ScriptError::MalformedScriptSig(_))
        ));

        let mut one_push = Script::new();
        one_push.append_push_data(&push).unwrap();
        assert!(parse_script_sig(&one_push).is_err());

        let mut bad_key = Script::new();
        bad_key.append_push_data(&push).unwrap();
        bad_key.append_push_data(&[0x05; 33]).unwrap();
        assert!(parse_script_sig(&bad_key).is_err());

        let mut bad_sig = Script::new();
        bad_sig.append_push_data(&[0x30, 0x01, 0x01]).unwrap();
        bad_sig.append_push_data(&key.pub_key().to_compressed()).unwrap();
        assert!(parse_script_sig(&bad_sig).is_err());

        let mut with_opcode = Script::new();
        with_opcode.append_push_data(&push).unwrap();
        with_opcode.append_opcodes(&[crate::opcodes::OP_DUP]).unwrap();
        assert!(parse_script_sig(&with_opcode).is_err());

        assert!(parse_script_sig(&Script::from_bytes(&[0x47, 0x30])).is_err());
    }
}
