//! ECDSA signatures with strict DER encoding.
//!
//! Signatures are produced with RFC6979 nonces and normalized to low-S. The
//! DER parser follows the strict encoding rules Bitcoin enforces for
//! script-sig signatures: minimal integer lengths, no negative integers and
//! no trailing data inside the sequence.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa;

use crate::ec::private_key::PrivateKey;
use crate::ec::public_key::PublicKey;
use crate::PrimitivesError;

/// The secp256k1 group order N.
const CURVE_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFE, 0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36,
    0x41, 0x41,
];

/// Smallest DER signature: `30 06 02 01 r 02 01 s`.
const MIN_DER_LEN: usize = 8;

/// Largest DER signature: two 33-byte integers plus headers.
const MAX_DER_LEN: usize = 72;

/// An ECDSA signature as its big-endian `(r, s)` scalars.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    r: [u8; 32],
    s: [u8; 32],
}

impl Signature {
    /// Build a signature from raw scalars without range checks.
    pub fn new(r: [u8; 32], s: [u8; 32]) -> Self {
        Signature { r, s }
    }

    /// The `r` scalar.
    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    /// The `s` scalar.
    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// Sign a 32-byte digest with `priv_key`.
    ///
    /// # Returns
    /// A low-S signature, or `InvalidSignature` if the digest is not 32
    /// bytes or the signer rejects it.
    pub fn sign(digest: &[u8], priv_key: &PrivateKey) -> Result<Self, PrimitivesError> {
        if digest.len() != 32 {
            return Err(PrimitivesError::InvalidSignature(format!(
                "digest must be 32 bytes, got {}",
                digest.len()
            )));
        }
        let sig: ecdsa::Signature = priv_key
            .signing_key()
            .sign_prehash(digest)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;
        let sig = sig.normalize_s().unwrap_or(sig);

        let (r_bytes, s_bytes) = sig.split_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&r_bytes);
        s.copy_from_slice(&s_bytes);
        Ok(Signature { r, s })
    }

    /// Verify this signature over a 32-byte digest.
    ///
    /// High-S signatures are accepted here; only the scalar range is checked.
    pub fn verify(&self, digest: &[u8], pub_key: &PublicKey) -> bool {
        if digest.len() != 32 {
            return false;
        }
        let sig = match ecdsa::Signature::from_scalars(
            k256::FieldBytes::from(self.r),
            k256::FieldBytes::from(self.s),
        ) {
            Ok(sig) => sig,
            Err(_) => return false,
        };
        let sig = sig.normalize_s().unwrap_or(sig);
        pub_key.verifying_key().verify_prehash(digest, &sig).is_ok()
    }

    /// Parse a strict DER signature.
    ///
    /// Layout: `0x30 len 0x02 rlen r 0x02 slen s`, with the sequence length
    /// covering exactly the remaining bytes.
    pub fn from_der(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let malformed = |why: &str| PrimitivesError::InvalidSignature(format!("malformed DER: {}", why));

        if bytes.len() < MIN_DER_LEN || bytes.len() > MAX_DER_LEN {
            return Err(malformed("bad total length"));
        }
        if bytes[0] != 0x30 {
            return Err(malformed("missing sequence tag"));
        }
        if bytes[1] as usize != bytes.len() - 2 {
            return Err(malformed("sequence length does not cover the data"));
        }

        let (r, rest) = read_der_integer(&bytes[2..]).map_err(|why| malformed(&format!("r {}", why)))?;
        let (s, rest) = read_der_integer(rest).map_err(|why| malformed(&format!("s {}", why)))?;
        if !rest.is_empty() {
            return Err(malformed("trailing bytes"));
        }

        for (name, v) in [("r", &r), ("s", &s)] {
            if v.iter().all(|&b| b == 0) {
                return Err(PrimitivesError::InvalidSignature(format!("{} is zero", name)));
            }
            if v.as_slice() >= CURVE_ORDER.as_slice() {
                return Err(PrimitivesError::InvalidSignature(format!(
                    "{} is not below the curve order",
                    name
                )));
            }
        }

        Ok(Signature { r, s })
    }

    /// Parse a script-sig signature push: DER bytes followed by one
    /// sighash-type byte.
    ///
    /// # Returns
    /// The signature and the trailing sighash byte.
    pub fn from_der_with_sighash(bytes: &[u8]) -> Result<(Self, u8), PrimitivesError> {
        match bytes.split_last() {
            Some((&sighash, der)) => Ok((Self::from_der(der)?, sighash)),
            None => Err(PrimitivesError::InvalidSignature(
                "empty signature push".to_string(),
            )),
        }
    }

    /// Serialize in minimal DER form.
    pub fn to_der(&self) -> Vec<u8> {
        let r = der_integer_body(&self.r);
        let s = der_integer_body(&self.s);

        let mut out = Vec::with_capacity(6 + r.len() + s.len());
        out.push(0x30);
        out.push((4 + r.len() + s.len()) as u8);
        out.push(0x02);
        out.push(r.len() as u8);
        out.extend_from_slice(&r);
        out.push(0x02);
        out.push(s.len() as u8);
        out.extend_from_slice(&s);
        out
    }
}

/// Read one DER INTEGER from the front of `data`, returning it left-padded
/// to 32 bytes together with the unread tail.
fn read_der_integer(data: &[u8]) -> Result<([u8; 32], &[u8]), &'static str> {
    let (tag, len, rest) = match data {
        [tag, len, rest @ ..] => (*tag, *len as usize, rest),
        _ => return Err("truncated header"),
    };
    if tag != 0x02 {
        return Err("missing integer tag");
    }
    if len == 0 || len > rest.len() {
        return Err("bad length");
    }
    let (body, tail) = rest.split_at(len);
    if body[0] & 0x80 != 0 {
        return Err("is negative");
    }
    if body.len() > 1 && body[0] == 0 && body[1] & 0x80 == 0 {
        return Err("has excess padding");
    }

    let trimmed = if body[0] == 0 { &body[1..] } else { body };
    if trimmed.len() > 32 {
        return Err("is wider than 32 bytes");
    }
    let mut out = [0u8; 32];
    out[32 - trimmed.len()..].copy_from_slice(trimmed);
    Ok((out, tail))
}

/// Minimal big-endian body of a DER INTEGER, with a zero pad byte when the
/// high bit would otherwise mark it negative.
fn der_integer_body(val: &[u8; 32]) -> Vec<u8> {
    let start = val.iter().position(|&b| b != 0).unwrap_or(31);
    let trimmed = &val[start..];
    let mut out = Vec::with_capacity(trimmed.len() + 1);
    if trimmed[0] & 0x80 != 0 {
        out.push(0x00);
    }
    out.extend_from_slice(trimmed);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::sha256;

    const VALID_DER: &str = "304402204e45e16932b8af514961a1d3a1a25fdf3f4f7732e9d624c6c61548ab5fb8cd41\
                             0220181522ec8eca07de4860a4acdd12909d831cc56cbbac4622082221a8768d1d09";

    fn hex_to_32(s: &str) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&hex::decode(s).unwrap());
        out
    }

    #[test]
    fn test_der_roundtrip_known_signature() {
        let der = hex::decode(VALID_DER).unwrap();
        let sig = Signature::from_der(&der).unwrap();
        assert_eq!(
            sig.r(),
            &hex_to_32("4e45e16932b8af514961a1d3a1a25fdf3f4f7732e9d624c6c61548ab5fb8cd41")
        );
        assert_eq!(sig.to_der(), der);
    }

    #[test]
    fn test_der_pads_high_bit_integers() {
        let sig = Signature::new(
            hex_to_32("a196ed0e7ebcbe7b63fe1d8eecbdbde03a67ceba4fc8f6482bdcb9606a911404"),
            hex_to_32("0000000000000000000000000000000000000000000000000000000000000001"),
        );
        let der = sig.to_der();
        assert_eq!(der[1] as usize, der.len() - 2);
        assert_eq!(&der[2..5], &[0x02, 0x21, 0x00]);
        assert_eq!(&der[der.len() - 3..], &[0x02, 0x01, 0x01]);
        assert_eq!(Signature::from_der(&der).unwrap(), sig);
    }

    #[test]
    fn test_der_rejects_malformed() {
        let der = hex::decode(VALID_DER).unwrap();

        assert!(Signature::from_der(&[]).is_err());

        let mut bad = der.clone();
        bad[0] = 0x31;
        assert!(Signature::from_der(&bad).is_err(), "sequence tag");

        let mut bad = der.clone();
        bad[2] = 0x03;
        assert!(Signature::from_der(&bad).is_err(), "integer tag");

        let mut bad = der.clone();
        bad[1] += 1;
        assert!(Signature::from_der(&bad).is_err(), "sequence length");

        let mut bad = der.clone();
        bad.push(0x00);
        assert!(Signature::from_der(&bad).is_err(), "trailing byte");

        let mut bad = der.clone();
        bad[4] = 0x80;
        assert!(Signature::from_der(&bad).is_err(), "negative r");

        // r = 0
        let zero_r = hex::decode("3006020100020101").unwrap();
        assert!(Signature::from_der(&zero_r).is_err());
    }

    #[test]
    fn test_from_der_with_sighash() {
        let mut push = hex::decode(VALID_DER).unwrap();
        push.push(0x81);
        let (sig, sighash) = Signature::from_der_with_sighash(&push).unwrap();
        assert_eq!(sighash, 0x81);
        assert_eq!(sig.to_der(), hex::decode(VALID_DER).unwrap());
        assert!(Signature::from_der_with_sighash(&[]).is_err());
    }

    /// RFC6979 vectors from the Trezor/CoreBitcoin suites.
    #[test]
    fn test_rfc6979() {
        let tests = [
            (
                "cca9fbcc1b41e5a95d369eaa6ddcff73b61a4efaa279cfc6567e8daa39cbaf50",
                "sample",
                "3045022100af340daf02cc15c8d5d08d7735dfe6b98a474ed373bdb5fbecf7571be52b384202205009fb27f37034a9b24b707b7c6b79ca23ddef9e25f7282e8a797efe53a8f124",
            ),
            (
                "0000000000000000000000000000000000000000000000000000000000000001",
                "Satoshi Nakamoto",
                "3045022100934b1ea10a4b3c1757e2b0c017d0b6143ce3c9a7e6a4a49860d7a6ab210ee3d802202442ce9d2b916064108014783e923ec36b49743e2ffa1c4496f01a512aafd9e5",
            ),
            (
                "f8b8af8ce3c7cca5e300d33939540c10d45ce001b8f252bfbc57ba0342904181",
                "Alan Turing",
                "304402207063ae83e7f62bbb171798131b4a0564b956930092b33b07b395615d9ec7e15c022058dfcc1e00a35e1572f366ffe34ba0fc47db1e7189759b9fb233c5b05ab388ea",
            ),
        ];

        for (key_hex, msg, expected) in tests {
            let key = PrivateKey::from_hex(key_hex).unwrap();
            let digest = sha256(msg.as_bytes());
            let sig = key.sign(&digest).unwrap();
            assert_eq!(hex::encode(sig.to_der()), expected, "message {:?}", msg);
            assert!(key.pub_key().verify(&digest, &sig));
        }
    }

    #[test]
    fn test_verify_rejects_other_digest_and_key() {
        let key = PrivateKey::new();
        let digest = sha256(b"one");
        let sig = key.sign(&digest).unwrap();
        assert!(!key.pub_key().verify(&sha256(b"two"), &sig));
        assert!(!PrivateKey::new().pub_key().verify(&digest, &sig));
        assert!(!key.pub_key().verify(&digest[..31], &sig));
    }

    #[test]
    fn test_sign_requires_32_byte_digest() {
        let key = PrivateKey::new();
        assert!(key.sign(b"short").is_err());
    }
}
