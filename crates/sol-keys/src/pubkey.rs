//! 32-byte Ed25519 public keys.
//!
//! The Base58 encoding of the raw bytes is the canonical string form;
//! well-known program addresses like `11111111111111111111111111111111`
//! (the system program, 32 zero bytes) are just public keys.

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::{Verifier, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::KeyError;
use crate::signature::Signature;

/// Byte length of a public key.
pub const PUBKEY_BYTES: usize = 32;

/// A 32-byte Ed25519 public key. Equality is bytewise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pubkey([u8; PUBKEY_BYTES]);

impl Pubkey {
    pub const fn new(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }

    pub const fn to_bytes(self) -> [u8; PUBKEY_BYTES] {
        self.0
    }

    pub const fn as_bytes(&self) -> &[u8; PUBKEY_BYTES] {
        &self.0
    }

    /// Decode a Base58 address string.
    pub fn from_base58(encoded: &str) -> Result<Self, KeyError> {
        let bytes = bs58::decode(encoded)
            .into_vec()
            .map_err(|e| KeyError::InvalidPublicKey(format!("base58 decode failed: {e}")))?;
        let arr: [u8; PUBKEY_BYTES] = bytes.try_into().map_err(|v: Vec<u8>| {
            KeyError::InvalidPublicKey(format!("expected {PUBKEY_BYTES} bytes, got {}", v.len()))
        })?;
        Ok(Self(arr))
    }

    /// Verify `signature` over `message` with this key.
    ///
    /// Returns `false` for anything that does not verify, including keys
    /// that are not valid curve points and the all-zero placeholder
    /// signature. Never panics.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        let Ok(key) = VerifyingKey::from_bytes(&self.0) else {
            return false;
        };
        let sig = ed25519_dalek::Signature::from_bytes(signature.as_bytes());
        key.verify(message, &sig).is_ok()
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(&self.0).into_string())
    }
}

impl FromStr for Pubkey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

impl From<[u8; PUBKEY_BYTES]> for Pubkey {
    fn from(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Pubkey {
    type Error = KeyError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; PUBKEY_BYTES] = bytes.try_into().map_err(|_| {
            KeyError::InvalidPublicKey(format!("expected {PUBKEY_BYTES} bytes, got {}", bytes.len()))
        })?;
        Ok(Self(arr))
    }
}

impl AsRef<[u8]> for Pubkey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// On the JSON side a pubkey is its Base58 address string.
impl Serialize for Pubkey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Pubkey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_base58(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypair::Keypair;

    #[test]
    fn system_program_is_zero_bytes() {
        let key = Pubkey::from_base58("11111111111111111111111111111111").unwrap();
        assert_eq!(key, Pubkey::default());
    }

    #[test]
    fn base58_roundtrip() {
        let address = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
        let key = Pubkey::from_base58(address).unwrap();
        assert_eq!(key.to_string(), address);
    }

    #[test]
    fn from_str_matches_from_base58() {
        let address = "SysvarC1ock11111111111111111111111111111111";
        let a: Pubkey = address.parse().unwrap();
        let b = Pubkey::from_base58(address).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_garbage() {
        assert!(Pubkey::from_base58("not-a-valid-address!!!").is_err());
    }

    #[test]
    fn rejects_wrong_length() {
        // "1" decodes to a single zero byte.
        assert!(Pubkey::from_base58("1").is_err());
    }

    #[test]
    fn try_from_slice() {
        let bytes = [7u8; 32];
        let key = Pubkey::try_from(&bytes[..]).unwrap();
        assert_eq!(key.to_bytes(), bytes);
        assert!(Pubkey::try_from(&bytes[..31]).is_err());
    }

    #[test]
    fn verify_accepts_real_signature() {
        let keypair = Keypair::from_seed(&[0x42; 32]);
        let message = b"canonical bytes";
        let signature = keypair.sign_message(message);
        assert!(keypair.pubkey().verify(message, &signature));
    }

    #[test]
    fn verify_rejects_placeholder_signature() {
        let keypair = Keypair::from_seed(&[0x42; 32]);
        assert!(!keypair.pubkey().verify(b"anything", &Signature::default()));
    }

    #[test]
    fn verify_rejects_tampered_message() {
        let keypair = Keypair::from_seed(&[0x42; 32]);
        let signature = keypair.sign_message(b"original");
        assert!(!keypair.pubkey().verify(b"tampered", &signature));
    }

    #[test]
    fn verify_handles_off_curve_key() {
        // All 0xff is not a valid curve point; verify must return false,
        // not panic or error.
        let key = Pubkey::new([0xff; 32]);
        let keypair = Keypair::from_seed(&[1; 32]);
        let signature = keypair.sign_message(b"msg");
        assert!(!key.verify(b"msg", &signature));
    }

    #[test]
    fn serde_as_base58_string() {
        let address = "SysvarRent111111111111111111111111111111111";
        let key = Pubkey::from_base58(address).unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{address}\""));
        let back: Pubkey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
