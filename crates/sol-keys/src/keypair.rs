//! Ed25519 signing keys.
//!
//! The 64-byte keypair form is the 32-byte secret seed followed by the
//! 32-byte public key, the layout used by wallet files and keygen tools.

use std::fmt;

use ed25519_dalek::{Signer, SigningKey};
use rand_core::OsRng;
use zeroize::Zeroize;

use crate::error::KeyError;
use crate::pubkey::Pubkey;
use crate::signature::Signature;

/// Byte length of the seed-plus-pubkey keypair form.
pub const KEYPAIR_BYTES: usize = 64;

/// The signing half of an account.
#[derive(Clone)]
pub struct Keypair {
    signing: SigningKey,
}

impl Keypair {
    /// Generate a fresh random keypair from the operating system CSPRNG.
    pub fn generate() -> Self {
        Self {
            signing: SigningKey::generate(&mut OsRng),
        }
    }

    /// Build a keypair from a 32-byte secret seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let mut seed = *seed;
        let signing = SigningKey::from_bytes(&seed);
        seed.zeroize();
        Self { signing }
    }

    /// Parse the 64-byte seed-plus-pubkey form, checking that the public
    /// half actually belongs to the seed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != KEYPAIR_BYTES {
            return Err(KeyError::InvalidPrivateKey(format!(
                "expected {KEYPAIR_BYTES} bytes, got {}",
                bytes.len()
            )));
        }
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&bytes[..32]);
        let signing = SigningKey::from_bytes(&seed);
        seed.zeroize();
        if signing.verifying_key().to_bytes() != bytes[32..] {
            return Err(KeyError::InvalidPrivateKey(
                "public key does not match secret seed".into(),
            ));
        }
        Ok(Self { signing })
    }

    pub fn to_bytes(&self) -> [u8; KEYPAIR_BYTES] {
        self.signing.to_keypair_bytes()
    }

    pub fn pubkey(&self) -> Pubkey {
        Pubkey::new(self.signing.verifying_key().to_bytes())
    }

    /// Sign arbitrary message bytes. Ed25519 is deterministic: the same
    /// key and message always produce the same signature.
    pub fn sign_message(&self, message: &[u8]) -> Signature {
        Signature::new(self.signing.sign(message).to_bytes())
    }
}

// Keep the secret seed out of debug output.
impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({})", self.pubkey())
    }
}
