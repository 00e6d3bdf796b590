//! Ed25519 primitives for the Solana wire format.
//!
//! Addresses, signatures, and blockhashes are all raw byte values with a
//! Base58 string form. There is no hashing step anywhere: unlike Bitcoin
//! or Ethereum, a Solana address IS the 32-byte public key. This crate
//! owns every `ed25519-dalek` and `bs58` call so that the transaction
//! layer above it can treat signing and verification as a black box.

pub mod error;
pub mod hash;
pub mod keypair;
pub mod pubkey;
pub mod signature;

pub use error::KeyError;
pub use hash::{Hash, HASH_BYTES};
pub use keypair::{Keypair, KEYPAIR_BYTES};
pub use pubkey::{Pubkey, PUBKEY_BYTES};
pub use signature::{Signature, SIGNATURE_BYTES};
