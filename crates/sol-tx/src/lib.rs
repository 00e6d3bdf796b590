//! Transaction assembly for the Solana binary wire format.
//!
//! The wire layout is a compact, position-addressed structure:
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message:
//!     num_required_sigs     u8
//!     num_readonly_signed   u8
//!     num_readonly_unsigned u8
//!     num_accounts          compact-u16
//!     account_keys          32 bytes * num_accounts
//!     recent_blockhash      32 bytes
//!     num_instructions      compact-u16
//!     instructions[]        (see below)
//!
//! Instruction:
//!   program_id_index        u8
//!   num_accounts            compact-u16
//!   account_indices         u8 * num_accounts
//!   data_len                compact-u16
//!   data                    u8 * data_len
//! ```
//!
//! The pipeline: a list of [`Instruction`]s plus a recent blockhash is
//! compiled into a canonically ordered [`Message`]; a [`Transaction`]
//! binds that message to one signature slot per required signer; Ed25519
//! signing fills slots in place; the codec maps both directions between
//! values and bytes. `signatures[i]` always belongs to
//! `message.account_keys[i]`, so account ordering is consensus-critical
//! and pinned by test vectors.

pub mod builder;
pub mod compile;
pub mod error;
pub mod instruction;
pub mod message;
pub mod transaction;
pub mod wire;

pub use builder::{TransactionBuilder, TransactionOption};
pub use compile::{compile_message, set_compile_debug, MAX_ACCOUNT_KEYS};
pub use error::{DecodeError, TransactionError};
pub use instruction::{AccountMeta, GenericInstruction, Instruction, InstructionDataError};
pub use message::{CompiledInstruction, Message, MessageHeader};
pub use transaction::Transaction;

// Re-export the primitives so callers need a single import.
pub use sol_keys::{Hash, Keypair, Pubkey, Signature};
