//! Instruction inputs to the compiler.

use sol_keys::Pubkey;

/// How one instruction touches one account.
///
/// The same key may appear in several instructions (or twice in one)
/// with different flags; the compiler merges them by OR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    /// A writable account reference.
    pub fn new(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    /// A readonly account reference.
    pub fn new_readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

/// Error carried by [`Instruction::data`] when the accessor fails.
pub type InstructionDataError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A program invocation before compilation.
///
/// The compiler needs exactly three capabilities; concrete instruction
/// types (system transfers, token instructions, hand-rolled byte blobs)
/// live with their callers. `data` may fail for types that serialize
/// lazily.
pub trait Instruction {
    fn program_id(&self) -> Pubkey;
    fn accounts(&self) -> &[AccountMeta];
    fn data(&self) -> Result<Vec<u8>, InstructionDataError>;
}

/// An instruction that already holds its serialized data.
#[derive(Debug, Clone)]
pub struct GenericInstruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

impl Instruction for GenericInstruction {
    fn program_id(&self) -> Pubkey {
        self.program_id
    }

    fn accounts(&self) -> &[AccountMeta] {
        &self.accounts
    }

    fn data(&self) -> Result<Vec<u8>, InstructionDataError> {
        Ok(self.data.clone())
    }
}
