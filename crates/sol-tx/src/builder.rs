//! Fluent construction of unsigned transactions.

use sol_keys::{Hash, Pubkey};

use crate::error::TransactionError;
use crate::instruction::Instruction;
use crate::transaction::Transaction;

/// Options applied with [`TransactionBuilder::with_opt`].
#[derive(Debug, Clone)]
pub enum TransactionOption {
    /// Use this account as the fee payer instead of the first signer.
    FeePayer(Pubkey),
}

/// Accumulates instructions and produces a compiled, unsigned
/// [`Transaction`].
#[derive(Default)]
pub struct TransactionBuilder {
    instructions: Vec<Box<dyn Instruction>>,
    fee_payer: Option<Pubkey>,
    recent_blockhash: Option<Hash>,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_instruction(mut self, instruction: impl Instruction + 'static) -> Self {
        self.instructions.push(Box::new(instruction));
        self
    }

    pub fn set_fee_payer(mut self, fee_payer: Pubkey) -> Self {
        self.fee_payer = Some(fee_payer);
        self
    }

    pub fn set_recent_blockhash(mut self, recent_blockhash: Hash) -> Self {
        self.recent_blockhash = Some(recent_blockhash);
        self
    }

    pub fn with_opt(self, option: TransactionOption) -> Self {
        match option {
            TransactionOption::FeePayer(fee_payer) => self.set_fee_payer(fee_payer),
        }
    }

    /// Compile everything accumulated so far. Fails with
    /// [`TransactionError::NoBlockhash`] if no blockhash was set.
    pub fn build(self) -> Result<Transaction, TransactionError> {
        let recent_blockhash = self.recent_blockhash.ok_or(TransactionError::NoBlockhash)?;
        let instructions: Vec<&dyn Instruction> =
            self.instructions.iter().map(|ix| &**ix).collect();
        Transaction::new_with_payer(&instructions, recent_blockhash, self.fee_payer.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::{AccountMeta, GenericInstruction};
    use sol_keys::Signature;

    fn sample_instruction(tag: u8) -> GenericInstruction {
        GenericInstruction {
            program_id: Pubkey::new([0xf0; 32]),
            accounts: vec![AccountMeta::new(Pubkey::new([tag; 32]), true)],
            data: vec![tag],
        }
    }

    #[test]
    fn build_requires_blockhash() {
        let err = TransactionBuilder::new()
            .add_instruction(sample_instruction(1))
            .build()
            .unwrap_err();
        assert!(matches!(err, TransactionError::NoBlockhash));
    }

    #[test]
    fn build_produces_unsigned_transaction() {
        let tx = TransactionBuilder::new()
            .add_instruction(sample_instruction(1))
            .set_recent_blockhash(Hash::new([0x11; 32]))
            .build()
            .unwrap();
        assert_eq!(tx.signatures, vec![Signature::default()]);
        assert_eq!(tx.message.recent_blockhash, Hash::new([0x11; 32]));
    }

    #[test]
    fn instructions_keep_insertion_order() {
        let tx = TransactionBuilder::new()
            .add_instruction(sample_instruction(1))
            .add_instruction(sample_instruction(2))
            .set_recent_blockhash(Hash::default())
            .build()
            .unwrap();
        assert_eq!(tx.message.instructions.len(), 2);
        assert_eq!(tx.message.instructions[0].data, vec![1]);
        assert_eq!(tx.message.instructions[1].data, vec![2]);
    }

    #[test]
    fn with_opt_sets_fee_payer() {
        let payer = Pubkey::new([0x77; 32]);
        let tx = TransactionBuilder::new()
            .add_instruction(sample_instruction(1))
            .with_opt(TransactionOption::FeePayer(payer))
            .set_recent_blockhash(Hash::default())
            .build()
            .unwrap();
        assert_eq!(tx.message.account_keys[0], payer);
    }

    #[test]
    fn set_fee_payer_matches_with_opt() {
        let payer = Pubkey::new([0x77; 32]);
        let a = TransactionBuilder::new()
            .add_instruction(sample_instruction(1))
            .set_fee_payer(payer)
            .set_recent_blockhash(Hash::default())
            .build()
            .unwrap();
        let b = TransactionBuilder::new()
            .add_instruction(sample_instruction(1))
            .with_opt(TransactionOption::FeePayer(payer))
            .set_recent_blockhash(Hash::default())
            .build()
            .unwrap();
        assert_eq!(a, b);
    }
}
