//! Account resolution and instruction compilation.
//!
//! Turning a declarative instruction list into a message is mostly an
//! ordering problem. Every referenced key appears exactly once in the
//! account table, partitioned into writable signers, readonly signers,
//! writable non-signers, and readonly non-signers, with the fee payer at
//! index zero. Signers must come first because signature slots are bound
//! to table positions, and the partition order is consensus-critical:
//! a different ordering changes the signable bytes.

use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;
use sol_keys::{Hash, Pubkey};

use crate::error::TransactionError;
use crate::instruction::Instruction;
use crate::message::{CompiledInstruction, Message, MessageHeader};

/// Hard cap on the account table: instruction references are u8 indices.
pub const MAX_ACCOUNT_KEYS: usize = 256;

static COMPILE_DEBUG: AtomicBool = AtomicBool::new(false);

/// Toggle verbose compilation traces, emitted through `log::debug!`.
/// Diagnostic only: defaults to off and has no effect on output.
pub fn set_compile_debug(enabled: bool) {
    COMPILE_DEBUG.store(enabled, Ordering::Relaxed);
}

fn compile_debug() -> bool {
    COMPILE_DEBUG.load(Ordering::Relaxed)
}

struct AccountEntry {
    pubkey: Pubkey,
    is_signer: bool,
    is_writable: bool,
}

impl AccountEntry {
    // Sort key for the canonical partition: signers before non-signers,
    // writable before readonly within each half.
    fn rank(&self) -> u8 {
        match (self.is_signer, self.is_writable) {
            (true, true) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (false, false) => 3,
        }
    }
}

fn upsert(entries: &mut Vec<AccountEntry>, pubkey: Pubkey, is_signer: bool, is_writable: bool) {
    // Linear scan instead of a map: account lists are tiny, and keeping
    // a plain Vec preserves first-occurrence order for free.
    if let Some(entry) = entries.iter_mut().find(|e| e.pubkey == pubkey) {
        entry.is_signer |= is_signer;
        entry.is_writable |= is_writable;
    } else {
        entries.push(AccountEntry {
            pubkey,
            is_signer,
            is_writable,
        });
    }
}

fn position(account_keys: &[Pubkey], key: &Pubkey) -> Result<u8, TransactionError> {
    account_keys
        .iter()
        .position(|k| k == key)
        .map(|index| index as u8)
        .ok_or(TransactionError::UnknownAccount(*key))
}

/// Compile `instructions` into a canonically ordered [`Message`].
///
/// With no explicit `fee_payer`, the first signer encountered is
/// promoted; it is always forced writable and moved to index zero. An
/// explicit fee payer is added to the table if the instructions never
/// reference it.
pub fn compile_message(
    instructions: &[&dyn Instruction],
    fee_payer: Option<&Pubkey>,
    recent_blockhash: Hash,
) -> Result<Message, TransactionError> {
    // Instruction metas first, in declared order; distinct program IDs
    // join the table afterwards so they sort behind accounts first seen
    // in a meta list.
    let mut entries: Vec<AccountEntry> = Vec::new();
    let mut program_ids: Vec<Pubkey> = Vec::new();
    for ix in instructions {
        for meta in ix.accounts() {
            upsert(&mut entries, meta.pubkey, meta.is_signer, meta.is_writable);
        }
        let program_id = ix.program_id();
        if !program_ids.contains(&program_id) {
            program_ids.push(program_id);
        }
    }
    for program_id in &program_ids {
        upsert(&mut entries, *program_id, false, false);
    }

    // Fee payer: explicit, or the first signer seen.
    let payer_index = match fee_payer {
        Some(payer) => {
            upsert(&mut entries, *payer, true, true);
            entries.iter().position(|e| e.pubkey == *payer)
        }
        None => entries.iter().position(|e| e.is_signer),
    };
    let Some(payer_index) = payer_index else {
        return Err(TransactionError::NoSignerFound);
    };
    let mut payer = entries.remove(payer_index);
    payer.is_signer = true;
    payer.is_writable = true;

    // Stable sort: first-occurrence order survives within each class.
    entries.sort_by_key(AccountEntry::rank);
    entries.insert(0, payer);

    if entries.len() > MAX_ACCOUNT_KEYS {
        return Err(TransactionError::TooManyAccounts(entries.len()));
    }

    let header = MessageHeader {
        num_required_signatures: entries.iter().filter(|e| e.is_signer).count() as u8,
        num_readonly_signed_accounts: entries
            .iter()
            .filter(|e| e.is_signer && !e.is_writable)
            .count() as u8,
        num_readonly_unsigned_accounts: entries
            .iter()
            .filter(|e| !e.is_signer && !e.is_writable)
            .count() as u8,
    };
    let account_keys: Vec<Pubkey> = entries.iter().map(|e| e.pubkey).collect();

    if compile_debug() {
        debug!(
            "compiled account table: {} keys, header ({}, {}, {})",
            account_keys.len(),
            header.num_required_signatures,
            header.num_readonly_signed_accounts,
            header.num_readonly_unsigned_accounts,
        );
        for (index, entry) in entries.iter().enumerate() {
            debug!(
                "  [{index}] {} signer={} writable={}",
                entry.pubkey, entry.is_signer, entry.is_writable
            );
        }
    }

    // Rewrite each instruction through the final ordering. Duplicate
    // references within one instruction keep their multiplicity.
    let mut compiled = Vec::with_capacity(instructions.len());
    for ix in instructions {
        let data = ix
            .data()
            .map_err(TransactionError::InstructionDataUnavailable)?;
        if data.len() > usize::from(u16::MAX) {
            return Err(TransactionError::InstructionDataTooLarge(data.len()));
        }
        let program_id_index = position(&account_keys, &ix.program_id())?;
        let mut accounts = Vec::with_capacity(ix.accounts().len());
        for meta in ix.accounts() {
            accounts.push(position(&account_keys, &meta.pubkey)?);
        }
        compiled.push(CompiledInstruction {
            program_id_index,
            accounts,
            data,
        });
    }

    Ok(Message {
        header,
        account_keys,
        recent_blockhash,
        instructions: compiled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::{AccountMeta, GenericInstruction};

    fn key(tag: u16) -> Pubkey {
        let mut bytes = [0u8; 32];
        bytes[0] = tag as u8;
        bytes[1] = (tag >> 8) as u8;
        bytes[30] = 0x77;
        Pubkey::new(bytes)
    }

    fn ix(program_id: Pubkey, accounts: Vec<AccountMeta>) -> GenericInstruction {
        GenericInstruction {
            program_id,
            accounts,
            data: vec![0x01],
        }
    }

    #[test]
    fn merges_duplicate_keys_by_or() {
        let program = key(100);
        let shared = key(1);
        let a = ix(program, vec![AccountMeta::new_readonly(shared, false)]);
        let b = ix(program, vec![AccountMeta::new(shared, true)]);
        let message = compile_message(&[&a, &b], None, Hash::default()).unwrap();
        // shared merged to (signer, writable) and promoted fee payer.
        assert_eq!(message.account_keys, vec![shared, program]);
        assert_eq!(message.header.num_required_signatures, 1);
        assert_eq!(message.header.num_readonly_unsigned_accounts, 1);
    }

    #[test]
    fn first_signer_becomes_writable_fee_payer() {
        let program = key(100);
        let readonly_signer = key(1);
        let writable = key(2);
        let a = ix(
            program,
            vec![
                AccountMeta::new(writable, false),
                AccountMeta::new_readonly(readonly_signer, true),
            ],
        );
        let message = compile_message(&[&a], None, Hash::default()).unwrap();
        assert_eq!(message.account_keys[0], readonly_signer);
        // Promoted out of the readonly-signer region.
        assert_eq!(message.header.num_readonly_signed_accounts, 0);
    }

    #[test]
    fn explicit_fee_payer_is_added_when_unreferenced() {
        let program = key(100);
        let payer = key(50);
        let a = ix(program, vec![AccountMeta::new(key(1), false)]);
        let message = compile_message(&[&a], Some(&payer), Hash::default()).unwrap();
        assert_eq!(message.account_keys[0], payer);
        assert_eq!(message.header.num_required_signatures, 1);
        // payer, writable account, program
        assert_eq!(message.account_keys.len(), 3);
    }

    #[test]
    fn explicit_fee_payer_moves_to_front() {
        let program = key(100);
        let payer = key(2);
        let a = ix(
            program,
            vec![
                AccountMeta::new(key(1), true),
                AccountMeta::new_readonly(payer, false),
            ],
        );
        let message = compile_message(&[&a], Some(&payer), Hash::default()).unwrap();
        assert_eq!(message.account_keys[0], payer);
        assert_eq!(message.account_keys[1], key(1));
        assert_eq!(message.header.num_required_signatures, 2);
    }

    #[test]
    fn fails_without_any_signer() {
        let a = ix(key(100), vec![AccountMeta::new(key(1), false)]);
        let err = compile_message(&[&a], None, Hash::default()).unwrap_err();
        assert!(matches!(err, TransactionError::NoSignerFound));
    }

    #[test]
    fn program_ids_deduplicate_and_sort_last() {
        let program = key(100);
        let a = ix(program, vec![AccountMeta::new(key(1), true)]);
        let b = ix(program, vec![AccountMeta::new(key(2), false)]);
        let message = compile_message(&[&a, &b], None, Hash::default()).unwrap();
        assert_eq!(message.account_keys, vec![key(1), key(2), program]);
        assert_eq!(message.instructions[0].program_id_index, 2);
        assert_eq!(message.instructions[1].program_id_index, 2);
    }

    #[test]
    fn duplicate_references_within_instruction_survive() {
        let program = key(100);
        let target = key(1);
        let a = ix(
            program,
            vec![
                AccountMeta::new(target, true),
                AccountMeta::new(target, false),
            ],
        );
        let message = compile_message(&[&a], None, Hash::default()).unwrap();
        assert_eq!(message.instructions[0].accounts, vec![0, 0]);
        assert_eq!(message.account_keys.len(), 2);
    }

    #[test]
    fn program_referenced_as_account_stays_deduplicated() {
        let program = key(100);
        let a = ix(
            program,
            vec![
                AccountMeta::new(key(1), true),
                AccountMeta::new_readonly(program, false),
            ],
        );
        let message = compile_message(&[&a], None, Hash::default()).unwrap();
        assert_eq!(message.account_keys, vec![key(1), program]);
        assert_eq!(message.instructions[0].accounts, vec![0, 1]);
        assert_eq!(message.instructions[0].program_id_index, 1);
    }

    #[test]
    fn rejects_more_than_256_accounts() {
        let metas: Vec<AccountMeta> = (0..300u16).map(|i| AccountMeta::new(key(i), false)).collect();
        let a = ix(key(1000), metas);
        let err = compile_message(&[&a], Some(&key(2000)), Hash::default()).unwrap_err();
        assert!(matches!(err, TransactionError::TooManyAccounts(302)));
    }

    #[test]
    fn rejects_oversized_instruction_data() {
        let a = GenericInstruction {
            program_id: key(100),
            accounts: vec![AccountMeta::new(key(1), true)],
            data: vec![0; usize::from(u16::MAX) + 1],
        };
        let err = compile_message(&[&a], None, Hash::default()).unwrap_err();
        assert!(matches!(
            err,
            TransactionError::InstructionDataTooLarge(65536)
        ));
    }

    #[test]
    fn blockhash_is_carried_through() {
        let a = ix(key(100), vec![AccountMeta::new(key(1), true)]);
        let blockhash = Hash::new([0xab; 32]);
        let message = compile_message(&[&a], None, blockhash).unwrap();
        assert_eq!(message.recent_blockhash, blockhash);
    }

    #[test]
    fn debug_flag_does_not_change_output() {
        let a = ix(key(100), vec![AccountMeta::new(key(1), true)]);
        let quiet = compile_message(&[&a], None, Hash::default()).unwrap();
        set_compile_debug(true);
        let loud = compile_message(&[&a], None, Hash::default()).unwrap();
        set_compile_debug(false);
        assert_eq!(quiet, loud);
    }
}
