//! The signable message and its bit-exact codec.

use sol_keys::{Hash, Pubkey};

use crate::error::DecodeError;
use crate::wire::{self, Reader};

/// Region counts partitioning the account table.
///
/// The table is laid out as four contiguous runs: writable signers
/// (`num_required_signatures - num_readonly_signed_accounts` of them),
/// readonly signers, writable non-signers (implicit length), readonly
/// non-signers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

/// An instruction whose account references have been replaced by
/// positional indices into the message's account table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    /// Indices in the order the program expects; duplicates are
    /// preserved, they are meaningful on-chain.
    pub accounts: Vec<u8>,
    /// Opaque instruction data.
    pub data: Vec<u8>,
}

/// The signable payload: everything in a transaction except the
/// signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: Hash,
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// Serialize to wire form. These exact bytes are what Ed25519 signs
    /// and verifies; there is no framing around them.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(128);
        out.push(self.header.num_required_signatures);
        out.push(self.header.num_readonly_signed_accounts);
        out.push(self.header.num_readonly_unsigned_accounts);
        wire::write_compact_u16(&mut out, self.account_keys.len() as u16);
        for key in &self.account_keys {
            out.extend_from_slice(key.as_bytes());
        }
        out.extend_from_slice(self.recent_blockhash.as_bytes());
        wire::write_compact_u16(&mut out, self.instructions.len() as u16);
        for ix in &self.instructions {
            out.push(ix.program_id_index);
            wire::write_compact_bytes(&mut out, &ix.accounts);
            wire::write_compact_bytes(&mut out, &ix.data);
        }
        out
    }

    /// Decode a message, consuming the whole input.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = Reader::new(bytes);
        let message = Self::read_from(&mut reader)?;
        if !reader.is_empty() {
            return Err(DecodeError::TrailingData(reader.remaining()));
        }
        Ok(message)
    }

    pub(crate) fn read_from(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let header = MessageHeader {
            num_required_signatures: reader.read_u8()?,
            num_readonly_signed_accounts: reader.read_u8()?,
            num_readonly_unsigned_accounts: reader.read_u8()?,
        };
        let num_keys = reader.read_compact_u16()?;
        let mut account_keys = Vec::with_capacity(usize::from(num_keys));
        for _ in 0..num_keys {
            account_keys.push(Pubkey::new(reader.read_array::<32>()?));
        }

        // Every region must have non-negative length: the readonly
        // signers fit inside the signer run, and the signer run plus the
        // readonly non-signers fit inside the table.
        let signed = usize::from(header.num_required_signatures);
        if usize::from(header.num_readonly_signed_accounts) > signed
            || signed + usize::from(header.num_readonly_unsigned_accounts) > account_keys.len()
        {
            return Err(DecodeError::HeaderInconsistent);
        }

        let recent_blockhash = Hash::new(reader.read_array::<32>()?);
        let num_instructions = reader.read_compact_u16()?;
        let mut instructions = Vec::with_capacity(usize::from(num_instructions));
        for _ in 0..num_instructions {
            let program_id_index = reader.read_u8()?;
            check_index(program_id_index, account_keys.len())?;
            let accounts = reader.read_compact_bytes()?.to_vec();
            for &index in &accounts {
                check_index(index, account_keys.len())?;
            }
            let data = reader.read_compact_bytes()?.to_vec();
            instructions.push(CompiledInstruction {
                program_id_index,
                accounts,
                data,
            });
        }

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions,
        })
    }

    /// The keys that must sign, in signature-slot order.
    pub fn signer_keys(&self) -> &[Pubkey] {
        let n = usize::from(self.header.num_required_signatures).min(self.account_keys.len());
        &self.account_keys[..n]
    }
}

fn check_index(index: u8, num_account_keys: usize) -> Result<(), DecodeError> {
    if usize::from(index) >= num_account_keys {
        return Err(DecodeError::IndexOutOfRange {
            index,
            num_account_keys,
        });
    }
    Ok(())
}
