//! Transactions: a signature vector bound to a message.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use sol_keys::{Hash, Keypair, Pubkey, Signature};

use crate::compile::compile_message;
use crate::error::{DecodeError, TransactionError};
use crate::instruction::Instruction;
use crate::message::Message;
use crate::wire::{self, Reader};

/// A compiled message plus one signature slot per required signer.
///
/// `signatures[i]` belongs to `message.account_keys[i]`. Slots start as
/// the all-zero placeholder and are overwritten in place by signing; the
/// message is never touched after compilation, since changing it would
/// invalidate every signature already collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub signatures: Vec<Signature>,
    pub message: Message,
}

impl Transaction {
    /// Compile an unsigned transaction; the fee payer is the first
    /// signer among the instruction accounts.
    pub fn new(
        instructions: &[&dyn Instruction],
        recent_blockhash: Hash,
    ) -> Result<Self, TransactionError> {
        Self::new_with_payer(instructions, recent_blockhash, None)
    }

    /// Compile an unsigned transaction with an explicit fee payer.
    pub fn new_with_payer(
        instructions: &[&dyn Instruction],
        recent_blockhash: Hash,
        fee_payer: Option<&Pubkey>,
    ) -> Result<Self, TransactionError> {
        let message = compile_message(instructions, fee_payer, recent_blockhash)?;
        Ok(Self::new_unsigned(message))
    }

    /// Wrap a compiled message with zeroed signature slots.
    pub fn new_unsigned(message: Message) -> Self {
        let signatures =
            vec![Signature::default(); usize::from(message.header.num_required_signatures)];
        Self {
            signatures,
            message,
        }
    }

    /// The exact bytes that are signed and verified.
    pub fn message_data(&self) -> Vec<u8> {
        self.message.serialize()
    }

    /// Sign for whichever required signers the lookup can produce.
    ///
    /// The lookup is consulted exactly once per required signer. A hit
    /// overwrites that signer's slot; a miss leaves the slot as it was,
    /// so disjoint lookups can be applied in any order and converge on
    /// the same fully signed vector. Re-running with the same lookup is
    /// a no-op (Ed25519 is deterministic).
    ///
    /// Returns the whole signature vector, placeholders included.
    pub fn partial_sign<F>(&mut self, mut lookup: F) -> &[Signature]
    where
        F: FnMut(&Pubkey) -> Option<Keypair>,
    {
        let message_data = self.message.serialize();
        for (slot, key) in self.message.signer_keys().iter().enumerate() {
            if let Some(keypair) = lookup(key) {
                self.signatures[slot] = keypair.sign_message(&message_data);
            }
        }
        &self.signatures
    }

    /// Sign for every required signer, or fail without touching any
    /// slot.
    pub fn sign<F>(&mut self, mut lookup: F) -> Result<&[Signature], TransactionError>
    where
        F: FnMut(&Pubkey) -> Option<Keypair>,
    {
        // Resolve all keys up front so a missing signer cannot leave a
        // half-signed vector behind.
        let mut keypairs = Vec::with_capacity(self.signatures.len());
        for key in self.message.signer_keys() {
            match lookup(key) {
                Some(keypair) => keypairs.push(keypair),
                None => return Err(TransactionError::MissingSigner(*key)),
            }
        }
        let message_data = self.message.serialize();
        for (slot, keypair) in keypairs.iter().enumerate() {
            self.signatures[slot] = keypair.sign_message(&message_data);
        }
        Ok(&self.signatures)
    }

    /// Check every signature slot against its positionally-bound key.
    ///
    /// A zeroed placeholder slot fails like any other bad signature.
    pub fn verify_signatures(&self) -> Result<(), TransactionError> {
        let required = usize::from(self.message.header.num_required_signatures);
        if self.signatures.len() != required {
            return Err(DecodeError::SignatureCountMismatch {
                count: self.signatures.len(),
                required,
            }
            .into());
        }
        let message_data = self.message.serialize();
        for (index, (signature, key)) in self
            .signatures
            .iter()
            .zip(self.message.signer_keys())
            .enumerate()
        {
            if !key.verify(&message_data, signature) {
                return Err(TransactionError::SignatureVerificationFailed(index));
            }
        }
        Ok(())
    }

    /// Serialize to wire form: compact-u16 signature count, raw 64-byte
    /// signatures, then the message bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let message_data = self.message.serialize();
        let mut out = Vec::with_capacity(3 + self.signatures.len() * 64 + message_data.len());
        wire::write_compact_u16(&mut out, self.signatures.len() as u16);
        for signature in &self.signatures {
            out.extend_from_slice(signature.as_bytes());
        }
        out.extend_from_slice(&message_data);
        out
    }

    /// Decode a transaction, consuming the whole input.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = Reader::new(bytes);
        let num_signatures = reader.read_compact_u16()?;
        let mut signatures = Vec::with_capacity(usize::from(num_signatures));
        for _ in 0..num_signatures {
            signatures.push(Signature::new(reader.read_array::<64>()?));
        }
        let message = Message::read_from(&mut reader)?;
        if !reader.is_empty() {
            return Err(DecodeError::TrailingData(reader.remaining()));
        }
        let required = usize::from(message.header.num_required_signatures);
        if signatures.len() != required {
            return Err(DecodeError::SignatureCountMismatch {
                count: signatures.len(),
                required,
            });
        }
        Ok(Self {
            signatures,
            message,
        })
    }

    /// Base64 transport form of [`Transaction::serialize`], as used by
    /// RPC `sendTransaction`.
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.serialize())
    }

    /// Decode the base64 transport form.
    pub fn from_base64(encoded: &str) -> Result<Self, DecodeError> {
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| DecodeError::Base64(e.to_string()))?;
        Self::deserialize(&bytes)
    }
}
