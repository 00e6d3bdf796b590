use sol_keys::Pubkey;
use thiserror::Error;

/// Bit-level codec failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unexpected end of input")]
    Truncated,

    #[error("non-canonical or out-of-range compact-u16")]
    InvalidCompactU16,

    #[error("account index {index} out of range for {num_account_keys} account keys")]
    IndexOutOfRange { index: u8, num_account_keys: usize },

    #[error("message header counts exceed the account table")]
    HeaderInconsistent,

    #[error("{count} signatures present but {required} required")]
    SignatureCountMismatch { count: usize, required: usize },

    #[error("{0} trailing bytes after transaction")]
    TrailingData(usize),

    #[error("invalid base64: {0}")]
    Base64(String),
}

/// Compilation, signing, and verification failures.
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("instruction data unavailable: {0}")]
    InstructionDataUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("transaction references {0} accounts, the limit is 256")]
    TooManyAccounts(usize),

    #[error("instruction data length {0} exceeds the wire format limit")]
    InstructionDataTooLarge(usize),

    #[error("no signer: no instruction account signs and no fee payer was set")]
    NoSignerFound,

    #[error("recent blockhash not set")]
    NoBlockhash,

    #[error("account {0} is not present in the compiled account table")]
    UnknownAccount(Pubkey),

    #[error("missing private key for required signer {0}")]
    MissingSigner(Pubkey),

    #[error("signature verification failed for signer at index {0}")]
    SignatureVerificationFailed(usize),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}
