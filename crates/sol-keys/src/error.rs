use thiserror::Error;

/// Key and signature parsing errors.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),
}
