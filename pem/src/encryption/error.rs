use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("PEM block is not encrypted")]
    NotEncrypted,
    #[error("malformed DEK-Info header {0:?}")]
    InvalidDekInfo(String),
    #[error("unsupported cipher {0:?}")]
    UnsupportedCipher(String),
    #[error("IV must be {expected} bytes, got {actual}")]
    InvalidIvLength { expected: usize, actual: usize },
    #[error("invalid key or IV length for {0}")]
    InvalidKeyIvLength(&'static str),
    #[error("encrypted data length {0} is not a multiple of the block size")]
    InvalidCiphertextLength(usize),
    #[error("decryption password incorrect")]
    IncorrectPassword,
    #[error("{0}")]
    Pem(#[from] crate::error::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
