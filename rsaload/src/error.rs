use pkcs::KeyKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid PEM key file: {0}")]
    Pem(#[from] pem::error::Error),

    #[error("error decrypting PEM block: {0}")]
    Decrypt(#[from] DecryptError),

    #[error("unsupported PEM block type {0:?}")]
    UnsupportedBlockType(String),

    /// Every format of the cascade failed; `format` names the last one tried.
    #[error("{format}: {source}")]
    Decode {
        format: &'static str,
        source: pkcs::Error,
    },

    #[error("unsupported key type {0}")]
    UnsupportedKeyType(KeyKind),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum DecryptError {
    #[error("missing password")]
    MissingPassword,

    /// `DEK-Info` encryption.
    #[error(transparent)]
    Legacy(#[from] pem::encryption::error::Error),

    /// PKCS#8 `EncryptedPrivateKeyInfo`.
    #[error(transparent)]
    Pkcs8(#[from] pkcs::pkcs8::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
