use asn1::ObjectIdentifier;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Encoding(#[from] crate::error::EncodingError),

    #[error(transparent)]
    Algorithm(#[from] crate::algorithm::Error),

    #[error("expected SEQUENCE")]
    ExpectedSequence,

    #[error("expected {expected} elements, got {actual}")]
    InvalidElementCount {
        expected: &'static str,
        actual: usize,
    },

    #[error("expected BIT STRING for subjectPublicKey")]
    ExpectedBitString,

    #[error("subjectPublicKey has {0} unused bits")]
    UnusedBits(u8),

    #[error("RSA key missing NULL parameters")]
    MissingNullParameters,

    #[error("invalid RSA public key: {0}")]
    Rsa(#[from] crate::pkcs1::Error),

    #[error("invalid {0} parameters")]
    InvalidParameters(&'static str),

    #[error("invalid {algorithm} public key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        algorithm: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid elliptic curve point")]
    InvalidEcPoint,

    #[error("invalid DSA public key")]
    InvalidDsaPublicKey,

    #[error("unknown algorithm {0}")]
    UnknownAlgorithm(ObjectIdentifier),
}

pub type Result<T> = std::result::Result<T, Error>;
