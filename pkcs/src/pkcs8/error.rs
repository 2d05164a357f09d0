use asn1::ObjectIdentifier;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Encoding(#[from] crate::error::EncodingError),

    #[error(transparent)]
    Algorithm(#[from] crate::algorithm::Error),

    #[error("invalid version: {0}")]
    InvalidVersion(i64),

    #[error("version out of range for i64")]
    VersionOutOfRange,

    #[error("expected SEQUENCE")]
    ExpectedSequence,

    #[error("expected {expected} elements, got {actual}")]
    InvalidElementCount {
        expected: &'static str,
        actual: usize,
    },

    #[error("expected INTEGER for {field}")]
    ExpectedInteger { field: &'static str },

    #[error("expected OCTET STRING for {field}")]
    ExpectedOctetString { field: &'static str },

    #[error("invalid RSA private key: {0}")]
    Rsa(#[from] crate::pkcs1::Error),

    #[error("invalid EC private key: {0}")]
    Ec(#[from] crate::sec1::Error),

    #[error("invalid {0} parameters")]
    InvalidParameters(&'static str),

    #[error("invalid {algorithm} private key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        algorithm: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid DSA private key")]
    InvalidDsaPrivateKey,

    #[error("unknown algorithm {0}")]
    UnknownAlgorithm(ObjectIdentifier),

    #[error("unsupported encryption scheme {0}")]
    UnsupportedEncryptionScheme(ObjectIdentifier),

    #[error("unsupported key derivation function {0}")]
    UnsupportedKdf(ObjectIdentifier),

    #[error("unsupported PBKDF2 PRF {0}")]
    UnsupportedPrf(ObjectIdentifier),

    #[error("unsupported cipher {0}")]
    UnsupportedCipher(ObjectIdentifier),

    #[error("unsupported PBKDF2 salt source")]
    UnsupportedSaltSource,

    #[error("invalid PBES2 parameters: {0}")]
    InvalidPbes2Parameters(&'static str),

    #[error(
        "PBKDF2 iteration count must be between 1 and {max}",
        max = super::encrypted::MAX_ITERATION_COUNT
    )]
    InvalidIterationCount,

    #[error("PBKDF2 key length {actual} does not match the cipher key length {expected}")]
    KeyLengthMismatch { expected: usize, actual: usize },

    #[error("invalid IV length: expected {expected}, got {actual}")]
    InvalidIvLength { expected: usize, actual: usize },

    #[error(transparent)]
    Cipher(#[from] pem::encryption::error::Error),
}
