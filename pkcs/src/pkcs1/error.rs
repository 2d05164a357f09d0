use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Encoding(#[from] crate::error::EncodingError),

    #[error("expected SEQUENCE")]
    ExpectedSequence,

    #[error("expected {expected} elements, got {actual}")]
    InvalidElementCount {
        expected: &'static str,
        actual: usize,
    },

    #[error("expected INTEGER for {field}")]
    ExpectedInteger { field: &'static str },

    #[error("invalid version: {0} (must be 0 for two-prime or 1 for multi-prime)")]
    InvalidVersion(i64),

    #[error("version out of range for i64")]
    VersionOutOfRange,

    #[error("{field} is zero or negative")]
    NotPositive { field: &'static str },

    #[error("public exponent too small")]
    PublicExponentTooSmall,

    #[error("public exponent too large")]
    PublicExponentTooLarge,

    #[error("invalid prime value")]
    InvalidPrime,

    #[error("product of primes does not match the modulus")]
    InvalidModulus,

    #[error("private exponent does not invert the public exponent")]
    InvalidExponents,
}

pub type Result<T> = std::result::Result<T, Error>;
