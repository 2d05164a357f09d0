use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Encoding(#[from] crate::error::EncodingError),

    #[error("expected SEQUENCE for {field}")]
    ExpectedSequence { field: &'static str },

    #[error("expected INTEGER for {field}")]
    ExpectedInteger { field: &'static str },

    #[error("{field} is zero or negative")]
    NotPositive { field: &'static str },

    #[error("expected at least 2 primes, got {0}")]
    TooFewPrimes(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
