//! SEC1 (RFC 5915) error types

use thiserror::Error;

/// Errors that can occur when parsing SEC1 structures.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Encoding(#[from] crate::error::EncodingError),

    #[error(transparent)]
    Algorithm(#[from] crate::algorithm::Error),

    /// Expected a SEQUENCE element but got something else
    #[error("expected SEQUENCE")]
    ExpectedSequence,

    /// Expected an INTEGER element but got something else
    #[error("expected INTEGER for {0}")]
    ExpectedInteger(&'static str),

    /// Expected an OCTET STRING element but got something else
    #[error("expected OCTET STRING")]
    ExpectedOctetString,

    /// The sequence has fewer elements than required
    #[error("insufficient elements: {0}")]
    InsufficientElements(&'static str),

    /// Invalid version number (must be 1 for ecPrivkeyVer1)
    #[error("invalid version: expected 1 (ecPrivkeyVer1), got {0}")]
    InvalidVersion(i64),

    /// Version integer value is out of range for i64
    #[error("version integer out of range")]
    VersionOutOfRange,

    /// `parameters [0]` present but not a named curve
    #[error("parameters are not a named curve")]
    InvalidParameters,

    /// Neither the algorithm identifier nor the key names a curve
    #[error("missing curve parameters")]
    MissingCurve,

    #[error("invalid private key length for {curve}: {actual} bytes")]
    InvalidPrivateKeyLength {
        curve: crate::algorithm::NamedCurve,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
