use base64::DecodeError;
use thiserror::Error;

/// Errors that can occur when parsing or decoding PEM data.
///
/// Parsing follows RFC 7468 framing with optional RFC 1421 headers, and
/// requires proper boundary markers, valid base64 and matching labels.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// No `-----BEGIN <label>-----` line was found.
    #[error("no valid PEM block found")]
    MissingPreEncapsulationBoundary,

    /// Missing the closing boundary marker (e.g., `-----END RSA PRIVATE KEY-----`)
    #[error("missing a post encapsulation boundary")]
    MissingPostEncapsulationBoundary,

    /// No data found between boundary markers
    #[error("missing PEM data")]
    MissingData,

    #[error("invalid label")]
    InvalidLabel,

    /// The BEGIN and END labels do not match (e.g., BEGIN PUBLIC KEY, END PRIVATE KEY)
    #[error("label doesn't match")]
    LabelMissMatch,

    #[error("invalid encapsulation boundary")]
    InvalidEncapsulationBoundary,

    /// A header continuation line appeared before any header.
    #[error("invalid header line")]
    InvalidHeader,

    #[error("invalid base64line")]
    InvalidBase64Line,

    /// Invalid final base64 line (the line containing padding characters)
    #[error("invalid base64finl")]
    InvalidBase64Finl,

    #[error("base64 decode: {0}")]
    Base64Decode(DecodeError),
}
