use thiserror::Error;

/// Failure to turn DER bytes into exactly one ASN.1 element.
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("DER error: {0}")]
    Der(#[from] der::error::Error),

    #[error("ASN.1 error: {0}")]
    Asn1(#[from] asn1::error::Error),

    #[error("empty ASN1Object")]
    EmptyAsn1Object,

    #[error("trailing data after {0}")]
    TrailingData(&'static str),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Algorithm(#[from] crate::algorithm::Error),

    #[error(transparent)]
    Pkcs1(#[from] crate::pkcs1::Error),

    #[error(transparent)]
    Pkcs8(#[from] crate::pkcs8::Error),

    #[error(transparent)]
    Sec1(#[from] crate::sec1::Error),

    #[error(transparent)]
    Spki(#[from] crate::spki::Error),

    #[error(transparent)]
    Raw(#[from] crate::raw::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
