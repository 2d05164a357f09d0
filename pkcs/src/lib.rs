//! Key structures read by `rsaload`.
//!
//! Every structure is decoded through the same chain:
//!
//! ```text
//! &[u8] -> Der -> ASN1Object -> Element -> key structure
//! ```
//!
//! - [`pkcs1`]: RSA-specific `RSAPrivateKey` / `RSAPublicKey` (RFC 8017)
//! - [`pkcs8`]: algorithm-agnostic `OneAsymmetricKey` and its encrypted form (RFC 5958, RFC 8018)
//! - [`spki`]: X.509 `SubjectPublicKeyInfo` (RFC 5280, RFC 5480)
//! - [`sec1`]: `ECPrivateKey` embedded in PKCS#8 (RFC 5915)
//! - [`raw`]: the container-less structures written by some early tools

#![forbid(unsafe_code)]

use asn1::{ASN1Object, Element};
use codec::decoder::Decoder;
use der::Der;

pub mod algorithm;
pub mod error;
mod key_kind;
pub mod pkcs1;
pub mod pkcs8;
pub mod raw;
pub mod sec1;
pub mod spki;

pub use algorithm::{AlgorithmIdentifier, AlgorithmParameters, NamedCurve};
pub use error::{EncodingError, Error, Result};
pub use key_kind::{KeyAlgorithm, KeyKind};

/// Decodes `bytes` as a single DER element, rejecting anything after it.
///
/// `what` names the structure in the trailing-data error.
pub(crate) fn decode_single(
    bytes: &[u8],
    what: &'static str,
) -> std::result::Result<Element, EncodingError> {
    let der: Der = bytes.decode()?;
    let asn1_obj: ASN1Object = der.decode()?;
    match asn1_obj.elements() {
        [] => Err(EncodingError::EmptyAsn1Object),
        [element] => Ok(element.clone()),
        _ => Err(EncodingError::TrailingData(what)),
    }
}

/// Decodes only the first DER element of `bytes`; whatever follows is ignored.
pub(crate) fn decode_first(bytes: &[u8]) -> std::result::Result<Element, EncodingError> {
    let (tlv, _rest) = der::Tlv::parse_prefix(bytes)?;
    Ok(Element::try_from(&tlv)?)
}
