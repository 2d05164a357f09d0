//! AlgorithmIdentifier and the object identifiers the key formats dispatch on.
//!
//! Defined in [RFC 5280 Section 4.1.1.2](https://datatracker.ietf.org/doc/html/rfc5280#section-4.1.1.2)

use std::fmt::Display;

use asn1::{Element, Integer, ObjectIdentifier};
use codec::decoder::{DecodableFrom, Decoder};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("AlgorithmIdentifier: expected SEQUENCE")]
    ExpectedSequence,

    #[error("AlgorithmIdentifier: expected OBJECT IDENTIFIER")]
    ExpectedOid,

    #[error("AlgorithmIdentifier: empty")]
    Empty,

    #[error("AlgorithmIdentifier: too many elements")]
    TooManyElements,

    #[error("unknown elliptic curve {0}")]
    UnknownCurve(ObjectIdentifier),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Parameters field in AlgorithmIdentifier
///
/// - None: field omitted (EdDSA, X25519)
/// - Some(Null): explicit NULL (RSA)
/// - Some(Other(..)): curve OID, DSA domain parameters, PBES2 parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlgorithmParameters {
    Null,
    Other(Element),
}

/*
RFC 5280 Section 4.1.1.2

AlgorithmIdentifier ::= SEQUENCE {
    algorithm   OBJECT IDENTIFIER,
    parameters  ANY DEFINED BY algorithm OPTIONAL
}
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmIdentifier {
    pub algorithm: ObjectIdentifier,
    pub parameters: Option<AlgorithmParameters>,
}

impl AlgorithmIdentifier {
    // Key algorithms (RFC 8017, RFC 5480, RFC 3279, RFC 8410)
    pub const OID_RSA_ENCRYPTION: &'static str = "1.2.840.113549.1.1.1";
    pub const OID_EC_PUBLIC_KEY: &'static str = "1.2.840.10045.2.1";
    pub const OID_ID_DSA: &'static str = "1.2.840.10040.4.1";
    pub const OID_X25519: &'static str = "1.3.101.110";
    pub const OID_X448: &'static str = "1.3.101.111";
    pub const OID_ED25519: &'static str = "1.3.101.112";
    pub const OID_ED448: &'static str = "1.3.101.113";

    // Password based encryption (RFC 8018)
    pub const OID_PBES2: &'static str = "1.2.840.113549.1.5.13";
    pub const OID_PBKDF2: &'static str = "1.2.840.113549.1.5.12";
    pub const OID_HMAC_WITH_SHA1: &'static str = "1.2.840.113549.2.7";
    pub const OID_HMAC_WITH_SHA224: &'static str = "1.2.840.113549.2.8";
    pub const OID_HMAC_WITH_SHA256: &'static str = "1.2.840.113549.2.9";
    pub const OID_HMAC_WITH_SHA384: &'static str = "1.2.840.113549.2.10";
    pub const OID_HMAC_WITH_SHA512: &'static str = "1.2.840.113549.2.11";
    pub const OID_DES_EDE3_CBC: &'static str = "1.2.840.113549.3.7";
    pub const OID_AES128_CBC: &'static str = "2.16.840.1.101.3.4.1.2";
    pub const OID_AES192_CBC: &'static str = "2.16.840.1.101.3.4.1.22";
    pub const OID_AES256_CBC: &'static str = "2.16.840.1.101.3.4.1.42";

    pub fn algorithm(&self) -> &ObjectIdentifier {
        &self.algorithm
    }

    pub fn parameters(&self) -> Option<&AlgorithmParameters> {
        self.parameters.as_ref()
    }

    /// The parameters element, unless absent or NULL.
    pub fn parameter_element(&self) -> Option<&Element> {
        match &self.parameters {
            Some(AlgorithmParameters::Other(element)) => Some(element),
            _ => None,
        }
    }

    /// DSA domain parameters `SEQUENCE { p, q, g }`, all positive.
    pub fn dsa_parameters(&self) -> Option<[&Integer; 3]> {
        match self.parameter_element() {
            Some(Element::Sequence(elements)) => match elements.as_slice() {
                [Element::Integer(p), Element::Integer(q), Element::Integer(g)]
                    if p.is_positive() && q.is_positive() && g.is_positive() =>
                {
                    Some([p, q, g])
                }
                _ => None,
            },
            _ => None,
        }
    }

    /// Whether the parameters field is omitted, as RFC 8410 requires.
    pub fn has_no_parameters(&self) -> bool {
        self.parameters.is_none()
    }

    /// The named curve carried as parameters, if the parameters are an OID.
    pub fn named_curve(&self) -> Option<Result<NamedCurve>> {
        match self.parameter_element() {
            Some(Element::ObjectIdentifier(oid)) => Some(NamedCurve::try_from(oid)),
            _ => None,
        }
    }
}

impl DecodableFrom<Element> for AlgorithmIdentifier {}

impl Decoder<Element, AlgorithmIdentifier> for Element {
    type Error = Error;

    fn decode(&self) -> Result<AlgorithmIdentifier> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence);
        };
        let algorithm = match elements.first() {
            Some(Element::ObjectIdentifier(oid)) => oid.clone(),
            Some(_) => return Err(Error::ExpectedOid),
            None => return Err(Error::Empty),
        };
        if elements.len() > 2 {
            return Err(Error::TooManyElements);
        }
        let parameters = match elements.get(1) {
            Some(Element::Null) => Some(AlgorithmParameters::Null),
            Some(other) => Some(AlgorithmParameters::Other(other.clone())),
            None => None,
        };

        Ok(AlgorithmIdentifier {
            algorithm,
            parameters,
        })
    }
}

/// Named elliptic curves (RFC 5480 Section 2.1.1.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedCurve {
    Secp192r1,
    Secp224r1,
    Secp256r1,
    Secp384r1,
    Secp521r1,
}

impl NamedCurve {
    pub const OID_SECP192R1: &'static str = "1.2.840.10045.3.1.1";
    pub const OID_SECP224R1: &'static str = "1.3.132.0.33";
    pub const OID_SECP256R1: &'static str = "1.2.840.10045.3.1.7";
    pub const OID_SECP384R1: &'static str = "1.3.132.0.34";
    pub const OID_SECP521R1: &'static str = "1.3.132.0.35";

    /// NIST name where one exists.
    pub fn name(&self) -> &'static str {
        match self {
            NamedCurve::Secp192r1 => "P-192",
            NamedCurve::Secp224r1 => "P-224",
            NamedCurve::Secp256r1 => "P-256",
            NamedCurve::Secp384r1 => "P-384",
            NamedCurve::Secp521r1 => "P-521",
        }
    }

    pub fn bits(&self) -> usize {
        match self {
            NamedCurve::Secp192r1 => 192,
            NamedCurve::Secp224r1 => 224,
            NamedCurve::Secp256r1 => 256,
            NamedCurve::Secp384r1 => 384,
            NamedCurve::Secp521r1 => 521,
        }
    }

    /// Length of a scalar (private key) in bytes.
    pub fn scalar_len(&self) -> usize {
        self.bits().div_ceil(8)
    }
}

impl Display for NamedCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TryFrom<&ObjectIdentifier> for NamedCurve {
    type Error = Error;

    fn try_from(oid: &ObjectIdentifier) -> Result<Self> {
        match oid.to_string().as_str() {
            Self::OID_SECP192R1 => Ok(Self::Secp192r1),
            Self::OID_SECP224R1 => Ok(Self::Secp224r1),
            Self::OID_SECP256R1 => Ok(Self::Secp256r1),
            Self::OID_SECP384R1 => Ok(Self::Secp384r1),
            Self::OID_SECP521R1 => Ok(Self::Secp521r1),
            _ => Err(Error::UnknownCurve(oid.clone())),
        }
    }
}
