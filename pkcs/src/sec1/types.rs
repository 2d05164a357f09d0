use asn1::{BitString, Element, ObjectIdentifier, OctetString};
use codec::decoder::{DecodableFrom, Decoder};

use super::error::{Error, Result};
use crate::algorithm::NamedCurve;
use crate::decode_single;

/*
RFC 5915 - Elliptic Curve Private Key Structure

ECPrivateKey ::= SEQUENCE {
    version        INTEGER { ecPrivkeyVer1(1) } (ecPrivkeyVer1),
    privateKey     OCTET STRING,
    parameters [0] ECParameters {{ NamedCurve }} OPTIONAL,
    publicKey  [1] BIT STRING OPTIONAL
}
*/

/// SEC1 ECPrivateKey version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    /// ecPrivkeyVer1 (value 1)
    V1 = 1,
}

impl TryFrom<i64> for Version {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            1 => Ok(Version::V1),
            _ => Err(Error::InvalidVersion(value)),
        }
    }
}

impl DecodableFrom<Element> for Version {}

impl Decoder<Element, Version> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Version> {
        match self {
            Element::Integer(int) => {
                let value = int.to_i64().ok_or(Error::VersionOutOfRange)?;
                Version::try_from(value)
            }
            _ => Err(Error::ExpectedInteger("version")),
        }
    }
}

/// SEC1 EC Private Key structure (RFC 5915)
///
/// The curve stays an OID here: inside PKCS#8 the algorithm identifier
/// takes precedence, so an unknown curve in `parameters` is only an error
/// once [`ECPrivateKey::curve`] has to fall back to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ECPrivateKey {
    pub version: Version,
    pub private_key: OctetString,
    /// Named curve OID - OPTIONAL [0]
    pub parameters: Option<ObjectIdentifier>,
    /// Public key - OPTIONAL [1]
    pub public_key: Option<BitString>,
}

impl ECPrivateKey {
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let element = decode_single(bytes, "ECPrivateKey")?;
        element.decode()
    }

    /// Resolves the curve, preferring `outer` (the PKCS#8 algorithm
    /// parameters) over this key's own `parameters`, and checks that the
    /// private scalar fits the curve.
    pub fn curve(&self, outer: Option<NamedCurve>) -> Result<NamedCurve> {
        let curve = match (outer, &self.parameters) {
            (Some(curve), _) => curve,
            (None, Some(oid)) => NamedCurve::try_from(oid)?,
            (None, None) => return Err(Error::MissingCurve),
        };
        let len = self.private_key.as_bytes().len();
        if len == 0 || len > curve.scalar_len() {
            return Err(Error::InvalidPrivateKeyLength { curve, actual: len });
        }
        Ok(curve)
    }
}

impl DecodableFrom<Element> for ECPrivateKey {}

impl Decoder<Element, ECPrivateKey> for Element {
    type Error = Error;

    fn decode(&self) -> Result<ECPrivateKey> {
        let elements = match self {
            Element::Sequence(elements) => elements,
            _ => return Err(Error::ExpectedSequence),
        };

        let mut iter = elements.iter();

        let version: Version = iter
            .next()
            .ok_or(Error::InsufficientElements("missing version"))?
            .decode()?;

        let private_key = iter
            .next()
            .ok_or(Error::InsufficientElements("missing privateKey"))
            .and_then(|e| match e {
                Element::OctetString(octets) => Ok(octets.clone()),
                _ => Err(Error::ExpectedOctetString),
            })?;

        let (parameters, public_key) =
            iter.try_fold((None, None), |(params, pubkey), e| match e {
                Element::ContextSpecific {
                    slot: 0, element, ..
                } => match element.as_ref() {
                    Element::ObjectIdentifier(oid) => Ok((Some(oid.clone()), pubkey)),
                    _ => Err(Error::InvalidParameters),
                },
                Element::ContextSpecific {
                    slot: 1, element, ..
                } => match element.as_ref() {
                    Element::BitString(bits) => Ok((params, Some(bits.clone()))),
                    _ => Ok((params, pubkey)),
                },
                _ => Ok((params, pubkey)),
            })?;

        Ok(ECPrivateKey {
            version,
            private_key,
            parameters,
            public_key,
        })
    }
}
