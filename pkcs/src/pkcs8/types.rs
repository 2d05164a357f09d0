use asn1::{BitString, Element, OctetString};
use codec::decoder::{DecodableFrom, Decoder};

use super::Result;
use super::error::Error;
use crate::algorithm::AlgorithmIdentifier;
use crate::decode_single;
use crate::key_kind::{KeyAlgorithm, KeyKind};
use crate::pkcs1::RSAPrivateKey;
use crate::sec1::ECPrivateKey;

/*
RFC 5958 - Asymmetric Key Packages

OneAsymmetricKey ::= SEQUENCE {
    version                   Version,
    privateKeyAlgorithm       PrivateKeyAlgorithmIdentifier,
    privateKey                PrivateKey,
    attributes            [0] Attributes OPTIONAL,
    ...,
    [[2: publicKey        [1] PublicKey OPTIONAL ]],
    ...
}

PrivateKeyInfo ::= OneAsymmetricKey

Version ::= INTEGER { v1(0), v2(1) } (v1, ..., v2)

PrivateKeyAlgorithmIdentifier ::= AlgorithmIdentifier

PrivateKey ::= OCTET STRING

PublicKey ::= BIT STRING
*/

/// PKCS#8 OneAsymmetricKey version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    /// Version 1 (no public key)
    V1 = 0,
    /// Version 2 (with public key)
    V2 = 1,
}

impl TryFrom<i64> for Version {
    type Error = Error;

    fn try_from(value: i64) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Version::V1),
            1 => Ok(Version::V2),
            _ => Err(Error::InvalidVersion(value)),
        }
    }
}

/// OneAsymmetricKey (PKCS#8 v2)
///
/// Attributes are skipped; they carry nothing the loader needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneAsymmetricKey {
    pub version: Version,
    pub private_key_algorithm: AlgorithmIdentifier,
    /// Algorithm-specific encoding of the private key
    pub private_key: OctetString,
    /// Optional public key [1] (only in v2)
    pub public_key: Option<BitString>,
}

/// PrivateKeyInfo (PKCS#8 v1 compatibility)
pub type PrivateKeyInfo = OneAsymmetricKey;

/// Private key carried by a [`OneAsymmetricKey`].
///
/// RSA keys are parsed in full; every other algorithm is validated and
/// then reduced to its [`KeyAlgorithm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrivateKey {
    Rsa(RSAPrivateKey),
    Foreign(KeyAlgorithm),
}

impl PrivateKey {
    pub fn kind(&self) -> KeyKind {
        match self {
            PrivateKey::Rsa(_) => KeyKind::Private(KeyAlgorithm::Rsa),
            PrivateKey::Foreign(algorithm) => KeyKind::Private(*algorithm),
        }
    }
}

impl OneAsymmetricKey {
    /// Parses a DER `PrivateKeyInfo` with no trailing data.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let element = decode_single(bytes, "PrivateKeyInfo")?;
        element.decode()
    }

    /// Parses `privateKey` according to the algorithm OID.
    pub fn private_key(&self) -> Result<PrivateKey> {
        let algorithm = &self.private_key_algorithm;
        let key = self.private_key.as_bytes();
        let oid = algorithm.algorithm().to_string();
        match oid.as_str() {
            AlgorithmIdentifier::OID_RSA_ENCRYPTION => {
                Ok(PrivateKey::Rsa(RSAPrivateKey::from_der(key)?))
            }
            AlgorithmIdentifier::OID_EC_PUBLIC_KEY => {
                let outer = algorithm.named_curve().transpose()?;
                let curve = ECPrivateKey::from_der(key)?.curve(outer)?;
                Ok(PrivateKey::Foreign(KeyAlgorithm::Ec(curve)))
            }
            AlgorithmIdentifier::OID_ID_DSA => {
                if algorithm.dsa_parameters().is_none() {
                    return Err(Error::InvalidParameters("DSA"));
                }
                match decode_single(key, "DSA private key") {
                    Ok(Element::Integer(x)) if x.is_positive() => {
                        Ok(PrivateKey::Foreign(KeyAlgorithm::Dsa))
                    }
                    _ => Err(Error::InvalidDsaPrivateKey),
                }
            }
            AlgorithmIdentifier::OID_ED25519 => self.curve_private_key(KeyAlgorithm::Ed25519),
            AlgorithmIdentifier::OID_ED448 => self.curve_private_key(KeyAlgorithm::Ed448),
            AlgorithmIdentifier::OID_X25519 => self.curve_private_key(KeyAlgorithm::X25519),
            AlgorithmIdentifier::OID_X448 => self.curve_private_key(KeyAlgorithm::X448),
            _ => Err(Error::UnknownAlgorithm(algorithm.algorithm().clone())),
        }
    }

    // RFC 8410: CurvePrivateKey ::= OCTET STRING, wrapped in privateKey.
    fn curve_private_key(&self, algorithm: KeyAlgorithm) -> Result<PrivateKey> {
        if !self.private_key_algorithm.has_no_parameters() {
            return Err(Error::InvalidParameters(algorithm.name()));
        }
        let seed = match decode_single(self.private_key.as_bytes(), "CurvePrivateKey")? {
            Element::OctetString(seed) => seed,
            _ => {
                return Err(Error::ExpectedOctetString {
                    field: "CurvePrivateKey",
                });
            }
        };
        let expected = algorithm.octet_key_len().unwrap_or_default();
        if seed.as_bytes().len() != expected {
            return Err(Error::InvalidKeyLength {
                algorithm: algorithm.name(),
                expected,
                actual: seed.as_bytes().len(),
            });
        }
        Ok(PrivateKey::Foreign(algorithm))
    }
}

impl DecodableFrom<Element> for OneAsymmetricKey {}

impl Decoder<Element, OneAsymmetricKey> for Element {
    type Error = Error;

    fn decode(&self) -> Result<OneAsymmetricKey> {
        match self {
            Element::Sequence(elements) => {
                if !(3..=5).contains(&elements.len()) {
                    return Err(Error::InvalidElementCount {
                        expected: "3 to 5",
                        actual: elements.len(),
                    });
                }

                // 1. version (INTEGER)
                let Element::Integer(int) = &elements[0] else {
                    return Err(Error::ExpectedInteger { field: "version" });
                };
                let version = Version::try_from(int.to_i64().ok_or(Error::VersionOutOfRange)?)?;

                // 2. privateKeyAlgorithm (AlgorithmIdentifier)
                let private_key_algorithm: AlgorithmIdentifier = elements[1].decode()?;

                // 3. privateKey (OCTET STRING)
                let Element::OctetString(private_key) = &elements[2] else {
                    return Err(Error::ExpectedOctetString {
                        field: "privateKey",
                    });
                };

                // Optional: attributes [0] and publicKey [1]
                let public_key = elements[3..].iter().find_map(|elem| match elem {
                    Element::ContextSpecific {
                        slot: 1, element, ..
                    } => match element.as_ref() {
                        Element::OctetString(bits) => BitString::try_from(bits.as_bytes()).ok(),
                        Element::BitString(bits) => Some(bits.clone()),
                        _ => None,
                    },
                    _ => None,
                });

                Ok(OneAsymmetricKey {
                    version,
                    private_key_algorithm,
                    private_key: private_key.clone(),
                    public_key,
                })
            }
            _ => Err(Error::ExpectedSequence),
        }
    }
}
