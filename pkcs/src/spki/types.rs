use asn1::{BitString, Element};
use codec::decoder::{DecodableFrom, Decoder};

use super::error::{Error, Result};
use crate::algorithm::{AlgorithmIdentifier, AlgorithmParameters};
use crate::key_kind::{KeyAlgorithm, KeyKind};
use crate::pkcs1::RSAPublicKey;
use crate::{decode_first, decode_single};

/*
RFC 5280 Section 4.1.2.7

SubjectPublicKeyInfo  ::=  SEQUENCE  {
    algorithm            AlgorithmIdentifier,
    subjectPublicKey     BIT STRING
}
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectPublicKeyInfo {
    pub algorithm: AlgorithmIdentifier,
    pub subject_public_key: BitString,
}

/// Public key carried by a [`SubjectPublicKeyInfo`].
///
/// Only RSA keys are kept; every other algorithm is validated and then
/// reduced to its [`KeyAlgorithm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    Rsa(RSAPublicKey),
    Foreign(KeyAlgorithm),
}

impl PublicKey {
    pub fn kind(&self) -> KeyKind {
        match self {
            PublicKey::Rsa(_) => KeyKind::Public(KeyAlgorithm::Rsa),
            PublicKey::Foreign(algorithm) => KeyKind::Public(*algorithm),
        }
    }
}

impl SubjectPublicKeyInfo {
    /// Parses a DER `SubjectPublicKeyInfo` with no trailing data.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let element = decode_single(bytes, "SubjectPublicKeyInfo")?;
        element.decode()
    }

    pub fn algorithm(&self) -> &AlgorithmIdentifier {
        &self.algorithm
    }

    pub fn subject_public_key(&self) -> &BitString {
        &self.subject_public_key
    }

    /// Interprets `subjectPublicKey` according to the algorithm OID.
    pub fn public_key(&self) -> Result<PublicKey> {
        let key = self.subject_public_key.as_bytes();
        let oid = self.algorithm.algorithm().to_string();
        match oid.as_str() {
            AlgorithmIdentifier::OID_RSA_ENCRYPTION => {
                if self.algorithm.parameters() != Some(&AlgorithmParameters::Null) {
                    return Err(Error::MissingNullParameters);
                }
                Ok(PublicKey::Rsa(RSAPublicKey::from_der(key)?))
            }
            AlgorithmIdentifier::OID_EC_PUBLIC_KEY => {
                let curve = self
                    .algorithm
                    .named_curve()
                    .ok_or(Error::InvalidParameters("EC"))??;
                // Uncompressed point only: 0x04 || X || Y
                if key.len() != 1 + 2 * curve.scalar_len() || key[0] != 0x04 {
                    return Err(Error::InvalidEcPoint);
                }
                Ok(PublicKey::Foreign(KeyAlgorithm::Ec(curve)))
            }
            AlgorithmIdentifier::OID_ID_DSA => {
                if self.algorithm.dsa_parameters().is_none() {
                    return Err(Error::InvalidParameters("DSA"));
                }
                match decode_first(key) {
                    Ok(Element::Integer(y)) if y.is_positive() => {
                        Ok(PublicKey::Foreign(KeyAlgorithm::Dsa))
                    }
                    _ => Err(Error::InvalidDsaPublicKey),
                }
            }
            AlgorithmIdentifier::OID_ED25519 => self.octet_key(KeyAlgorithm::Ed25519),
            AlgorithmIdentifier::OID_ED448 => self.octet_key(KeyAlgorithm::Ed448),
            AlgorithmIdentifier::OID_X25519 => self.octet_key(KeyAlgorithm::X25519),
            AlgorithmIdentifier::OID_X448 => self.octet_key(KeyAlgorithm::X448),
            _ => Err(Error::UnknownAlgorithm(self.algorithm.algorithm().clone())),
        }
    }

    // RFC 8410: parameters absent, raw key bytes of a fixed length.
    fn octet_key(&self, algorithm: KeyAlgorithm) -> Result<PublicKey> {
        if !self.algorithm.has_no_parameters() {
            return Err(Error::InvalidParameters(algorithm.name()));
        }
        let expected = algorithm.octet_key_len().unwrap_or_default();
        let actual = self.subject_public_key.as_bytes().len();
        if actual != expected {
            return Err(Error::InvalidKeyLength {
                algorithm: algorithm.name(),
                expected,
                actual,
            });
        }
        Ok(PublicKey::Foreign(algorithm))
    }
}

impl DecodableFrom<Element> for SubjectPublicKeyInfo {}

impl Decoder<Element, SubjectPublicKeyInfo> for Element {
    type Error = Error;

    fn decode(&self) -> Result<SubjectPublicKeyInfo> {
        match self {
            Element::Sequence(elements) => {
                if elements.len() != 2 {
                    return Err(Error::InvalidElementCount {
                        expected: "2",
                        actual: elements.len(),
                    });
                }
                let algorithm: AlgorithmIdentifier = elements[0].decode()?;
                let subject_public_key = match &elements[1] {
                    Element::BitString(bits) => bits.clone(),
                    _ => return Err(Error::ExpectedBitString),
                };
                if subject_public_key.unused_bits() != 0 {
                    return Err(Error::UnusedBits(subject_public_key.unused_bits()));
                }
                Ok(SubjectPublicKeyInfo {
                    algorithm,
                    subject_public_key,
                })
            }
            _ => Err(Error::ExpectedSequence),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use asn1::{Integer, ObjectIdentifier};
    use codec::decoder::Decoder;
    use pem::Pem;
    use rstest::rstest;

    use super::*;
    use crate::algorithm::NamedCurve;

    fn der_of(pem: &str) -> Vec<u8> {
        let pem = Pem::from_str(pem).unwrap();
        pem.decode().unwrap()
    }

    fn oid(s: &str) -> Element {
        Element::ObjectIdentifier(ObjectIdentifier::from_str(s).unwrap())
    }

    fn spki(algorithm: Vec<Element>, key: BitString) -> Element {
        Element::Sequence(vec![Element::Sequence(algorithm), Element::BitString(key)])
    }

    // SEQUENCE { INTEGER 3233, INTEGER 17 }
    const TOY_RSA_PUBLIC_KEY: &[u8] = &[0x30, 0x07, 0x02, 0x02, 0x0c, 0xa1, 0x02, 0x01, 0x11];

    #[test]
    fn test_rsa_public_key() {
        let der = der_of(include_str!("../../../rsaload/tests/data/rsa2048_spki.pem"));

        let info = SubjectPublicKeyInfo::from_der(&der).unwrap();

        match info.public_key().unwrap() {
            PublicKey::Rsa(key) => {
                assert_eq!(2048, key.modulus.as_bigint().bits());
                assert_eq!(Some(65537), key.public_exponent.to_i64());
            }
            other => panic!("unexpected key {other:?}"),
        }
    }

    #[rstest]
    #[case::ec(
        include_str!("../../../rsaload/tests/data/ec_p256_spki.pem"),
        KeyAlgorithm::Ec(NamedCurve::Secp256r1)
    )]
    #[case::dsa(include_str!("../../../rsaload/tests/data/dsa_spki.pem"), KeyAlgorithm::Dsa)]
    #[case::ed25519(
        include_str!("../../../rsaload/tests/data/ed25519_spki.pem"),
        KeyAlgorithm::Ed25519
    )]
    fn test_foreign_public_key(#[case] input: &str, #[case] expected: KeyAlgorithm) {
        let info = SubjectPublicKeyInfo::from_der(&der_of(input)).unwrap();

        let key = info.public_key().unwrap();

        assert_eq!(PublicKey::Foreign(expected), key);
        assert_eq!(KeyKind::Public(expected), key.kind());
    }

    #[test]
    fn test_toy_rsa_public_key() {
        let element = spki(
            vec![oid(AlgorithmIdentifier::OID_RSA_ENCRYPTION), Element::Null],
            BitString::new(0, TOY_RSA_PUBLIC_KEY.to_vec()),
        );
        let info: SubjectPublicKeyInfo = element.decode().unwrap();

        let PublicKey::Rsa(key) = info.public_key().unwrap() else {
            panic!("expected RSA key");
        };
        assert_eq!(Integer::from(3233), key.modulus);
        assert_eq!(Integer::from(17), key.public_exponent);
    }

    #[rstest]
    #[case::rsa_without_null(
        spki(vec![oid(AlgorithmIdentifier::OID_RSA_ENCRYPTION)], BitString::new(0, TOY_RSA_PUBLIC_KEY.to_vec())),
        "RSA key missing NULL parameters"
    )]
    #[case::rsa_trailing_data(
        spki(
            vec![oid(AlgorithmIdentifier::OID_RSA_ENCRYPTION), Element::Null],
            BitString::new(0, [TOY_RSA_PUBLIC_KEY, &[0x05, 0x00]].concat()),
        ),
        "invalid RSA public key: trailing data after RSAPublicKey"
    )]
    #[case::unknown_algorithm(
        spki(vec![oid("1.2.3.4"), Element::Null], BitString::new(0, vec![0x00])),
        "unknown algorithm 1.2.3.4"
    )]
    #[case::ed25519_short(
        spki(vec![oid(AlgorithmIdentifier::OID_ED25519)], BitString::new(0, vec![0u8; 31])),
        "invalid Ed25519 public key length: expected 32, got 31"
    )]
    #[case::x448_with_parameters(
        spki(vec![oid(AlgorithmIdentifier::OID_X448), Element::Null], BitString::new(0, vec![0u8; 56])),
        "invalid X448 parameters"
    )]
    #[case::ec_compressed_point(
        spki(
            vec![oid(AlgorithmIdentifier::OID_EC_PUBLIC_KEY), oid(NamedCurve::OID_SECP256R1)],
            BitString::new(0, [&[0x02u8][..], &[0u8; 32]].concat()),
        ),
        "invalid elliptic curve point"
    )]
    #[case::ec_unknown_curve(
        spki(
            vec![oid(AlgorithmIdentifier::OID_EC_PUBLIC_KEY), oid("1.3.132.0.10")],
            BitString::new(0, vec![0x04; 65]),
        ),
        "unknown elliptic curve 1.3.132.0.10"
    )]
    fn test_public_key_error(#[case] input: Element, #[case] expected: &str) {
        let info: SubjectPublicKeyInfo = input.decode().unwrap();

        assert_eq!(expected, info.public_key().unwrap_err().to_string());
    }

    #[rstest]
    #[case::unused_bits(
        spki(vec![oid(AlgorithmIdentifier::OID_ED25519)], BitString::new(1, vec![0u8; 32])),
        "subjectPublicKey has 1 unused bits"
    )]
    #[case::not_bit_string(
        Element::Sequence(vec![Element::Sequence(vec![oid(AlgorithmIdentifier::OID_ED25519)]), Element::Null]),
        "expected BIT STRING for subjectPublicKey"
    )]
    #[case::extra_element(
        Element::Sequence(vec![
            Element::Sequence(vec![oid(AlgorithmIdentifier::OID_ED25519)]),
            Element::BitString(BitString::new(0, vec![0u8; 32])),
            Element::Null,
        ]),
        "expected 2 elements, got 3"
    )]
    #[case::not_sequence(Element::Null, "expected SEQUENCE")]
    fn test_decode_error(#[case] input: Element, #[case] expected: &str) {
        let result: Result<SubjectPublicKeyInfo> = input.decode();

        assert_eq!(expected, result.unwrap_err().to_string());
    }

    #[test]
    fn test_from_der_trailing_data() {
        let mut der = der_of(include_str!("../../../rsaload/tests/data/rsa2048_spki.pem"));
        der.extend_from_slice(&[0x05, 0x00]);

        assert!(SubjectPublicKeyInfo::from_der(&der).is_err());
    }
}
