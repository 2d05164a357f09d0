use asn1::{Element, Integer};
use codec::decoder::{DecodableFrom, Decoder};

use super::error::{Error, Result};
use crate::decode_first;

/*
RawRSAPrivateKey ::= SEQUENCE {
    publicKey         SEQUENCE { modulus INTEGER, publicExponent INTEGER, ... },
    privateExponent   INTEGER,
    primes            SEQUENCE OF INTEGER,
    ...
}

RawRSAPublicKey ::= SEQUENCE {
    modulus           INTEGER,
    publicExponent    INTEGER,
    ...
}
*/

fn positive_at(elements: &[Element], idx: usize, field: &'static str) -> Result<Integer> {
    match elements.get(idx) {
        Some(Element::Integer(int)) if int.is_positive() => Ok(int.clone()),
        Some(Element::Integer(_)) => Err(Error::NotPositive { field }),
        _ => Err(Error::ExpectedInteger { field }),
    }
}

/// RSA private key without version, CRT values or validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRSAPrivateKey {
    pub modulus: Integer,
    pub public_exponent: Integer,
    pub private_exponent: Integer,
    pub primes: Vec<Integer>,
}

impl RawRSAPrivateKey {
    /// Reads the first DER element of `bytes`; anything after it is ignored.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        decode_first(bytes)?.decode()
    }
}

impl DecodableFrom<Element> for RawRSAPrivateKey {}

impl Decoder<Element, RawRSAPrivateKey> for Element {
    type Error = Error;

    fn decode(&self) -> Result<RawRSAPrivateKey> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence { field: "key" });
        };

        let (modulus, public_exponent) = match elements.first() {
            Some(Element::Sequence(public)) => (
                positive_at(public, 0, "modulus")?,
                positive_at(public, 1, "publicExponent")?,
            ),
            _ => return Err(Error::ExpectedSequence { field: "publicKey" }),
        };
        let private_exponent = positive_at(elements, 1, "privateExponent")?;
        let primes = match elements.get(2) {
            Some(Element::Sequence(primes)) => (0..primes.len())
                .map(|idx| positive_at(primes, idx, "prime"))
                .collect::<Result<Vec<_>>>()?,
            _ => return Err(Error::ExpectedSequence { field: "primes" }),
        };
        if primes.len() < 2 {
            return Err(Error::TooFewPrimes(primes.len()));
        }

        Ok(RawRSAPrivateKey {
            modulus,
            public_exponent,
            private_exponent,
            primes,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRSAPublicKey {
    pub modulus: Integer,
    pub public_exponent: Integer,
}

impl RawRSAPublicKey {
    /// Reads the first DER element of `bytes`; anything after it is ignored.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        decode_first(bytes)?.decode()
    }
}

impl DecodableFrom<Element> for RawRSAPublicKey {}

impl Decoder<Element, RawRSAPublicKey> for Element {
    type Error = Error;

    fn decode(&self) -> Result<RawRSAPublicKey> {
        match self {
            Element::Sequence(elements) => Ok(RawRSAPublicKey {
                modulus: positive_at(elements, 0, "modulus")?,
                public_exponent: positive_at(elements, 1, "publicExponent")?,
            }),
            _ => Err(Error::ExpectedSequence { field: "key" }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pem::Pem;
    use rstest::rstest;

    use super::*;
    use crate::pkcs1::{RSAPrivateKey, RSAPublicKey};

    fn der_of(pem: &str) -> Vec<u8> {
        let pem = Pem::from_str(pem).unwrap();
        pem.decode().unwrap()
    }

    fn int(value: i64) -> Element {
        Element::Integer(Integer::from(value))
    }

    fn seq(elements: Vec<Element>) -> Element {
        Element::Sequence(elements)
    }

    #[test]
    fn test_raw_private_key_matches_pkcs1() {
        let raw = der_of(include_str!("../../../rsaload/tests/data/rsa2048_raw.pem"));
        let pkcs1 = der_of(include_str!("../../../rsaload/tests/data/rsa2048_pkcs1.pem"));

        let key = RawRSAPrivateKey::from_der(&raw).unwrap();
        let expected = RSAPrivateKey::from_der(&pkcs1).unwrap();

        assert_eq!(expected.modulus, key.modulus);
        assert_eq!(expected.public_exponent, key.public_exponent);
        assert_eq!(expected.private_exponent, key.private_exponent);
        assert_eq!(vec![expected.prime1, expected.prime2], key.primes);
    }

    #[test]
    fn test_raw_private_key_ignores_trailing_data() {
        let mut der = der_of(include_str!("../../../rsaload/tests/data/rsa2048_raw.pem"));
        der.extend_from_slice(&[0x05, 0x00, 0xff]);

        assert!(RawRSAPrivateKey::from_der(&der).is_ok());
    }

    #[rstest]
    #[case::extra_members(
        seq(vec![seq(vec![int(3233), int(17), int(1)]), int(2753), seq(vec![int(61), int(53)]), Element::Null]),
        3233,
        2
    )]
    #[case::three_primes(
        seq(vec![seq(vec![int(3233), int(17)]), int(2753), seq(vec![int(61), int(53), int(7)])]),
        3233,
        3
    )]
    fn test_decode_raw_private_key(
        #[case] input: Element,
        #[case] expected_modulus: i64,
        #[case] expected_primes: usize,
    ) {
        let key: RawRSAPrivateKey = input.decode().unwrap();

        assert_eq!(Integer::from(expected_modulus), key.modulus);
        assert_eq!(expected_primes, key.primes.len());
    }

    #[rstest]
    #[case::not_sequence(int(1), "expected SEQUENCE for key")]
    #[case::flat(
        seq(vec![int(3233), int(17), int(2753)]),
        "expected SEQUENCE for publicKey"
    )]
    #[case::zero_modulus(
        seq(vec![seq(vec![int(0), int(17)]), int(2753), seq(vec![int(61), int(53)])]),
        "modulus is zero or negative"
    )]
    #[case::negative_exponent(
        seq(vec![seq(vec![int(3233), int(17)]), int(-2753), seq(vec![int(61), int(53)])]),
        "privateExponent is zero or negative"
    )]
    #[case::missing_primes(
        seq(vec![seq(vec![int(3233), int(17)]), int(2753)]),
        "expected SEQUENCE for primes"
    )]
    #[case::one_prime(
        seq(vec![seq(vec![int(3233), int(17)]), int(2753), seq(vec![int(3233)])]),
        "expected at least 2 primes, got 1"
    )]
    #[case::prime_not_integer(
        seq(vec![seq(vec![int(3233), int(17)]), int(2753), seq(vec![int(61), Element::Null])]),
        "expected INTEGER for prime"
    )]
    fn test_decode_raw_private_key_error(#[case] input: Element, #[case] expected: &str) {
        let result: Result<RawRSAPrivateKey> = input.decode();

        assert_eq!(expected, result.unwrap_err().to_string());
    }

    #[test]
    fn test_raw_public_key_matches_pkcs1() {
        let der = der_of(include_str!("../../../rsaload/tests/data/rsa2048_pkcs1_public.pem"));

        let key = RawRSAPublicKey::from_der(&der).unwrap();
        let expected = RSAPublicKey::from_der(&der).unwrap();

        assert_eq!(expected.modulus, key.modulus);
        assert_eq!(expected.public_exponent, key.public_exponent);
    }

    #[rstest]
    #[case::trailing_members(seq(vec![int(3233), int(17), Element::Null]), Ok((3233, 17)))]
    #[case::missing_exponent(seq(vec![int(3233)]), Err("expected INTEGER for publicExponent"))]
    #[case::zero_exponent(seq(vec![int(3233), int(0)]), Err("publicExponent is zero or negative"))]
    #[case::not_sequence(Element::Null, Err("expected SEQUENCE for key"))]
    fn test_decode_raw_public_key(
        #[case] input: Element,
        #[case] expected: std::result::Result<(i64, i64), &str>,
    ) {
        let result: Result<RawRSAPublicKey> = input.decode();

        match expected {
            Ok((n, e)) => {
                let key = result.unwrap();
                assert_eq!(Integer::from(n), key.modulus);
                assert_eq!(Integer::from(e), key.public_exponent);
            }
            Err(message) => assert_eq!(message, result.unwrap_err().to_string()),
        }
    }

    #[rstest]
    #[case::empty(&[])]
    #[case::garbage(b"this is definitely not a key")]
    fn test_from_der_error(#[case] input: &[u8]) {
        assert!(RawRSAPrivateKey::from_der(input).is_err());
        assert!(RawRSAPublicKey::from_der(input).is_err());
    }
}
