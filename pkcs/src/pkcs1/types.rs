use asn1::{Element, Integer};
use codec::decoder::{DecodableFrom, Decoder};
use num_bigint::BigInt;
use num_traits::One;

use super::error::{Error, Result};
use crate::decode_single;

/// Largest public exponent accepted by validation (2^31 - 1).
pub const MAX_PUBLIC_EXPONENT: i64 = (1 << 31) - 1;

/*
RFC 8017 Appendix A.1.2 - RSA Private Key Syntax

RSAPrivateKey ::= SEQUENCE {
    version           Version,
    modulus           INTEGER,  -- n
    publicExponent    INTEGER,  -- e
    privateExponent   INTEGER,  -- d
    prime1            INTEGER,  -- p
    prime2            INTEGER,  -- q
    exponent1         INTEGER,  -- d mod (p-1)
    exponent2         INTEGER,  -- d mod (q-1)
    coefficient       INTEGER,  -- (inverse of q) mod p
    otherPrimeInfos   OtherPrimeInfos OPTIONAL
}

Version ::= INTEGER { two-prime(0), multi(1) }
    (CONSTRAINED BY {-- version must be multi if otherPrimeInfos present --})

OtherPrimeInfos ::= SEQUENCE SIZE(1..MAX) OF OtherPrimeInfo

OtherPrimeInfo ::= SEQUENCE {
    prime             INTEGER,  -- ri
    exponent          INTEGER,  -- di
    coefficient       INTEGER   -- ti
}
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    TwoPrime = 0,
    Multi = 1,
}

impl TryFrom<i64> for Version {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Version::TwoPrime),
            1 => Ok(Version::Multi),
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
            _ => Err(Error::ExpectedInteger { field: "version" }),
        }
    }
}

fn integer_at(elements: &[Element], idx: usize, field: &'static str) -> Result<Integer> {
    match elements.get(idx) {
        Some(Element::Integer(int)) => Ok(int.clone()),
        _ => Err(Error::ExpectedInteger { field }),
    }
}

fn ensure_positive(value: &Integer, field: &'static str) -> Result<()> {
    if value.is_positive() {
        Ok(())
    } else {
        Err(Error::NotPositive { field })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherPrimeInfo {
    pub prime: Integer,       // ri
    pub exponent: Integer,    // di
    pub coefficient: Integer, // ti
}

impl DecodableFrom<Element> for OtherPrimeInfo {}

impl Decoder<Element, OtherPrimeInfo> for Element {
    type Error = Error;

    fn decode(&self) -> Result<OtherPrimeInfo> {
        match self {
            Element::Sequence(elements) => {
                if elements.len() != 3 {
                    return Err(Error::InvalidElementCount {
                        expected: "3",
                        actual: elements.len(),
                    });
                }
                Ok(OtherPrimeInfo {
                    prime: integer_at(elements, 0, "prime")?,
                    exponent: integer_at(elements, 1, "exponent")?,
                    coefficient: integer_at(elements, 2, "coefficient")?,
                })
            }
            _ => Err(Error::ExpectedSequence),
        }
    }
}

/// PKCS#1 RSA private key.
///
/// Decoding from an [`Element`] checks the structure and that `n`, `d` and
/// every prime are positive. [`RSAPrivateKey::from_der`] additionally runs
/// [`RSAPrivateKey::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RSAPrivateKey {
    pub version: Version,
    pub modulus: Integer,          // n
    pub public_exponent: Integer,  // e
    pub private_exponent: Integer, // d
    pub prime1: Integer,           // p
    pub prime2: Integer,           // q
    pub exponent1: Integer,        // d mod (p-1)
    pub exponent2: Integer,        // d mod (q-1)
    pub coefficient: Integer,      // (inverse of q) mod p
    pub other_prime_infos: Vec<OtherPrimeInfo>,
}

impl RSAPrivateKey {
    /// Parses a DER `RSAPrivateKey` with no trailing data and validates it.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let element = decode_single(bytes, "RSAPrivateKey")?;
        let key: RSAPrivateKey = element.decode()?;
        key.validate()?;
        Ok(key)
    }

    /// `p`, `q`, then the primes from `otherPrimeInfos`.
    pub fn primes(&self) -> impl Iterator<Item = &Integer> {
        [&self.prime1, &self.prime2]
            .into_iter()
            .chain(self.other_prime_infos.iter().map(|info| &info.prime))
    }

    /// Consistency checks on the key material:
    ///
    /// - `2 <= e <= 2^31 - 1`
    /// - every prime is greater than one and their product is `n`
    /// - `d * e == 1 (mod p - 1)` for every prime
    pub fn validate(&self) -> Result<()> {
        let e = self.public_exponent.as_bigint();
        if e < &BigInt::from(2) {
            return Err(Error::PublicExponentTooSmall);
        }
        if e > &BigInt::from(MAX_PUBLIC_EXPONENT) {
            return Err(Error::PublicExponentTooLarge);
        }

        let mut product = BigInt::one();
        for prime in self.primes() {
            if prime.as_bigint() <= &BigInt::one() {
                return Err(Error::InvalidPrime);
            }
            product *= prime.as_bigint();
        }
        if &product != self.modulus.as_bigint() {
            return Err(Error::InvalidModulus);
        }

        let de = self.private_exponent.as_bigint() * e;
        for prime in self.primes() {
            let p_minus_one = prime.as_bigint() - BigInt::one();
            if !(&de % &p_minus_one).is_one() {
                return Err(Error::InvalidExponents);
            }
        }
        Ok(())
    }
}

impl DecodableFrom<Element> for RSAPrivateKey {}

impl Decoder<Element, RSAPrivateKey> for Element {
    type Error = Error;

    fn decode(&self) -> Result<RSAPrivateKey> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence);
        };
        if !(9..=10).contains(&elements.len()) {
            return Err(Error::InvalidElementCount {
                expected: "9 or 10",
                actual: elements.len(),
            });
        }

        let version: Version = elements[0].decode()?;
        let other_prime_infos = match elements.get(9) {
            Some(Element::Sequence(infos)) => infos
                .iter()
                .map(Decoder::<Element, OtherPrimeInfo>::decode)
                .collect::<Result<Vec<_>>>()?,
            Some(_) => return Err(Error::ExpectedSequence),
            None => Vec::new(),
        };

        let key = RSAPrivateKey {
            version,
            modulus: integer_at(elements, 1, "modulus")?,
            public_exponent: integer_at(elements, 2, "publicExponent")?,
            private_exponent: integer_at(elements, 3, "privateExponent")?,
            prime1: integer_at(elements, 4, "prime1")?,
            prime2: integer_at(elements, 5, "prime2")?,
            exponent1: integer_at(elements, 6, "exponent1")?,
            exponent2: integer_at(elements, 7, "exponent2")?,
            coefficient: integer_at(elements, 8, "coefficient")?,
            other_prime_infos,
        };

        ensure_positive(&key.modulus, "modulus")?;
        ensure_positive(&key.private_exponent, "privateExponent")?;
        for prime in key.primes() {
            ensure_positive(prime, "prime")?;
        }
        Ok(key)
    }
}

/*
RFC 8017 Appendix A.1.1 - RSA Public Key Syntax

RSAPublicKey ::= SEQUENCE {
    modulus           INTEGER,  -- n
    publicExponent    INTEGER   -- e
}
*/

/// PKCS#1 RSA public key. Both values are checked to be positive on decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RSAPublicKey {
    pub modulus: Integer,         // n
    pub public_exponent: Integer, // e
}

impl RSAPublicKey {
    /// Parses a DER `RSAPublicKey` with no trailing data.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let element = decode_single(bytes, "RSAPublicKey")?;
        element.decode()
    }
}

impl DecodableFrom<Element> for RSAPublicKey {}

impl Decoder<Element, RSAPublicKey> for Element {
    type Error = Error;

    fn decode(&self) -> Result<RSAPublicKey> {
        match self {
            Element::Sequence(elements) => {
                if elements.len() != 2 {
                    return Err(Error::InvalidElementCount {
                        expected: "2",
                        actual: elements.len(),
                    });
                }
                let key = RSAPublicKey {
                    modulus: integer_at(elements, 0, "modulus")?,
                    public_exponent: integer_at(elements, 1, "publicExponent")?,
                };
                ensure_positive(&key.modulus, "modulus")?;
                ensure_positive(&key.public_exponent, "publicExponent")?;
                Ok(key)
            }
            _ => Err(Error::ExpectedSequence),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use codec::decoder::Decoder;
    use num_bigint::BigInt;
    use pem::Pem;
    use rstest::rstest;

    use super::*;
    use crate::error::EncodingError;

    const RSA2048_PKCS1: &str = include_str!("../../../rsaload/tests/data/rsa2048_pkcs1.pem");
    const RSA1024_3PRIME_PKCS1: &str =
        include_str!("../../../rsaload/tests/data/rsa1024_3prime_pkcs1.pem");
    const RSA2048_PKCS1_PUBLIC: &str =
        include_str!("../../../rsaload/tests/data/rsa2048_pkcs1_public.pem");

    fn der_of(pem: &str) -> Vec<u8> {
        let pem = Pem::from_str(pem).unwrap();
        pem.decode().unwrap()
    }

    fn int(value: i64) -> Element {
        Element::Integer(Integer::from(value))
    }

    // p = 61, q = 53, n = 3233, e = 17, d = 2753
    fn toy_key(n: i64, e: i64, d: i64) -> Element {
        Element::Sequence(vec![
            int(0),
            int(n),
            int(e),
            int(d),
            int(61),
            int(53),
            int(53),
            int(49),
            int(38),
        ])
    }

    #[test]
    fn test_from_der_two_prime() {
        let key = RSAPrivateKey::from_der(&der_of(RSA2048_PKCS1)).unwrap();

        assert_eq!(Version::TwoPrime, key.version);
        assert_eq!(2048, key.modulus.as_bigint().bits());
        assert_eq!(Some(65537), key.public_exponent.to_i64());
        assert_eq!(2, key.primes().count());
        assert!(key.other_prime_infos.is_empty());
    }

    #[test]
    fn test_from_der_multi_prime() {
        let key = RSAPrivateKey::from_der(&der_of(RSA1024_3PRIME_PKCS1)).unwrap();

        assert_eq!(Version::Multi, key.version);
        assert_eq!(1, key.other_prime_infos.len());
        assert_eq!(3, key.primes().count());
        assert_eq!(1024, key.modulus.as_bigint().bits());
    }

    #[test]
    fn test_from_der_trailing_data() {
        let mut der = der_of(RSA2048_PKCS1);
        der.extend_from_slice(&[0x05, 0x00]);

        let result = RSAPrivateKey::from_der(&der);

        assert!(matches!(
            result,
            Err(Error::Encoding(EncodingError::TrailingData("RSAPrivateKey")))
        ));
    }

    #[test]
    fn test_public_key_matches_private() {
        let private = RSAPrivateKey::from_der(&der_of(RSA2048_PKCS1)).unwrap();
        let public = RSAPublicKey::from_der(&der_of(RSA2048_PKCS1_PUBLIC)).unwrap();

        assert_eq!(private.modulus, public.modulus);
        assert_eq!(private.public_exponent, public.public_exponent);
    }

    #[test]
    fn test_validate_toy_key() {
        let key: RSAPrivateKey = toy_key(3233, 17, 2753).decode().unwrap();

        assert!(key.validate().is_ok());
        assert_eq!(
            vec![BigInt::from(61), BigInt::from(53)],
            key.primes().map(|p| p.as_bigint().clone()).collect::<Vec<_>>()
        );
    }

    #[rstest]
    #[case::exponent_too_small(toy_key(3233, 1, 2753), "public exponent too small")]
    #[case::exponent_too_large(toy_key(3233, 1 << 31, 2753), "public exponent too large")]
    #[case::modulus_mismatch(toy_key(3235, 17, 2753), "product of primes does not match the modulus")]
    #[case::bad_private_exponent(toy_key(3233, 17, 2752), "private exponent does not invert the public exponent")]
    fn test_validate_error(#[case] input: Element, #[case] expected: &str) {
        let key: RSAPrivateKey = input.decode().unwrap();

        assert_eq!(expected, key.validate().unwrap_err().to_string());
    }

    #[rstest]
    #[case::zero_modulus(toy_key(0, 17, 2753), "modulus is zero or negative")]
    #[case::negative_private_exponent(toy_key(3233, 17, -2753), "privateExponent is zero or negative")]
    #[case::bad_version(
        Element::Sequence(vec![int(2), int(3233), int(17), int(2753), int(61), int(53), int(53), int(49), int(38)]),
        "invalid version: 2 (must be 0 for two-prime or 1 for multi-prime)"
    )]
    #[case::too_few(Element::Sequence(vec![int(0), int(3233)]), "expected 9 or 10 elements, got 2")]
    #[case::not_sequence(int(0), "expected SEQUENCE")]
    #[case::not_integer(
        Element::Sequence(vec![int(0), Element::Null, int(17), int(2753), int(61), int(53), int(53), int(49), int(38)]),
        "expected INTEGER for modulus"
    )]
    fn test_decode_private_key_error(#[case] input: Element, #[case] expected: &str) {
        let result: Result<RSAPrivateKey> = input.decode();

        assert_eq!(expected, result.unwrap_err().to_string());
    }

    #[rstest]
    #[case(Element::Sequence(vec![int(3233), int(17)]), Some((3233, 17)))]
    #[case(Element::Sequence(vec![int(3233), int(0)]), None)]
    #[case(Element::Sequence(vec![int(-3233), int(17)]), None)]
    #[case(Element::Sequence(vec![int(3233), int(17), int(1)]), None)]
    #[case(Element::Sequence(vec![int(3233)]), None)]
    fn test_decode_public_key(#[case] input: Element, #[case] expected: Option<(i64, i64)>) {
        let result: Result<RSAPublicKey> = input.decode();

        match expected {
            Some((n, e)) => {
                let key = result.unwrap();
                assert_eq!(Some(n), key.modulus.to_i64());
                assert_eq!(Some(e), key.public_exponent.to_i64());
            }
            None => assert!(result.is_err()),
        }
    }
}
