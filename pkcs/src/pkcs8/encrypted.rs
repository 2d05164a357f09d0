//! RFC 5958 EncryptedPrivateKeyInfo with RFC 8018 PBES2 decryption.
//!
//! Only PBES2 with PBKDF2 is understood. The key derivation PRF is one of
//! the HMAC-SHA family and the cipher one of the CBC ciphers shared with
//! legacy PEM encryption.

use asn1::{Element, OctetString};
use codec::decoder::{DecodableFrom, Decoder};
use pem::encryption::Cipher;

use super::error::{Error, Result};
use crate::algorithm::{AlgorithmIdentifier, AlgorithmParameters};
use crate::decode_single;

/// Largest PBKDF2 `iterationCount` accepted. Larger counts are rejected
/// before any key derivation runs.
pub const MAX_ITERATION_COUNT: u32 = 10_000_000;

/*
RFC 5958 Section 3

EncryptedPrivateKeyInfo ::= SEQUENCE {
    encryptionAlgorithm  EncryptionAlgorithmIdentifier,
    encryptedData        EncryptedData
}

EncryptedData ::= OCTET STRING

RFC 8018 Appendix A.2 and A.4

PBES2-params ::= SEQUENCE {
    keyDerivationFunc AlgorithmIdentifier {{PBES2-KDFs}},
    encryptionScheme  AlgorithmIdentifier {{PBES2-Encs}}
}

PBKDF2-params ::= SEQUENCE {
    salt CHOICE {
        specified       OCTET STRING,
        otherSource     AlgorithmIdentifier {{PBKDF2-SaltSources}}
    },
    iterationCount      INTEGER (1..MAX),
    keyLength           INTEGER (1..MAX) OPTIONAL,
    prf                 AlgorithmIdentifier {{PBKDF2-PRFs}} DEFAULT algid-hmacWithSHA1
}
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedPrivateKeyInfo {
    pub encryption_algorithm: AlgorithmIdentifier,
    pub encrypted_data: OctetString,
}

impl EncryptedPrivateKeyInfo {
    /// Parses a DER `EncryptedPrivateKeyInfo` with no trailing data.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let element = decode_single(bytes, "EncryptedPrivateKeyInfo")?;
        element.decode()
    }

    /// PBES2 parameters of `encryptionAlgorithm`.
    pub fn pbes2_params(&self) -> Result<Pbes2Params> {
        let algorithm = &self.encryption_algorithm;
        if algorithm.algorithm().to_string() != AlgorithmIdentifier::OID_PBES2 {
            return Err(Error::UnsupportedEncryptionScheme(
                algorithm.algorithm().clone(),
            ));
        }
        algorithm
            .parameter_element()
            .ok_or(Error::InvalidPbes2Parameters("missing parameters"))?
            .decode()
    }

    /// Decrypts `encryptedData`, returning the DER `PrivateKeyInfo`.
    ///
    /// A wrong password shows up as bad padding or as a plaintext that is
    /// not one DER element, and is reported as
    /// [`pem::encryption::error::Error::IncorrectPassword`].
    pub fn decrypt(&self, password: &[u8]) -> Result<Vec<u8>> {
        let params = self.pbes2_params()?;
        let key = params.kdf.derive_key(password, params.cipher.key_len());
        Ok(params
            .cipher
            .decrypt_der(&key, &params.iv, self.encrypted_data.as_bytes())?)
    }
}

impl DecodableFrom<Element> for EncryptedPrivateKeyInfo {}

impl Decoder<Element, EncryptedPrivateKeyInfo> for Element {
    type Error = Error;

    fn decode(&self) -> Result<EncryptedPrivateKeyInfo> {
        match self {
            Element::Sequence(elements) => {
                if elements.len() != 2 {
                    return Err(Error::InvalidElementCount {
                        expected: "2",
                        actual: elements.len(),
                    });
                }

                let encryption_algorithm: AlgorithmIdentifier = elements[0].decode()?;
                let encrypted_data = match &elements[1] {
                    Element::OctetString(data) => data.clone(),
                    _ => {
                        return Err(Error::ExpectedOctetString {
                            field: "encryptedData",
                        });
                    }
                };

                Ok(EncryptedPrivateKeyInfo {
                    encryption_algorithm,
                    encrypted_data,
                })
            }
            _ => Err(Error::ExpectedSequence),
        }
    }
}

/// PBKDF2 pseudorandom function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Prf {
    #[default]
    HmacSha1,
    HmacSha224,
    HmacSha256,
    HmacSha384,
    HmacSha512,
}

impl Prf {
    fn derive(&self, password: &[u8], salt: &[u8], rounds: u32, out: &mut [u8]) {
        match self {
            Prf::HmacSha1 => pbkdf2::pbkdf2_hmac::<sha1::Sha1>(password, salt, rounds, out),
            Prf::HmacSha224 => pbkdf2::pbkdf2_hmac::<sha2::Sha224>(password, salt, rounds, out),
            Prf::HmacSha256 => pbkdf2::pbkdf2_hmac::<sha2::Sha256>(password, salt, rounds, out),
            Prf::HmacSha384 => pbkdf2::pbkdf2_hmac::<sha2::Sha384>(password, salt, rounds, out),
            Prf::HmacSha512 => pbkdf2::pbkdf2_hmac::<sha2::Sha512>(password, salt, rounds, out),
        }
    }
}

impl DecodableFrom<Element> for Prf {}

impl Decoder<Element, Prf> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Prf> {
        let algorithm: AlgorithmIdentifier = self.decode()?;
        if algorithm.parameter_element().is_some() {
            return Err(Error::InvalidPbes2Parameters("PRF parameters must be NULL"));
        }
        match algorithm.algorithm().to_string().as_str() {
            AlgorithmIdentifier::OID_HMAC_WITH_SHA1 => Ok(Prf::HmacSha1),
            AlgorithmIdentifier::OID_HMAC_WITH_SHA224 => Ok(Prf::HmacSha224),
            AlgorithmIdentifier::OID_HMAC_WITH_SHA256 => Ok(Prf::HmacSha256),
            AlgorithmIdentifier::OID_HMAC_WITH_SHA384 => Ok(Prf::HmacSha384),
            AlgorithmIdentifier::OID_HMAC_WITH_SHA512 => Ok(Prf::HmacSha512),
            _ => Err(Error::UnsupportedPrf(algorithm.algorithm().clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pbkdf2Params {
    pub salt: Vec<u8>,
    pub iteration_count: u32,
    pub key_length: Option<usize>,
    pub prf: Prf,
}

impl Pbkdf2Params {
    pub fn derive_key(&self, password: &[u8], key_len: usize) -> Vec<u8> {
        let mut key = vec![0u8; key_len];
        self.prf
            .derive(password, &self.salt, self.iteration_count, &mut key);
        key
    }
}

impl DecodableFrom<Element> for Pbkdf2Params {}

impl Decoder<Element, Pbkdf2Params> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Pbkdf2Params> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence);
        };
        let mut iter = elements.iter().peekable();

        let salt = match iter.next() {
            Some(Element::OctetString(salt)) => salt.as_bytes().to_vec(),
            Some(Element::Sequence(_)) => return Err(Error::UnsupportedSaltSource),
            _ => return Err(Error::ExpectedOctetString { field: "salt" }),
        };

        let iteration_count = match iter.next() {
            Some(Element::Integer(count)) => count
                .to_u32()
                .filter(|count| (1..=MAX_ITERATION_COUNT).contains(count))
                .ok_or(Error::InvalidIterationCount)?,
            _ => {
                return Err(Error::ExpectedInteger {
                    field: "iterationCount",
                });
            }
        };

        let key_length = match iter.next_if(|element| matches!(element, Element::Integer(_))) {
            Some(Element::Integer(length)) => {
                let length = length
                    .to_u32()
                    .filter(|length| *length > 0)
                    .ok_or(Error::InvalidPbes2Parameters("keyLength"))?;
                Some(length as usize)
            }
            _ => None,
        };

        let prf = match iter.next() {
            Some(element) => element.decode()?,
            None => Prf::default(),
        };

        if iter.next().is_some() {
            return Err(Error::InvalidPbes2Parameters("unexpected PBKDF2 parameter"));
        }

        Ok(Pbkdf2Params {
            salt,
            iteration_count,
            key_length,
            prf,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pbes2Params {
    pub kdf: Pbkdf2Params,
    pub cipher: Cipher,
    pub iv: Vec<u8>,
}

fn cipher_from_oid(algorithm: &AlgorithmIdentifier) -> Result<Cipher> {
    match algorithm.algorithm().to_string().as_str() {
        AlgorithmIdentifier::OID_AES128_CBC => Ok(Cipher::Aes128Cbc),
        AlgorithmIdentifier::OID_AES192_CBC => Ok(Cipher::Aes192Cbc),
        AlgorithmIdentifier::OID_AES256_CBC => Ok(Cipher::Aes256Cbc),
        AlgorithmIdentifier::OID_DES_EDE3_CBC => Ok(Cipher::DesEde3Cbc),
        _ => Err(Error::UnsupportedCipher(algorithm.algorithm().clone())),
    }
}

impl DecodableFrom<Element> for Pbes2Params {}

impl Decoder<Element, Pbes2Params> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Pbes2Params> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence);
        };
        let [kdf, scheme] = elements.as_slice() else {
            return Err(Error::InvalidElementCount {
                expected: "2",
                actual: elements.len(),
            });
        };

        let kdf: AlgorithmIdentifier = kdf.decode()?;
        if kdf.algorithm().to_string() != AlgorithmIdentifier::OID_PBKDF2 {
            return Err(Error::UnsupportedKdf(kdf.algorithm().clone()));
        }
        let kdf: Pbkdf2Params = kdf
            .parameter_element()
            .ok_or(Error::InvalidPbes2Parameters("missing PBKDF2 parameters"))?
            .decode()?;

        let scheme: AlgorithmIdentifier = scheme.decode()?;
        let cipher = cipher_from_oid(&scheme)?;
        let iv = match scheme.parameters() {
            Some(AlgorithmParameters::Other(Element::OctetString(iv))) => iv.as_bytes().to_vec(),
            _ => return Err(Error::InvalidPbes2Parameters("cipher IV")),
        };
        if iv.len() != cipher.block_size() {
            return Err(Error::InvalidIvLength {
                expected: cipher.block_size(),
                actual: iv.len(),
            });
        }
        if let Some(length) = kdf.key_length {
            if length != cipher.key_len() {
                return Err(Error::KeyLengthMismatch {
                    expected: cipher.key_len(),
                    actual: length,
                });
            }
        }

        Ok(Pbes2Params { kdf, cipher, iv })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use asn1::{Integer, ObjectIdentifier};
    use codec::decoder::Decoder;
    use pem::{Label, Pem};
    use rstest::rstest;

    use super::*;
    use crate::pkcs1::RSAPrivateKey;
    use crate::pkcs8::{OneAsymmetricKey, PrivateKey};

    const PBES2_PEM: &str = include_str!("../../../rsaload/tests/data/rsa2048_pbes2.pem");
    const PKCS1_PEM: &str = include_str!("../../../rsaload/tests/data/rsa2048_pkcs1.pem");
    const PASSWORD: &[u8] = b"correct-horse";

    fn der_of(pem: &str) -> Vec<u8> {
        let pem = Pem::from_str(pem).unwrap();
        pem.decode().unwrap()
    }

    fn oid(s: &str) -> Element {
        Element::ObjectIdentifier(ObjectIdentifier::from_str(s).unwrap())
    }

    fn int(value: i64) -> Element {
        Element::Integer(Integer::from(value))
    }

    fn pbkdf2(params: Vec<Element>) -> Element {
        Element::Sequence(vec![oid(AlgorithmIdentifier::OID_PBKDF2), Element::Sequence(params)])
    }

    fn aes128(iv_len: usize) -> Element {
        Element::Sequence(vec![
            oid(AlgorithmIdentifier::OID_AES128_CBC),
            Element::OctetString(OctetString::from(vec![0u8; iv_len])),
        ])
    }

    fn salt() -> Element {
        Element::OctetString(OctetString::from(vec![1u8; 8]))
    }

    #[test]
    fn test_pbes2_params_from_fixture() {
        let info = EncryptedPrivateKeyInfo::from_der(&der_of(PBES2_PEM)).unwrap();

        let params = info.pbes2_params().unwrap();

        assert_eq!(Prf::HmacSha256, params.kdf.prf);
        assert_eq!(2048, params.kdf.iteration_count);
        assert_eq!(None, params.kdf.key_length);
        assert_eq!(vec![0x90, 0xe5, 0xb6, 0xd1, 0xa4, 0xf0, 0x7e, 0x17], params.kdf.salt);
        assert_eq!(Cipher::Aes256Cbc, params.cipher);
        assert_eq!(16, params.iv.len());
        assert_eq!(&[0x6a, 0x62, 0x6f, 0x15], &params.iv[..4]);
    }

    #[test]
    fn test_decrypt() {
        let pem = Pem::from_str(PBES2_PEM).unwrap();
        assert_eq!(&Label::EncryptedPrivateKey, pem.label());
        let der: Vec<u8> = pem.decode().unwrap();
        let info = EncryptedPrivateKeyInfo::from_der(&der).unwrap();

        let plaintext = info.decrypt(PASSWORD).unwrap();

        assert_eq!(&[0x30, 0x82, 0x04, 0xbe], &plaintext[..4]);
        let key = OneAsymmetricKey::from_der(&plaintext)
            .unwrap()
            .private_key()
            .unwrap();
        assert_eq!(
            PrivateKey::Rsa(RSAPrivateKey::from_der(&der_of(PKCS1_PEM)).unwrap()),
            key
        );
    }

    // "wrong-242" and "wrong-117" decrypt to validly padded garbage.
    #[rstest]
    #[case::bad_padding(b"wrong-password")]
    #[case::valid_padding(b"wrong-242")]
    #[case::valid_padding_high_tag(b"wrong-117")]
    fn test_decrypt_wrong_password(#[case] password: &[u8]) {
        let info = EncryptedPrivateKeyInfo::from_der(&der_of(PBES2_PEM)).unwrap();

        let err = info.decrypt(password).unwrap_err();

        assert!(matches!(
            err,
            Error::Cipher(pem::encryption::error::Error::IncorrectPassword)
        ));
        assert_eq!("decryption password incorrect", err.to_string());
    }

    // RFC 6070 test vector 1
    #[test]
    fn test_pbkdf2_hmac_sha1() {
        let params = Pbkdf2Params {
            salt: b"salt".to_vec(),
            iteration_count: 1,
            key_length: None,
            prf: Prf::HmacSha1,
        };

        let key = params.derive_key(b"password", 20);

        assert_eq!(
            vec![
                0x0c, 0x60, 0xc8, 0x0f, 0x96, 0x1f, 0x0e, 0x71, 0xf3, 0xa9, 0xb5, 0x24, 0xaf, 0x60,
                0x12, 0x06, 0x2f, 0xe0, 0x37, 0xa6
            ],
            key
        );
    }

    #[rstest]
    #[case::default_prf(vec![salt(), int(1000)], Prf::HmacSha1, None)]
    #[case::key_length(vec![salt(), int(1000), int(16)], Prf::HmacSha1, Some(16))]
    #[case::sha512(
        vec![salt(), int(1000), Element::Sequence(vec![oid(AlgorithmIdentifier::OID_HMAC_WITH_SHA512), Element::Null])],
        Prf::HmacSha512,
        None
    )]
    #[case::sha224_no_params(
        vec![salt(), int(1000), int(16), Element::Sequence(vec![oid(AlgorithmIdentifier::OID_HMAC_WITH_SHA224)])],
        Prf::HmacSha224,
        Some(16)
    )]
    fn test_decode_pbes2_params(
        #[case] kdf_params: Vec<Element>,
        #[case] expected_prf: Prf,
        #[case] expected_key_length: Option<usize>,
    ) {
        let element = Element::Sequence(vec![pbkdf2(kdf_params), aes128(16)]);

        let params: Pbes2Params = element.decode().unwrap();

        assert_eq!(expected_prf, params.kdf.prf);
        assert_eq!(expected_key_length, params.kdf.key_length);
        assert_eq!(1000, params.kdf.iteration_count);
        assert_eq!(Cipher::Aes128Cbc, params.cipher);
    }

    #[test]
    fn test_decode_pbes2_params_iteration_limit() {
        let limit = i64::from(MAX_ITERATION_COUNT);
        let element = Element::Sequence(vec![pbkdf2(vec![salt(), int(limit)]), aes128(16)]);

        let params: Pbes2Params = element.decode().unwrap();

        assert_eq!(MAX_ITERATION_COUNT, params.kdf.iteration_count);
    }

    #[rstest]
    #[case::zero_iterations(
        Element::Sequence(vec![pbkdf2(vec![salt(), int(0)]), aes128(16)]),
        "PBKDF2 iteration count must be between 1 and 10000000"
    )]
    #[case::too_many_iterations(
        Element::Sequence(vec![pbkdf2(vec![salt(), int(10_000_001)]), aes128(16)]),
        "PBKDF2 iteration count must be between 1 and 10000000"
    )]
    #[case::iterations_beyond_u32(
        Element::Sequence(vec![pbkdf2(vec![salt(), int(1 << 40)]), aes128(16)]),
        "PBKDF2 iteration count must be between 1 and 10000000"
    )]
    #[case::key_length_mismatch(
        Element::Sequence(vec![pbkdf2(vec![salt(), int(1000), int(32)]), aes128(16)]),
        "PBKDF2 key length 32 does not match the cipher key length 16"
    )]
    #[case::short_iv(
        Element::Sequence(vec![pbkdf2(vec![salt(), int(1000)]), aes128(8)]),
        "invalid IV length: expected 16, got 8"
    )]
    #[case::unknown_prf(
        Element::Sequence(vec![
            pbkdf2(vec![salt(), int(1000), Element::Sequence(vec![oid("1.2.840.113549.2.5"), Element::Null])]),
            aes128(16),
        ]),
        "unsupported PBKDF2 PRF 1.2.840.113549.2.5"
    )]
    #[case::scrypt(
        Element::Sequence(vec![
            Element::Sequence(vec![oid("1.3.6.1.4.1.11591.4.11"), Element::Sequence(vec![salt(), int(16384), int(8), int(1)])]),
            aes128(16),
        ]),
        "unsupported key derivation function 1.3.6.1.4.1.11591.4.11"
    )]
    #[case::unknown_cipher(
        Element::Sequence(vec![
            pbkdf2(vec![salt(), int(1000)]),
            Element::Sequence(vec![oid("1.2.840.113549.3.2"), Element::OctetString(OctetString::from(vec![0u8; 8]))]),
        ]),
        "unsupported cipher 1.2.840.113549.3.2"
    )]
    #[case::salt_source(
        Element::Sequence(vec![pbkdf2(vec![Element::Sequence(vec![oid("1.2.3.4")]), int(1000)]), aes128(16)]),
        "unsupported PBKDF2 salt source"
    )]
    fn test_decode_pbes2_params_error(#[case] input: Element, #[case] expected: &str) {
        let result: Result<Pbes2Params> = input.decode();

        assert_eq!(expected, result.unwrap_err().to_string());
    }

    #[test]
    fn test_unsupported_scheme() {
        // pbeWithMD5AndDES-CBC (PBES1)
        let element = Element::Sequence(vec![
            Element::Sequence(vec![
                oid("1.2.840.113549.1.5.3"),
                Element::Sequence(vec![salt(), int(2048)]),
            ]),
            Element::OctetString(OctetString::from(vec![0u8; 16])),
        ]);
        let info: EncryptedPrivateKeyInfo = element.decode().unwrap();

        let err = info.decrypt(PASSWORD).unwrap_err();

        assert_eq!(
            "unsupported encryption scheme 1.2.840.113549.1.5.3",
            err.to_string()
        );
    }
}
