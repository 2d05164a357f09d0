//! Ordered format fallback.
//!
//! A PEM label does not reliably say how its bytes are encoded, so each
//! loader walks a fixed list of decoders and keeps the first one that
//! accepts the bytes. When every decoder fails, only the error of the final
//! fallback is returned.

use log::{debug, trace};
use pem::Label;
use pkcs::pkcs1::RSAPrivateKey;
use pkcs::pkcs8::{OneAsymmetricKey, PrivateKey};
use pkcs::raw::{RawRSAPrivateKey, RawRSAPublicKey};
use pkcs::spki::{PublicKey, SubjectPublicKeyInfo};
use pkcs::{KeyKind, Result as PkcsResult};

use crate::decoded::DecodedKey;
use crate::error::{Error, Result};
use crate::key::{RsaPrivateKey, RsaPublicKey};

/// One binary encoding the cascade can try.
pub(crate) struct Format {
    pub(crate) name: &'static str,
    pub(crate) decode: fn(&[u8]) -> PkcsResult<DecodedKey>,
}

impl Format {
    fn attempt(&self, bytes: &[u8]) -> Result<DecodedKey> {
        (self.decode)(bytes).map_err(|source| Error::Decode {
            format: self.name,
            source,
        })
    }
}

pub(crate) struct Cascade {
    labels: &'static [&'static str],
    formats: &'static [Format],
    /// Tried last; its error is the one reported.
    fallback: Format,
}

impl Cascade {
    pub(crate) fn resolve(&self, label: &Label, bytes: &[u8]) -> Result<DecodedKey> {
        if !self.labels.contains(&label.as_str()) {
            return Err(Error::UnsupportedBlockType(label.to_string()));
        }

        for format in self.formats {
            match format.attempt(bytes) {
                Ok(key) => {
                    debug!("{label} block decoded as {}", format.name);
                    return Ok(key);
                }
                Err(err) => trace!("{label} block is not {}: {err}", format.name),
            }
        }

        let key = self.fallback.attempt(bytes)?;
        debug!("{label} block decoded as {}", self.fallback.name);
        Ok(key)
    }
}

const PKCS1: Format = Format {
    name: "PKCS#1",
    decode: decode_pkcs1,
};

const PKCS8: Format = Format {
    name: "PKCS#8",
    decode: decode_pkcs8,
};

const PKIX: Format = Format {
    name: "PKIX",
    decode: decode_pkix,
};

pub(crate) const PRIVATE: Cascade = Cascade {
    labels: &["PRIVATE KEY", "ENCRYPTED PRIVATE KEY", "RSA PRIVATE KEY"],
    formats: &[PKCS1, PKCS8],
    fallback: Format {
        name: "raw RSA private key",
        decode: decode_raw_private,
    },
};

pub(crate) const PUBLIC: Cascade = Cascade {
    labels: &[
        "PUBLIC KEY",
        "PRIVATE KEY",
        "ENCRYPTED PRIVATE KEY",
        "RSA PUBLIC KEY",
        "RSA PRIVATE KEY",
    ],
    formats: &[PKIX, PKCS1, PKCS8],
    fallback: Format {
        name: "raw RSA public key",
        decode: decode_raw_public,
    },
};

fn decode_pkcs1(bytes: &[u8]) -> PkcsResult<DecodedKey> {
    let key = RSAPrivateKey::from_der(bytes)?;
    Ok(DecodedKey::RsaPrivate(RsaPrivateKey::from(&key)))
}

fn decode_pkcs8(bytes: &[u8]) -> PkcsResult<DecodedKey> {
    let key = match OneAsymmetricKey::from_der(bytes)?.private_key()? {
        PrivateKey::Rsa(key) => DecodedKey::RsaPrivate(RsaPrivateKey::from(&key)),
        PrivateKey::Foreign(algorithm) => DecodedKey::Foreign(KeyKind::Private(algorithm)),
    };
    Ok(key)
}

fn decode_pkix(bytes: &[u8]) -> PkcsResult<DecodedKey> {
    let key = match SubjectPublicKeyInfo::from_der(bytes)?.public_key()? {
        PublicKey::Rsa(key) => DecodedKey::RsaPublic(RsaPublicKey::from(&key)),
        PublicKey::Foreign(algorithm) => DecodedKey::Foreign(KeyKind::Public(algorithm)),
    };
    Ok(key)
}

fn decode_raw_private(bytes: &[u8]) -> PkcsResult<DecodedKey> {
    let key = RawRSAPrivateKey::from_der(bytes)?;
    Ok(DecodedKey::RsaPrivate(RsaPrivateKey::from(&key)))
}

fn decode_raw_public(bytes: &[u8]) -> PkcsResult<DecodedKey> {
    let key = RawRSAPublicKey::from_der(bytes)?;
    Ok(DecodedKey::RsaPublic(RsaPublicKey::from(&key)))
}
