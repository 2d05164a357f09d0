//! Load RSA keys from PEM, whatever encoding the producing tool picked.
//!
//! A PEM label says little about the bytes under it: `RSA PRIVATE KEY` may
//! hold PKCS#1, PKCS#8 or a container-less structure, and `PUBLIC KEY`
//! sometimes holds private material. Each loader decrypts the block when it
//! is password protected, then tries the known encodings in a fixed order
//! and keeps the first that parses:
//!
//! | Loader | Labels | Order |
//! |---|---|---|
//! | [`load_private_key`] | `PRIVATE KEY`, `ENCRYPTED PRIVATE KEY`, `RSA PRIVATE KEY` | PKCS#1, PKCS#8, raw |
//! | [`load_public_key`] | the above plus `PUBLIC KEY`, `RSA PUBLIC KEY` | PKIX, PKCS#1, PKCS#8, raw |
//!
//! Keys of any other algorithm are rejected with
//! [`Error::UnsupportedKeyType`].
//!
//! ```no_run
//! let key = rsaload::load_private_key_from_file("server.key", "")?;
//! println!("{} bit modulus", key.bits());
//! # Ok::<(), rsaload::Error>(())
//! ```

#![forbid(unsafe_code)]

use std::path::Path;

mod cascade;
mod decoded;
mod envelope;
mod error;
mod key;
mod normalize;

pub use error::{DecryptError, Error, Result};
pub use key::{RsaPrivateKey, RsaPublicKey};
pub use num_bigint::BigUint;
pub use pkcs::{KeyAlgorithm, KeyKind, NamedCurve};

/// Loads an RSA private key from PEM bytes.
///
/// `password` is only used when the block is encrypted, in which case it
/// must not be empty.
pub fn load_private_key(pem: &[u8], password: &str) -> Result<RsaPrivateKey> {
    let block = envelope::open(pem, password)?;
    let key = cascade::PRIVATE.resolve(&block.label, &block.bytes)?;
    normalize::private_key(key)
}

pub fn load_private_key_from_file(
    path: impl AsRef<Path>,
    password: &str,
) -> Result<RsaPrivateKey> {
    let pem = std::fs::read(path)?;
    load_private_key(&pem, password)
}

/// Loads an RSA public key from PEM bytes.
///
/// Private keys are accepted too and reduced to their public half.
pub fn load_public_key(pem: &[u8], password: &str) -> Result<RsaPublicKey> {
    let block = envelope::open(pem, password)?;
    let key = cascade::PUBLIC.resolve(&block.label, &block.bytes)?;
    normalize::public_key(key)
}

pub fn load_public_key_from_file(path: impl AsRef<Path>, password: &str) -> Result<RsaPublicKey> {
    let pem = std::fs::read(path)?;
    load_public_key(&pem, password)
}
