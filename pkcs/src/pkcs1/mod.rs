//! PKCS#1: RSA Cryptography Specifications
//!
//! This module implements the RSA key structures of
//! [RFC 8017](https://datatracker.ietf.org/doc/html/rfc8017), including the
//! multi-prime form.

pub mod error;
mod types;

pub use error::{Error, Result};
pub use types::{MAX_PUBLIC_EXPONENT, OtherPrimeInfo, RSAPrivateKey, RSAPublicKey, Version};
