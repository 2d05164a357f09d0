//! PKCS#8: Private-Key Information Syntax Specification
//!
//! This module implements [RFC 5958](https://datatracker.ietf.org/doc/html/rfc5958) (Asymmetric Key Packages)
//! which obsoletes RFC 5208 (PKCS#8 v1.2), and the PBES2 scheme of
//! [RFC 8018](https://datatracker.ietf.org/doc/html/rfc8018) used by `ENCRYPTED PRIVATE KEY`.

mod encrypted;

pub mod error;
pub mod types;

pub use encrypted::{
    EncryptedPrivateKeyInfo, MAX_ITERATION_COUNT, Pbes2Params, Pbkdf2Params, Prf,
};
pub use error::{Error, Result};
pub use types::{OneAsymmetricKey, PrivateKey, PrivateKeyInfo, Version};
