//! SEC1 - Elliptic Curve Private Key Structure
//!
//! This module implements the ECPrivateKey structure as defined in
//! [RFC 5915](https://datatracker.ietf.org/doc/html/rfc5915). It is only
//! read as the payload of a PKCS#8 `id-ecPublicKey` key.

pub mod error;
mod types;

pub use error::{Error, Result};
pub use types::{ECPrivateKey, Version};
