//! Subject Public Key Info
//!
//! The `PUBLIC KEY` structure of [RFC 5280 Section 4.1.2.7](https://datatracker.ietf.org/doc/html/rfc5280#section-4.1.2.7),
//! with the per-algorithm key encodings of RFC 3279, RFC 5480 and RFC 8410.

pub mod error;
mod types;

pub use error::{Error, Result};
pub use types::{PublicKey, SubjectPublicKeyInfo};
