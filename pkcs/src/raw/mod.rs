//! Container-less RSA structures.
//!
//! Some early tools wrote RSA keys as a bare SEQUENCE without a version or
//! algorithm identifier. These structures are read leniently: only the first
//! top-level element is considered and trailing members are ignored.

pub mod error;
mod types;

pub use error::{Error, Result};
pub use types::{RawRSAPrivateKey, RawRSAPublicKey};
