//! Decoder trait for type-safe conversions.
//!
//! A conversion from `T` to `D` needs two pieces:
//!
//! 1. `DecodableFrom<T>` on `D`, declaring that the conversion exists.
//! 2. `Decoder<T, D>` on `T`, performing it.
//!
//! ```no_run
//! use codec::decoder::{DecodableFrom, Decoder};
//!
//! struct Octets(Vec<u8>);
//! struct Hex(String);
//!
//! #[derive(Debug)]
//! struct HexError;
//!
//! impl DecodableFrom<Octets> for Hex {}
//!
//! impl Decoder<Octets, Hex> for Octets {
//!     type Error = HexError;
//!
//!     fn decode(&self) -> Result<Hex, Self::Error> {
//!         Ok(Hex(self.0.iter().map(|b| format!("{b:02x}")).collect()))
//!     }
//! }
//! ```

/// Converts `self` (of type `T`) into `D`.
///
/// `T` is almost always `Self`; it is a type parameter so a single source type
/// can decode into several destinations, e.g. an ASN.1 `Element` decodes into
/// both a PKCS#1 private key and a PKCS#1 public key.
pub trait Decoder<T, D: DecodableFrom<T>> {
    /// The error type returned when decoding fails.
    type Error;

    /// Decodes `self` into type `D`.
    ///
    /// # Errors
    ///
    /// Returns an error if `self` does not hold a valid encoding of `D`.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker trait indicating that type `D` can be decoded from type `T`.
///
/// It has no methods. Implementing it for a type pair is what allows a
/// `Decoder<T, D>` implementation for that pair to exist.
pub trait DecodableFrom<T> {}
