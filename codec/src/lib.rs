//! # codec
//!
//! Core decoding traits shared by every crate of the workspace.
//!
//! Loading a key is a chain of small, typed conversions:
//! ```text
//! PEM → Vec<u8> → Der → ASN1Object → RSAPrivateKey / OneAsymmetricKey / SubjectPublicKeyInfo
//! ```
//!
//! Each arrow is an implementation of [`decoder::Decoder`]. The marker trait
//! [`decoder::DecodableFrom`] pins down which arrows exist, so a conversion that
//! nobody implemented is a compile error rather than a runtime surprise.
//!
//! ```ignore
//! use codec::decoder::Decoder;
//! use der::Der;
//! use asn1::ASN1Object;
//!
//! let bytes = vec![0x30, 0x00];
//! let der: Der = bytes.decode().unwrap();
//! let asn1: ASN1Object = der.decode().unwrap();
//! ```

#![forbid(unsafe_code)]

pub mod decoder;
