use std::{fmt::Display, str::FromStr};

use codec::decoder::{DecodableFrom, Decoder};
use der::{Der, PrimitiveTag, Tag, Tlv};
use error::Error;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{Signed, ToPrimitive};

pub mod error;

#[derive(Debug, Clone)]
pub struct ASN1Object {
    elements: Vec<Element>,
}

impl ASN1Object {
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn new(elements: Vec<Element>) -> Self {
        ASN1Object { elements }
    }
}

impl DecodableFrom<Der> for ASN1Object {}

impl Decoder<Der, ASN1Object> for Der {
    type Error = Error;

    fn decode(&self) -> Result<ASN1Object, Error> {
        let elements = self
            .elements()
            .iter()
            .map(Element::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ASN1Object { elements })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Boolean(bool),
    Integer(Integer),
    BitString(BitString),
    OctetString(OctetString),
    Null,
    ObjectIdentifier(ObjectIdentifier),
    Sequence(Vec<Element>),
    Set(Vec<Element>),
    /// EXPLICIT tagging keeps the inner element; IMPLICIT (primitive) tagging
    /// keeps the raw contents as an `OctetString` for the schema to interpret.
    /// A constructed tag with other than one child wraps the children in a
    /// `Sequence`.
    ContextSpecific {
        slot: u8,
        constructed: bool,
        element: Box<Element>,
    },
    Unimplemented(Tlv),
}

fn children(tlvs: &[Tlv]) -> Result<Vec<Element>, Error> {
    tlvs.iter().map(Element::try_from).collect()
}

impl TryFrom<&Tlv> for Element {
    type Error = Error;

    fn try_from(tlv: &Tlv) -> Result<Self, Self::Error> {
        match tlv.tag() {
            Tag::Primitive(primitive_tag, _) => {
                // Constructed encodings of primitive types are not DER.
                if let (Some(tlvs), PrimitiveTag::Sequence | PrimitiveTag::Set) =
                    (tlv.tlvs(), primitive_tag)
                {
                    let elements = children(tlvs)?;
                    return Ok(if *primitive_tag == PrimitiveTag::Sequence {
                        Element::Sequence(elements)
                    } else {
                        Element::Set(elements)
                    });
                }
                let Some(data) = tlv.data() else {
                    return Ok(Element::Unimplemented(tlv.clone()));
                };
                match primitive_tag {
                    PrimitiveTag::Boolean => match data {
                        [0x00] => Ok(Element::Boolean(false)),
                        [0xff] => Ok(Element::Boolean(true)),
                        _ => Err(Error::InvalidBoolean),
                    },
                    PrimitiveTag::Integer => Ok(Element::Integer(Integer::try_from(data)?)),
                    PrimitiveTag::BitString => Ok(Element::BitString(BitString::try_from(data)?)),
                    PrimitiveTag::OctetString => Ok(Element::OctetString(OctetString::from(data))),
                    PrimitiveTag::Null => {
                        if data.is_empty() {
                            Ok(Element::Null)
                        } else {
                            Err(Error::NullNotEmpty)
                        }
                    }
                    PrimitiveTag::ObjectIdentifier => Ok(Element::ObjectIdentifier(
                        ObjectIdentifier::try_from(data)?,
                    )),
                    PrimitiveTag::Sequence | PrimitiveTag::Set | PrimitiveTag::Unimplemented(_) => {
                        Ok(Element::Unimplemented(tlv.clone()))
                    }
                }
            }
            Tag::ContextSpecific { slot, constructed } => {
                if *constructed {
                    let tlvs = tlv.tlvs().ok_or_else(|| Error::InvalidContextSpecific {
                        slot: *slot,
                        msg: "constructed tag without children".to_string(),
                    })?;
                    let element = match tlvs {
                        [single] => Element::try_from(single)?,
                        many => Element::Sequence(children(many)?),
                    };
                    Ok(Element::ContextSpecific {
                        slot: *slot,
                        constructed: true,
                        element: Box::new(element),
                    })
                } else {
                    let data = tlv.data().ok_or_else(|| Error::InvalidContextSpecific {
                        slot: *slot,
                        msg: "primitive tag without data".to_string(),
                    })?;
                    Ok(Element::ContextSpecific {
                        slot: *slot,
                        constructed: false,
                        element: Box::new(Element::OctetString(OctetString::from(data))),
                    })
                }
            }
        }
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Element::Boolean(b) => write!(f, "Boolean({})", b),
            Element::Integer(i) => write!(f, "Integer({})", i),
            Element::BitString(bs) => write!(f, "BitString({} bits)", bs.bit_len()),
            Element::OctetString(os) => write!(f, "OctetString({})", os),
            Element::Null => write!(f, "Null"),
            Element::ObjectIdentifier(oid) => write!(f, "ObjectIdentifier({})", oid),
            Element::Sequence(seq) => write!(f, "Sequence({} elements)", seq.len()),
            Element::Set(set) => write!(f, "Set({} elements)", set.len()),
            Element::ContextSpecific { slot, element, .. } => {
                write!(f, "[{}] {}", slot, element)
            }
            Element::Unimplemented(tlv) => write!(f, "Unimplemented({:?})", tlv.tag()),
        }
    }
}

// ASN.1 INTEGER is signed and arbitrary sized. DER requires the shortest
// two's complement encoding, so redundant leading 0x00/0xff octets are rejected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Integer {
    inner: BigInt,
}

impl Integer {
    pub fn as_bigint(&self) -> &BigInt {
        &self.inner
    }

    pub fn is_positive(&self) -> bool {
        self.inner.is_positive()
    }

    /// Magnitude of a non-negative integer, `None` if the value is negative.
    pub fn to_biguint(&self) -> Option<BigUint> {
        self.inner.to_biguint()
    }

    pub fn to_u32(&self) -> Option<u32> {
        self.inner.to_u32()
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.inner.to_i64()
    }
}

impl TryFrom<&[u8]> for Integer {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        match value {
            [] => Err(Error::IntegerNoData),
            [0x00, next, ..] if next & 0x80 == 0 => Err(Error::IntegerNotMinimal),
            [0xff, next, ..] if next & 0x80 == 0x80 => Err(Error::IntegerNotMinimal),
            _ => Ok(Integer {
                inner: BigInt::from_signed_bytes_be(value),
            }),
        }
    }
}

impl From<BigInt> for Integer {
    fn from(inner: BigInt) -> Self {
        Integer { inner }
    }
}

impl From<BigUint> for Integer {
    fn from(value: BigUint) -> Self {
        Integer {
            inner: BigInt::from_biguint(Sign::Plus, value),
        }
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectIdentifier {
    inner: Vec<u64>,
}

impl ObjectIdentifier {
    pub fn components(&self) -> &[u64] {
        &self.inner
    }
}

impl TryFrom<&[u8]> for ObjectIdentifier {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(Error::ObjectIdentifierNoData);
        }

        let mut subidentifiers = Vec::new();
        let mut val = 0u64;
        let mut fresh = true;
        for &b in value {
            if fresh && b == 0x80 {
                return Err(Error::ObjectIdentifierNotMinimal);
            }
            if val > u64::MAX >> 7 {
                return Err(Error::ObjectIdentifierComponentTooLarge);
            }
            val = (val << 7) | (b & 0x7f) as u64;
            fresh = b & 0x80 == 0;
            if fresh {
                subidentifiers.push(val);
                val = 0;
            }
        }
        if !fresh {
            return Err(Error::ObjectIdentifierIncompleteEncoding);
        }

        // The first subidentifier packs the first two arcs as X * 40 + Y.
        let first = subidentifiers[0];
        let (x, y) = match first {
            0..40 => (0, first),
            40..80 => (1, first - 40),
            _ => (2, first - 80),
        };
        let mut inner = vec![x, y];
        inner.extend_from_slice(&subidentifiers[1..]);

        Ok(ObjectIdentifier { inner })
    }
}

impl Display for ObjectIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .inner
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", s)
    }
}

impl FromStr for ObjectIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .split('.')
            .map(|c| c.parse::<u64>().map_err(Error::ParseInt))
            .collect::<Result<Vec<u64>, Error>>()?;
        if inner.len() < 2 {
            return Err(Error::ObjectIdentifierInvalidComponent(s.to_string()));
        }
        Ok(ObjectIdentifier { inner })
    }
}

impl PartialEq<&str> for ObjectIdentifier {
    fn eq(&self, other: &&str) -> bool {
        let mut parts = other.split('.');
        self.inner
            .iter()
            .all(|n| parts.next().and_then(|p| p.parse::<u64>().ok()) == Some(*n))
            && parts.next().is_none()
    }
}

impl PartialEq<ObjectIdentifier> for &str {
    fn eq(&self, other: &ObjectIdentifier) -> bool {
        other == self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitString {
    unused: u8,
    data: Vec<u8>,
}

impl BitString {
    pub fn new(unused: u8, data: Vec<u8>) -> Self {
        BitString { unused, data }
    }

    /// Number of unused bits in the last byte.
    pub fn unused_bits(&self) -> u8 {
        self.unused
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn bit_len(&self) -> usize {
        self.data.len() * 8 - self.unused as usize
    }
}

impl AsRef<[u8]> for BitString {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl TryFrom<&[u8]> for BitString {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        match value {
            [] => Err(Error::BitStringNoData),
            [unused, ..] if *unused > 7 => Err(Error::BitStringUnusedBitsOutOfRange(*unused)),
            [unused] if *unused != 0 => Err(Error::BitStringUnusedBitsOutOfRange(*unused)),
            [unused, data @ ..] => Ok(BitString {
                unused: *unused,
                data: data.to_vec(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OctetString {
    inner: Vec<u8>,
}

impl OctetString {
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }
}

impl TryFrom<&OctetString> for ASN1Object {
    type Error = Error;

    fn try_from(value: &OctetString) -> Result<Self, Self::Error> {
        let der: Der = value.as_bytes().decode().map_err(Error::FailedToDecodeDer)?;
        der.decode()
    }
}

impl AsRef<[u8]> for OctetString {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(value: Vec<u8>) -> Self {
        OctetString { inner: value }
    }
}

impl From<&[u8]> for OctetString {
    fn from(value: &[u8]) -> Self {
        OctetString {
            inner: value.to_vec(),
        }
    }
}

impl Display for OctetString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for b in &self.inner {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}
