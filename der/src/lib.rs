//! Strict DER tag-length-value parser.
//!
//! Only the definite-length, minimally encoded form is accepted. Constructed
//! values are parsed recursively up to [`MAX_DEPTH`] levels.

use codec::decoder::{DecodableFrom, Decoder};
use nom::{IResult, Parser};

pub mod error;

use error::Error;

pub const TAG_CONSTRUCTED: u8 = 0x20;
const TAG_CLASS_MASK: u8 = 0xc0;
const TAG_CLASS_CONTEXT_SPECIFIC: u8 = 0x80;
const TAG_NUMBER_MASK: u8 = 0x1f;

/// Maximum nesting of constructed values.
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Der {
    elements: Vec<Tlv>,
}

impl Der {
    pub fn new(elements: Vec<Tlv>) -> Self {
        Der { elements }
    }

    pub fn elements(&self) -> &[Tlv] {
        &self.elements
    }
}

impl DecodableFrom<&[u8]> for Der {}

impl Decoder<&[u8], Der> for &[u8] {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        if self.is_empty() {
            return Err(Error::Empty);
        }
        let mut elements = Vec::new();
        let mut input = *self;
        while !input.is_empty() {
            let (rest, tlv) = Tlv::parse(input, 0)?;
            elements.push(tlv);
            input = rest;
        }
        Ok(Der { elements })
    }
}

impl DecodableFrom<Vec<u8>> for Der {}

impl Decoder<Vec<u8>, Der> for Vec<u8> {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        self.as_slice().decode()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PrimitiveTag {
    Boolean,
    Integer,
    BitString,
    OctetString,
    Null,
    ObjectIdentifier,
    Sequence,
    Set,
    Unimplemented(u8),
}

impl From<u8> for PrimitiveTag {
    fn from(value: u8) -> Self {
        match value {
            0x01 => Self::Boolean,
            0x02 => Self::Integer,
            0x03 => Self::BitString,
            0x04 => Self::OctetString,
            0x05 => Self::Null,
            0x06 => Self::ObjectIdentifier,
            0x30 => Self::Sequence,
            0x31 => Self::Set,
            _ => Self::Unimplemented(value),
        }
    }
}

impl From<&PrimitiveTag> for u8 {
    fn from(value: &PrimitiveTag) -> Self {
        match value {
            PrimitiveTag::Boolean => 0x01,
            PrimitiveTag::Integer => 0x02,
            PrimitiveTag::BitString => 0x03,
            PrimitiveTag::OctetString => 0x04,
            PrimitiveTag::Null => 0x05,
            PrimitiveTag::ObjectIdentifier => 0x06,
            PrimitiveTag::Sequence => 0x30,
            PrimitiveTag::Set => 0x31,
            PrimitiveTag::Unimplemented(b) => *b,
        }
    }
}

/// Identifier octet of a TLV.
///
/// Universal, application and private class tags are all `Primitive` (keyed by
/// the raw identifier byte); only context-specific tags get their own variant
/// since key structures use them for optional fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Primitive(PrimitiveTag, u8),
    ContextSpecific { slot: u8, constructed: bool },
}

impl Tag {
    pub fn is_constructed(&self) -> bool {
        match self {
            Tag::Primitive(_, raw) => raw & TAG_CONSTRUCTED == TAG_CONSTRUCTED,
            Tag::ContextSpecific { constructed, .. } => *constructed,
        }
    }
}

impl From<u8> for Tag {
    fn from(value: u8) -> Self {
        if value & TAG_CLASS_MASK == TAG_CLASS_CONTEXT_SPECIFIC {
            return Tag::ContextSpecific {
                slot: value & TAG_NUMBER_MASK,
                constructed: value & TAG_CONSTRUCTED == TAG_CONSTRUCTED,
            };
        }
        Tag::Primitive(PrimitiveTag::from(value), value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    tag: Tag,
    length: u64,
    value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Tlv(Vec<Tlv>),
    Data(Vec<u8>),
}

impl Tlv {
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    /// Contents of a primitive TLV.
    pub fn data(&self) -> Option<&[u8]> {
        match &self.value {
            Value::Data(data) => Some(data),
            Value::Tlv(_) => None,
        }
    }

    /// Children of a constructed TLV.
    pub fn tlvs(&self) -> Option<&[Tlv]> {
        match &self.value {
            Value::Tlv(tlvs) => Some(tlvs),
            Value::Data(_) => None,
        }
    }

    /// Parses the first TLV of `input` and returns it with the unparsed rest.
    ///
    /// Unlike decoding into [`Der`], bytes after the first element are not
    /// looked at.
    pub fn parse_prefix(input: &[u8]) -> error::Result<(Tlv, &[u8])> {
        if input.is_empty() {
            return Err(Error::Empty);
        }
        let (rest, tlv) = Self::parse(input, 0)?;
        Ok((tlv, rest))
    }

    fn parse(input: &[u8], depth: usize) -> IResult<&[u8], Tlv, Error> {
        let (input, tag) = parse_tag(input)?;
        let (input, length) = parse_length(input)?;
        let (input, data) = nom::bytes::complete::take(length).parse(input)?;

        if tag.is_constructed() {
            if depth >= MAX_DEPTH {
                return Err(nom::Err::Failure(Error::TooDeep(MAX_DEPTH)));
            }
            let mut tlvs = Vec::new();
            let mut data = data;
            while !data.is_empty() {
                let (rest, v) = Self::parse(data, depth + 1)?;
                data = rest;
                tlvs.push(v);
            }

            return Ok((
                input,
                Tlv {
                    tag,
                    length,
                    value: Value::Tlv(tlvs),
                },
            ));
        }

        Ok((
            input,
            Tlv {
                tag,
                length,
                value: Value::Data(data.to_vec()),
            },
        ))
    }
}

fn parse_tag(input: &[u8]) -> IResult<&[u8], Tag, Error> {
    let (input, n) = nom::number::complete::be_u8(input)?;
    if n & TAG_NUMBER_MASK == TAG_NUMBER_MASK {
        return Err(nom::Err::Failure(Error::HighTagNumber(n)));
    }
    Ok((input, Tag::from(n)))
}

fn parse_length(input: &[u8]) -> IResult<&[u8], u64, Error> {
    let (input, n) = nom::number::complete::be_u8(input)?;
    if n == 0x80 {
        return Err(nom::Err::Failure(Error::IndefiniteLength));
    }
    if n & 0x80 == 0x80 {
        // long form: the low 7 bits count the length octets that follow.
        let count = n & 0x7f;
        if count as usize > std::mem::size_of::<u64>() {
            return Err(nom::Err::Failure(Error::LengthTooLarge(count)));
        }
        let (input, bs) = nom::bytes::complete::take(count).parse(input)?;
        if bs[0] == 0 {
            return Err(nom::Err::Failure(Error::NonMinimalLength));
        }
        let length = bs.iter().fold(0u64, |n, &b| (n << 8) | b as u64);
        if length < 0x80 {
            return Err(nom::Err::Failure(Error::NonMinimalLength));
        }
        return Ok((input, length));
    }
    // short form: 0-127
    Ok((input, n as u64))
}
