//! DER (Distinguished Encoding Rules) TLV parsing.
//!
//! Only the strict DER subset of BER is accepted: definite lengths in their
//! shortest form, low tag numbers, and a bounded nesting depth. Malformed or
//! truncated input is reported as an [`Error`], never as a panic.

use kagi::decoder::{DecodableFrom, Decoder};
use nom::{IResult, Parser};
use zeroize::Zeroize;

use crate::error::{Error, Result};

pub mod error;

/// Constructed bit of the identifier octet.
pub const TAG_CONSTRUCTED: u8 = 0x20;

/// Maximum nesting of constructed values.
pub const MAX_DEPTH: usize = 64;

const TAG_NUMBER_MASK: u8 = 0x1f;
const CLASS_UNIVERSAL: u8 = 0x00;
const CLASS_CONTEXT_SPECIFIC: u8 = 0x02;

/// A sequence of top-level TLVs.
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

    fn parse(input: &[u8]) -> Result<Self> {
        if input.is_empty() {
            return Err(Error::Empty);
        }
        let mut elements = Vec::new();
        let mut rest = input;
        while !rest.is_empty() {
            let (next, tlv) = Tlv::parse(rest, 0)?;
            elements.push(tlv);
            rest = next;
        }
        Ok(Der { elements })
    }
}

impl DecodableFrom<Vec<u8>> for Der {}

impl Decoder<Vec<u8>, Der> for Vec<u8> {
    type Error = Error;

    fn decode(&self) -> Result<Der> {
        Der::parse(self)
    }
}

impl<'a> DecodableFrom<&'a [u8]> for Der {}

impl<'a> Decoder<&'a [u8], Der> for &'a [u8] {
    type Error = Error;

    fn decode(&self) -> Result<Der> {
        Der::parse(self)
    }
}

/// Universal class tag numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PrimitiveTag {
    Boolean,
    Integer,
    BitString,
    OctetString,
    Null,
    ObjectIdentifier,
    UTF8String,
    Sequence,
    Set,
    PrintableString,
    IA5String,
    Unimplemented(u8),
}

impl From<u8> for PrimitiveTag {
    fn from(value: u8) -> Self {
        match value & TAG_NUMBER_MASK {
            0x01 => PrimitiveTag::Boolean,
            0x02 => PrimitiveTag::Integer,
            0x03 => PrimitiveTag::BitString,
            0x04 => PrimitiveTag::OctetString,
            0x05 => PrimitiveTag::Null,
            0x06 => PrimitiveTag::ObjectIdentifier,
            0x0c => PrimitiveTag::UTF8String,
            0x10 => PrimitiveTag::Sequence,
            0x11 => PrimitiveTag::Set,
            0x13 => PrimitiveTag::PrintableString,
            0x16 => PrimitiveTag::IA5String,
            n => PrimitiveTag::Unimplemented(n),
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
            PrimitiveTag::UTF8String => 0x0c,
            PrimitiveTag::Sequence => 0x10,
            PrimitiveTag::Set => 0x11,
            PrimitiveTag::PrintableString => 0x13,
            PrimitiveTag::IA5String => 0x16,
            PrimitiveTag::Unimplemented(n) => *n,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// Universal class. Carries the raw identifier octet as well.
    Primitive(PrimitiveTag, u8),
    ContextSpecific { slot: u8, constructed: bool },
    /// Application or private class.
    Other(u8),
}

impl Tag {
    pub fn is_constructed(&self) -> bool {
        match self {
            Tag::Primitive(_, raw) | Tag::Other(raw) => raw & TAG_CONSTRUCTED != 0,
            Tag::ContextSpecific { constructed, .. } => *constructed,
        }
    }
}

impl TryFrom<u8> for Tag {
    type Error = Error;

    fn try_from(raw: u8) -> Result<Self> {
        if raw & TAG_NUMBER_MASK == TAG_NUMBER_MASK {
            return Err(Error::HighTagNumber(raw));
        }
        let tag = match raw >> 6 {
            CLASS_UNIVERSAL => Tag::Primitive(PrimitiveTag::from(raw), raw),
            CLASS_CONTEXT_SPECIFIC => Tag::ContextSpecific {
                slot: raw & TAG_NUMBER_MASK,
                constructed: raw & TAG_CONSTRUCTED != 0,
            },
            _ => Tag::Other(raw),
        };
        Ok(tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    tag: Tag,
    length: usize,
    value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Tlv(Vec<Tlv>),
    Data(Vec<u8>),
}

impl Drop for Tlv {
    fn drop(&mut self) {
        // Payloads may hold key material.
        if let Value::Data(data) = &mut self.value {
            data.zeroize();
        }
    }
}

impl Tlv {
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Length of the value in octets as it appeared on the wire.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn data(&self) -> Option<&[u8]> {
        match &self.value {
            Value::Data(data) => Some(data),
            Value::Tlv(_) => None,
        }
    }

    pub fn tlvs(&self) -> Option<&[Tlv]> {
        match &self.value {
            Value::Tlv(tlvs) => Some(tlvs),
            Value::Data(_) => None,
        }
    }

    fn parse(input: &[u8], depth: usize) -> Result<(&[u8], Tlv)> {
        if depth > MAX_DEPTH {
            return Err(Error::NestingTooDeep(MAX_DEPTH));
        }
        let (input, raw_tag) = parse_identifier(input)?;
        let tag = Tag::try_from(raw_tag)?;
        let (input, length) = parse_length(input)?;
        if length > input.len() {
            return Err(Error::Truncated {
                expected: length,
                remaining: input.len(),
            });
        }
        let (input, data) = take(input, length)?;

        if tag.is_constructed() {
            let mut tlvs = Vec::new();
            let mut rest = data;
            while !rest.is_empty() {
                let (next, tlv) = Self::parse(rest, depth + 1)?;
                tlvs.push(tlv);
                rest = next;
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

fn parse_identifier(input: &[u8]) -> IResult<&[u8], u8> {
    nom::number::complete::be_u8(input)
}

fn take(input: &[u8], count: usize) -> IResult<&[u8], &[u8]> {
    nom::bytes::complete::take(count).parse(input)
}

fn parse_length(input: &[u8]) -> Result<(&[u8], usize)> {
    let (input, n) = parse_identifier(input)?;
    if n & 0x80 == 0 {
        // short form: 0-127
        return Ok((input, n as usize));
    }

    // long form: the low 7 bits count the length octets that follow.
    let count = n & 0x7f;
    if count == 0 {
        return Err(Error::IndefiniteLength);
    }
    if count > 8 {
        return Err(Error::LengthTooLong(count));
    }
    let (input, bs) = take(input, count as usize)?;
    if bs.first() == Some(&0) {
        return Err(Error::NonMinimalLength);
    }
    let length = bs.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64);
    if length < 0x80 {
        return Err(Error::NonMinimalLength);
    }
    let length = usize::try_from(length).map_err(|_| Error::LengthTooLong(count))?;
    Ok((input, length))
}
