use std::{fmt::Display, str::FromStr};

use error::{Error, Result};
use kagi::decoder::{DecodableFrom, Decoder};
use kagi_der::{Der, PrimitiveTag, Tag, Tlv};
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

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

    /// Returns the only top-level element. Trailing data after it is an error.
    pub fn single(&self) -> Result<&Element> {
        match self.elements.as_slice() {
            [element] => Ok(element),
            elements => Err(Error::ExpectedSingleElement(elements.len())),
        }
    }
}

impl DecodableFrom<Der> for ASN1Object {}

impl Decoder<Der, ASN1Object> for Der {
    type Error = Error;

    fn decode(&self) -> Result<ASN1Object> {
        let elements = self
            .elements()
            .iter()
            .map(Element::try_from)
            .collect::<Result<Vec<_>>>()?;
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
    UTF8String(String),
    Sequence(Vec<Element>),
    Set(Vec<Element>),
    PrintableString(String),
    IA5String(String),
    ContextSpecific {
        slot: u8,
        constructed: bool,
        element: Box<Element>,
    },
    Unimplemented(Tlv),
}

impl Element {
    /// Short name of the element type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Element::Boolean(_) => "BOOLEAN",
            Element::Integer(_) => "INTEGER",
            Element::BitString(_) => "BIT STRING",
            Element::OctetString(_) => "OCTET STRING",
            Element::Null => "NULL",
            Element::ObjectIdentifier(_) => "OBJECT IDENTIFIER",
            Element::UTF8String(_) => "UTF8String",
            Element::Sequence(_) => "SEQUENCE",
            Element::Set(_) => "SET",
            Element::PrintableString(_) => "PrintableString",
            Element::IA5String(_) => "IA5String",
            Element::ContextSpecific { .. } => "context-specific",
            Element::Unimplemented(_) => "unimplemented",
        }
    }
}

fn primitive_data<'a>(tlv: &'a Tlv, name: &'static str) -> Result<&'a [u8]> {
    tlv.data().ok_or(Error::ExpectedPrimitive(name))
}

fn constructed_elements(tlv: &Tlv, name: &'static str) -> Result<Vec<Element>> {
    tlv.tlvs()
        .ok_or(Error::ExpectedConstructed(name))?
        .iter()
        .map(Element::try_from)
        .collect()
}

impl TryFrom<&Tlv> for Element {
    type Error = Error;

    fn try_from(tlv: &Tlv) -> Result<Self> {
        match tlv.tag() {
            Tag::Primitive(primitive_tag, _raw) => match primitive_tag {
                PrimitiveTag::Boolean => match primitive_data(tlv, "BOOLEAN")? {
                    [0x00] => Ok(Element::Boolean(false)),
                    [0xff] => Ok(Element::Boolean(true)),
                    _ => Err(Error::InvalidBoolean),
                },
                PrimitiveTag::Integer => {
                    let data = primitive_data(tlv, "INTEGER")?;
                    Ok(Element::Integer(Integer::try_from(data)?))
                }
                PrimitiveTag::BitString => {
                    let data = primitive_data(tlv, "BIT STRING")?;
                    Ok(Element::BitString(BitString::try_from(data)?))
                }
                PrimitiveTag::OctetString => {
                    let data = primitive_data(tlv, "OCTET STRING")?;
                    Ok(Element::OctetString(OctetString::from(data)))
                }
                PrimitiveTag::Null => {
                    if primitive_data(tlv, "NULL")?.is_empty() {
                        Ok(Element::Null)
                    } else {
                        Err(Error::InvalidNull)
                    }
                }
                PrimitiveTag::ObjectIdentifier => {
                    let data = primitive_data(tlv, "OBJECT IDENTIFIER")?;
                    Ok(Element::ObjectIdentifier(ObjectIdentifier::try_from(data)?))
                }
                PrimitiveTag::UTF8String => {
                    let data = primitive_data(tlv, "UTF8String")?;
                    let s = std::str::from_utf8(data).map_err(|_| Error::Utf8StringInvalidUtf8)?;
                    Ok(Element::UTF8String(s.to_string()))
                }
                PrimitiveTag::PrintableString => {
                    let data = primitive_data(tlv, "PrintableString")?;
                    if !data.iter().all(|&b| is_printable(b)) {
                        return Err(Error::PrintableStringInvalidEncoding);
                    }
                    Ok(Element::PrintableString(
                        String::from_utf8_lossy(data).into_owned(),
                    ))
                }
                PrimitiveTag::IA5String => {
                    let data = primitive_data(tlv, "IA5String")?;
                    if !data.is_ascii() {
                        return Err(Error::Ia5StringInvalidEncoding);
                    }
                    Ok(Element::IA5String(String::from_utf8_lossy(data).into_owned()))
                }
                PrimitiveTag::Sequence => {
                    Ok(Element::Sequence(constructed_elements(tlv, "SEQUENCE")?))
                }
                PrimitiveTag::Set => Ok(Element::Set(constructed_elements(tlv, "SET")?)),
                PrimitiveTag::Unimplemented(_) => Ok(Element::Unimplemented(tlv.clone())),
            },
            Tag::ContextSpecific { slot, constructed } => {
                if *constructed {
                    // EXPLICIT tagging wraps one element. Several children come from an
                    // IMPLICIT SET OF or SEQUENCE OF and are kept together as a SEQUENCE.
                    let tlvs = tlv.tlvs().ok_or(Error::InvalidContextSpecific {
                        slot: *slot,
                        msg: "constructed value has no children",
                    })?;
                    let element = match tlvs {
                        [inner] => Element::try_from(inner)?,
                        _ => Element::Sequence(
                            tlvs.iter()
                                .map(Element::try_from)
                                .collect::<Result<Vec<_>>>()?,
                        ),
                    };
                    Ok(Element::ContextSpecific {
                        slot: *slot,
                        constructed: true,
                        element: Box::new(element),
                    })
                } else {
                    // IMPLICIT tagging: the upper layer interprets the raw octets.
                    let data = tlv.data().ok_or(Error::InvalidContextSpecific {
                        slot: *slot,
                        msg: "primitive value has no data",
                    })?;
                    Ok(Element::ContextSpecific {
                        slot: *slot,
                        constructed: false,
                        element: Box::new(Element::OctetString(OctetString::from(data))),
                    })
                }
            }
            Tag::Other(_) => Ok(Element::Unimplemented(tlv.clone())),
        }
    }
}

fn is_printable(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b" '()+,-./:=?".contains(&b)
}

impl Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Element::Boolean(b) => write!(f, "Boolean({})", b),
            Element::Integer(i) => write!(f, "Integer({})", i),
            Element::BitString(bs) => write!(f, "BitString({} bits)", bs.bit_len()),
            Element::OctetString(os) => write!(f, "OctetString({} bytes)", os.as_bytes().len()),
            Element::Null => write!(f, "Null"),
            Element::ObjectIdentifier(oid) => write!(f, "ObjectIdentifier({})", oid),
            Element::UTF8String(s) => write!(f, "UTF8String({})", s),
            Element::Sequence(seq) => write!(f, "Sequence({} elements)", seq.len()),
            Element::Set(set) => write!(f, "Set({} elements)", set.len()),
            Element::PrintableString(s) => write!(f, "PrintableString({})", s),
            Element::IA5String(s) => write!(f, "IA5String({})", s),
            Element::ContextSpecific {
                slot,
                constructed,
                element,
            } => write!(
                f,
                "ContextSpecific(slot: {}, constructed: {}, element: {})",
                slot, constructed, element
            ),
            Element::Unimplemented(tlv) => write!(f, "Unimplemented({:?})", tlv.tag()),
        }
    }
}

// ASN.1 INTEGER is an arbitrary sized, signed, two's complement value.
// DER requires the shortest encoding, so a redundant leading 0x00 or 0xff is rejected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Integer {
    inner: BigInt,
}

impl Integer {
    /// Returns a reference to the inner BigInt
    pub fn as_bigint(&self) -> &BigInt {
        &self.inner
    }

    pub fn is_positive(&self) -> bool {
        self.inner.is_positive()
    }

    /// Magnitude as big-endian bytes without a sign octet.
    pub fn to_unsigned_bytes_be(&self) -> Vec<u8> {
        self.inner.magnitude().to_bytes_be()
    }

    /// Number of significant bits of the magnitude.
    pub fn bits(&self) -> u64 {
        self.inner.bits()
    }

    /// Converts the Integer to u32 if it fits in the range
    pub fn to_u32(&self) -> Option<u32> {
        self.inner.to_u32()
    }

    /// Converts the Integer to i64 if it fits in the range
    pub fn to_i64(&self) -> Option<i64> {
        self.inner.to_i64()
    }

    /// Converts the Integer to u64 if it fits in the range
    pub fn to_u64(&self) -> Option<u64> {
        self.inner.to_u64()
    }
}

impl Serialize for Integer {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.inner.to_string())
    }
}

impl<'de> Deserialize<'de> for Integer {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let inner = s.parse::<BigInt>().map_err(serde::de::Error::custom)?;
        Ok(Integer { inner })
    }
}

impl TryFrom<&[u8]> for Integer {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        match value {
            [] => Err(Error::IntegerNoData),
            [0x00, next, ..] if next & 0x80 == 0 => Err(Error::IntegerNotMinimal),
            [0xff, next, ..] if next & 0x80 != 0 => Err(Error::IntegerNotMinimal),
            _ => Ok(Integer {
                inner: BigInt::from_signed_bytes_be(value),
            }),
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

impl From<BigInt> for Integer {
    fn from(inner: BigInt) -> Self {
        Integer { inner }
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
    pub fn arcs(&self) -> &[u64] {
        &self.inner
    }
}

impl Serialize for ObjectIdentifier {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ObjectIdentifier {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ObjectIdentifier::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<&[u8]> for ObjectIdentifier {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        if value.is_empty() {
            return Err(Error::ObjectIdentifierNoData);
        }

        let mut subidentifiers = Vec::new();
        let mut val = 0u64;
        let mut in_progress = false;
        for &b in value {
            if !in_progress && b == 0x80 {
                return Err(Error::ObjectIdentifierNotMinimal);
            }
            if val >> 57 != 0 {
                return Err(Error::ObjectIdentifierArcTooLarge);
            }
            val = (val << 7) | (b & 0x7f) as u64;
            if b & 0x80 == 0 {
                subidentifiers.push(val);
                val = 0;
                in_progress = false;
            } else {
                in_progress = true;
            }
        }
        if in_progress {
            // The last octet still had its continuation bit set.
            return Err(Error::ObjectIdentifierIncompleteEncoding);
        }

        // The first subidentifier packs the first two arcs.
        let Some((&first, rest)) = subidentifiers.split_first() else {
            return Err(Error::ObjectIdentifierNoData);
        };
        let mut inner = Vec::with_capacity(subidentifiers.len() + 1);
        match first {
            first @ 0..=79 => {
                inner.push(first / 40);
                inner.push(first % 40);
            }
            first => {
                inner.push(2);
                inner.push(first - 80);
            }
        }
        inner.extend_from_slice(rest);

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

    fn from_str(s: &str) -> Result<Self> {
        let inner = s
            .split('.')
            .map(|s| s.parse::<u64>().map_err(Error::ParseInt))
            .collect::<Result<Vec<u64>>>()?;
        if inner.len() < 2 {
            return Err(Error::ObjectIdentifierTooFewComponents);
        }
        Ok(ObjectIdentifier { inner })
    }
}

impl PartialEq<&str> for ObjectIdentifier {
    fn eq(&self, other: &&str) -> bool {
        let mut arcs = other.split('.');
        self.inner
            .iter()
            .all(|n| arcs.next().and_then(|s| s.parse::<u64>().ok()) == Some(*n))
            && arcs.next().is_none()
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
    /// Creates a new BitString with the specified number of unused bits and data
    pub fn new(unused: u8, data: Vec<u8>) -> Self {
        BitString { unused, data }
    }

    /// Returns the number of unused bits in the last byte
    pub fn unused_bits(&self) -> u8 {
        self.unused
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the total number of bits (excluding unused bits)
    pub fn bit_len(&self) -> usize {
        if self.data.is_empty() {
            0
        } else {
            self.data.len() * 8 - self.unused as usize
        }
    }
}

impl AsRef<[u8]> for BitString {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl TryFrom<&[u8]> for BitString {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
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

impl Display for BitString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut result = String::new();

        for (i, byte) in self.data.iter().enumerate() {
            if i == self.data.len() - 1 && self.unused > 0 {
                let valid_bits = byte >> self.unused;
                let bit_count = 8 - self.unused as usize;
                result.push_str(&format!("{:0bit_count$b}", valid_bits));
            } else {
                result.push_str(&format!("{:08b}", byte));
            }
        }

        write!(f, "{}", result)
    }
}

/// OCTET STRING contents. Wiped on drop because private keys travel inside them.
#[derive(Clone, PartialEq, Eq)]
pub struct OctetString {
    inner: Vec<u8>,
}

impl OctetString {
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Drop for OctetString {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

impl std::fmt::Debug for OctetString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OctetString({} bytes)", self.inner.len())
    }
}

impl TryFrom<&OctetString> for ASN1Object {
    type Error = Error;

    fn try_from(value: &OctetString) -> Result<Self> {
        let der: Der = value.as_bytes().decode()?;
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
