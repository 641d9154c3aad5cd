use kagi::decoder::{DecodableFrom, Decoder};
use kagi_asn1::{BitString, Element, OctetString};

use super::error::{Error, Result};
use crate::algorithm::AlgorithmIdentifier;

/*
RFC 5958 - Asymmetric Key Packages

OneAsymmetricKey ::= SEQUENCE {
    version                   Version,
    privateKeyAlgorithm       PrivateKeyAlgorithmIdentifier,
    privateKey                PrivateKey,
    attributes            [0] Attributes OPTIONAL,
    ...,
    [[2: publicKey        [1] PublicKey OPTIONAL ]],
    ...
}

PrivateKeyInfo ::= OneAsymmetricKey

Version ::= INTEGER { v1(0), v2(1) } (v1, ..., v2)

PrivateKey ::= OCTET STRING

PublicKey ::= BIT STRING

Attributes ::= SET OF Attribute
*/

/// PKCS#8 OneAsymmetricKey version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    /// Version 1 (no public key)
    V1 = 0,
    /// Version 2 (with public key)
    V2 = 1,
}

impl TryFrom<i64> for Version {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Version::V1),
            1 => Ok(Version::V2),
            _ => Err(Error::InvalidVersion(value)),
        }
    }
}

impl DecodableFrom<Element> for Version {}

impl Decoder<Element, Version> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Version> {
        match self {
            Element::Integer(int) => {
                let value = int.to_i64().ok_or(Error::VersionOutOfRange)?;
                Version::try_from(value)
            }
            _ => Err(Error::ExpectedVersionInteger),
        }
    }
}

/// PKCS#8 private key envelope.
///
/// `private_key` holds the algorithm specific encoding (a PKCS#1 or SEC1
/// structure, or a wrapped raw secret). It is wiped on drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneAsymmetricKey {
    pub version: Version,
    pub private_key_algorithm: AlgorithmIdentifier,
    pub private_key: OctetString,
    /// Raw `[0]` content. Attributes are carried but not interpreted.
    pub attributes: Option<Element>,
    pub public_key: Option<BitString>,
}

pub type PrivateKeyInfo = OneAsymmetricKey;

// [1] is IMPLICIT, so the content octets are the BIT STRING encoding itself.
fn implicit_bit_string(element: &Element) -> Result<BitString> {
    match element {
        Element::OctetString(raw) => {
            BitString::try_from(raw.as_bytes()).map_err(Error::InvalidPublicKey)
        }
        Element::BitString(bits) => Ok(bits.clone()),
        other => Err(Error::UnexpectedElement(other.type_name())),
    }
}

impl DecodableFrom<Element> for OneAsymmetricKey {}

impl Decoder<Element, OneAsymmetricKey> for Element {
    type Error = Error;

    fn decode(&self) -> Result<OneAsymmetricKey> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence(self.type_name()));
        };

        let [version, algorithm, private_key, rest @ ..] = elements.as_slice() else {
            return Err(Error::InvalidElementCount {
                expected: "3 to 5",
                actual: elements.len(),
            });
        };

        let version: Version = version.decode()?;
        let private_key_algorithm: AlgorithmIdentifier = algorithm.decode()?;
        let private_key = match private_key {
            Element::OctetString(octets) => octets.clone(),
            _ => {
                return Err(Error::ExpectedOctetString {
                    field: "privateKey",
                });
            }
        };

        let mut attributes = None;
        let mut public_key = None;
        for element in rest {
            match element {
                Element::ContextSpecific {
                    slot: 0,
                    constructed: true,
                    element,
                } if attributes.is_none() && public_key.is_none() => {
                    attributes = Some(element.as_ref().clone());
                }
                Element::ContextSpecific {
                    slot: 1, element, ..
                } if public_key.is_none() => {
                    public_key = Some(implicit_bit_string(element)?);
                }
                other => return Err(Error::UnexpectedElement(other.type_name())),
            }
        }

        Ok(OneAsymmetricKey {
            version,
            private_key_algorithm,
            private_key,
            attributes,
            public_key,
        })
    }
}
