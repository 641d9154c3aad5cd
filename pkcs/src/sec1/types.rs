use kagi::decoder::{DecodableFrom, Decoder};
use kagi_asn1::{BitString, Element};

use super::error::{Error, Result};
use crate::SecretBytes;
use crate::algorithm::NamedCurve;
use crate::private_key::{KeyAlgorithm, PrivateKeyExt};

/*
RFC 5915 - Elliptic Curve Private Key Structure

ECPrivateKey ::= SEQUENCE {
    version        INTEGER { ecPrivkeyVer1(1) } (ecPrivkeyVer1),
    privateKey     OCTET STRING,
    parameters [0] ECParameters {{ NamedCurve }} OPTIONAL,
    publicKey  [1] BIT STRING OPTIONAL
}
*/

/// SEC1 ECPrivateKey version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    /// ecPrivkeyVer1 (value 1)
    V1 = 1,
}

impl TryFrom<i64> for Version {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            1 => Ok(Version::V1),
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
            _ => Err(Error::ExpectedInteger("version")),
        }
    }
}

/// SEC1 EC private key.
///
/// `parameters` may be absent when the key travels inside a PKCS#8
/// envelope that names the curve. [`ECPrivateKey::with_curve`] fills it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ECPrivateKey {
    pub version: Version,
    /// Private scalar, big-endian
    pub private_key: SecretBytes,
    pub parameters: Option<NamedCurve>,
    /// Uncompressed or compressed public point
    pub public_key: Option<BitString>,
}

impl ECPrivateKey {
    pub fn curve(&self) -> Option<NamedCurve> {
        self.parameters
    }

    /// Binds the key to the curve named by an enclosing envelope.
    pub fn with_curve(mut self, outer: NamedCurve) -> Result<Self> {
        match self.parameters {
            Some(inner) if inner != outer => {
                return Err(Error::CurveMismatch {
                    outer: outer.name(),
                    inner: inner.name(),
                });
            }
            _ => {}
        }
        check_scalar(self.private_key.as_bytes(), outer)?;
        self.parameters = Some(outer);
        Ok(self)
    }

    /// Returns the curve of a standalone key, which must name it.
    pub fn require_curve(&self) -> Result<NamedCurve> {
        self.parameters.ok_or(Error::MissingCurve)
    }
}

fn check_scalar(scalar: &[u8], curve: NamedCurve) -> Result<()> {
    if scalar.is_empty() {
        return Err(Error::EmptyPrivateKey);
    }
    if scalar.len() > curve.scalar_len() {
        return Err(Error::PrivateKeyTooLong {
            curve: curve.name(),
            len: scalar.len(),
            max: curve.scalar_len(),
        });
    }
    if scalar.iter().all(|b| *b == 0) {
        return Err(Error::ZeroPrivateKey);
    }
    Ok(())
}

fn named_curve(parameters: &Element) -> Result<NamedCurve> {
    match parameters {
        Element::ObjectIdentifier(oid) => {
            NamedCurve::from_oid(oid).ok_or_else(|| Error::UnsupportedCurve(oid.to_string()))
        }
        // specifiedCurve and implicitCurve
        _ => Err(Error::UnsupportedCurve(format!(
            "{} curve parameters",
            parameters.type_name()
        ))),
    }
}

impl DecodableFrom<Element> for ECPrivateKey {}

impl Decoder<Element, ECPrivateKey> for Element {
    type Error = Error;

    fn decode(&self) -> Result<ECPrivateKey> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence(self.type_name()));
        };

        let [version, private_key, rest @ ..] = elements.as_slice() else {
            return Err(Error::InvalidElementCount(elements.len()));
        };
        if rest.len() > 2 {
            return Err(Error::InvalidElementCount(elements.len()));
        }

        let version: Version = version.decode()?;
        let private_key = match private_key {
            Element::OctetString(octets) if octets.is_empty() => {
                return Err(Error::EmptyPrivateKey);
            }
            Element::OctetString(octets) => SecretBytes::from(octets.as_bytes()),
            other => return Err(Error::ExpectedOctetString(other.type_name())),
        };

        let mut parameters = None;
        let mut public_key = None;
        for element in rest {
            match element {
                Element::ContextSpecific {
                    slot: 0,
                    constructed: true,
                    element,
                } if parameters.is_none() && public_key.is_none() => {
                    parameters = Some(named_curve(element)?);
                }
                Element::ContextSpecific {
                    slot: 1,
                    constructed: true,
                    element,
                } if public_key.is_none() => match element.as_ref() {
                    Element::BitString(bits) => public_key = Some(bits.clone()),
                    other => return Err(Error::ExpectedBitString(other.type_name())),
                },
                other => return Err(Error::UnexpectedElement(other.type_name())),
            }
        }

        if let Some(curve) = parameters {
            check_scalar(private_key.as_bytes(), curve)?;
        }

        Ok(ECPrivateKey {
            version,
            private_key,
            parameters,
            public_key,
        })
    }
}

impl PrivateKeyExt for ECPrivateKey {
    fn key_size(&self) -> u32 {
        self.parameters
            .map_or((self.private_key.len() * 8) as u32, |curve| curve.bits())
    }

    fn algorithm(&self) -> KeyAlgorithm {
        KeyAlgorithm::Ec
    }

    fn public_key_bytes(&self) -> Option<&[u8]> {
        self.public_key.as_ref().map(|bits| bits.as_bytes())
    }
}
