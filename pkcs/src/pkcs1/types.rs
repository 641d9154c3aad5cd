use kagi::decoder::{DecodableFrom, Decoder};
use kagi_asn1::{Element, Integer};

use super::error::{Error, Result};
use crate::SecretBytes;
use crate::private_key::{KeyAlgorithm, PrivateKeyExt};

/*
RFC 8017 - PKCS #1: RSA Cryptography Specifications

RSAPrivateKey ::= SEQUENCE {
    version           Version,
    modulus           INTEGER,  -- n
    publicExponent    INTEGER,  -- e
    privateExponent   INTEGER,  -- d
    prime1            INTEGER,  -- p
    prime2            INTEGER,  -- q
    exponent1         INTEGER,  -- d mod (p-1)
    exponent2         INTEGER,  -- d mod (q-1)
    coefficient       INTEGER,  -- (inverse of q) mod p
    otherPrimeInfos   OtherPrimeInfos OPTIONAL
}

Version ::= INTEGER { two-prime(0), multi(1) }
    (CONSTRAINED BY {-- version must be multi if otherPrimeInfos present --})

OtherPrimeInfos ::= SEQUENCE SIZE(1..MAX) OF OtherPrimeInfo

OtherPrimeInfo ::= SEQUENCE {
    prime             INTEGER,  -- ri
    exponent          INTEGER,  -- di
    coefficient       INTEGER   -- ti
}
*/

/// PKCS#1 RSAPrivateKey version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    TwoPrime = 0,
    Multi = 1,
}

impl TryFrom<i64> for Version {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Version::TwoPrime),
            1 => Ok(Version::Multi),
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
            _ => Err(Error::ExpectedInteger { field: "version" }),
        }
    }
}

/// Additional prime of a multi-prime key. Every component is secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherPrimeInfo {
    pub prime: SecretBytes,
    pub exponent: SecretBytes,
    pub coefficient: SecretBytes,
}

/// PKCS#1 RSA private key.
///
/// The public components stay as [`Integer`]. Private components are kept
/// as unsigned big-endian magnitudes in [`SecretBytes`] and are wiped on drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RSAPrivateKey {
    pub version: Version,
    pub modulus: Integer,              // n
    pub public_exponent: Integer,      // e
    pub private_exponent: SecretBytes, // d
    pub prime1: SecretBytes,           // p
    pub prime2: SecretBytes,           // q
    pub exponent1: SecretBytes,        // d mod (p-1)
    pub exponent2: SecretBytes,        // d mod (q-1)
    pub coefficient: SecretBytes,      // (inverse of q) mod p
    pub other_prime_infos: Vec<OtherPrimeInfo>,
}

fn positive_integer(element: Option<&Element>, field: &'static str) -> Result<Integer> {
    match element {
        Some(Element::Integer(int)) if int.is_positive() => Ok(int.clone()),
        Some(Element::Integer(_)) => Err(Error::NonPositive { field }),
        _ => Err(Error::ExpectedInteger { field }),
    }
}

fn secret_integer(element: Option<&Element>, field: &'static str) -> Result<SecretBytes> {
    positive_integer(element, field).map(|int| SecretBytes::from(int.to_unsigned_bytes_be()))
}

impl DecodableFrom<Element> for OtherPrimeInfo {}

impl Decoder<Element, OtherPrimeInfo> for Element {
    type Error = Error;

    fn decode(&self) -> Result<OtherPrimeInfo> {
        match self {
            Element::Sequence(elements) if elements.len() == 3 => Ok(OtherPrimeInfo {
                prime: secret_integer(elements.first(), "otherPrimeInfo.prime")?,
                exponent: secret_integer(elements.get(1), "otherPrimeInfo.exponent")?,
                coefficient: secret_integer(elements.get(2), "otherPrimeInfo.coefficient")?,
            }),
            _ => Err(Error::InvalidOtherPrimeInfos),
        }
    }
}

impl DecodableFrom<Element> for RSAPrivateKey {}

impl Decoder<Element, RSAPrivateKey> for Element {
    type Error = Error;

    fn decode(&self) -> Result<RSAPrivateKey> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence(self.type_name()));
        };

        let version: Version = elements
            .first()
            .ok_or(Error::InvalidElementCount {
                expected: "9 or 10",
                actual: 0,
            })?
            .decode()?;

        match (version, elements.len()) {
            (Version::TwoPrime, 9) | (Version::Multi, 10) => {}
            (Version::Multi, 9) => return Err(Error::MissingOtherPrimeInfos),
            (Version::TwoPrime, actual) => {
                return Err(Error::InvalidElementCount {
                    expected: "9",
                    actual,
                });
            }
            (Version::Multi, actual) => {
                return Err(Error::InvalidElementCount {
                    expected: "10",
                    actual,
                });
            }
        }

        let other_prime_infos = match elements.get(9) {
            None => Vec::new(),
            Some(Element::Sequence(infos)) if !infos.is_empty() => infos
                .iter()
                .map(|info| -> Result<OtherPrimeInfo> { info.decode() })
                .collect::<Result<Vec<_>>>()?,
            Some(_) => return Err(Error::InvalidOtherPrimeInfos),
        };

        Ok(RSAPrivateKey {
            version,
            modulus: positive_integer(elements.get(1), "modulus")?,
            public_exponent: positive_integer(elements.get(2), "publicExponent")?,
            private_exponent: secret_integer(elements.get(3), "privateExponent")?,
            prime1: secret_integer(elements.get(4), "prime1")?,
            prime2: secret_integer(elements.get(5), "prime2")?,
            exponent1: secret_integer(elements.get(6), "exponent1")?,
            exponent2: secret_integer(elements.get(7), "exponent2")?,
            coefficient: secret_integer(elements.get(8), "coefficient")?,
            other_prime_infos,
        })
    }
}

impl PrivateKeyExt for RSAPrivateKey {
    fn key_size(&self) -> u32 {
        self.modulus.bits() as u32
    }

    fn algorithm(&self) -> KeyAlgorithm {
        KeyAlgorithm::Rsa
    }

    fn public_key_bytes(&self) -> Option<&[u8]> {
        // The public key is (modulus, publicExponent), not a raw byte string.
        None
    }
}
