//! Algorithm identifiers and named elliptic curves.
//!
//! Defined in [RFC 5280 Section 4.1.1.2](https://datatracker.ietf.org/doc/html/rfc5280#section-4.1.1.2)
//! and [RFC 5480 Section 2.1.1.1](https://datatracker.ietf.org/doc/html/rfc5480#section-2.1.1.1).

use std::fmt::Display;

use kagi::decoder::{DecodableFrom, Decoder};
use kagi_asn1::{Element, ObjectIdentifier};
use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("AlgorithmIdentifier: expected SEQUENCE, got {0}")]
    ExpectedSequence(&'static str),
    #[error("AlgorithmIdentifier: expected 1 or 2 elements, got {0}")]
    InvalidElementCount(usize),
    #[error("AlgorithmIdentifier: algorithm must be an OBJECT IDENTIFIER, got {0}")]
    ExpectedObjectIdentifier(&'static str),
}

/// Parameters field of an AlgorithmIdentifier.
///
/// - `Null`: explicit NULL, as RSA keys carry
/// - `Elm`: anything else (a curve OID for EC keys, a SEQUENCE for DSA)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlgorithmParameters {
    Null,
    Elm(Element),
}

/*
AlgorithmIdentifier ::= SEQUENCE {
    algorithm   OBJECT IDENTIFIER,
    parameters  ANY DEFINED BY algorithm OPTIONAL
}
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmIdentifier {
    pub algorithm: ObjectIdentifier,
    pub parameters: Option<AlgorithmParameters>,
}

impl AlgorithmIdentifier {
    pub const OID_RSA_ENCRYPTION: &'static str = "1.2.840.113549.1.1.1";
    pub const OID_EC_PUBLIC_KEY: &'static str = "1.2.840.10045.2.1";
    pub const OID_X25519: &'static str = "1.3.101.110";
    pub const OID_X448: &'static str = "1.3.101.111";
    pub const OID_ED25519: &'static str = "1.3.101.112";
    pub const OID_ED448: &'static str = "1.3.101.113";

    /// Curve OID carried in the parameters, if they hold one.
    pub fn named_curve_oid(&self) -> Option<&ObjectIdentifier> {
        match &self.parameters {
            Some(AlgorithmParameters::Elm(Element::ObjectIdentifier(oid))) => Some(oid),
            _ => None,
        }
    }
}

impl DecodableFrom<Element> for AlgorithmIdentifier {}

impl Decoder<Element, AlgorithmIdentifier> for Element {
    type Error = Error;

    fn decode(&self) -> Result<AlgorithmIdentifier, Self::Error> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence(self.type_name()));
        };

        let (algorithm, rest) = match elements.as_slice() {
            [Element::ObjectIdentifier(oid), rest @ ..] if rest.len() <= 1 => (oid.clone(), rest),
            [other, rest @ ..] if rest.len() <= 1 => {
                return Err(Error::ExpectedObjectIdentifier(other.type_name()));
            }
            _ => return Err(Error::InvalidElementCount(elements.len())),
        };

        let parameters = rest.first().map(|param| match param {
            Element::Null => AlgorithmParameters::Null,
            other => AlgorithmParameters::Elm(other.clone()),
        });

        Ok(AlgorithmIdentifier {
            algorithm,
            parameters,
        })
    }
}

/// Named curves accepted for EC private keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedCurve {
    /// P-224, OID 1.3.132.0.33
    Secp224r1,
    /// P-256 (prime256v1), OID 1.2.840.10045.3.1.7
    Secp256r1,
    /// P-384, OID 1.3.132.0.34
    Secp384r1,
    /// P-521, OID 1.3.132.0.35
    Secp521r1,
    /// OID 1.3.132.0.10
    Secp256k1,
}

impl NamedCurve {
    pub const OID_SECP224R1: &'static str = "1.3.132.0.33";
    pub const OID_SECP256R1: &'static str = "1.2.840.10045.3.1.7";
    pub const OID_SECP384R1: &'static str = "1.3.132.0.34";
    pub const OID_SECP521R1: &'static str = "1.3.132.0.35";
    pub const OID_SECP256K1: &'static str = "1.3.132.0.10";

    const ALL: [NamedCurve; 5] = [
        NamedCurve::Secp224r1,
        NamedCurve::Secp256r1,
        NamedCurve::Secp384r1,
        NamedCurve::Secp521r1,
        NamedCurve::Secp256k1,
    ];

    pub const fn oid_str(&self) -> &'static str {
        match self {
            Self::Secp224r1 => Self::OID_SECP224R1,
            Self::Secp256r1 => Self::OID_SECP256R1,
            Self::Secp384r1 => Self::OID_SECP384R1,
            Self::Secp521r1 => Self::OID_SECP521R1,
            Self::Secp256k1 => Self::OID_SECP256K1,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Secp224r1 => "secp224r1",
            Self::Secp256r1 => "secp256r1",
            Self::Secp384r1 => "secp384r1",
            Self::Secp521r1 => "secp521r1",
            Self::Secp256k1 => "secp256k1",
        }
    }

    /// Order size of the curve in bits.
    pub const fn bits(&self) -> u32 {
        match self {
            Self::Secp224r1 => 224,
            Self::Secp256r1 | Self::Secp256k1 => 256,
            Self::Secp384r1 => 384,
            Self::Secp521r1 => 521,
        }
    }

    /// Length of an encoded private scalar: ceil(bits / 8).
    pub const fn scalar_len(&self) -> usize {
        self.bits().div_ceil(8) as usize
    }

    /// Looks up a supported curve by OID.
    pub fn from_oid(oid: &ObjectIdentifier) -> Option<Self> {
        Self::ALL.into_iter().find(|curve| *oid == curve.oid_str())
    }
}

impl Serialize for NamedCurve {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl Display for NamedCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
