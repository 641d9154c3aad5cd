//! Unified private key type.
//!
//! [`PrivateKey`] is a closed enum over the supported algorithms. It is built
//! from one of the three encodings ([`KeyEncoding`]) and is structurally
//! valid once constructed:
//!
//! - RSA: every component is a positive INTEGER
//! - EC: the curve is known and the scalar fits it
//! - Ed25519, Ed448, X25519, X448: the secret has the algorithm's exact length
//!
//! ```ignore
//! use kagi_pkcs::{KeyEncoding, PrivateKey, PrivateKeyExt};
//!
//! let key = PrivateKey::from_element(&element, KeyEncoding::Pkcs8)?;
//! assert_eq!(256, key.key_size());
//! ```

use std::fmt::Display;

use kagi::decoder::Decoder;
use kagi_asn1::{ASN1Object, Element, ObjectIdentifier};
use serde::{Serialize, Serializer};

use crate::SecretBytes;
use crate::algorithm::{AlgorithmIdentifier, AlgorithmParameters, NamedCurve};
use crate::error::{Error, Result};
use crate::pkcs1::RSAPrivateKey;
use crate::pkcs8::{self, OneAsymmetricKey};
use crate::sec1::ECPrivateKey;

/// Algorithm of a private key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAlgorithm {
    Rsa,
    Ec,
    Ed25519,
    Ed448,
    X25519,
    X448,
}

impl KeyAlgorithm {
    const ALL: [KeyAlgorithm; 6] = [
        KeyAlgorithm::Rsa,
        KeyAlgorithm::Ec,
        KeyAlgorithm::Ed25519,
        KeyAlgorithm::Ed448,
        KeyAlgorithm::X25519,
        KeyAlgorithm::X448,
    ];

    /// OID used in a PKCS#8 AlgorithmIdentifier.
    pub const fn oid(&self) -> &'static str {
        match self {
            KeyAlgorithm::Rsa => AlgorithmIdentifier::OID_RSA_ENCRYPTION,
            KeyAlgorithm::Ec => AlgorithmIdentifier::OID_EC_PUBLIC_KEY,
            KeyAlgorithm::Ed25519 => AlgorithmIdentifier::OID_ED25519,
            KeyAlgorithm::Ed448 => AlgorithmIdentifier::OID_ED448,
            KeyAlgorithm::X25519 => AlgorithmIdentifier::OID_X25519,
            KeyAlgorithm::X448 => AlgorithmIdentifier::OID_X448,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            KeyAlgorithm::Rsa => "RSA",
            KeyAlgorithm::Ec => "EC",
            KeyAlgorithm::Ed25519 => "Ed25519",
            KeyAlgorithm::Ed448 => "Ed448",
            KeyAlgorithm::X25519 => "X25519",
            KeyAlgorithm::X448 => "X448",
        }
    }

    /// Length of the raw secret for the RFC 8410 algorithms.
    pub const fn curve_secret_len(&self) -> Option<usize> {
        match self {
            KeyAlgorithm::Ed25519 | KeyAlgorithm::X25519 => Some(32),
            KeyAlgorithm::Ed448 => Some(57),
            KeyAlgorithm::X448 => Some(56),
            KeyAlgorithm::Rsa | KeyAlgorithm::Ec => None,
        }
    }

    pub fn from_oid(oid: &ObjectIdentifier) -> Option<Self> {
        Self::ALL.into_iter().find(|alg| *oid == alg.oid())
    }
}

impl Display for KeyAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for KeyAlgorithm {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

/// ASN.1 structure a private key is encoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEncoding {
    /// RFC 8017 RSAPrivateKey
    Pkcs1,
    /// RFC 5958 OneAsymmetricKey
    Pkcs8,
    /// RFC 5915 ECPrivateKey
    Sec1,
}

impl KeyEncoding {
    /// Order in which encodings are tried when nothing hints at one.
    pub const DEFAULT_ORDER: [KeyEncoding; 3] =
        [KeyEncoding::Pkcs1, KeyEncoding::Pkcs8, KeyEncoding::Sec1];

    pub const fn name(&self) -> &'static str {
        match self {
            KeyEncoding::Pkcs1 => "PKCS#1",
            KeyEncoding::Pkcs8 => "PKCS#8",
            KeyEncoding::Sec1 => "SEC1",
        }
    }
}

impl Display for KeyEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for KeyEncoding {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

/// Properties shared by every private key representation.
pub trait PrivateKeyExt {
    /// Key size in bits.
    ///
    /// The modulus length for RSA and the curve order for EC. Ed25519 and
    /// X25519 report 256, Ed448 and X448 report 448.
    fn key_size(&self) -> u32;

    fn algorithm(&self) -> KeyAlgorithm;

    /// Public key bytes embedded next to the private key, if any.
    ///
    /// RSA keys return `None`: their public part is the modulus and exponent.
    fn public_key_bytes(&self) -> Option<&[u8]>;
}

/// Ed25519, Ed448, X25519 or X448 private key (RFC 8410).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurvePrivateKey {
    algorithm: KeyAlgorithm,
    secret: SecretBytes,
    public_key: Option<Vec<u8>>,
}

impl CurvePrivateKey {
    pub fn secret(&self) -> &SecretBytes {
        &self.secret
    }
}

impl PrivateKeyExt for CurvePrivateKey {
    fn key_size(&self) -> u32 {
        match self.algorithm {
            KeyAlgorithm::Ed448 | KeyAlgorithm::X448 => 448,
            _ => 256,
        }
    }

    fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    fn public_key_bytes(&self) -> Option<&[u8]> {
        self.public_key.as_deref()
    }
}

/// A decoded private key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrivateKey {
    Rsa(RSAPrivateKey),
    /// The curve is always set.
    Ec(ECPrivateKey),
    Ed25519(CurvePrivateKey),
    Ed448(CurvePrivateKey),
    X25519(CurvePrivateKey),
    X448(CurvePrivateKey),
}

/// Loggable summary of a key. Carries no secret material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyInfo {
    pub algorithm: KeyAlgorithm,
    pub key_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curve: Option<NamedCurve>,
    pub has_public_key: bool,
}

impl PrivateKey {
    /// Reads `element` as the given encoding.
    pub fn from_element(element: &Element, encoding: KeyEncoding) -> Result<Self> {
        match encoding {
            KeyEncoding::Pkcs1 => Self::from_pkcs1(element),
            KeyEncoding::Pkcs8 => Self::from_pkcs8(element),
            KeyEncoding::Sec1 => Self::from_sec1(element),
        }
    }

    pub fn from_pkcs1(element: &Element) -> Result<Self> {
        let key: RSAPrivateKey = element.decode()?;
        Ok(PrivateKey::Rsa(key))
    }

    pub fn from_pkcs8(element: &Element) -> Result<Self> {
        let key: OneAsymmetricKey = element.decode()?;
        PrivateKey::try_from(&key)
    }

    /// A standalone SEC1 key must name its curve.
    pub fn from_sec1(element: &Element) -> Result<Self> {
        let key: ECPrivateKey = element.decode()?;
        key.require_curve()?;
        Ok(PrivateKey::Ec(key))
    }

    pub fn curve(&self) -> Option<NamedCurve> {
        match self {
            PrivateKey::Ec(key) => key.curve(),
            _ => None,
        }
    }

    pub fn info(&self) -> KeyInfo {
        KeyInfo {
            algorithm: self.algorithm(),
            key_size: self.key_size(),
            curve: self.curve(),
            has_public_key: self.public_key_bytes().is_some(),
        }
    }

    fn as_ext(&self) -> &dyn PrivateKeyExt {
        match self {
            PrivateKey::Rsa(key) => key,
            PrivateKey::Ec(key) => key,
            PrivateKey::Ed25519(key)
            | PrivateKey::Ed448(key)
            | PrivateKey::X25519(key)
            | PrivateKey::X448(key) => key,
        }
    }
}

impl PrivateKeyExt for PrivateKey {
    fn key_size(&self) -> u32 {
        self.as_ext().key_size()
    }

    fn algorithm(&self) -> KeyAlgorithm {
        self.as_ext().algorithm()
    }

    fn public_key_bytes(&self) -> Option<&[u8]> {
        self.as_ext().public_key_bytes()
    }
}

fn envelope_curve(parameters: &Option<AlgorithmParameters>) -> Result<NamedCurve> {
    match parameters {
        Some(AlgorithmParameters::Elm(Element::ObjectIdentifier(oid))) => NamedCurve::from_oid(oid)
            .ok_or_else(|| pkcs8::Error::UnsupportedCurve(oid.to_string()).into()),
        Some(AlgorithmParameters::Elm(other)) => Err(pkcs8::Error::UnsupportedCurve(format!(
            "{} curve parameters",
            other.type_name()
        ))
        .into()),
        Some(AlgorithmParameters::Null) | None => {
            Err(pkcs8::Error::MissingCurveParameters.into())
        }
    }
}

impl TryFrom<&OneAsymmetricKey> for PrivateKey {
    type Error = Error;

    fn try_from(key: &OneAsymmetricKey) -> Result<Self> {
        let identifier = &key.private_key_algorithm;
        let algorithm = KeyAlgorithm::from_oid(&identifier.algorithm).ok_or_else(|| {
            pkcs8::Error::UnsupportedAlgorithm(identifier.algorithm.to_string())
        })?;

        if algorithm == KeyAlgorithm::Ec {
            // The curve is checked before the inner key so an unknown curve is
            // reported as such.
            let curve = envelope_curve(&identifier.parameters)?;
            let inner = ASN1Object::try_from(&key.private_key)?;
            let ec: ECPrivateKey = inner.single()?.decode()?;
            let mut ec = ec.with_curve(curve)?;
            if ec.public_key.is_none() {
                ec.public_key = key.public_key.clone();
            }
            return Ok(PrivateKey::Ec(ec));
        }

        let inner = ASN1Object::try_from(&key.private_key)?;
        let inner = inner.single()?;

        let Some(expected) = algorithm.curve_secret_len() else {
            let rsa: RSAPrivateKey = inner.decode()?;
            return Ok(PrivateKey::Rsa(rsa));
        };

        if identifier.parameters.is_some() {
            return Err(pkcs8::Error::UnexpectedParameters {
                algorithm: algorithm.name(),
            }
            .into());
        }

        // CurvePrivateKey ::= OCTET STRING
        let Element::OctetString(secret) = inner else {
            return Err(pkcs8::Error::ExpectedOctetString {
                field: "CurvePrivateKey",
            }
            .into());
        };
        if secret.len() != expected {
            return Err(pkcs8::Error::InvalidCurveKeyLength {
                algorithm: algorithm.name(),
                expected,
                actual: secret.len(),
            }
            .into());
        }

        let curve_key = CurvePrivateKey {
            algorithm,
            secret: SecretBytes::from(secret.as_bytes()),
            public_key: key.public_key.as_ref().map(|bits| bits.as_bytes().to_vec()),
        };
        match algorithm {
            KeyAlgorithm::Ed25519 => Ok(PrivateKey::Ed25519(curve_key)),
            KeyAlgorithm::Ed448 => Ok(PrivateKey::Ed448(curve_key)),
            KeyAlgorithm::X25519 => Ok(PrivateKey::X25519(curve_key)),
            KeyAlgorithm::X448 => Ok(PrivateKey::X448(curve_key)),
            KeyAlgorithm::Rsa | KeyAlgorithm::Ec => {
                Err(pkcs8::Error::UnsupportedAlgorithm(algorithm.oid().to_string()).into())
            }
        }
    }
}
