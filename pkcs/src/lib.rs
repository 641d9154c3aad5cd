//! # kagi-pkcs
//!
//! Private key structures carried inside PEM blocks.
//!
//! - [`pkcs1`]: RFC 8017 `RSAPrivateKey` (two-prime and multi-prime)
//! - [`pkcs8`]: RFC 5958 `OneAsymmetricKey` / `PrivateKeyInfo`
//! - [`sec1`]: RFC 5915 `ECPrivateKey`
//!
//! Each structure is decoded from an ASN.1 [`Element`](kagi_asn1::Element)
//! through the `Decoder` trait. [`PrivateKey`] folds the three encodings into
//! one closed enum over the supported algorithms.
//!
//! ```ignore
//! use kagi::decoder::Decoder;
//! use kagi_pkcs::{KeyEncoding, PrivateKey, PrivateKeyExt};
//!
//! let key = PrivateKey::from_element(&element, KeyEncoding::Pkcs8)?;
//! println!("{} ({} bits)", key.algorithm(), key.key_size());
//! ```

#![forbid(unsafe_code)]

pub mod algorithm;
pub mod error;
pub mod pkcs1;
pub mod pkcs8;
mod private_key;
pub mod sec1;
mod secret;

pub use algorithm::{AlgorithmIdentifier, AlgorithmParameters, NamedCurve};
pub use error::{Error, Result};
pub use private_key::{
    CurvePrivateKey, KeyAlgorithm, KeyEncoding, KeyInfo, PrivateKey, PrivateKeyExt,
};
pub use secret::SecretBytes;
