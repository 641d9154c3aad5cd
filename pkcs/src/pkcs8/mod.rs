//! PKCS#8: Private-Key Information Syntax
//!
//! Implements the `OneAsymmetricKey` structure of
//! [RFC 5958](https://datatracker.ietf.org/doc/html/rfc5958), which obsoletes
//! RFC 5208. The inner private key is resolved by
//! [`PrivateKey`](crate::PrivateKey).

mod error;
mod types;

pub use error::{Error, Result};
pub use types::{OneAsymmetricKey, PrivateKeyInfo, Version};
