//! SEC1 `ECPrivateKey` as specified by
//! [RFC 5915](https://datatracker.ietf.org/doc/html/rfc5915).

mod error;
mod types;

pub use error::{Error, Result};
pub use types::{ECPrivateKey, Version};
