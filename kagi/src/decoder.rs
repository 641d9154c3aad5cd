//! Decoder trait for type-safe conversions.
//!
//! The `Decoder` trait converts a source type `T` into a destination type
//! `D`. Every stage of key decoding is expressed through it, from PEM text
//! down to a typed private key.
//!
//! # Design Pattern
//!
//! 1. `Decoder<T, D>` performs the conversion.
//! 2. `DecodableFrom<T>` is a marker on the destination type that declares
//!    the conversion legal.
//!
//! # Implementation Guide
//!
//! ```no_run
//! use kagi::decoder::{Decoder, DecodableFrom};
//!
//! struct Payload(Vec<u8>);
//! struct Length(usize);
//!
//! #[derive(Debug)]
//! struct EmptyPayload;
//!
//! impl DecodableFrom<Payload> for Length {}
//!
//! impl Decoder<Payload, Length> for Payload {
//!     type Error = EmptyPayload;
//!
//!     fn decode(&self) -> Result<Length, Self::Error> {
//!         if self.0.is_empty() {
//!             return Err(EmptyPayload);
//!         }
//!         Ok(Length(self.0.len()))
//!     }
//! }
//! ```

/// Decoder trait for converting from type `T` to type `D`.
///
/// Implemented by the source type `T`. The destination type must implement
/// `DecodableFrom<T>`.
///
/// A single source type usually implements `Decoder` for several
/// destinations (an ASN.1 `Element` can become a PKCS#1, PKCS#8 or SEC1
/// key), so call sites pick the destination with a type annotation:
///
/// ```ignore
/// use kagi::decoder::Decoder;
///
/// let key: RSAPrivateKey = element.decode()?;
/// ```
pub trait Decoder<T, D: DecodableFrom<T>> {
    /// The error type returned when decoding fails.
    type Error;

    /// Decodes `self` into type `D`.
    ///
    /// # Errors
    ///
    /// Returns an error if the conversion fails. The specific error
    /// conditions depend on the implementing type.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker trait indicating that type `D` can be decoded from type `T`.
///
/// This trait has no methods. It only constrains `Decoder` so that each
/// valid conversion has to be declared explicitly:
///
/// ```no_run
/// use kagi::decoder::DecodableFrom;
///
/// struct Base64Text;
/// struct Bytes;
///
/// impl DecodableFrom<Base64Text> for Bytes {}
/// ```
pub trait DecodableFrom<T> {}
