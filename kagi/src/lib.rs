//! # kagi
//!
//! Core traits for the kagi key-material decoding crates.
//!
//! This crate defines the `Decoder` trait that links every layer of the
//! pipeline. Each layer only knows how to turn its input type into the next
//! representation:
//!
//! ```text
//! &[u8] → Pem → Vec<u8> → Der → ASN1Object/Element → RSAPrivateKey | OneAsymmetricKey | ECPrivateKey
//! ```
//!
//! ## Type Safety
//!
//! `Decoder` is paired with the `DecodableFrom` marker trait, so only the
//! conversions a crate explicitly opts into are possible. An attempt to
//! decode a `Der` into something that was never declared decodable from it
//! is rejected at compile time.
//!
//! ## Example
//!
//! The concrete implementations live in the `kagi-pem`, `kagi-der`,
//! `kagi-asn1` and `kagi-pkcs` crates:
//!
//! ```ignore
//! use kagi::decoder::Decoder;
//! use kagi_der::Der;
//! use kagi_asn1::ASN1Object;
//!
//! let bytes = vec![0x30, 0x03, 0x02, 0x01, 0x00];
//! let der: Der = bytes.decode().unwrap();
//! let asn1: ASN1Object = der.decode().unwrap();
//! ```

#![forbid(unsafe_code)]

pub mod decoder;
