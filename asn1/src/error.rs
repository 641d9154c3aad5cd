//! Error types for ASN.1 element parsing.

use std::num::ParseIntError;

use thiserror::Error;

/// Errors that can occur while turning DER TLVs into ASN.1 elements.
#[derive(Debug, Error)]
pub enum Error {
    // Boolean errors
    #[error("BOOLEAN: must be a single 0x00 or 0xff octet")]
    InvalidBoolean,

    // Null errors
    #[error("NULL: must have no content")]
    InvalidNull,

    // Integer errors
    #[error("INTEGER: no data")]
    IntegerNoData,
    #[error("INTEGER: not minimally encoded")]
    IntegerNotMinimal,
    #[error("parse int error: {0}")]
    ParseInt(#[from] ParseIntError),

    // ObjectIdentifier errors
    #[error("OBJECT IDENTIFIER: no data")]
    ObjectIdentifierNoData,
    #[error("OBJECT IDENTIFIER: incomplete encoding")]
    ObjectIdentifierIncompleteEncoding,
    #[error("OBJECT IDENTIFIER: arc is not minimally encoded")]
    ObjectIdentifierNotMinimal,
    #[error("OBJECT IDENTIFIER: arc does not fit in 64 bits")]
    ObjectIdentifierArcTooLarge,
    #[error("OBJECT IDENTIFIER: too few components (need at least 2)")]
    ObjectIdentifierTooFewComponents,

    // BitString errors
    #[error("BIT STRING: no data")]
    BitStringNoData,
    #[error("BIT STRING: unused bits {0} out of range (must be 0-7)")]
    BitStringUnusedBitsOutOfRange(u8),

    // String type errors
    #[error("UTF8String: invalid UTF-8")]
    Utf8StringInvalidUtf8,
    #[error("PrintableString: invalid encoding")]
    PrintableStringInvalidEncoding,
    #[error("IA5String: invalid encoding")]
    Ia5StringInvalidEncoding,

    // Structure errors
    #[error("{0}: primitive encoding is required")]
    ExpectedPrimitive(&'static str),
    #[error("{0}: constructed encoding is required")]
    ExpectedConstructed(&'static str),
    #[error("expected a single top-level element, found {0}")]
    ExpectedSingleElement(usize),
    #[error("invalid context-specific value: {slot}, {msg}")]
    InvalidContextSpecific { slot: u8, msg: &'static str },

    // DER errors
    #[error("invalid DER encoding: {0}")]
    FailedToDecodeDer(#[from] kagi_der::error::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
