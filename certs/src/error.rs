use std::fmt::{self, Display};

use kagi_pem::Label;
use kagi_pkcs::KeyEncoding;
use thiserror::Error;

fn join<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Failure to extract a PEM block. Every variant carries the caller's kind.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{kind}: input is empty")]
    Empty { kind: String },

    #[error("{kind}: no PEM data found")]
    NoPemData { kind: String },

    #[error("{kind}: no matching PEM block (found: {})", join(.found))]
    NoMatchingBlock { kind: String, found: Vec<Label> },

    #[error("{kind}: malformed PEM: {source}")]
    Malformed {
        kind: String,
        source: kagi_pem::error::Error,
    },

    #[error("{kind}: {label} block: {source}")]
    Base64 {
        kind: String,
        label: Label,
        source: kagi_pem::error::Error,
    },

    #[error("{kind}: PEM block has no payload")]
    EmptyPayload { kind: String },
}

impl DecodeError {
    /// The kind the caller asked for.
    pub fn kind(&self) -> &str {
        match self {
            DecodeError::Empty { kind }
            | DecodeError::NoPemData { kind }
            | DecodeError::NoMatchingBlock { kind, .. }
            | DecodeError::Malformed { kind, .. }
            | DecodeError::Base64 { kind, .. }
            | DecodeError::EmptyPayload { kind } => kind,
        }
    }
}

/// One encoding that was tried and why it did not fit.
#[derive(Debug)]
pub struct ProbeFailure {
    pub encoding: KeyEncoding,
    pub source: kagi_pkcs::Error,
}

impl Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.encoding, self.source)
    }
}

/// Failure to read a PEM block as a private key. Every variant carries the
/// block label.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{label} block does not hold a private key")]
    UnexpectedBlockType { label: Label },

    #[error("{label} block is encrypted")]
    Encrypted { label: Label },

    #[error("{label} block is not valid DER: {source}")]
    NotAsn1 {
        label: Label,
        source: kagi_asn1::error::Error,
    },

    #[error("{label} block: {encoding} key uses unsupported algorithm {algorithm}")]
    UnsupportedAlgorithm {
        label: Label,
        encoding: KeyEncoding,
        algorithm: String,
    },

    #[error("{label} block is not a private key in any supported encoding ({})", join(.attempts))]
    UnrecognizedKey {
        label: Label,
        attempts: Vec<ProbeFailure>,
    },
}

impl ParseError {
    pub fn label(&self) -> Label {
        match self {
            ParseError::UnexpectedBlockType { label }
            | ParseError::Encrypted { label }
            | ParseError::NotAsn1 { label, .. }
            | ParseError::UnsupportedAlgorithm { label, .. }
            | ParseError::UnrecognizedKey { label, .. } => *label,
        }
    }
}
