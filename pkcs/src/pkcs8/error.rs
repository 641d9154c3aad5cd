use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid version: {0} (must be 0 for v1 or 1 for v2)")]
    InvalidVersion(i64),

    #[error("version out of range for i64")]
    VersionOutOfRange,

    #[error("expected INTEGER for version")]
    ExpectedVersionInteger,

    #[error("expected SEQUENCE, got {0}")]
    ExpectedSequence(&'static str),

    #[error("expected {expected} elements, got {actual}")]
    InvalidElementCount {
        expected: &'static str,
        actual: usize,
    },

    #[error("expected OCTET STRING for {field}")]
    ExpectedOctetString { field: &'static str },

    #[error("unexpected {0} after privateKey")]
    UnexpectedElement(&'static str),

    #[error("invalid publicKey: {0}")]
    InvalidPublicKey(#[source] kagi_asn1::error::Error),

    #[error(transparent)]
    AlgorithmIdentifier(#[from] crate::algorithm::Error),

    #[error("unsupported private key algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("unsupported EC curve: {0}")]
    UnsupportedCurve(String),

    #[error("id-ecPublicKey requires a named curve parameter")]
    MissingCurveParameters,

    #[error("{algorithm} must not carry algorithm parameters")]
    UnexpectedParameters { algorithm: &'static str },

    #[error("{algorithm} private key must be {expected} bytes, got {actual}")]
    InvalidCurveKeyLength {
        algorithm: &'static str,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
