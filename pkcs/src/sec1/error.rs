use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("expected SEQUENCE, got {0}")]
    ExpectedSequence(&'static str),

    #[error("expected 2 to 4 elements, got {0}")]
    InvalidElementCount(usize),

    #[error("expected INTEGER for {0}")]
    ExpectedInteger(&'static str),

    #[error("expected OCTET STRING for privateKey, got {0}")]
    ExpectedOctetString(&'static str),

    #[error("invalid version: {0} (must be 1)")]
    InvalidVersion(i64),

    #[error("version out of range for i64")]
    VersionOutOfRange,

    #[error("unsupported EC curve: {0}")]
    UnsupportedCurve(String),

    #[error("expected BIT STRING for publicKey, got {0}")]
    ExpectedBitString(&'static str),

    #[error("unexpected {0} after privateKey")]
    UnexpectedElement(&'static str),

    #[error("curve is not named in the key or its envelope")]
    MissingCurve,

    #[error("curve mismatch: envelope names {outer}, key names {inner}")]
    CurveMismatch {
        outer: &'static str,
        inner: &'static str,
    },

    #[error("private key is empty")]
    EmptyPrivateKey,

    #[error("private key is zero")]
    ZeroPrivateKey,

    #[error("private key is {len} bytes, {curve} allows at most {max}")]
    PrivateKeyTooLong {
        curve: &'static str,
        len: usize,
        max: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
