use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("expected SEQUENCE, got {0}")]
    ExpectedSequence(&'static str),

    #[error("expected {expected} elements, got {actual}")]
    InvalidElementCount {
        expected: &'static str,
        actual: usize,
    },

    #[error("expected INTEGER for {field}")]
    ExpectedInteger { field: &'static str },

    #[error("{field} must be a positive INTEGER")]
    NonPositive { field: &'static str },

    #[error("invalid version: {0} (must be 0 for two-prime or 1 for multi-prime)")]
    InvalidVersion(i64),

    #[error("version out of range for i64")]
    VersionOutOfRange,

    #[error("multi-prime key without otherPrimeInfos")]
    MissingOtherPrimeInfos,

    #[error("otherPrimeInfos must be a non-empty SEQUENCE of OtherPrimeInfo")]
    InvalidOtherPrimeInfos,
}

pub type Result<T> = std::result::Result<T, Error>;
