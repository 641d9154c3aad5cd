use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("ASN.1 error: {0}")]
    Asn1(#[from] kagi_asn1::error::Error),

    #[error("PKCS#1 error: {0}")]
    Pkcs1(#[from] crate::pkcs1::Error),

    #[error("PKCS#8 error: {0}")]
    Pkcs8(#[from] crate::pkcs8::Error),

    #[error("SEC1 error: {0}")]
    Sec1(#[from] crate::sec1::Error),
}

impl Error {
    /// Name of the algorithm or curve when the envelope was understood but
    /// its content is not supported.
    ///
    /// A probe that fails this way recognized the key encoding, so trying
    /// other encodings cannot succeed.
    pub fn unsupported_algorithm(&self) -> Option<&str> {
        match self {
            Error::Pkcs8(crate::pkcs8::Error::UnsupportedAlgorithm(oid)) => Some(oid),
            Error::Pkcs8(crate::pkcs8::Error::UnsupportedCurve(oid)) => Some(oid),
            Error::Sec1(crate::sec1::Error::UnsupportedCurve(oid)) => Some(oid),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
