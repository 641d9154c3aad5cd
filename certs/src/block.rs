use std::convert::Infallible;
use std::fmt;

use kagi::decoder::Decoder;
use kagi_pem::{Header, Label, Pem, ToPem};
use zeroize::Zeroizing;

/// A decoded PEM block: label, encapsulated headers and binary payload.
///
/// The payload is never empty and is wiped on drop.
#[derive(Clone)]
pub struct PemBlock {
    label: Label,
    headers: Vec<Header>,
    encrypted: bool,
    payload: Zeroizing<Vec<u8>>,
}

impl PemBlock {
    pub fn label(&self) -> Label {
        self.label
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Looks up an encapsulated header, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name().eq_ignore_ascii_case(name))
            .map(Header::value)
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// True for `ENCRYPTED PRIVATE KEY` and `Proc-Type: 4,ENCRYPTED` blocks.
    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }
}

impl TryFrom<&Pem> for PemBlock {
    type Error = kagi_pem::error::Error;

    fn try_from(pem: &Pem) -> Result<Self, Self::Error> {
        let payload: Vec<u8> = pem.decode()?;
        Ok(PemBlock {
            label: pem.label(),
            headers: pem.headers().to_vec(),
            encrypted: pem.is_encrypted(),
            payload: Zeroizing::new(payload),
        })
    }
}

impl ToPem for PemBlock {
    type Error = Infallible;

    fn pem_label(&self) -> Label {
        self.label
    }

    fn to_pem(&self) -> Result<Pem, Self::Error> {
        Ok(Pem::from_bytes(self.label, &self.payload).with_headers(self.headers.clone()))
    }
}

impl fmt::Debug for PemBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PemBlock")
            .field("label", &self.label)
            .field("headers", &self.headers)
            .field("encrypted", &self.encrypted)
            .field(
                "payload",
                &format_args!("[REDACTED; {} bytes]", self.payload.len()),
            )
            .finish()
    }
}
