use kagi_pem::Label;

/// What a caller expects to find in a blob.
///
/// Parsed leniently from the caller's label. The kind only sets which PEM
/// blocks are preferred. It never changes how a block is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Certificate,
    PrivateKey,
    PublicKey,
    /// Any label we do not know. No block is preferred.
    Unrecognized,
}

impl ElementKind {
    /// PEM labels that satisfy this kind.
    pub fn candidate_labels(&self) -> &'static [Label] {
        match self {
            ElementKind::Certificate => &[Label::Certificate],
            ElementKind::PrivateKey => &[
                Label::RSAPrivateKey,
                Label::ECPrivateKey,
                Label::PrivateKey,
                Label::EncryptedPrivateKey,
            ],
            ElementKind::PublicKey => &[Label::PublicKey, Label::RSAPublicKey],
            ElementKind::Unrecognized => &[],
        }
    }

    pub fn matches(&self, label: Label) -> bool {
        self.candidate_labels().contains(&label)
    }
}

impl From<&str> for ElementKind {
    fn from(kind: &str) -> Self {
        match kind.trim().to_ascii_lowercase().as_str() {
            "cert" | "certificate" | "x509 certificate" => ElementKind::Certificate,
            "key" | "private key" | "privatekey" | "private-key" => ElementKind::PrivateKey,
            "public key" | "pubkey" => ElementKind::PublicKey,
            _ => ElementKind::Unrecognized,
        }
    }
}
