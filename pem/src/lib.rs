pub mod error;

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
    sync::LazyLock,
};

use base64::{Engine, engine::general_purpose::STANDARD};
use error::{Error, Result};
use kagi::decoder::{DecodableFrom, Decoder};
use regex::Regex;
use serde::{Serialize, Serializer};

const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";
const ENCRYPTED_PRIVATE_KEY_LABEL: &str = "ENCRYPTED PRIVATE KEY";
const RSA_PRIVATE_KEY_LABEL: &str = "RSA PRIVATE KEY";
const EC_PRIVATE_KEY_LABEL: &str = "EC PRIVATE KEY";
const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";
const RSA_PUBLIC_KEY_LABEL: &str = "RSA PUBLIC KEY";
const CERTIFICATE_LABEL: &str = "CERTIFICATE";

const LINE_WIDTH: usize = 64;

static BOUNDARY: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^-----(BEGIN|END) ([A-Z0-9]+(?:[ -][A-Z0-9]+)*)-----$"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    /// PKCS#8 private key (non-encrypted)
    PrivateKey,
    /// PKCS#8 encrypted private key
    EncryptedPrivateKey,
    /// PKCS#1 RSA private key
    RSAPrivateKey,
    /// SEC1 EC private key
    ECPrivateKey,
    /// X.509 SubjectPublicKeyInfo
    PublicKey,
    /// PKCS#1 RSA public key
    RSAPublicKey,
    /// X.509 Certificate
    Certificate,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::PrivateKey => PRIVATE_KEY_LABEL,
            Label::EncryptedPrivateKey => ENCRYPTED_PRIVATE_KEY_LABEL,
            Label::RSAPrivateKey => RSA_PRIVATE_KEY_LABEL,
            Label::ECPrivateKey => EC_PRIVATE_KEY_LABEL,
            Label::PublicKey => PUBLIC_KEY_LABEL,
            Label::RSAPublicKey => RSA_PUBLIC_KEY_LABEL,
            Label::Certificate => CERTIFICATE_LABEL,
        }
    }

    pub fn is_private_key(&self) -> bool {
        matches!(
            self,
            Label::PrivateKey
                | Label::EncryptedPrivateKey
                | Label::RSAPrivateKey
                | Label::ECPrivateKey
        )
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Label {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            PRIVATE_KEY_LABEL => Ok(Label::PrivateKey),
            ENCRYPTED_PRIVATE_KEY_LABEL => Ok(Label::EncryptedPrivateKey),
            RSA_PRIVATE_KEY_LABEL => Ok(Label::RSAPrivateKey),
            EC_PRIVATE_KEY_LABEL => Ok(Label::ECPrivateKey),
            PUBLIC_KEY_LABEL => Ok(Label::PublicKey),
            RSA_PUBLIC_KEY_LABEL => Ok(Label::RSAPublicKey),
            CERTIFICATE_LABEL => Ok(Label::Certificate),
            _ => Err(Error::InvalidLabel(s.to_string())),
        }
    }
}

impl Serialize for Label {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoundaryKind {
    Begin,
    End,
}

/// An encapsulation boundary line. The label is kept raw so unknown labels can be skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Boundary<'a> {
    kind: BoundaryKind,
    label: &'a str,
}

impl<'a> Boundary<'a> {
    fn parse(line: &'a str) -> Result<Option<Self>> {
        let re = BOUNDARY
            .as_ref()
            .map_err(|_| Error::InvalidEncapsulationBoundary)?;
        let Some(captured) = re.captures(line.trim()) else {
            return Ok(None);
        };
        let (Some(kind), Some(label)) = (captured.get(1), captured.get(2)) else {
            return Err(Error::InvalidEncapsulationBoundary);
        };
        let kind = match kind.as_str() {
            "BEGIN" => BoundaryKind::Begin,
            _ => BoundaryKind::End,
        };
        Ok(Some(Boundary {
            kind,
            label: label.as_str(),
        }))
    }
}

/// RFC 1421 encapsulated header, such as `Proc-Type: 4,ENCRYPTED`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    name: String,
    value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Header {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    fn parse(line: &str) -> Option<Self> {
        let (name, value) = line.split_once(':')?;
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return None;
        }
        Some(Header::new(name, value.trim()))
    }
}

impl Display for Header {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/*
ref: https://www.rfc-editor.org/rfc/rfc7468.html#section-3
ref: https://www.rfc-editor.org/rfc/rfc1421.html#section-4.4 (encapsulated headers)
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pem {
    label: Label,
    headers: Vec<Header>,
    base64_data: String,
}

impl Pem {
    pub fn new(label: Label, base64_data: String) -> Self {
        Pem {
            label,
            headers: Vec::new(),
            base64_data,
        }
    }

    pub fn from_bytes(label: Label, data: &[u8]) -> Self {
        Pem::new(label, STANDARD.encode(data))
    }

    pub fn with_headers(mut self, headers: Vec<Header>) -> Self {
        self.headers = headers;
        self
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Looks up a header by name, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(Header::value)
    }

    pub fn data(&self) -> &str {
        &self.base64_data
    }

    /// True for `ENCRYPTED PRIVATE KEY` blocks and legacy `Proc-Type: 4,ENCRYPTED` blocks.
    pub fn is_encrypted(&self) -> bool {
        self.label == Label::EncryptedPrivateKey
            || self
                .header("Proc-Type")
                .is_some_and(|v| v.to_ascii_uppercase().contains("ENCRYPTED"))
    }
}

impl Display for Pem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "-----BEGIN {}-----", self.label)?;
        if !self.headers.is_empty() {
            for header in &self.headers {
                writeln!(f, "{}", header)?;
            }
            writeln!(f)?;
        }
        // RFC 7468: base64 text should be wrapped at 64 characters
        for chunk in self.base64_data.as_bytes().chunks(LINE_WIDTH) {
            let line = std::str::from_utf8(chunk).map_err(|_| std::fmt::Error)?;
            writeln!(f, "{}", line)?;
        }
        write!(f, "-----END {}-----", self.label)
    }
}

/// Trait for types that can be converted to PEM format
pub trait ToPem {
    /// The error type returned by to_pem
    type Error;

    /// Get the PEM label for this type
    fn pem_label(&self) -> Label;

    /// Convert to PEM format
    fn to_pem(&self) -> std::result::Result<Pem, Self::Error>;
}

impl DecodableFrom<Pem> for Vec<u8> {}

impl Decoder<Pem, Vec<u8>> for Pem {
    type Error = Error;

    fn decode(&self) -> Result<Vec<u8>> {
        // This discards label information from Pem format.
        let decoded = STANDARD.decode(self.data())?;
        if decoded.is_empty() {
            return Err(Error::MissingData);
        }
        Ok(decoded)
    }
}

struct OpenBlock<'a> {
    label: &'a str,
    lines: Vec<&'a str>,
}

/// Parse every PEM block with a recognized label from a string.
///
/// Text around the blocks is ignored, and so are whole blocks whose label is
/// not a [`Label`]. An END line that shares a line with the next BEGIN is
/// split first.
///
/// # Example
/// ```
/// use kagi_pem::{Label, parse_many};
///
/// let pem_data = "-----BEGIN CERTIFICATE-----\nAAA=\n-----END CERTIFICATE-----\n-----BEGIN X509 CRL-----\nBBB=\n-----END X509 CRL-----";
/// let pems = parse_many(pem_data).unwrap();
/// assert_eq!(pems.len(), 1);
/// assert_eq!(pems[0].label(), Label::Certificate);
/// ```
pub fn parse_many(s: &str) -> Result<Vec<Pem>> {
    // Normalize input: ensure each boundary marker is on its own line
    let normalized = s.replace("----------", "-----\n-----");

    let mut pems = Vec::new();
    let mut current: Option<OpenBlock<'_>> = None;

    for line in normalized.lines() {
        match Boundary::parse(line)? {
            Some(Boundary {
                kind: BoundaryKind::Begin,
                label,
            }) => {
                if current.is_some() {
                    return Err(Error::MissingPostEncapsulationBoundary);
                }
                current = Some(OpenBlock {
                    label,
                    lines: vec![line],
                });
            }
            Some(Boundary {
                kind: BoundaryKind::End,
                label,
            }) => {
                let mut block = current.take().ok_or(Error::MissingPreEncapsulationBoundary)?;
                if block.label != label {
                    return Err(Error::LabelMissMatch {
                        begin: block.label.to_string(),
                        end: label.to_string(),
                    });
                }
                if Label::from_str(block.label).is_ok() {
                    block.lines.push(line);
                    pems.push(Pem::from_str(&block.lines.join("\n"))?);
                }
            }
            None => {
                if let Some(block) = current.as_mut() {
                    block.lines.push(line);
                }
            }
        }
    }

    if current.is_some() {
        return Err(Error::MissingPostEncapsulationBoundary);
    }

    if pems.is_empty() {
        return Err(Error::MissingPreEncapsulationBoundary);
    }

    Ok(pems)
}

impl FromStr for Pem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut state = PemParsingState::default();
        let mut label = None;
        let mut headers: Vec<Header> = Vec::new();
        let mut base64_lines = vec![];
        let mut base64_finl_lines = vec![];
        let mut lines = s.lines();
        loop {
            state = match state {
                PemParsingState::Init => {
                    let line = lines.next().ok_or(Error::MissingPreEncapsulationBoundary)?;
                    match Boundary::parse(line)? {
                        Some(Boundary {
                            kind: BoundaryKind::Begin,
                            label: raw,
                        }) => {
                            label = Some(Label::from_str(raw)?);
                            PemParsingState::PreEncapsulationBoundary
                        }
                        Some(_) => return Err(Error::MissingPreEncapsulationBoundary),
                        // explanatory text before the block
                        None => PemParsingState::Init,
                    }
                }
                PemParsingState::PreEncapsulationBoundary | PemParsingState::HeaderSeparator => {
                    let line = lines
                        .by_ref()
                        .map(str::trim)
                        .find(|line| !line.is_empty())
                        .ok_or(Error::MissingPostEncapsulationBoundary)?;
                    if let Some(boundary) = Boundary::parse(line)? {
                        check_post_boundary(label, boundary)?;
                        return Err(Error::MissingData);
                    }
                    match Header::parse(line) {
                        Some(header) if state == PemParsingState::PreEncapsulationBoundary => {
                            headers.push(header);
                            PemParsingState::Headers
                        }
                        _ if is_base64_finl(line) => {
                            base64_finl_lines.push(line);
                            PemParsingState::Base64Finl
                        }
                        _ => {
                            base64_lines.push(line);
                            PemParsingState::Base64Lines
                        }
                    }
                }
                PemParsingState::Headers => {
                    let raw = lines
                        .next()
                        .ok_or(Error::MissingPostEncapsulationBoundary)?;
                    let line = raw.trim();
                    if line.is_empty() {
                        PemParsingState::HeaderSeparator
                    } else if raw.starts_with([' ', '\t']) {
                        // folded continuation of the previous header
                        if let Some(last) = headers.last_mut() {
                            last.value.push(' ');
                            last.value.push_str(line);
                        }
                        PemParsingState::Headers
                    } else if let Some(header) = Header::parse(line) {
                        headers.push(header);
                        PemParsingState::Headers
                    } else {
                        return Err(Error::MissingHeaderSeparator);
                    }
                }
                PemParsingState::Base64Lines => {
                    let line = lines
                        .next()
                        .ok_or(Error::MissingPostEncapsulationBoundary)?
                        .trim();
                    if line.is_empty() {
                        PemParsingState::Base64Lines
                    } else if let Some(boundary) = Boundary::parse(line)? {
                        check_post_boundary(label, boundary)?;
                        PemParsingState::PostEncapsulationBoundary
                    } else if is_base64_finl(line) {
                        base64_finl_lines.push(line);
                        PemParsingState::Base64Finl
                    } else {
                        base64_lines.push(line);
                        PemParsingState::Base64Lines
                    }
                }
                PemParsingState::Base64Finl => {
                    let line = lines
                        .next()
                        .ok_or(Error::MissingPostEncapsulationBoundary)?
                        .trim();
                    if line.is_empty() {
                        PemParsingState::Base64Finl
                    } else if let Some(boundary) = Boundary::parse(line)? {
                        check_post_boundary(label, boundary)?;
                        PemParsingState::PostEncapsulationBoundary
                    } else if is_base64_finl(line) {
                        base64_finl_lines.push(line);
                        PemParsingState::Base64Finl
                    } else {
                        return Err(Error::InvalidBase64Finl);
                    }
                }
                PemParsingState::PostEncapsulationBoundary => break,
            };
        }

        let label = label.ok_or(Error::MissingPreEncapsulationBoundary)?;
        let finl = base64_finl(&base64_finl_lines)?;
        base64_lines.push(&finl);

        Ok(Pem {
            label,
            headers,
            base64_data: base64_lines.join(""),
        })
    }
}

fn check_post_boundary(label: Option<Label>, boundary: Boundary<'_>) -> Result<()> {
    let begin = label.ok_or(Error::MissingPreEncapsulationBoundary)?;
    if boundary.kind != BoundaryKind::End {
        return Err(Error::MissingPostEncapsulationBoundary);
    }
    if begin.as_str() != boundary.label {
        return Err(Error::LabelMissMatch {
            begin: begin.to_string(),
            end: boundary.label.to_string(),
        });
    }
    Ok(())
}

/*
* pre-eb -> headers -> blank -> base64lines -> base64finl -> post-eb
*        |____________________|-------------|------------->
*/
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
enum PemParsingState {
    #[default]
    Init,
    PreEncapsulationBoundary,
    Headers,
    HeaderSeparator,
    Base64Lines,
    Base64Finl,
    PostEncapsulationBoundary,
}

fn base64_finl(lines: &[&str]) -> Result<String> {
    // base64finl = *base64char (base64pad *WSP eol base64pad / *2base64pad) *WSP eol
    if lines.iter().any(|l| l.is_empty()) {
        return Err(Error::InvalidBase64Finl);
    }
    Ok(lines.concat())
}

fn is_base64_finl(line: &str) -> bool {
    line.contains('=')
}
