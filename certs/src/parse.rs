use kagi::decoder::Decoder;
use kagi_asn1::{ASN1Object, Element};
use kagi_der::Der;
use kagi_pem::Label;
use kagi_pkcs::{KeyEncoding, PrivateKey, PrivateKeyExt};
use tracing::{debug, trace};

use crate::block::PemBlock;
use crate::error::{ParseError, ProbeFailure};

/// Reads the payload of `block` as a private key.
///
/// The encoding is found by probing: PKCS#1, then PKCS#8, then SEC1, with
/// the encoding named by the block label tried first. The first encoding
/// that reads the payload wins.
///
/// # Errors
///
/// - [`ParseError::UnexpectedBlockType`] when the label is not a private key label
/// - [`ParseError::Encrypted`] for `ENCRYPTED PRIVATE KEY` and `Proc-Type: 4,ENCRYPTED` blocks
/// - [`ParseError::NotAsn1`] when the payload is not a single DER value
/// - [`ParseError::UnsupportedAlgorithm`] when a key envelope names an algorithm or curve
///   that is not supported
/// - [`ParseError::UnrecognizedKey`] when no encoding fits, with every attempt listed
pub fn parse_private_key(block: &PemBlock) -> Result<PrivateKey, ParseError> {
    let label = block.label();
    if !label.is_private_key() {
        return Err(ParseError::UnexpectedBlockType { label });
    }
    if block.is_encrypted() {
        return Err(ParseError::Encrypted { label });
    }

    let element =
        payload_element(block.payload()).map_err(|source| ParseError::NotAsn1 { label, source })?;

    let mut attempts = Vec::new();
    for encoding in probe_order(label) {
        match PrivateKey::from_element(&element, encoding) {
            Ok(key) => {
                debug!(
                    %label,
                    %encoding,
                    algorithm = %key.algorithm(),
                    key_size = key.key_size(),
                    "parsed private key"
                );
                return Ok(key);
            }
            Err(source) => {
                if let Some(algorithm) = source.unsupported_algorithm() {
                    return Err(ParseError::UnsupportedAlgorithm {
                        label,
                        encoding,
                        algorithm: algorithm.to_string(),
                    });
                }
                trace!(%label, %encoding, error = %source, "encoding does not fit");
                attempts.push(ProbeFailure { encoding, source });
            }
        }
    }

    Err(ParseError::UnrecognizedKey { label, attempts })
}

fn payload_element(payload: &[u8]) -> kagi_asn1::error::Result<Element> {
    let der: Der = payload.decode()?;
    let object: ASN1Object = der.decode()?;
    Ok(object.single()?.clone())
}

fn probe_order(label: Label) -> Vec<KeyEncoding> {
    let preferred = match label {
        Label::RSAPrivateKey => Some(KeyEncoding::Pkcs1),
        Label::PrivateKey => Some(KeyEncoding::Pkcs8),
        Label::ECPrivateKey => Some(KeyEncoding::Sec1),
        _ => None,
    };

    preferred
        .into_iter()
        .chain(
            KeyEncoding::DEFAULT_ORDER
                .into_iter()
                .filter(|encoding| Some(*encoding) != preferred),
        )
        .collect()
}
