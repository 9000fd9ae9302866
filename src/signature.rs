use crate::errors::HookError;
use crate::types::RegistryEntry;
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Verifies the `X-Hub-Signature` header (`sha1=<hex>`) against the raw
/// request body.
///
/// Entries without a configured key skip verification entirely: the
/// payload is trusted by configuration, not by cryptography. When a key
/// is present, the comparison runs in constant time via
/// [`Mac::verify_slice`], so a near-miss digest takes as long to reject
/// as a completely wrong one.
pub fn authenticate(
    entry: &RegistryEntry,
    body: &[u8],
    signature_header: Option<&str>,
) -> Result<(), HookError> {
    let Some(key) = entry.secret() else {
        return Ok(());
    };

    let header = signature_header.ok_or(HookError::MissingSignature)?;
    let digest = parse_signature_header(header).ok_or(HookError::SignatureMismatch)?;

    let mut mac = HmacSha1::new_from_slice(key).map_err(|_| HookError::SignatureMismatch)?;
    mac.update(body);
    mac.verify_slice(&digest)
        .map_err(|_| HookError::SignatureMismatch)
}

/// Splits a `sha1=<hex>` header on `=` and decodes the digest portion.
/// Returns `None` for headers with no `=` or invalid hex.
fn parse_signature_header(header: &str) -> Option<Vec<u8>> {
    let (_, hex_digest) = header.split_once('=')?;
    hex::decode(hex_digest).ok()
}
