use base64::{prelude::BASE64_STANDARD, Engine};
use openssl::{hash::MessageDigest, memcmp, pkey::PKey, sign::Signer};

use crate::server::error::line::LineError;

/// Computes HMAC-SHA256 of `body` keyed with the channel secret.
fn hmac_sha256(channel_secret: &str, body: &[u8]) -> Result<Vec<u8>, LineError> {
    let key = PKey::hmac(channel_secret.as_bytes())?;
    let mut signer = Signer::new(MessageDigest::sha256(), &key)?;
    signer.update(body)?;

    Ok(signer.sign_to_vec()?)
}

/// Computes the base64 encoded signature LINE sends for `body`.
pub fn compute_signature(channel_secret: &str, body: &[u8]) -> Result<String, LineError> {
    Ok(BASE64_STANDARD.encode(hmac_sha256(channel_secret, body)?))
}

/// Verifies the `x-line-signature` header against the raw request body.
///
/// The comparison runs in constant time.
///
/// # Arguments
/// - `channel_secret` - LINE channel secret
/// - `body` - Raw, unparsed request body
/// - `signature` - Value of the `x-line-signature` header, if present
///
/// # Returns
/// - `Ok(())` - Signature matches
/// - `Err(LineError::MissingSignature)` - Header absent or empty
/// - `Err(LineError::InvalidSignature)` - Header is not valid base64 or does not match
pub fn verify_signature(
    channel_secret: &str,
    body: &[u8],
    signature: Option<&str>,
) -> Result<(), LineError> {
    let signature = signature
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(LineError::MissingSignature)?;

    let provided = BASE64_STANDARD
        .decode(signature)
        .map_err(|_| LineError::InvalidSignature)?;
    let expected = hmac_sha256(channel_secret, body)?;

    if provided.len() != expected.len() || !memcmp::eq(&provided, &expected) {
        return Err(LineError::InvalidSignature);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use lionsclub_test_utils::prelude::*;

    use super::*;
    use crate::server::error::line::LineError;

    const BODY: &[u8] = br#"{"destination":"Ubot","events":[]}"#;

    /// Expect success for a signature produced with the same secret
    #[test]
    fn accepts_valid_signature() {
        let signature = sign_body(BODY);

        let result = verify_signature(TEST_CHANNEL_SECRET, BODY, Some(&signature));

        assert!(result.is_ok());
    }

    /// Expect computed signature to match the one LINE would send
    #[test]
    fn compute_matches_reference_signer() {
        let signature = compute_signature(TEST_CHANNEL_SECRET, BODY).unwrap();

        assert_eq!(signature, sign_body(BODY));
    }

    /// Expect MissingSignature when header is absent
    #[test]
    fn rejects_missing_signature() {
        let result = verify_signature(TEST_CHANNEL_SECRET, BODY, None);

        assert!(matches!(result, Err(LineError::MissingSignature)));
    }

    /// Expect InvalidSignature when the body was altered after signing
    #[test]
    fn rejects_tampered_body() {
        let signature = sign_body(BODY);

        let result = verify_signature(
            TEST_CHANNEL_SECRET,
            br#"{"destination":"Ubot","events":[{}]}"#,
            Some(&signature),
        );

        assert!(matches!(result, Err(LineError::InvalidSignature)));
    }

    /// Expect InvalidSignature for a header that is not base64
    #[test]
    fn rejects_malformed_signature() {
        let result = verify_signature(TEST_CHANNEL_SECRET, BODY, Some("not base64!"));

        assert!(matches!(result, Err(LineError::InvalidSignature)));
    }
}
