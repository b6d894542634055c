//! Webhook signature verification
//!
//! Implements the svix signing scheme used by the identity provider:
//! the secret is `whsec_` followed by base64 key material, the signed
//! content is `{id}.{timestamp}.{payload}`, and the signature header
//! carries one or more space-separated `v1,<base64 hmac>` candidates.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use subtle::ConstantTimeEq;

use crate::error::{IdentityError, IdentityResult};

type HmacSha256 = Hmac<Sha256>;

/// Maximum age (in either direction) of the `svix-timestamp` header.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// The three transport headers every delivery must carry.
#[derive(Debug, Clone)]
pub struct SvixHeaders {
    pub id: String,
    pub timestamp: String,
    pub signature: String,
}

impl SvixHeaders {
    /// Build from the raw header values; any missing header rejects the
    /// delivery before the body is looked at.
    pub fn from_parts(
        id: Option<&str>,
        timestamp: Option<&str>,
        signature: Option<&str>,
    ) -> IdentityResult<Self> {
        match (id, timestamp, signature) {
            (Some(id), Some(timestamp), Some(signature)) => Ok(Self {
                id: id.to_string(),
                timestamp: timestamp.to_string(),
                signature: signature.to_string(),
            }),
            _ => Err(IdentityError::MissingHeaders),
        }
    }
}

/// Verifies webhook deliveries against the configured signing secret.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: Vec<u8>,
    tolerance_secs: i64,
}

impl WebhookVerifier {
    /// Decode the signing secret. An undecodable secret is a fatal
    /// misconfiguration and fails construction at startup.
    pub fn new(secret: &str) -> IdentityResult<Self> {
        let encoded = secret.strip_prefix("whsec_").unwrap_or(secret);
        let secret = BASE64
            .decode(encoded)
            .map_err(|_| IdentityError::InvalidSecret)?;
        if secret.is_empty() {
            return Err(IdentityError::InvalidSecret);
        }
        Ok(Self {
            secret,
            tolerance_secs: SIGNATURE_TOLERANCE_SECS,
        })
    }

    /// Verify a delivery against the current wall clock.
    pub fn verify(&self, headers: &SvixHeaders, payload: &str) -> IdentityResult<()> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        self.verify_at(headers, payload, now)
    }

    /// Produce a `v1,<base64>` signature for a payload. Used to sign test
    /// fixtures; real deliveries are signed by the provider.
    pub fn sign(&self, id: &str, timestamp: i64, payload: &str) -> IdentityResult<String> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|_| IdentityError::InvalidSecret)?;
        mac.update(format!("{id}.{timestamp}.{payload}").as_bytes());
        Ok(format!("v1,{}", BASE64.encode(mac.finalize().into_bytes())))
    }

    fn verify_at(&self, headers: &SvixHeaders, payload: &str, now: i64) -> IdentityResult<()> {
        let timestamp: i64 = headers
            .timestamp
            .parse()
            .map_err(|_| IdentityError::SignatureInvalid)?;

        if (now - timestamp).abs() > self.tolerance_secs {
            tracing::warn!(
                timestamp = timestamp,
                now = now,
                "Webhook timestamp outside tolerance window"
            );
            return Err(IdentityError::SignatureInvalid);
        }

        let signed_content = format!("{}.{}.{}", headers.id, timestamp, payload);
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|_| IdentityError::InvalidSecret)?;
        mac.update(signed_content.as_bytes());
        let expected = mac.finalize().into_bytes();

        // The header may list several versioned signatures; any v1 match
        // accepts the delivery.
        for candidate in headers.signature.split(' ') {
            let Some(encoded) = candidate.strip_prefix("v1,") else {
                continue;
            };
            let Ok(candidate_bytes) = BASE64.decode(encoded) else {
                continue;
            };
            if bool::from(candidate_bytes.ct_eq(expected.as_slice())) {
                return Ok(());
            }
        }

        tracing::warn!(msg_id = %headers.id, "No matching webhook signature");
        Err(IdentityError::SignatureInvalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // "test-secret" in base64
    const SECRET: &str = "whsec_dGVzdC1zZWNyZXQ=";

    fn verifier() -> WebhookVerifier {
        WebhookVerifier::new(SECRET).unwrap()
    }

    fn signed_headers(verifier: &WebhookVerifier, payload: &str, timestamp: i64) -> SvixHeaders {
        SvixHeaders {
            id: "msg_test".to_string(),
            timestamp: timestamp.to_string(),
            signature: verifier.sign("msg_test", timestamp, payload).unwrap(),
        }
    }

    #[test]
    fn accepts_correctly_signed_payload() {
        let verifier = verifier();
        let payload = r#"{"type":"user.created","data":{}}"#;
        let headers = signed_headers(&verifier, payload, 1_700_000_000);

        assert!(verifier.verify_at(&headers, payload, 1_700_000_000).is_ok());
    }

    #[test]
    fn accepts_any_of_multiple_signature_candidates() {
        let verifier = verifier();
        let payload = "{}";
        let mut headers = signed_headers(&verifier, payload, 1_700_000_000);
        headers.signature = format!("v1,aW52YWxpZA== {}", headers.signature);

        assert!(verifier.verify_at(&headers, payload, 1_700_000_000).is_ok());
    }

    #[test]
    fn rejects_tampered_payload() {
        let verifier = verifier();
        let headers = signed_headers(&verifier, "{}", 1_700_000_000);

        let result = verifier.verify_at(&headers, r#"{"evil":true}"#, 1_700_000_000);
        assert!(matches!(result, Err(IdentityError::SignatureInvalid)));
    }

    #[test]
    fn rejects_signature_from_different_secret() {
        let verifier = verifier();
        // "other-secret" in base64
        let other = WebhookVerifier::new("whsec_b3RoZXItc2VjcmV0").unwrap();
        let headers = signed_headers(&other, "{}", 1_700_000_000);

        let result = verifier.verify_at(&headers, "{}", 1_700_000_000);
        assert!(matches!(result, Err(IdentityError::SignatureInvalid)));
    }

    #[test]
    fn rejects_stale_timestamp() {
        let verifier = verifier();
        let payload = "{}";
        let headers = signed_headers(&verifier, payload, 1_700_000_000);

        let result =
            verifier.verify_at(&headers, payload, 1_700_000_000 + SIGNATURE_TOLERANCE_SECS + 1);
        assert!(matches!(result, Err(IdentityError::SignatureInvalid)));
    }

    #[test]
    fn rejects_non_numeric_timestamp() {
        let verifier = verifier();
        let mut headers = signed_headers(&verifier, "{}", 1_700_000_000);
        headers.timestamp = "soon".to_string();

        let result = verifier.verify_at(&headers, "{}", 1_700_000_000);
        assert!(matches!(result, Err(IdentityError::SignatureInvalid)));
    }

    #[test]
    fn rejects_signature_without_v1_prefix() {
        let verifier = verifier();
        let mut headers = signed_headers(&verifier, "{}", 1_700_000_000);
        headers.signature = headers
            .signature
            .strip_prefix("v1,")
            .unwrap()
            .to_string();

        let result = verifier.verify_at(&headers, "{}", 1_700_000_000);
        assert!(matches!(result, Err(IdentityError::SignatureInvalid)));
    }

    #[test]
    fn missing_headers_are_rejected_as_a_set() {
        let ok = SvixHeaders::from_parts(Some("msg"), Some("123"), Some("v1,abc"));
        assert!(ok.is_ok());

        for (id, ts, sig) in [
            (None, Some("123"), Some("v1,abc")),
            (Some("msg"), None, Some("v1,abc")),
            (Some("msg"), Some("123"), None),
        ] {
            let result = SvixHeaders::from_parts(id, ts, sig);
            assert!(matches!(result, Err(IdentityError::MissingHeaders)));
        }
    }

    #[test]
    fn secret_must_be_valid_base64() {
        let result = WebhookVerifier::new("whsec_!!!not-base64!!!");
        assert!(matches!(result, Err(IdentityError::InvalidSecret)));
    }

    #[test]
    fn secret_prefix_is_optional() {
        // Raw base64 without whsec_ prefix also works
        assert!(WebhookVerifier::new("dGVzdC1zZWNyZXQ=").is_ok());
    }
}
