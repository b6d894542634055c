//! Session token verification

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Cookie the frontend stores the session token in.
pub const SESSION_COOKIE: &str = "__session";

/// Claims carried by an identity-provider session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Identity-provider subject id.
    pub sub: String,
    pub exp: i64,
    #[serde(default)]
    pub email: Option<String>,
    /// Coarse authorization tag from profile metadata ("admin" or absent).
    #[serde(default)]
    pub role: Option<String>,
}

impl SessionClaims {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("admin")
    }
}

/// Validates HS256 session tokens against the configured secret.
#[derive(Clone)]
pub struct SessionVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
        let data =
            jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn token(secret: &str, claims: &SessionClaims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(role: Option<&str>) -> SessionClaims {
        let exp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64
            + 3600;
        SessionClaims {
            sub: "user_2abc".to_string(),
            exp,
            email: Some("x@y.com".to_string()),
            role: role.map(String::from),
        }
    }

    #[test]
    fn verifies_valid_token() {
        let verifier = SessionVerifier::new("secret");
        let verified = verifier.verify(&token("secret", &claims(Some("admin")))).unwrap();

        assert_eq!(verified.sub, "user_2abc");
        assert!(verified.is_admin());
    }

    #[test]
    fn role_defaults_to_non_admin() {
        let verifier = SessionVerifier::new("secret");
        let verified = verifier.verify(&token("secret", &claims(None))).unwrap();

        assert!(!verified.is_admin());
        assert!(verified.role.is_none());
    }

    #[test]
    fn rejects_wrong_secret() {
        let verifier = SessionVerifier::new("secret");
        assert!(verifier.verify(&token("other", &claims(None))).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let verifier = SessionVerifier::new("secret");
        let mut expired = claims(None);
        expired.exp = 1_000_000; // long past, outside any leeway

        assert!(verifier.verify(&token("secret", &expired)).is_err());
    }

    #[test]
    fn rejects_garbage() {
        let verifier = SessionVerifier::new("secret");
        assert!(verifier.verify("not.a.token").is_err());
    }
}
