//! HS256 access tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use backoffice_core::RecordId;

use crate::{JwtClaims, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("token generation failed: {0}")]
    Generation(String),
}

/// Issues and validates signed access tokens with one shared secret.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl core::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("JwtService").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl JwtService {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn issue(&self, user_id: RecordId, role: Role, email: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user_id.to_string(),
            role,
            email: Some(email.to_string()),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }

    pub fn validate(&self, token: &str) -> Result<JwtClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["sub", "exp"]);
        validation.leeway = 0;

        decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new(b"test-secret-test-secret-test-secret", Duration::minutes(5))
    }

    #[test]
    fn issued_token_validates() {
        let id = RecordId::new();
        let token = service().issue(id, Role::Admin, "admin@example.com").unwrap();
        let claims = service().validate(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), id);
        assert!(claims.is_admin());
        assert_eq!(claims.email.as_deref(), Some("admin@example.com"));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = service().issue(RecordId::new(), Role::User, "u@example.com").unwrap();
        let other = JwtService::new(b"another-secret", Duration::minutes(5));
        assert!(matches!(other.validate(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let expired = JwtService::new(b"k", Duration::minutes(-10));
        let token = expired.issue(RecordId::new(), Role::User, "u@example.com").unwrap();
        assert_eq!(expired.validate(&token), Err(TokenError::Expired));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(service().validate("not.a.jwt").is_err());
    }
}
