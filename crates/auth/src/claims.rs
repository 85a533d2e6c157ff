use serde::{Deserialize, Serialize};

use backoffice_core::{DomainError, DomainResult, RecordId};

use crate::Role;

/// JWT claims carried by every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject: the user's record key.
    pub sub: String,

    pub role: Role,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Issued-at, seconds since the epoch.
    pub iat: i64,

    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

impl JwtClaims {
    pub fn user_id(&self) -> DomainResult<RecordId> {
        self.sub
            .parse()
            .map_err(|_| DomainError::unauthorized("Invalid token subject."))
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_must_be_a_record_key() {
        let id = RecordId::new();
        let mut claims = JwtClaims {
            sub: id.to_string(),
            role: Role::User,
            email: None,
            iat: 0,
            exp: 1,
        };
        assert_eq!(claims.user_id().unwrap(), id);

        claims.sub = "not-a-uuid".into();
        assert!(claims.user_id().is_err());
    }
}
