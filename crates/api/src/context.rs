use backoffice_auth::{JwtClaims, Role};
use backoffice_core::{DomainResult, RecordId};

/// The authenticated caller, taken from a validated access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    id: RecordId,
    role: Role,
    email: Option<String>,
}

impl CurrentUser {
    pub fn from_claims(claims: JwtClaims) -> DomainResult<Self> {
        Ok(Self {
            id: claims.user_id()?,
            role: claims.role,
            email: claims.email,
        })
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
