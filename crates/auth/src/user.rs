//! User accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use backoffice_core::{DomainError, DomainResult, Record, RecordId};

use crate::Role;

/// Trimmed, lowercased email. Rejects values without a local part and domain.
pub fn normalize_email(raw: &str) -> DomainResult<String> {
    let email = raw.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(DomainError::validation("Invalid email address."));
    }
    Ok(email)
}

/// Stored account. The password is only ever kept as an argon2 PHC string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub blocked: bool,
}

impl User {
    pub const COLLECTION: &'static str = "users";

    pub fn new(email: String, password_hash: String, role: Role) -> Self {
        Self {
            email,
            password_hash,
            role,
            blocked: false,
        }
    }

    pub fn ensure_can_log_in(&self) -> DomainResult<()> {
        if self.blocked {
            return Err(DomainError::validation("User is blocked."));
        }
        Ok(())
    }
}

/// Public representation of a user, without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: RecordId,
    pub email: String,
    pub role: Role,
    pub blocked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Record<User>> for UserView {
    fn from(record: Record<User>) -> Self {
        Self {
            id: record.id,
            email: record.doc.email,
            role: record.doc.role,
            blocked: record.doc.blocked,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Admin@Example.COM ").unwrap(), "admin@example.com");
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for bad in ["", "plain", "@example.com", "a@nodot", "a@.com", "a@example."] {
            assert!(normalize_email(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn blocked_users_cannot_log_in() {
        let mut user = User::new("a@b.co".into(), "hash".into(), Role::User);
        assert!(user.ensure_can_log_in().is_ok());
        user.blocked = true;
        assert_eq!(
            user.ensure_can_log_in(),
            Err(DomainError::validation("User is blocked."))
        );
    }

    #[test]
    fn view_never_carries_the_hash() {
        let record = Record::new(
            RecordId::new(),
            User::new("a@b.co".into(), "$argon2id$secret".into(), Role::User),
            Utc::now(),
        );
        let json = serde_json::to_value(UserView::from(record)).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["email"], "a@b.co");
        assert_eq!(json["role"], "user");
    }
}
