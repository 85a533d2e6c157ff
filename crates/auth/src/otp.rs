//! Password-reset one-time codes.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use backoffice_core::{DomainError, DomainResult};

use crate::password::{PasswordError, hash_password, verify_password};

pub const OTP_LEN: usize = 6;

/// Random numeric code of exactly [`OTP_LEN`] digits.
pub fn generate_otp() -> String {
    let code: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
    code.to_string()
}

/// A pending password reset. At most one exists per email; while it exists
/// the account cannot log in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    pub email: String,
    pub otp_hash: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub otp_verified: bool,
}

impl PasswordReset {
    pub fn issue(
        email: &str,
        otp: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, PasswordError> {
        Ok(Self {
            email: email.to_string(),
            otp_hash: hash_password(otp)?,
            expires_at: now + ttl,
            otp_verified: false,
        })
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Check a submitted code. Expiry is checked before the code itself.
    pub fn check(&self, otp: &str, now: DateTime<Utc>) -> DomainResult<()> {
        if self.is_expired(now) {
            return Err(DomainError::unprocessable("OTP has been expired."));
        }
        if !verify_password(otp, &self.otp_hash) {
            return Err(DomainError::validation("Invalid OTP."));
        }
        Ok(())
    }

    pub fn ensure_verified(&self) -> DomainResult<()> {
        if !self.otp_verified {
            return Err(DomainError::unprocessable("Please first verify OTP."));
        }
        Ok(())
    }
}
