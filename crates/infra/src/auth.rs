//! Account service: login, the OTP password-reset flow and user management.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::json;
use tracing::{debug, info, instrument};

use backoffice_auth::{
    JwtService, PasswordReset, Role, User, UserView, generate_otp, hash_password, normalize_email,
    verify_password,
};
use backoffice_core::{DomainError, Record, RecordId};

use crate::error::ServiceResult;
use crate::store::{DocumentFilter, DocumentStore, StoredDocument};

const RESETS: &str = "password_resets";

/// Delivers one-time reset codes.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_otp(&self, email: &str, otp: &str) -> ServiceResult<()>;
}

/// Writes the code to the log instead of sending mail.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingMailer;

#[async_trait]
impl Mailer for LoggingMailer {
    async fn send_otp(&self, email: &str, otp: &str) -> ServiceResult<()> {
        info!(%email, "password reset code issued");
        debug!(%email, %otp, "password reset code");
        Ok(())
    }
}

#[derive(Clone)]
pub struct AuthService {
    docs: Arc<dyn DocumentStore>,
    jwt: JwtService,
    mailer: Arc<dyn Mailer>,
    otp_ttl: Duration,
}

impl AuthService {
    pub fn new(
        docs: Arc<dyn DocumentStore>,
        jwt: JwtService,
        mailer: Arc<dyn Mailer>,
        otp_ttl: Duration,
    ) -> Self {
        Self {
            docs,
            jwt,
            mailer,
            otp_ttl,
        }
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    /// Check credentials and issue an access token.
    #[instrument(skip_all, err)]
    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<(String, UserView)> {
        let email = normalize_email(email).map_err(|_| user_not_found())?;
        let user = self.find_user(&email).await?.ok_or_else(user_not_found)?;
        user.doc.ensure_can_log_in()?;
        if self.find_reset(&email).await?.is_some() {
            return Err(DomainError::unprocessable("Please reset your password.").into());
        }
        if !verify_password(password, &user.doc.password_hash) {
            return Err(DomainError::unauthorized("Invalid Password.").into());
        }

        let token = self.jwt.issue(user.id, user.doc.role, &user.doc.email)?;
        info!(user = %user.id, "login");
        Ok((token, user.into()))
    }

    /// Replace any pending reset for the account with a fresh code and mail it.
    #[instrument(skip_all, err)]
    pub async fn forgot_password(&self, email: &str) -> ServiceResult<()> {
        let email = normalize_email(email).map_err(|_| user_not_found())?;
        self.find_user(&email).await?.ok_or_else(user_not_found)?;

        let otp = generate_otp();
        let now = Utc::now();
        let reset = PasswordReset::issue(&email, &otp, now, self.otp_ttl)?;
        self.docs.delete_where(RESETS, "email", &email).await?;
        let record = Record::new(RecordId::new(), reset, now);
        self.docs
            .insert(RESETS, StoredDocument::from_record(&record, None)?)
            .await?;

        self.mailer.send_otp(&email, &otp).await
    }

    #[instrument(skip_all, err)]
    pub async fn verify_otp(&self, email: &str, otp: &str) -> ServiceResult<()> {
        let (email, reset) = self.pending_reset(email).await?;
        reset.doc.check(otp.trim(), Utc::now())?;
        self.docs
            .merge(RESETS, reset.id, json!({ "otpVerified": true }), Utc::now())
            .await?;
        debug!(%email, "reset code verified");
        Ok(())
    }

    /// Set a new password once the reset code has been verified.
    #[instrument(skip_all, err)]
    pub async fn reset_password(&self, email: &str, password: &str) -> ServiceResult<()> {
        let (email, reset) = self.pending_reset(email).await?;
        reset.doc.ensure_verified()?;
        if password.trim().is_empty() {
            return Err(DomainError::validation("Password is required.").into());
        }
        let user = self.find_user(&email).await?.ok_or_else(invalid_email)?;

        let hash = hash_password(password)?;
        self.docs
            .merge(User::COLLECTION, user.id, json!({ "passwordHash": hash }), Utc::now())
            .await?;
        self.docs.delete_where(RESETS, "email", &email).await?;
        info!(user = %user.id, "password reset");
        Ok(())
    }

    /// Flip the blocked flag; returns the new value.
    #[instrument(skip(self), err)]
    pub async fn toggle_block(&self, id: RecordId) -> ServiceResult<bool> {
        let user = self.get_record(id).await?;
        let blocked = !user.doc.blocked;
        self.docs
            .merge(User::COLLECTION, id, json!({ "blocked": blocked }), Utc::now())
            .await?
            .ok_or_else(user_not_found)?;
        info!(user = %id, blocked, "block status changed");
        Ok(blocked)
    }

    /// Every non-admin account, oldest first.
    pub async fn list_users(&self) -> ServiceResult<Vec<UserView>> {
        let (docs, _) = self
            .docs
            .list(User::COLLECTION, &DocumentFilter::All, 0, u64::MAX / 2)
            .await?;
        let mut users = Vec::with_capacity(docs.len());
        for doc in docs {
            let record: Record<User> = doc.into_record()?;
            if !record.doc.role.is_admin() {
                users.push(record.into());
            }
        }
        Ok(users)
    }

    pub async fn get_user(&self, id: RecordId) -> ServiceResult<UserView> {
        Ok(self.get_record(id).await?.into())
    }

    /// Create the admin account unless one with this email exists.
    /// Returns whether an account was created.
    #[instrument(skip(self, password), err)]
    pub async fn ensure_admin(&self, email: &str, password: &str) -> ServiceResult<bool> {
        let email = normalize_email(email)?;
        if self.find_user(&email).await?.is_some() {
            return Ok(false);
        }
        let user = User::new(email, hash_password(password)?, Role::Admin);
        let record = Record::new(RecordId::new(), user, Utc::now());
        self.docs
            .insert(User::COLLECTION, StoredDocument::from_record(&record, None)?)
            .await?;
        info!(user = %record.id, "admin account created");
        Ok(true)
    }

    async fn find_user(&self, email: &str) -> ServiceResult<Option<Record<User>>> {
        match self.docs.find_one(User::COLLECTION, "email", email).await? {
            Some(doc) => Ok(Some(doc.into_record()?)),
            None => Ok(None),
        }
    }

    async fn get_record(&self, id: RecordId) -> ServiceResult<Record<User>> {
        match self.docs.get(User::COLLECTION, id).await? {
            Some(doc) => Ok(doc.into_record()?),
            None => Err(user_not_found().into()),
        }
    }

    async fn find_reset(&self, email: &str) -> ServiceResult<Option<Record<PasswordReset>>> {
        match self.docs.find_one(RESETS, "email", email).await? {
            Some(doc) => Ok(Some(doc.into_record()?)),
            None => Ok(None),
        }
    }

    /// The account's email and its pending reset; the account must exist.
    async fn pending_reset(&self, email: &str) -> ServiceResult<(String, Record<PasswordReset>)> {
        let email = normalize_email(email).map_err(|_| invalid_email())?;
        self.find_user(&email).await?.ok_or_else(invalid_email)?;
        let reset = self
            .find_reset(&email)
            .await?
            .ok_or_else(|| DomainError::unprocessable("Forgot password step is missing."))?;
        Ok((email, reset))
    }
}

fn user_not_found() -> DomainError {
    DomainError::not_found("User not found.")
}

fn invalid_email() -> DomainError {
    DomainError::not_found("Invalid email address.")
}
