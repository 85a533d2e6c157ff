//! Service-level error: a domain rule said no, storage failed, or a
//! credential could not be hashed or signed.

use thiserror::Error;

use backoffice_auth::{PasswordError, TokenError};
use backoffice_core::DomainError;

use crate::store::StoreError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("credential processing failed: {0}")]
    Credentials(String),
}

impl From<PasswordError> for ServiceError {
    fn from(e: PasswordError) -> Self {
        ServiceError::Credentials(e.to_string())
    }
}

impl From<TokenError> for ServiceError {
    fn from(e: TokenError) -> Self {
        ServiceError::Credentials(e.to_string())
    }
}

impl ServiceError {
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            ServiceError::Domain(e) => Some(e),
            ServiceError::Store(_) | ServiceError::Credentials(_) => None,
        }
    }
}
