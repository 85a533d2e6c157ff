//! `backoffice-auth`: credentials, tokens and password-reset rules.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod claims;
pub mod otp;
pub mod password;
pub mod roles;
pub mod token;
pub mod user;

pub use claims::JwtClaims;
pub use otp::{OTP_LEN, PasswordReset, generate_otp};
pub use password::{PasswordError, hash_password, verify_password};
pub use roles::Role;
pub use token::{JwtService, TokenError};
pub use user::{User, UserView, normalize_email};
