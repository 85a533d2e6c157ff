//! Process configuration, read from the environment (and `.env` if present).

use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_JWT_EXPIRE_MINUTES: i64 = 24 * 60;
pub const DEFAULT_OTP_TTL_MINUTES: i64 = 10;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Bootstrap credentials for the admin account created at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Postgres URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl: Duration,
    pub otp_ttl: Duration,
    pub admin: Option<AdminSeed>,
}

impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("database", &self.database_url.as_ref().map(|_| "postgres"))
            .field("db_max_connections", &self.db_max_connections)
            .field("jwt_ttl", &self.jwt_ttl)
            .field("otp_ttl", &self.otp_ttl)
            .field("admin", &self.admin)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    /// Load `.env` (if any) and read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let default_addr: SocketAddr = DEFAULT_BIND_ADDR
            .parse()
            .map_err(|e| invalid("BIND_ADDR", e))?;
        let bind_addr = parse_or("BIND_ADDR", get("BIND_ADDR"), default_addr)?;
        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let jwt_minutes = parse_or(
            "JWT_EXPIRE_MINUTES",
            get("JWT_EXPIRE_MINUTES"),
            DEFAULT_JWT_EXPIRE_MINUTES,
        )?;
        let otp_minutes = parse_or(
            "OTP_TTL_MINUTES",
            get("OTP_TTL_MINUTES"),
            DEFAULT_OTP_TTL_MINUTES,
        )?;
        let db_max_connections = parse_or(
            "DATABASE_MAX_CONNECTIONS",
            get("DATABASE_MAX_CONNECTIONS"),
            DEFAULT_DB_MAX_CONNECTIONS,
        )?;

        let admin = match (get("ADMIN_EMAIL"), get("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed { email, password }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing("ADMIN_PASSWORD")),
            (None, Some(_)) => return Err(ConfigError::Missing("ADMIN_EMAIL")),
        };

        Ok(Self {
            bind_addr,
            database_url: get("DATABASE_URL"),
            db_max_connections,
            jwt_secret,
            jwt_ttl: Duration::minutes(jwt_minutes),
            otp_ttl: Duration::minutes(otp_minutes),
            admin,
        })
    }
}

fn invalid(name: &'static str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        name,
        reason: reason.to_string(),
    }
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(v) => v.parse().map_err(|e| invalid(name, e)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let cfg = load(&[("JWT_SECRET", "s")]).unwrap();
        assert_eq!(cfg.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(cfg.jwt_ttl, Duration::minutes(1440));
        assert_eq!(cfg.otp_ttl, Duration::minutes(10));
        assert!(cfg.database_url.is_none());
        assert!(cfg.admin.is_none());
    }

    #[test]
    fn secret_is_required() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::Missing("JWT_SECRET"));
        assert_eq!(
            load(&[("JWT_SECRET", "   ")]).unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
    }

    #[test]
    fn bad_numbers_name_the_variable() {
        let err = load(&[("JWT_SECRET", "s"), ("JWT_EXPIRE_MINUTES", "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "JWT_EXPIRE_MINUTES", .. }));
    }

    #[test]
    fn admin_seed_needs_both_halves() {
        let cfg = load(&[
            ("JWT_SECRET", "s"),
            ("ADMIN_EMAIL", "admin@example.com"),
            ("ADMIN_PASSWORD", "pw"),
        ])
        .unwrap();
        assert_eq!(cfg.admin.unwrap().email, "admin@example.com");

        let err = load(&[("JWT_SECRET", "s"), ("ADMIN_EMAIL", "admin@example.com")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("ADMIN_PASSWORD"));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let cfg = load(&[
            ("JWT_SECRET", "very-secret"),
            ("DATABASE_URL", "postgres://u:pw@localhost/db"),
            ("ADMIN_EMAIL", "admin@example.com"),
            ("ADMIN_PASSWORD", "hunter2"),
        ])
        .unwrap();
        let shown = format!("{cfg:?}");
        assert!(!shown.contains("very-secret"));
        assert!(!shown.contains("hunter2"));
        assert!(!shown.contains("pw@"));
    }
}
