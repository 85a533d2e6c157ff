use serde::{Deserialize, Serialize};

use backoffice_core::{DomainError, DomainResult, ValueObject};

pub const MIN_LEN: usize = 8;
pub const MAX_LEN: usize = 15;

/// Customer phone number, 8 to 15 characters after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl ValueObject for Phone {}

impl Phone {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        let len = trimmed.chars().count();
        if !(MIN_LEN..=MAX_LEN).contains(&len) {
            return Err(DomainError::validation("Invalid phone number length."));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub(crate) fn unchecked(raw: String) -> Self {
        Self(raw.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Phone {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Phone> for String {
    fn from(value: Phone) -> Self {
        value.0
    }
}

impl std::fmt::Display for Phone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
