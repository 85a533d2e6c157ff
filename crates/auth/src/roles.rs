use serde::{Deserialize, Serialize};

/// Account role. Admins manage other users; everyone else is a plain user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_lowercase() {
        assert_eq!(serde_json::to_value(Role::Admin).unwrap(), "admin");
        let role: Role = serde_json::from_value(serde_json::json!("user")).unwrap();
        assert_eq!(role, Role::User);
        assert!(!role.is_admin());
    }
}
