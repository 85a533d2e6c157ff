use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use backoffice_core::{Document, DomainResult, Sequence, Validate, require_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub staff_id: i64,
    pub full_name: String,
    pub gender: Gender,
    pub role: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStaff {
    #[serde(default)]
    pub full_name: String,
    pub gender: Gender,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub phone: String,
}

impl Validate for NewStaff {
    fn validate(&self) -> DomainResult<()> {
        require_text("Name", &self.full_name)?;
        require_text("Role", &self.role)?;
        require_text("Phone number", &self.phone)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Validate for StaffPatch {
    fn validate(&self) -> DomainResult<()> {
        for (field, value) in [
            ("Name", &self.full_name),
            ("Role", &self.role),
            ("Phone number", &self.phone),
        ] {
            if let Some(value) = value {
                require_text(field, value)?;
            }
        }
        Ok(())
    }
}

impl Document for Staff {
    const COLLECTION: &'static str = "staff";
    const LABEL: &'static str = "Staff member";
    const SEQUENCE: Sequence = Sequence::STAFF;
    const SEARCH_FIELDS: &'static [&'static str] = &["fullName", "gender", "role", "phone"];

    type Draft = NewStaff;
    type Patch = StaffPatch;

    fn from_draft(seq: i64, draft: NewStaff, _now: DateTime<Utc>) -> Self {
        Self {
            staff_id: seq,
            full_name: draft.full_name,
            gender: draft.gender,
            role: draft.role,
            phone: draft.phone,
        }
    }

    fn seq(&self) -> i64 {
        self.staff_id
    }
}
