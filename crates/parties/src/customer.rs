use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use backoffice_core::{Document, DomainResult, Sequence, Validate, require_text};

use crate::phone::Phone;

/// A business customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub customer_id: i64,
    pub company_name: String,
    pub client_name: String,
    pub phone: Phone,
    pub state: String,
    pub city: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zip_code: String,
}

impl Validate for NewCustomer {
    fn validate(&self) -> DomainResult<()> {
        Phone::parse(&self.phone)?;
        require_text("Company name", &self.company_name)?;
        require_text("Client name", &self.client_name)?;
        require_text("State", &self.state)?;
        require_text("City", &self.city)?;
        require_text("Zip code", &self.zip_code)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
}

impl Validate for CustomerPatch {
    fn validate(&self) -> DomainResult<()> {
        if let Some(phone) = &self.phone {
            Phone::parse(phone)?;
        }
        let texts = [
            ("Company name", &self.company_name),
            ("Client name", &self.client_name),
            ("State", &self.state),
            ("City", &self.city),
            ("Zip code", &self.zip_code),
        ];
        for (field, value) in texts {
            if let Some(value) = value {
                require_text(field, value)?;
            }
        }
        Ok(())
    }
}

impl Document for Customer {
    const COLLECTION: &'static str = "customers";
    const LABEL: &'static str = "Customer";
    const SEQUENCE: Sequence = Sequence::CUSTOMER;
    const SEARCH_FIELDS: &'static [&'static str] =
        &["companyName", "clientName", "phone", "state", "city", "zipCode"];

    type Draft = NewCustomer;
    type Patch = CustomerPatch;

    fn from_draft(seq: i64, draft: NewCustomer, _now: DateTime<Utc>) -> Self {
        // `validate` has already accepted the phone; re-parsing only trims it.
        let phone = Phone::parse(&draft.phone).unwrap_or_else(|_| Phone::unchecked(draft.phone));
        Self {
            customer_id: seq,
            company_name: draft.company_name,
            client_name: draft.client_name,
            phone,
            state: draft.state,
            city: draft.city,
            zip_code: draft.zip_code,
        }
    }

    fn seq(&self) -> i64 {
        self.customer_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(phone: &str) -> NewCustomer {
        NewCustomer {
            company_name: "Acme".into(),
            client_name: "Jane".into(),
            phone: phone.into(),
            state: "TX".into(),
            city: "Austin".into(),
            zip_code: "73301".into(),
        }
    }

    #[test]
    fn phone_length_is_checked_on_create() {
        assert!(draft("5550100123").validate().is_ok());
        let err = draft("555").validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid phone number length.");
    }

    #[test]
    fn every_field_is_required() {
        let mut d = draft("5550100123");
        d.city = String::new();
        assert_eq!(d.validate().unwrap_err().to_string(), "City is required.");
    }

    #[test]
    fn patch_checks_only_present_fields() {
        assert!(CustomerPatch::default().validate().is_ok());
        let patch = CustomerPatch {
            phone: Some("12".into()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn document_uses_customer_sequence() {
        let customer = Customer::from_draft(501, draft(" 5550100123 "), Utc::now());
        assert_eq!(customer.seq(), 501);
        assert_eq!(customer.phone.as_str(), "5550100123");
        let json = serde_json::to_value(&customer).unwrap();
        assert_eq!(json["customerId"], 501);
        assert_eq!(json["zipCode"], "73301");
    }
}
