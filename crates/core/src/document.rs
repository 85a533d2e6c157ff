//! Document contract shared by every stored entity kind.
//!
//! Products, orders, customers, staff, salaries and expenses are all the same
//! shape from the storage point of view: a JSON document in a named collection,
//! keyed by a [`RecordId`], carrying a sequence-allocated display ID. This trait
//! captures what differs per kind so one generic repository can serve them all.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{DomainError, DomainResult};
use crate::id::RecordId;
use crate::sequence::Sequence;

/// Self-validation of an input payload (draft or patch).
pub trait Validate {
    fn validate(&self) -> DomainResult<()>;
}

/// Reject a missing or blank required text field.
pub fn require_text(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} is required.")));
    }
    Ok(())
}

/// A storable entity kind.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection the documents live in.
    const COLLECTION: &'static str;

    /// Human label used in messages (`"Product"` → `"Product not found."`).
    const LABEL: &'static str;

    /// Display-ID sequence for this kind.
    const SEQUENCE: Sequence;

    /// Text fields matched by case-insensitive substring search.
    const SEARCH_FIELDS: &'static [&'static str];

    /// Creation payload.
    type Draft: Validate + Send;

    /// Partial update payload. Serializes to only the fields being changed,
    /// using the same wire names as the document.
    type Patch: Validate + Serialize + Send + Sync;

    /// Build the document once its display ID has been allocated.
    fn from_draft(seq: i64, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// Allocated display ID.
    fn seq(&self) -> i64;

    fn not_found_message() -> String {
        format!("{} not found.", Self::LABEL)
    }
}

/// A stored document together with its key and bookkeeping timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record<T> {
    pub id: RecordId,
    #[serde(flatten)]
    pub doc: T,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<T> Record<T> {
    pub fn new(id: RecordId, doc: T, now: DateTime<Utc>) -> Self {
        Self {
            id,
            doc,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Record<U> {
        Record {
            id: self.id,
            doc: f(self.doc),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_required_text_names_the_field() {
        assert!(require_text("City", "Austin").is_ok());
        assert_eq!(
            require_text("City", "   "),
            Err(DomainError::validation("City is required."))
        );
    }

    #[test]
    fn record_flattens_document_fields() {
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        struct Note {
            text: String,
        }

        let now = Utc::now();
        let record = Record::new(RecordId::new(), Note { text: "hi".into() }, now);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["text"], "hi");
        assert!(json.get("createdAt").is_some());
        let back: Record<Note> = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
