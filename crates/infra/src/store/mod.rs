//! Storage contracts and their backends.
//!
//! Three capabilities, each a single atomic operation at the storage level:
//!
//! - [`DocumentStore`]: JSON documents in named collections, keyed by [`RecordId`].
//! - [`SequenceAllocator`]: increment-and-read on a named counter.
//! - [`StockLedgerStore`]: conditional stock writes on a product document.
//!
//! [`InMemoryStore`] backs tests and local runs; [`PostgresStore`] is used when
//! a database URL is configured.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value as JsonValue;
use thiserror::Error;

use backoffice_core::{Document, Record, RecordId, SearchQuery, Sequence};
use backoffice_inventory::{StockLevels, StockMove};

use crate::error::ServiceResult;

mod in_memory;
mod postgres;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Infrastructure failure. Domain outcomes (not found, insufficient stock)
/// are never reported through this type.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("unique constraint violated: {0}")]
    Conflict(String),

    #[error("stored document could not be (de)serialized: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// A document as the store sees it: an opaque JSON body plus bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub key: RecordId,
    /// Allocated display ID, if the collection has one.
    pub seq: Option<i64>,
    pub body: JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredDocument {
    pub fn from_record<T: Serialize>(record: &Record<T>, seq: Option<i64>) -> StoreResult<Self> {
        Ok(Self {
            key: record.id,
            seq,
            body: serde_json::to_value(&record.doc)?,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    pub fn into_record<T: DeserializeOwned>(self) -> StoreResult<Record<T>> {
        Ok(Record {
            id: self.key,
            doc: serde_json::from_value(self.body)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }

    /// Text value of a top-level body field.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.body.get(field).and_then(JsonValue::as_str)
    }
}

/// Which documents of a collection to return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentFilter {
    All,
    /// Case-insensitive substring over `fields`, or exact display ID.
    Search {
        fields: &'static [&'static str],
        needle: String,
        number: Option<i64>,
    },
    /// Top-level text field equal to `value`.
    FieldEquals { field: &'static str, value: String },
}

impl DocumentFilter {
    pub fn search<T: Document>(query: &SearchQuery) -> Self {
        DocumentFilter::Search {
            fields: T::SEARCH_FIELDS,
            needle: query.needle().to_string(),
            number: query.number(),
        }
    }

    pub fn matches(&self, doc: &StoredDocument) -> bool {
        match self {
            DocumentFilter::All => true,
            DocumentFilter::Search {
                fields,
                needle,
                number,
            } => {
                let by_id = number.is_some() && *number == doc.seq;
                by_id
                    || fields.iter().any(|f| {
                        doc.text(f)
                            .is_some_and(|v| v.to_lowercase().contains(needle.as_str()))
                    })
            }
            DocumentFilter::FieldEquals { field, value } => doc.text(field) == Some(value.as_str()),
        }
    }
}

/// JSON document storage.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, collection: &str, doc: StoredDocument) -> StoreResult<()>;

    async fn get(&self, collection: &str, key: RecordId) -> StoreResult<Option<StoredDocument>>;

    /// First document (in creation order) whose `field` equals `value`.
    async fn find_one(
        &self,
        collection: &str,
        field: &'static str,
        value: &str,
    ) -> StoreResult<Option<StoredDocument>>;

    /// Shallow-merge `patch` into the body. `None` if the key does not exist.
    async fn merge(
        &self,
        collection: &str,
        key: RecordId,
        patch: JsonValue,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<StoredDocument>>;

    /// Like [`merge`](Self::merge), but only while every top-level field of
    /// `expected` still holds that value. `None` if the key is missing or a
    /// field differs; nothing is written then.
    async fn merge_if(
        &self,
        collection: &str,
        key: RecordId,
        expected: JsonValue,
        patch: JsonValue,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<StoredDocument>>;

    /// `false` if the key did not exist.
    async fn delete(&self, collection: &str, key: RecordId) -> StoreResult<bool>;

    /// Delete every document whose `field` equals `value`; returns how many.
    async fn delete_where(
        &self,
        collection: &str,
        field: &'static str,
        value: &str,
    ) -> StoreResult<u64>;

    /// Matching documents in creation order, plus the total match count.
    async fn list(
        &self,
        collection: &str,
        filter: &DocumentFilter,
        offset: u64,
        limit: u64,
    ) -> StoreResult<(Vec<StoredDocument>, u64)>;
}

/// Atomic display-ID allocation.
#[async_trait]
pub trait SequenceAllocator: Send + Sync {
    /// Create the counter at its base on first use, increment, return the new value.
    async fn allocate(&self, sequence: Sequence) -> StoreResult<i64>;
}

/// Conditional stock writes on product documents.
#[async_trait]
pub trait StockLedgerStore: Send + Sync {
    /// Apply `mv` to the product's stock in one atomic step.
    ///
    /// Fails with `NotFound` if the product does not exist and with
    /// `InsufficientStock` if either category would go negative; the product
    /// is left unchanged in both cases.
    async fn apply(&self, product: RecordId, mv: StockMove) -> ServiceResult<StockLevels>;
}

#[async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    async fn insert(&self, collection: &str, doc: StoredDocument) -> StoreResult<()> {
        (**self).insert(collection, doc).await
    }

    async fn get(&self, collection: &str, key: RecordId) -> StoreResult<Option<StoredDocument>> {
        (**self).get(collection, key).await
    }

    async fn find_one(
        &self,
        collection: &str,
        field: &'static str,
        value: &str,
    ) -> StoreResult<Option<StoredDocument>> {
        (**self).find_one(collection, field, value).await
    }

    async fn merge(
        &self,
        collection: &str,
        key: RecordId,
        patch: JsonValue,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<StoredDocument>> {
        (**self).merge(collection, key, patch, now).await
    }

    async fn merge_if(
        &self,
        collection: &str,
        key: RecordId,
        expected: JsonValue,
        patch: JsonValue,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<StoredDocument>> {
        (**self).merge_if(collection, key, expected, patch, now).await
    }

    async fn delete(&self, collection: &str, key: RecordId) -> StoreResult<bool> {
        (**self).delete(collection, key).await
    }

    async fn delete_where(
        &self,
        collection: &str,
        field: &'static str,
        value: &str,
    ) -> StoreResult<u64> {
        (**self).delete_where(collection, field, value).await
    }

    async fn list(
        &self,
        collection: &str,
        filter: &DocumentFilter,
        offset: u64,
        limit: u64,
    ) -> StoreResult<(Vec<StoredDocument>, u64)> {
        (**self).list(collection, filter, offset, limit).await
    }
}

#[async_trait]
impl<S> SequenceAllocator for Arc<S>
where
    S: SequenceAllocator + ?Sized,
{
    async fn allocate(&self, sequence: Sequence) -> StoreResult<i64> {
        (**self).allocate(sequence).await
    }
}

#[async_trait]
impl<S> StockLedgerStore for Arc<S>
where
    S: StockLedgerStore + ?Sized,
{
    async fn apply(&self, product: RecordId, mv: StockMove) -> ServiceResult<StockLevels> {
        (**self).apply(product, mv).await
    }
}

/// Whether every top-level field of `expected` has the same value in `body`.
/// Numbers compare by value, so `10` matches `10.0`.
pub(crate) fn body_matches(body: &JsonValue, expected: &JsonValue) -> bool {
    let Some(fields) = expected.as_object() else {
        return false;
    };
    fields.iter().all(|(k, want)| match (body.get(k), want) {
        (Some(JsonValue::Number(have)), JsonValue::Number(want)) => have.as_f64() == want.as_f64(),
        (Some(have), want) => have == want,
        (None, _) => false,
    })
}

/// Merge a JSON patch object into a body, top-level keys only.
pub(crate) fn merge_body(body: &mut JsonValue, patch: JsonValue) {
    if let (Some(target), JsonValue::Object(changes)) = (body.as_object_mut(), patch) {
        for (k, v) in changes {
            target.insert(k, v);
        }
    }
}
