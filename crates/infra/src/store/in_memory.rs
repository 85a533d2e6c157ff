//! In-memory storage for tests and local runs.
//!
//! Every operation runs inside one lock critical section and never awaits
//! while holding it, so counter increments and stock moves are atomic.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use backoffice_core::{Document, DomainError, RecordId, Sequence};
use backoffice_inventory::{Product, StockLevels, StockMove};

use super::{
    DocumentFilter, DocumentStore, SequenceAllocator, StockLedgerStore, StoreError, StoreResult,
    StoredDocument, body_matches, merge_body,
};
use crate::error::ServiceResult;

#[derive(Debug, Default)]
struct Collection {
    next_position: u64,
    rows: BTreeMap<u64, StoredDocument>,
    positions: HashMap<RecordId, u64>,
}

impl Collection {
    fn get(&self, key: RecordId) -> Option<&StoredDocument> {
        self.positions.get(&key).and_then(|p| self.rows.get(p))
    }

    fn get_mut(&mut self, key: RecordId) -> Option<&mut StoredDocument> {
        let position = self.positions.get(&key)?;
        self.rows.get_mut(position)
    }

    fn insert(&mut self, doc: StoredDocument) {
        let position = self.next_position;
        self.next_position += 1;
        self.positions.insert(doc.key, position);
        self.rows.insert(position, doc);
    }

    fn remove(&mut self, key: RecordId) -> bool {
        match self.positions.remove(&key) {
            Some(position) => self.rows.remove(&position).is_some(),
            None => false,
        }
    }
}

/// Lock-guarded maps standing in for the documents and counters tables.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
    counters: RwLock<HashMap<&'static str, i64>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn insert(&self, collection: &str, doc: StoredDocument) -> StoreResult<()> {
        let mut map = self.collections.write().map_err(|_| poisoned())?;
        let coll = map.entry(collection.to_string()).or_default();
        if coll.positions.contains_key(&doc.key) {
            return Err(StoreError::Conflict(format!("duplicate key {}", doc.key)));
        }
        coll.insert(doc);
        Ok(())
    }

    async fn get(&self, collection: &str, key: RecordId) -> StoreResult<Option<StoredDocument>> {
        let map = self.collections.read().map_err(|_| poisoned())?;
        Ok(map.get(collection).and_then(|c| c.get(key)).cloned())
    }

    async fn find_one(
        &self,
        collection: &str,
        field: &'static str,
        value: &str,
    ) -> StoreResult<Option<StoredDocument>> {
        let map = self.collections.read().map_err(|_| poisoned())?;
        Ok(map.get(collection).and_then(|c| {
            c.rows
                .values()
                .find(|d| d.text(field) == Some(value))
                .cloned()
        }))
    }

    async fn merge(
        &self,
        collection: &str,
        key: RecordId,
        patch: JsonValue,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<StoredDocument>> {
        let mut map = self.collections.write().map_err(|_| poisoned())?;
        let Some(doc) = map.get_mut(collection).and_then(|c| c.get_mut(key)) else {
            return Ok(None);
        };
        merge_body(&mut doc.body, patch);
        doc.updated_at = now;
        Ok(Some(doc.clone()))
    }

    async fn merge_if(
        &self,
        collection: &str,
        key: RecordId,
        expected: JsonValue,
        patch: JsonValue,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<StoredDocument>> {
        let mut map = self.collections.write().map_err(|_| poisoned())?;
        let Some(doc) = map.get_mut(collection).and_then(|c| c.get_mut(key)) else {
            return Ok(None);
        };
        if !body_matches(&doc.body, &expected) {
            return Ok(None);
        }
        merge_body(&mut doc.body, patch);
        doc.updated_at = now;
        Ok(Some(doc.clone()))
    }

    async fn delete(&self, collection: &str, key: RecordId) -> StoreResult<bool> {
        let mut map = self.collections.write().map_err(|_| poisoned())?;
        Ok(map.get_mut(collection).is_some_and(|c| c.remove(key)))
    }

    async fn delete_where(
        &self,
        collection: &str,
        field: &'static str,
        value: &str,
    ) -> StoreResult<u64> {
        let mut map = self.collections.write().map_err(|_| poisoned())?;
        let Some(coll) = map.get_mut(collection) else {
            return Ok(0);
        };
        let doomed: Vec<RecordId> = coll
            .rows
            .values()
            .filter(|d| d.text(field) == Some(value))
            .map(|d| d.key)
            .collect();
        for key in &doomed {
            coll.remove(*key);
        }
        Ok(doomed.len() as u64)
    }

    async fn list(
        &self,
        collection: &str,
        filter: &DocumentFilter,
        offset: u64,
        limit: u64,
    ) -> StoreResult<(Vec<StoredDocument>, u64)> {
        let map = self.collections.read().map_err(|_| poisoned())?;
        let Some(coll) = map.get(collection) else {
            return Ok((Vec::new(), 0));
        };
        let matching: Vec<&StoredDocument> = coll.rows.values().filter(|d| filter.matches(d)).collect();
        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok((page, total))
    }
}

#[async_trait]
impl SequenceAllocator for InMemoryStore {
    async fn allocate(&self, sequence: Sequence) -> StoreResult<i64> {
        let mut counters = self.counters.write().map_err(|_| poisoned())?;
        let value = counters.entry(sequence.name).or_insert(sequence.base);
        *value += 1;
        Ok(*value)
    }
}

#[async_trait]
impl StockLedgerStore for InMemoryStore {
    async fn apply(&self, product: RecordId, mv: StockMove) -> ServiceResult<StockLevels> {
        let mut map = self.collections.write().map_err(|_| poisoned())?;
        let Some(doc) = map
            .get_mut(Product::COLLECTION)
            .and_then(|c| c.get_mut(product))
        else {
            return Err(DomainError::not_found(Product::not_found_message()).into());
        };

        let current: Product = serde_json::from_value(doc.body.clone()).map_err(StoreError::from)?;
        let next = mv.apply(current.stock())?;
        doc.body = serde_json::to_value(current.with_stock(next)).map_err(StoreError::from)?;
        doc.updated_at = Utc::now();
        Ok(next)
    }
}
