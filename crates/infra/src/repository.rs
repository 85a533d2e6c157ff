//! Generic entity repository.
//!
//! One implementation serves every document kind: validation and display-ID
//! allocation on create, merge-writes on update, NotFound without a write when
//! the key is missing, and paginated list/search.

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value as JsonValue;
use tracing::instrument;

use backoffice_core::{
    Document, DomainError, Page, PageRequest, Record, RecordId, SearchQuery, Validate,
};

use crate::error::ServiceResult;
use crate::store::{DocumentFilter, DocumentStore, SequenceAllocator, StoreError, StoredDocument};

pub struct Repository<T> {
    docs: Arc<dyn DocumentStore>,
    sequences: Arc<dyn SequenceAllocator>,
    _kind: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            docs: self.docs.clone(),
            sequences: self.sequences.clone(),
            _kind: PhantomData,
        }
    }
}

impl<T: Document> Repository<T> {
    pub fn new(docs: Arc<dyn DocumentStore>, sequences: Arc<dyn SequenceAllocator>) -> Self {
        Self {
            docs,
            sequences,
            _kind: PhantomData,
        }
    }

    /// Validate, allocate the display ID, insert.
    #[instrument(skip_all, fields(collection = T::COLLECTION), err)]
    pub async fn create(&self, draft: T::Draft) -> ServiceResult<Record<T>> {
        draft.validate()?;
        let seq = self.allocate().await?;
        let record = Self::build(seq, draft);
        self.insert(&record).await?;
        Ok(record)
    }

    pub async fn allocate(&self) -> ServiceResult<i64> {
        Ok(self.sequences.allocate(T::SEQUENCE).await?)
    }

    /// A new record for an already-allocated display ID. Nothing is written.
    pub fn build(seq: i64, draft: T::Draft) -> Record<T> {
        let now = Utc::now();
        Record::new(RecordId::new(), T::from_draft(seq, draft, now), now)
    }

    pub async fn insert(&self, record: &Record<T>) -> ServiceResult<()> {
        let doc = StoredDocument::from_record(record, Some(record.doc.seq()))?;
        self.docs.insert(T::COLLECTION, doc).await?;
        Ok(())
    }

    pub async fn find(&self, id: RecordId) -> ServiceResult<Option<Record<T>>> {
        match self.docs.get(T::COLLECTION, id).await? {
            Some(doc) => Ok(Some(doc.into_record()?)),
            None => Ok(None),
        }
    }

    pub async fn get(&self, id: RecordId) -> ServiceResult<Record<T>> {
        self.find(id)
            .await?
            .ok_or_else(|| DomainError::not_found(T::not_found_message()).into())
    }

    /// Write only the fields present in `patch`. The display ID is never touched.
    #[instrument(skip_all, fields(collection = T::COLLECTION, id = %id), err)]
    pub async fn update(&self, id: RecordId, patch: T::Patch) -> ServiceResult<Record<T>> {
        patch.validate()?;
        let changes = serde_json::to_value(&patch).map_err(StoreError::from)?;
        if changes.as_object().is_some_and(|o| o.is_empty()) {
            return self.get(id).await;
        }
        match self.docs.merge(T::COLLECTION, id, changes, Utc::now()).await? {
            Some(doc) => Ok(doc.into_record()?),
            None => Err(DomainError::not_found(T::not_found_message()).into()),
        }
    }

    /// [`update`](Self::update) guarded by `expected`: the patch is written
    /// only while each of its top-level fields still holds the given value.
    /// `None` when the record is missing or has moved on.
    pub async fn update_if(
        &self,
        id: RecordId,
        expected: JsonValue,
        patch: T::Patch,
    ) -> ServiceResult<Option<Record<T>>> {
        patch.validate()?;
        let changes = serde_json::to_value(&patch).map_err(StoreError::from)?;
        let doc = self
            .docs
            .merge_if(T::COLLECTION, id, expected, changes, Utc::now())
            .await?;
        Ok(doc.map(|d| d.into_record::<T>()).transpose()?)
    }

    #[instrument(skip_all, fields(collection = T::COLLECTION, id = %id), err)]
    pub async fn delete(&self, id: RecordId) -> ServiceResult<()> {
        if !self.docs.delete(T::COLLECTION, id).await? {
            return Err(DomainError::not_found(T::not_found_message()).into());
        }
        Ok(())
    }

    pub async fn list(&self, page: PageRequest) -> ServiceResult<Page<Record<T>>> {
        self.page(&DocumentFilter::All, page).await
    }

    /// Blank queries are rejected before touching storage.
    pub async fn search(&self, query: Option<&str>, page: PageRequest) -> ServiceResult<Page<Record<T>>> {
        let query = SearchQuery::parse(query)?;
        self.page(&DocumentFilter::search::<T>(&query), page).await
    }

    /// Every record, in creation order.
    pub async fn all(&self) -> ServiceResult<Vec<Record<T>>> {
        Ok(self.list(PageRequest::everything()).await?.items)
    }

    pub async fn count(&self) -> ServiceResult<u64> {
        let (_, total) = self.docs.list(T::COLLECTION, &DocumentFilter::All, 0, 0).await?;
        Ok(total)
    }

    async fn page(&self, filter: &DocumentFilter, page: PageRequest) -> ServiceResult<Page<Record<T>>> {
        let (docs, total) = self
            .docs
            .list(T::COLLECTION, filter, page.offset(), page.limit())
            .await?;
        let items = docs
            .into_iter()
            .map(StoredDocument::into_record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, total, page))
    }
}
