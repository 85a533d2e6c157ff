//! Postgres-backed storage.
//!
//! All collections share one `documents` table holding JSONB bodies; display-ID
//! counters live in `counters`. Every write is a single statement, so counter
//! increments and stock moves are atomic without explicit transactions.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (other) | Any other | `Backend` |
//! | PoolClosed / other | N/A | `Backend` |

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::{FromRow, PgPool, Postgres, Row};
use tracing::instrument;

use backoffice_core::{Document, DomainError, RecordId, Sequence};
use backoffice_inventory::{Product, StockLevels, StockMove};

use super::{
    DocumentFilter, DocumentStore, SequenceAllocator, StockLedgerStore, StoreError, StoreResult,
    StoredDocument,
};
use crate::error::ServiceResult;

const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS documents (
        position    BIGSERIAL PRIMARY KEY,
        collection  TEXT NOT NULL,
        key         UUID NOT NULL,
        seq_id      BIGINT,
        body        JSONB NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL,
        updated_at  TIMESTAMPTZ NOT NULL,
        UNIQUE (collection, key)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS documents_collection_seq ON documents (collection, seq_id)",
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS documents_users_email
        ON documents ((body ->> 'email')) WHERE collection = 'users'
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS counters (
        name   TEXT PRIMARY KEY,
        value  BIGINT NOT NULL
    )
    "#,
];

const DOCUMENT_COLUMNS: &str = "key, seq_id, body, created_at, updated_at";

/// Postgres implementation of every storage capability.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: Arc<PgPool>,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect and make sure the schema exists.
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("migrate", e))?;
        }
        Ok(())
    }

    async fn exists(&self, collection: &str, key: RecordId) -> StoreResult<bool> {
        let row = sqlx::query("SELECT 1 FROM documents WHERE collection = $1 AND key = $2")
            .bind(collection)
            .bind(key.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("exists", e))?;
        Ok(row.is_some())
    }
}

struct DocumentRow(StoredDocument);

impl<'r> FromRow<'r, PgRow> for DocumentRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let key: uuid::Uuid = row.try_get("key")?;
        Ok(DocumentRow(StoredDocument {
            key: RecordId::from_uuid(key),
            seq: row.try_get("seq_id")?,
            body: row.try_get("body")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        }))
    }
}

fn decode_row(row: &PgRow) -> StoreResult<StoredDocument> {
    DocumentRow::from_row(row)
        .map(|r| r.0)
        .map_err(|e| StoreError::Serialization(format!("failed to decode document row: {e}")))
}

/// WHERE clause for a filter, and how many bind parameters it uses (including `$1`).
fn filter_clause(filter: &DocumentFilter) -> (&'static str, usize) {
    match filter {
        DocumentFilter::All => ("collection = $1", 1),
        DocumentFilter::Search { .. } => (
            r#"collection = $1 AND (
                seq_id = $2
                OR EXISTS (
                    SELECT 1 FROM unnest($3::text[]) AS f(name)
                    WHERE body ->> f.name ILIKE $4 ESCAPE '\'
                )
            )"#,
            4,
        ),
        DocumentFilter::FieldEquals { .. } => ("collection = $1 AND body ->> $2 = $3", 3),
    }
}

fn bind_filter<'q>(
    query: Query<'q, Postgres, PgArguments>,
    filter: &'q DocumentFilter,
) -> Query<'q, Postgres, PgArguments> {
    match filter {
        DocumentFilter::All => query,
        DocumentFilter::Search {
            fields,
            needle,
            number,
        } => query
            .bind(*number)
            .bind(fields.iter().map(|f| f.to_string()).collect::<Vec<String>>())
            .bind(like_pattern(needle)),
        DocumentFilter::FieldEquals { field, value } => query.bind(*field).bind(value.as_str()),
    }
}

/// `%needle%` with LIKE metacharacters escaped.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl DocumentStore for PostgresStore {
    #[instrument(skip(self, doc), fields(key = %doc.key), err)]
    async fn insert(&self, collection: &str, doc: StoredDocument) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, key, seq_id, body, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(collection)
        .bind(doc.key.as_uuid())
        .bind(doc.seq)
        .bind(&doc.body)
        .bind(doc.created_at)
        .bind(doc.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(key = %key), err)]
    async fn get(&self, collection: &str, key: RecordId) -> StoreResult<Option<StoredDocument>> {
        let sql = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE collection = $1 AND key = $2"
        );
        let row = sqlx::query(&sql)
            .bind(collection)
            .bind(key.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get", e))?;
        row.as_ref().map(decode_row).transpose()
    }

    #[instrument(skip(self, value), err)]
    async fn find_one(
        &self,
        collection: &str,
        field: &'static str,
        value: &str,
    ) -> StoreResult<Option<StoredDocument>> {
        let sql = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents \
             WHERE collection = $1 AND body ->> $2 = $3 ORDER BY position LIMIT 1"
        );
        let row = sqlx::query(&sql)
            .bind(collection)
            .bind(field)
            .bind(value)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_one", e))?;
        row.as_ref().map(decode_row).transpose()
    }

    #[instrument(skip(self, patch), fields(key = %key), err)]
    async fn merge(
        &self,
        collection: &str,
        key: RecordId,
        patch: JsonValue,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<StoredDocument>> {
        let sql = format!(
            "UPDATE documents SET body = body || $3, updated_at = $4 \
             WHERE collection = $1 AND key = $2 RETURNING {DOCUMENT_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(collection)
            .bind(key.as_uuid())
            .bind(&patch)
            .bind(now)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("merge", e))?;
        row.as_ref().map(decode_row).transpose()
    }

    #[instrument(skip(self, expected, patch), fields(key = %key), err)]
    async fn merge_if(
        &self,
        collection: &str,
        key: RecordId,
        expected: JsonValue,
        patch: JsonValue,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<StoredDocument>> {
        let sql = format!(
            "UPDATE documents SET body = body || $3, updated_at = $4 \
             WHERE collection = $1 AND key = $2 AND body @> $5 RETURNING {DOCUMENT_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(collection)
            .bind(key.as_uuid())
            .bind(&patch)
            .bind(now)
            .bind(&expected)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("merge_if", e))?;
        row.as_ref().map(decode_row).transpose()
    }

    #[instrument(skip(self), fields(key = %key), err)]
    async fn delete(&self, collection: &str, key: RecordId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND key = $2")
            .bind(collection)
            .bind(key.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, value), err)]
    async fn delete_where(
        &self,
        collection: &str,
        field: &'static str,
        value: &str,
    ) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND body ->> $2 = $3")
            .bind(collection)
            .bind(field)
            .bind(value)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_where", e))?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self, filter), err)]
    async fn list(
        &self,
        collection: &str,
        filter: &DocumentFilter,
        offset: u64,
        limit: u64,
    ) -> StoreResult<(Vec<StoredDocument>, u64)> {
        let (clause, params) = filter_clause(filter);

        let count_sql = format!("SELECT COUNT(*) AS total FROM documents WHERE {clause}");
        let total: i64 = bind_filter(sqlx::query(&count_sql).bind(collection), filter)
            .fetch_one(&*self.pool)
            .await
            .and_then(|row| row.try_get("total"))
            .map_err(|e| map_sqlx_error("list_count", e))?;

        let page_sql = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE {clause} \
             ORDER BY position OFFSET ${} LIMIT ${}",
            params + 1,
            params + 2
        );
        let rows = bind_filter(sqlx::query(&page_sql).bind(collection), filter)
            .bind(i64::try_from(offset).unwrap_or(i64::MAX))
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list", e))?;

        let docs = rows.iter().map(decode_row).collect::<StoreResult<Vec<_>>>()?;
        Ok((docs, u64::try_from(total).unwrap_or(0)))
    }
}

#[async_trait]
impl SequenceAllocator for PostgresStore {
    #[instrument(skip(self), fields(sequence = %sequence), err)]
    async fn allocate(&self, sequence: Sequence) -> StoreResult<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO counters (name, value) VALUES ($1, $2::bigint + 1)
            ON CONFLICT (name) DO UPDATE SET value = counters.value + 1
            RETURNING value
            "#,
        )
        .bind(sequence.name)
        .bind(sequence.base)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("allocate", e))?;
        row.try_get("value")
            .map_err(|e| map_sqlx_error("allocate", e))
    }
}

#[async_trait]
impl StockLedgerStore for PostgresStore {
    #[instrument(skip(self), fields(product = %product))]
    async fn apply(&self, product: RecordId, mv: StockMove) -> ServiceResult<StockLevels> {
        let (delta_a, delta_b): (Decimal, Decimal) = mv.delta();
        let row = sqlx::query(
            r#"
            UPDATE documents
            SET body = jsonb_set(
                    jsonb_set(
                        body,
                        '{stockA,quantity}',
                        to_jsonb((body #>> '{stockA,quantity}')::numeric + $3)
                    ),
                    '{stockB,quantity}',
                    to_jsonb((body #>> '{stockB,quantity}')::numeric + $4)
                ),
                updated_at = now()
            WHERE collection = $1 AND key = $2
              AND (body #>> '{stockA,quantity}')::numeric + $3 >= 0
              AND (body #>> '{stockB,quantity}')::numeric + $4 >= 0
            RETURNING body
            "#,
        )
        .bind(Product::COLLECTION)
        .bind(product.as_uuid())
        .bind(delta_a)
        .bind(delta_b)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("stock_apply", e))?;

        let Some(row) = row else {
            if self.exists(Product::COLLECTION, product).await? {
                return Err(mv.insufficient().into());
            }
            return Err(DomainError::not_found(Product::not_found_message()).into());
        };
        let body: JsonValue = row
            .try_get("body")
            .map_err(|e| map_sqlx_error("stock_apply", e))?;
        let updated: Product = serde_json::from_value(body).map_err(StoreError::from)?;
        Ok(updated.stock())
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::Conflict(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}
