//! Create/list/search/get/update/delete handlers shared by the plain entities.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

use backoffice_core::{Document, Record};
use backoffice_infra::Repository;

use crate::app::dto;
use crate::app::errors::{self, ApiResult};
use crate::app::extract::{LenientQuery, PageParams, RecordPath, SearchParams, TrimmedJson};
use crate::app::services::AppServices;

/// Response wording for one entity kind.
pub struct Messages {
    pub added: &'static str,
    pub listed: &'static str,
    pub empty: &'static str,
    pub fetched: &'static str,
    pub updated: &'static str,
    pub deleted: &'static str,
    pub found: &'static str,
    pub no_match: &'static str,
}

/// An entity served over HTTP by the shared handlers.
pub trait Resource:
    Document<Draft: DeserializeOwned + 'static, Patch: DeserializeOwned + 'static>
{
    /// Key holding the item array in list and search responses.
    const PLURAL: &'static str;
    const MESSAGES: Messages;

    type View: Serialize + From<Record<Self>>;

    fn repository(services: &AppServices) -> &Repository<Self>;
}

pub fn router<T: Resource>() -> Router {
    Router::new()
        .route("/", post(create::<T>).get(list::<T>))
        .route("/search", get(search::<T>))
        .route("/:id", get(fetch::<T>).put(update::<T>).delete(remove::<T>))
}

pub async fn create<T: Resource>(
    Extension(services): Extension<Arc<AppServices>>,
    TrimmedJson(draft): TrimmedJson<T::Draft>,
) -> ApiResult {
    let record = T::repository(&services).create(draft).await?;
    Ok(errors::created(T::MESSAGES.added, T::View::from(record)))
}

pub async fn list<T: Resource>(
    Extension(services): Extension<Arc<AppServices>>,
    LenientQuery(params): LenientQuery<PageParams>,
) -> ApiResult {
    let page = T::repository(&services).list(params.request()).await?;
    let message = if page.items.is_empty() {
        T::MESSAGES.empty
    } else {
        T::MESSAGES.listed
    };
    Ok(errors::ok(message, dto::page_body(T::PLURAL, page, T::View::from)?))
}

pub async fn search<T: Resource>(
    Extension(services): Extension<Arc<AppServices>>,
    LenientQuery(params): LenientQuery<SearchParams>,
) -> ApiResult {
    let page = T::repository(&services)
        .search(params.query.as_deref(), params.page.request())
        .await?;
    let message = if page.items.is_empty() {
        T::MESSAGES.no_match
    } else {
        T::MESSAGES.found
    };
    Ok(errors::ok(message, dto::page_body(T::PLURAL, page, T::View::from)?))
}

pub async fn fetch<T: Resource>(
    Extension(services): Extension<Arc<AppServices>>,
    RecordPath(id): RecordPath,
) -> ApiResult {
    let record = T::repository(&services).get(id).await?;
    Ok(errors::ok(T::MESSAGES.fetched, T::View::from(record)))
}

pub async fn update<T: Resource>(
    Extension(services): Extension<Arc<AppServices>>,
    RecordPath(id): RecordPath,
    TrimmedJson(patch): TrimmedJson<T::Patch>,
) -> ApiResult {
    let record = T::repository(&services).update(id, patch).await?;
    Ok(errors::ok(T::MESSAGES.updated, T::View::from(record)))
}

pub async fn remove<T: Resource>(
    Extension(services): Extension<Arc<AppServices>>,
    RecordPath(id): RecordPath,
) -> ApiResult {
    T::repository(&services).delete(id).await?;
    Ok(errors::message(StatusCode::OK, T::MESSAGES.deleted))
}
