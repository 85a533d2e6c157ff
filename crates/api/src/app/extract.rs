//! Request extractors that reject with the response envelope.

use axum::Json;
use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use backoffice_core::{PageRequest, RecordId};

use crate::app::errors::ApiError;

/// JSON body with every string value trimmed before deserialization.
///
/// A missing field is reported as `"<field> is required."`.
#[derive(Debug, Clone)]
pub struct TrimmedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for TrimmedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(mut value) = Json::<JsonValue>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        trim_strings(&mut value);
        serde_json::from_value(value)
            .map(TrimmedJson)
            .map_err(|e| ApiError::bad_request(describe(&e)))
    }
}

pub fn trim_strings(value: &mut JsonValue) {
    match value {
        JsonValue::String(s) => {
            let trimmed = s.trim();
            if trimmed.len() != s.len() {
                *s = trimmed.to_string();
            }
        }
        JsonValue::Array(items) => items.iter_mut().for_each(trim_strings),
        JsonValue::Object(map) => map.values_mut().for_each(trim_strings),
        _ => {}
    }
}

fn describe(e: &serde_json::Error) -> String {
    let text = e.to_string();
    match text
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split_once('`'))
    {
        Some((field, _)) => format!("{field} is required."),
        None => text,
    }
}

/// `:id` path segment parsed as a record key.
#[derive(Debug, Clone, Copy)]
pub struct RecordPath(pub RecordId);

#[async_trait]
impl<S> FromRequestParts<S> for RecordPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::bad_request("Invalid record id."))?;
        raw.parse()
            .map(RecordPath)
            .map_err(|_| ApiError::bad_request("Invalid record id."))
    }
}

/// `?page=&limit=`; anything unparsable falls back to the defaults.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    page: Option<String>,
    #[serde(default)]
    limit: Option<String>,
}

impl PageParams {
    pub fn request(&self) -> PageRequest {
        let number = |v: &Option<String>| v.as_deref().and_then(|s| s.trim().parse::<u64>().ok());
        PageRequest::new(number(&self.page), number(&self.limit))
    }
}

/// `?query=&page=&limit=`
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

/// Query string extractor that never rejects; malformed input reads as empty.
#[derive(Debug, Default)]
pub struct LenientQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for LenientQuery<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let value = Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(v)| v)
            .unwrap_or_default();
        Ok(LenientQuery(value))
    }
}
