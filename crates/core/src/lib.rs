//! `backoffice-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the error model, display-ID sequences, the document contract
//! shared by every entity kind, pagination and search parameters, and
//! per-payer totals.

pub mod document;
pub mod error;
pub mod id;
pub mod page;
pub mod search;
pub mod sequence;
pub mod totals;
pub mod value_object;

pub use document::{Document, Record, Validate, require_text};
pub use error::{DomainError, DomainResult, ErrorKind};
pub use id::RecordId;
pub use page::{Page, PageInfo, PageRequest};
pub use search::SearchQuery;
pub use sequence::Sequence;
pub use totals::{PayerTotal, group_by_payer};
pub use value_object::ValueObject;
