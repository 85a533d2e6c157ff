use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use backoffice_core::{Document, DomainError, DomainResult, Sequence, Validate};

use crate::stock::{StockLevels, StockLine};

/// A sellable product with two stock categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: i64,
    pub product_name: String,
    pub stock_a: StockLine,
    pub stock_b: StockLine,
    pub date: DateTime<Utc>,
}

impl Product {
    pub fn stock(&self) -> StockLevels {
        StockLevels::new(self.stock_a.quantity, self.stock_b.quantity)
    }

    /// Same product with new stock quantities (units and prices unchanged).
    pub fn with_stock(mut self, levels: StockLevels) -> Self {
        self.stock_a.quantity = levels.a;
        self.stock_b.quantity = levels.b;
        self
    }
}

/// Payload for creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub product_name: String,
    pub stock_a: StockLine,
    pub stock_b: StockLine,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl Validate for NewProduct {
    fn validate(&self) -> DomainResult<()> {
        if self.product_name.trim().is_empty() {
            return Err(DomainError::validation("Product name is required."));
        }
        Ok(())
    }
}

/// Direct edit of a product. Stock values given here replace the current ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_a: Option<StockLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_b: Option<StockLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

impl Validate for ProductPatch {
    fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.product_name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("Product name is required."));
            }
        }
        Ok(())
    }
}

impl Document for Product {
    const COLLECTION: &'static str = "products";
    const LABEL: &'static str = "Product";
    const SEQUENCE: Sequence = Sequence::PRODUCT;
    const SEARCH_FIELDS: &'static [&'static str] = &["productName"];

    type Draft = NewProduct;
    type Patch = ProductPatch;

    fn from_draft(seq: i64, draft: NewProduct, now: DateTime<Utc>) -> Self {
        Self {
            product_id: seq,
            product_name: draft.product_name,
            stock_a: draft.stock_a,
            stock_b: draft.stock_b,
            date: draft.date.unwrap_or(now),
        }
    }

    fn seq(&self) -> i64 {
        self.product_id
    }
}
