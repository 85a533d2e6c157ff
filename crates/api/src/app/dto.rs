use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use backoffice_core::{Page, PageInfo, Record, RecordId};
use backoffice_infra::OrderView;
use backoffice_inventory::{Product, StockLine};
use backoffice_sales::Order;

use crate::app::errors::ApiError;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub new_password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusParams {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct YearParams {
    #[serde(default)]
    pub year: Option<String>,
}

impl YearParams {
    /// Unparsable years read as absent.
    pub fn year(&self) -> Option<i32> {
        self.year.as_deref().and_then(|y| y.trim().parse().ok())
    }
}

// -------------------------
// Response DTOs
// -------------------------

/// A stock category as returned to clients, with its `"1200lb"` display form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockLineView {
    #[serde(flatten)]
    pub line: StockLine,
    pub display: String,
}

impl From<StockLine> for StockLineView {
    fn from(line: StockLine) -> Self {
        Self {
            display: line.display(),
            line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: RecordId,
    pub product_id: i64,
    pub product_name: String,
    pub stock_a: StockLineView,
    pub stock_b: StockLineView,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Record<Product>> for ProductView {
    fn from(r: Record<Product>) -> Self {
        Self {
            id: r.id,
            product_id: r.doc.product_id,
            product_name: r.doc.product_name,
            stock_a: r.doc.stock_a.into(),
            stock_b: r.doc.stock_b.into(),
            date: r.doc.date,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// The product an order points at: populated, or just its key once deleted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProductRef {
    Populated(Box<ProductView>),
    Missing(RecordId),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBody {
    pub id: RecordId,
    pub order_id: i64,
    pub product: ProductRef,
    pub stock_a: Decimal,
    pub stock_b: Decimal,
    pub stock_a_price: Decimal,
    pub stock_b_price: Decimal,
    pub client_name: String,
    pub phone: String,
    pub product_weight: String,
    pub product_price: Decimal,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrderView> for OrderBody {
    fn from(view: OrderView) -> Self {
        let Record {
            id,
            doc,
            created_at,
            updated_at,
        } = view.order;
        let Order {
            order_id,
            product,
            stock_a,
            stock_b,
            stock_a_price,
            stock_b_price,
            client_name,
            phone,
            product_weight,
            product_price,
            date,
        } = doc;
        let product = match view.product {
            Some(p) => ProductRef::Populated(Box::new(p.into())),
            None => ProductRef::Missing(product),
        };
        Self {
            id,
            order_id,
            product,
            stock_a,
            stock_b,
            stock_a_price,
            stock_b_price,
            client_name,
            phone,
            product_weight,
            product_price,
            date,
            created_at,
            updated_at,
        }
    }
}

/// `{ <key>: [...], pagination: {...} }`
pub fn page_body<T, V>(key: &str, page: Page<T>, view: impl FnMut(T) -> V) -> Result<JsonValue, ApiError>
where
    V: Serialize,
{
    let Page { items, pagination } = page.map(view);
    keyed_body(key, items, pagination)
}

pub fn keyed_body<V: Serialize>(key: &str, items: Vec<V>, pagination: PageInfo) -> Result<JsonValue, ApiError> {
    let mut body = Map::new();
    body.insert(key.to_string(), serde_json::to_value(items)?);
    body.insert("pagination".to_string(), serde_json::to_value(pagination)?);
    Ok(JsonValue::Object(body))
}
