use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use backoffice_core::{Document, DomainError, DomainResult, RecordId, Sequence, Validate};
use backoffice_inventory::StockDraw;

/// A customer order drawing stock from one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: i64,
    pub product: RecordId,
    pub stock_a: Decimal,
    pub stock_b: Decimal,
    pub stock_a_price: Decimal,
    pub stock_b_price: Decimal,
    pub client_name: String,
    pub phone: String,
    pub product_weight: String,
    pub product_price: Decimal,
    pub date: DateTime<Utc>,
}

impl Order {
    /// Stock this order currently holds against its product.
    pub fn draw(&self) -> DomainResult<StockDraw> {
        StockDraw::new(self.stock_a, self.stock_b)
    }
}

/// Payload for placing an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub product: RecordId,
    #[serde(default)]
    pub stock_a: Decimal,
    #[serde(default)]
    pub stock_b: Decimal,
    #[serde(default)]
    pub stock_a_price: Decimal,
    #[serde(default)]
    pub stock_b_price: Decimal,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub product_weight: String,
    #[serde(default)]
    pub product_price: Decimal,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl NewOrder {
    pub fn draw(&self) -> DomainResult<StockDraw> {
        StockDraw::new(self.stock_a, self.stock_b)
    }
}

impl Validate for NewOrder {
    fn validate(&self) -> DomainResult<()> {
        self.draw()?;
        ensure_non_negative(&[
            ("productPrice", Some(self.product_price)),
            ("stockAPrice", Some(self.stock_a_price)),
            ("stockBPrice", Some(self.stock_b_price)),
        ])
    }
}

/// Edit of an order. The referenced product cannot be changed; amounts that
/// are left out keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_a: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_b: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_a_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_b_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

impl OrderPatch {
    /// The draw after applying this patch to an order currently drawing `old`.
    pub fn draw_over(&self, old: StockDraw) -> DomainResult<StockDraw> {
        StockDraw::new(self.stock_a.unwrap_or(old.a()), self.stock_b.unwrap_or(old.b()))
    }

    pub fn touches_stock(&self) -> bool {
        self.stock_a.is_some() || self.stock_b.is_some()
    }
}

impl Validate for OrderPatch {
    fn validate(&self) -> DomainResult<()> {
        ensure_non_negative(&[
            ("stockA", self.stock_a),
            ("stockB", self.stock_b),
            ("productPrice", self.product_price),
            ("stockAPrice", self.stock_a_price),
            ("stockBPrice", self.stock_b_price),
        ])
    }
}

fn ensure_non_negative(fields: &[(&str, Option<Decimal>)]) -> DomainResult<()> {
    for (name, value) in fields {
        if matches!(value, Some(v) if *v < Decimal::ZERO) {
            return Err(DomainError::validation(format!("{name} cannot be negative.")));
        }
    }
    Ok(())
}

impl Document for Order {
    const COLLECTION: &'static str = "orders";
    const LABEL: &'static str = "Order";
    const SEQUENCE: Sequence = Sequence::ORDER;
    const SEARCH_FIELDS: &'static [&'static str] = &["clientName", "phone"];

    type Draft = NewOrder;
    type Patch = OrderPatch;

    fn from_draft(seq: i64, draft: NewOrder, now: DateTime<Utc>) -> Self {
        Self {
            order_id: seq,
            product: draft.product,
            stock_a: draft.stock_a,
            stock_b: draft.stock_b,
            stock_a_price: draft.stock_a_price,
            stock_b_price: draft.stock_b_price,
            client_name: draft.client_name,
            phone: draft.phone,
            product_weight: draft.product_weight,
            product_price: draft.product_price,
            date: draft.date.unwrap_or(now),
        }
    }

    fn seq(&self) -> i64 {
        self.order_id
    }
}
