//! Orders: the entity store composed with the stock ledger.
//!
//! Placing an order debits its product, revising it adjusts by the difference,
//! removing it leaves stock alone. When the order write fails after the stock
//! write succeeded, the stock write is reversed before the error is returned.
//! A revision only lands while the order still draws the amounts it was
//! computed from.

use std::sync::Arc;

use serde_json::{Value as JsonValue, json};
use tracing::{error, instrument};

use backoffice_core::{DomainError, Page, PageRequest, Record, RecordId, Validate};
use backoffice_inventory::{Product, StockDraw, StockMove};
use backoffice_sales::{NewOrder, Order, OrderPatch};

use crate::error::{ServiceError, ServiceResult};
use crate::repository::Repository;
use crate::store::{DocumentStore, SequenceAllocator, StockLedgerStore};

/// An order with its product resolved. `product` is `None` when the product
/// has since been deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderView {
    pub order: Record<Order>,
    pub product: Option<Record<Product>>,
}

#[derive(Clone)]
pub struct OrderService {
    orders: Repository<Order>,
    products: Repository<Product>,
    ledger: Arc<dyn StockLedgerStore>,
}

impl OrderService {
    pub fn new(
        docs: Arc<dyn DocumentStore>,
        sequences: Arc<dyn SequenceAllocator>,
        ledger: Arc<dyn StockLedgerStore>,
    ) -> Self {
        Self {
            orders: Repository::new(docs.clone(), sequences.clone()),
            products: Repository::new(docs, sequences),
            ledger,
        }
    }

    #[instrument(skip_all, fields(product = %draft.product), err)]
    pub async fn place(&self, draft: NewOrder) -> ServiceResult<OrderView> {
        draft.validate()?;
        let draw = draft.draw()?;
        let product = self.products.get(draft.product).await?;

        let seq = self.orders.allocate().await?;
        let record = Repository::<Order>::build(seq, draft);

        let mv = StockMove::Debit(draw);
        let levels = self.ledger.apply(product.id, mv).await?;
        if let Err(e) = self.orders.insert(&record).await {
            self.undo(product.id, mv).await;
            return Err(e);
        }

        Ok(OrderView {
            order: record,
            product: Some(product.map(|p| p.with_stock(levels))),
        })
    }

    /// Change an order. When its amounts change, the product is adjusted by
    /// the difference and the order is written only if its amounts are still
    /// the ones the adjustment was computed from; otherwise the adjustment is
    /// reversed and the edit fails with `Conflict`.
    #[instrument(skip_all, fields(id = %id), err)]
    pub async fn revise(&self, id: RecordId, patch: OrderPatch) -> ServiceResult<OrderView> {
        patch.validate()?;
        let current = self.orders.get(id).await?;
        let product = self.products.get(current.doc.product).await?;

        if !patch.touches_stock() {
            let order = self.orders.update(id, patch).await?;
            return Ok(OrderView {
                order,
                product: Some(product),
            });
        }

        let old = current.doc.draw()?;
        let new = patch.draw_over(old)?;
        let guard = drawn(old);
        if old == new {
            let order = self
                .orders
                .update_if(id, guard, patch)
                .await?
                .ok_or_else(revised_elsewhere)?;
            return Ok(OrderView {
                order,
                product: Some(product),
            });
        }

        let mv = StockMove::Adjust { old, new };
        let levels = self.ledger.apply(product.id, mv).await?;
        match self.orders.update_if(id, guard, patch).await {
            Ok(Some(order)) => Ok(OrderView {
                order,
                product: Some(product.map(|p| p.with_stock(levels))),
            }),
            Ok(None) => {
                self.undo(product.id, mv).await;
                Err(revised_elsewhere())
            }
            Err(e) => {
                self.undo(product.id, mv).await;
                Err(e)
            }
        }
    }

    /// Delete the order. Stock is not restored.
    pub async fn remove(&self, id: RecordId) -> ServiceResult<()> {
        self.orders.delete(id).await
    }

    pub async fn get(&self, id: RecordId) -> ServiceResult<OrderView> {
        let order = self.orders.get(id).await?;
        self.populate(order).await
    }

    pub async fn list(&self, page: PageRequest) -> ServiceResult<Page<OrderView>> {
        let orders = self.orders.list(page).await?;
        self.populate_page(orders).await
    }

    pub async fn search(&self, query: Option<&str>, page: PageRequest) -> ServiceResult<Page<OrderView>> {
        let orders = self.orders.search(query, page).await?;
        self.populate_page(orders).await
    }

    async fn populate(&self, order: Record<Order>) -> ServiceResult<OrderView> {
        let product = self.products.find(order.doc.product).await?;
        Ok(OrderView { order, product })
    }

    async fn populate_page(&self, page: Page<Record<Order>>) -> ServiceResult<Page<OrderView>> {
        let mut items = Vec::with_capacity(page.items.len());
        for order in page.items {
            items.push(self.populate(order).await?);
        }
        Ok(Page {
            items,
            pagination: page.pagination,
        })
    }

    async fn undo(&self, product: RecordId, mv: StockMove) {
        if let Err(e) = self.ledger.apply(product, mv.reverse()).await {
            log_failed_undo(product, &e);
        }
    }
}

/// The order fields a revision is conditional on.
fn drawn(draw: StockDraw) -> JsonValue {
    json!({ "stockA": draw.a(), "stockB": draw.b() })
}

fn revised_elsewhere() -> ServiceError {
    DomainError::conflict("Order was changed by another request. Please retry.").into()
}

fn log_failed_undo(product: RecordId, e: &ServiceError) {
    error!(%product, error = %e, "failed to reverse stock move after order write failure");
}
