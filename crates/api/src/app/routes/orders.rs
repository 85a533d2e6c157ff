use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    routing::{get, post},
    Router,
};

use backoffice_sales::{NewOrder, OrderPatch};

use crate::app::dto::{self, OrderBody};
use crate::app::errors::{self, ApiResult};
use crate::app::extract::{LenientQuery, PageParams, RecordPath, SearchParams, TrimmedJson};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(place_order).get(list_orders))
        .route("/search", get(search_orders))
        .route("/:id", get(get_order).put(revise_order).delete(delete_order))
}

/// Debits the product's stock, then stores the order.
pub async fn place_order(
    Extension(services): Extension<Arc<AppServices>>,
    TrimmedJson(draft): TrimmedJson<NewOrder>,
) -> ApiResult {
    let view = services.orders.place(draft).await?;
    Ok(errors::created("Order placed successfully.", OrderBody::from(view)))
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    LenientQuery(params): LenientQuery<PageParams>,
) -> ApiResult {
    let page = services.orders.list(params.request()).await?;
    let message = if page.items.is_empty() {
        "Order collection is empty."
    } else {
        "Order collection fetched successfully."
    };
    Ok(errors::ok(message, dto::page_body("orders", page, OrderBody::from)?))
}

pub async fn search_orders(
    Extension(services): Extension<Arc<AppServices>>,
    LenientQuery(params): LenientQuery<SearchParams>,
) -> ApiResult {
    let page = services
        .orders
        .search(params.query.as_deref(), params.page.request())
        .await?;
    let message = if page.items.is_empty() {
        "No matching order found."
    } else {
        "Order search results fetched successfully."
    };
    Ok(errors::ok(message, dto::page_body("orders", page, OrderBody::from)?))
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    RecordPath(id): RecordPath,
) -> ApiResult {
    let view = services.orders.get(id).await?;
    Ok(errors::ok("Order fetched successfully.", OrderBody::from(view)))
}

/// Applies the difference between the old and new quantities to stock.
pub async fn revise_order(
    Extension(services): Extension<Arc<AppServices>>,
    RecordPath(id): RecordPath,
    TrimmedJson(patch): TrimmedJson<OrderPatch>,
) -> ApiResult {
    let view = services.orders.revise(id, patch).await?;
    Ok(errors::ok(
        "Order updated and stock adjusted successfully.",
        OrderBody::from(view),
    ))
}

/// Stock already debited stays debited.
pub async fn delete_order(
    Extension(services): Extension<Arc<AppServices>>,
    RecordPath(id): RecordPath,
) -> ApiResult {
    services.orders.remove(id).await?;
    Ok(errors::message(StatusCode::OK, "Order deleted successfully."))
}
