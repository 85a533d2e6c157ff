use axum::Router;

use backoffice_infra::Repository;
use backoffice_inventory::Product;

use crate::app::dto::ProductView;
use crate::app::routes::crud::{self, Messages, Resource};
use crate::app::services::AppServices;

impl Resource for Product {
    const PLURAL: &'static str = "products";
    const MESSAGES: Messages = Messages {
        added: "Product added successfully.",
        listed: "Product collection fetched successfully.",
        empty: "Product collection is empty.",
        fetched: "Product fetched successfully.",
        updated: "Product updated successfully.",
        deleted: "Product deleted successfully.",
        found: "Product search results fetched successfully.",
        no_match: "No matching product found.",
    };

    type View = ProductView;

    fn repository(services: &AppServices) -> &Repository<Self> {
        &services.products
    }
}

pub fn router() -> Router {
    crud::router::<Product>()
}
