use axum::Router;

use backoffice_core::Record;
use backoffice_infra::Repository;
use backoffice_parties::Customer;

use crate::app::routes::crud::{self, Messages, Resource};
use crate::app::services::AppServices;

impl Resource for Customer {
    const PLURAL: &'static str = "customers";
    const MESSAGES: Messages = Messages {
        added: "Customer added successfully.",
        listed: "Customer collection fetched successfully.",
        empty: "Customer collection is empty.",
        fetched: "Customer fetched successfully.",
        updated: "Customer updated successfully.",
        deleted: "Customer deleted successfully.",
        found: "Customer search results fetched successfully.",
        no_match: "No matching customer found.",
    };

    type View = Record<Customer>;

    fn repository(services: &AppServices) -> &Repository<Self> {
        &services.customers
    }
}

pub fn router() -> Router {
    crud::router::<Customer>()
}
