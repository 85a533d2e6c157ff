use axum::Router;

use backoffice_accounting::Expense;
use backoffice_core::Record;
use backoffice_infra::Repository;

use crate::app::routes::crud::{self, Messages, Resource};
use crate::app::services::AppServices;

impl Resource for Expense {
    const PLURAL: &'static str = "expenses";
    const MESSAGES: Messages = Messages {
        added: "Expense added successfully.",
        listed: "Expenses fetched successfully.",
        empty: "No expense records found.",
        fetched: "Expense fetched successfully.",
        updated: "Expense updated successfully.",
        deleted: "Expense deleted successfully.",
        found: "Expenses search results fetched successfully.",
        no_match: "No matching expenses found.",
    };

    type View = Record<Expense>;

    fn repository(services: &AppServices) -> &Repository<Self> {
        &services.expenses
    }
}

pub fn router() -> Router {
    crud::router::<Expense>()
}
