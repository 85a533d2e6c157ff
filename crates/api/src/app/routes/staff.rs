use axum::Router;

use backoffice_core::Record;
use backoffice_infra::Repository;
use backoffice_workforce::Staff;

use crate::app::routes::crud::{self, Messages, Resource};
use crate::app::services::AppServices;

impl Resource for Staff {
    const PLURAL: &'static str = "staff";
    const MESSAGES: Messages = Messages {
        added: "Staff added successfully.",
        listed: "Staff collection fetched successfully.",
        empty: "Staff collection is empty.",
        fetched: "Staff member fetched successfully.",
        updated: "Staff member updated successfully.",
        deleted: "Staff member deleted successfully.",
        found: "Staff search results fetched successfully.",
        no_match: "No matching staff found.",
    };

    type View = Record<Staff>;

    fn repository(services: &AppServices) -> &Repository<Self> {
        &services.staff
    }
}

pub fn router() -> Router {
    crud::router::<Staff>()
}
