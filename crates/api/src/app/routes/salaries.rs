use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, patch, post},
    Router,
};
use serde::Serialize;

use backoffice_core::{PageInfo, Record};
use backoffice_infra::Repository;
use backoffice_workforce::{PayerTotal, Salary, SalaryPatch, SalaryStatus, totals_by_payer};

use crate::app::dto::StatusParams;
use crate::app::errors::{self, ApiResult};
use crate::app::extract::{LenientQuery, PageParams, RecordPath};
use crate::app::routes::crud::{self, Messages, Resource};
use crate::app::services::AppServices;

impl Resource for Salary {
    const PLURAL: &'static str = "salaries";
    const MESSAGES: Messages = Messages {
        added: "Salary record added successfully.",
        listed: "Salary records fetched successfully.",
        empty: "Salary collection is empty.",
        fetched: "Salary record fetched successfully.",
        updated: "Salary record updated successfully.",
        deleted: "Salary record deleted successfully.",
        found: "Salary search results fetched successfully.",
        no_match: "No matching salary record found.",
    };

    type View = Record<Salary>;

    fn repository(services: &AppServices) -> &Repository<Self> {
        &services.salaries
    }
}

pub fn router() -> Router {
    Router::new()
        .route("/", post(crud::create::<Salary>).get(list_salaries))
        .route("/search", get(crud::search::<Salary>))
        .route(
            "/:id",
            get(crud::fetch::<Salary>)
                .put(crud::update::<Salary>)
                .delete(crud::remove::<Salary>)
                .patch(update_status),
        )
        .route("/:id/status", patch(update_status))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SalaryList {
    salaries: Vec<Record<Salary>>,
    /// Over every paid salary, not just this page.
    totals_by_paid_by: Vec<PayerTotal>,
    pagination: PageInfo,
}

pub async fn list_salaries(
    Extension(services): Extension<Arc<AppServices>>,
    LenientQuery(params): LenientQuery<PageParams>,
) -> ApiResult {
    let page = services.salaries.list(params.request()).await?;
    let all = services.salaries.all().await?;
    let totals = totals_by_payer(all.iter().map(|r| &r.doc));

    let message = if page.items.is_empty() {
        Salary::MESSAGES.empty
    } else {
        Salary::MESSAGES.listed
    };
    Ok(errors::ok(
        message,
        SalaryList {
            salaries: page.items,
            totals_by_paid_by: totals,
            pagination: page.pagination,
        },
    ))
}

/// `PATCH /salary/:id?status=Paid|Unpaid`, also served at `/salary/:id/status`.
pub async fn update_status(
    Extension(services): Extension<Arc<AppServices>>,
    RecordPath(id): RecordPath,
    LenientQuery(params): LenientQuery<StatusParams>,
) -> ApiResult {
    let status: SalaryStatus = params.status.as_deref().unwrap_or_default().parse()?;
    let record = services.salaries.update(id, SalaryPatch::status(status)).await?;
    Ok(errors::ok("Salary status updated successfully.", record))
}
