use std::sync::Arc;

use axum::{extract::Extension, routing::get, Router};
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeMap, Serializer};

use backoffice_accounting::{MONTH_NAMES, MonthlyExpenses};

use crate::app::dto::YearParams;
use crate::app::errors::{self, ApiResult};
use crate::app::extract::LenientQuery;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/counter-details", get(counter_details))
        .route("/total-expense", get(total_expense))
        .route("/monthly-expenses", get(monthly_expenses))
}

pub async fn counter_details(Extension(services): Extension<Arc<AppServices>>) -> ApiResult {
    let counters = services.dashboard.counter_details().await?;
    Ok(errors::ok("Counter details fetched successfully.", counters))
}

pub async fn total_expense(Extension(services): Extension<Arc<AppServices>>) -> ApiResult {
    let totals = services.dashboard.total_expense().await?;
    Ok(errors::ok("Total expenses fetched successfully.", totals))
}

pub async fn monthly_expenses(
    Extension(services): Extension<Arc<AppServices>>,
    LenientQuery(params): LenientQuery<YearParams>,
) -> ApiResult {
    let monthly = services.dashboard.monthly_expenses(params.year()).await?;
    let message = format!("Monthly expenses for year {} fetched successfully.", monthly.year);
    Ok(errors::ok(message, MonthlyBody(monthly)))
}

/// `{ "year": 2024, "monthlyExpenses": { "January": .., .., "December": .. } }`
struct MonthlyBody(MonthlyExpenses);

struct MonthMap<'a>(&'a [Decimal; 12]);

impl Serialize for MonthlyBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("year", &self.0.year)?;
        map.serialize_entry("monthlyExpenses", &MonthMap(&self.0.months))?;
        map.end()
    }
}

impl Serialize for MonthMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(MONTH_NAMES.len()))?;
        for (name, amount) in MONTH_NAMES.iter().zip(self.0) {
            map.serialize_entry(name, amount)?;
        }
        map.end()
    }
}
