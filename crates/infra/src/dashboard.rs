//! Dashboard figures, folded from the entity repositories on each request.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use backoffice_accounting::{Expense, ExpenseTotals, MonthlyExpenses, expense_totals, monthly_expenses};
use backoffice_inventory::Product;
use backoffice_workforce::{Salary, Staff};

use crate::error::ServiceResult;
use crate::repository::Repository;
use crate::store::{DocumentStore, SequenceAllocator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterDetails {
    pub total_products: u64,
    /// Sum of both stock categories over all products.
    pub total_stock: Decimal,
    pub total_staff: u64,
    /// Sum of every salary record, paid or not.
    pub total_salaries: Decimal,
}

#[derive(Clone)]
pub struct DashboardService {
    products: Repository<Product>,
    staff: Repository<Staff>,
    salaries: Repository<Salary>,
    expenses: Repository<Expense>,
}

impl DashboardService {
    pub fn new(docs: Arc<dyn DocumentStore>, sequences: Arc<dyn SequenceAllocator>) -> Self {
        Self {
            products: Repository::new(docs.clone(), sequences.clone()),
            staff: Repository::new(docs.clone(), sequences.clone()),
            salaries: Repository::new(docs.clone(), sequences.clone()),
            expenses: Repository::new(docs, sequences),
        }
    }

    pub async fn counter_details(&self) -> ServiceResult<CounterDetails> {
        let products = self.products.all().await?;
        let salaries = self.salaries.all().await?;
        Ok(CounterDetails {
            total_products: products.len() as u64,
            total_stock: products.iter().map(|p| p.doc.stock().total()).sum(),
            total_staff: self.staff.count().await?,
            total_salaries: salaries.iter().map(|s| s.doc.salary).sum(),
        })
    }

    pub async fn total_expense(&self) -> ServiceResult<ExpenseTotals> {
        let expenses = self.expenses.all().await?;
        Ok(expense_totals(expenses.iter().map(|r| &r.doc)))
    }

    /// Defaults to the current year.
    pub async fn monthly_expenses(&self, year: Option<i32>) -> ServiceResult<MonthlyExpenses> {
        let year = year.unwrap_or_else(|| Utc::now().year());
        let expenses = self.expenses.all().await?;
        Ok(monthly_expenses(year, expenses.iter().map(|r| &r.doc)))
    }
}
