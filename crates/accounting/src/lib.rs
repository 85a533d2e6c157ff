//! Accounting module: business expenses and their reporting folds.
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod expense;
pub mod report;

pub use expense::{Expense, ExpensePatch, NewExpense};
pub use report::{ExpenseTotals, MONTH_NAMES, MonthlyExpenses, expense_totals, monthly_expenses};
