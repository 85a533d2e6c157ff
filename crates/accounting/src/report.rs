//! Expense reporting folds used by the dashboard.

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeMap, Serializer};

use backoffice_core::{PayerTotal, group_by_payer};

use crate::expense::Expense;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseTotals {
    pub by_payer: Vec<PayerTotal>,
    pub total_expenses: Decimal,
}

pub fn expense_totals<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> ExpenseTotals {
    let by_payer = group_by_payer(expenses.into_iter().map(|e| (e.paid_by.as_str(), e.amount)));
    let total_expenses = by_payer.iter().map(|t| t.total_amount).sum();
    ExpenseTotals {
        by_payer,
        total_expenses,
    }
}

/// Expense amounts for one calendar year, bucketed by month (UTC).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyExpenses {
    pub year: i32,
    pub months: [Decimal; 12],
}

impl MonthlyExpenses {
    pub fn month(&self, name: &str) -> Option<Decimal> {
        MONTH_NAMES
            .iter()
            .position(|m| *m == name)
            .map(|i| self.months[i])
    }
}

pub fn monthly_expenses<'a>(
    year: i32,
    expenses: impl IntoIterator<Item = &'a Expense>,
) -> MonthlyExpenses {
    let mut months = [Decimal::ZERO; 12];
    for expense in expenses.into_iter().filter(|e| e.date.year() == year) {
        months[expense.date.month0() as usize] += expense.amount;
    }
    MonthlyExpenses { year, months }
}

struct MonthBuckets<'a>(&'a [Decimal; 12]);

impl Serialize for MonthBuckets<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(12))?;
        for (name, amount) in MONTH_NAMES.iter().zip(self.0.iter()) {
            map.serialize_entry(name, amount)?;
        }
        map.end()
    }
}

impl Serialize for MonthlyExpenses {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("year", &self.year)?;
        map.serialize_entry("monthlyExpenses", &MonthBuckets(&self.months))?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn expense(payer: &str, amount: i64, y: i32, m: u32, d: u32) -> Expense {
        Expense {
            expense_id: 5001,
            paid_by: payer.into(),
            expense_type: "Fuel".into(),
            amount: Decimal::from(amount),
            date: Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
            image: String::new(),
        }
    }

    #[test]
    fn totals_per_payer_and_overall() {
        let rows = [
            expense("Sam", 100, 2025, 1, 1),
            expense("Jose", 50, 2025, 1, 2),
            expense("Sam", 25, 2024, 6, 1),
        ];
        let totals = expense_totals(&rows);
        assert_eq!(totals.total_expenses, Decimal::from(175));
        assert_eq!(totals.by_payer.len(), 2);
    }

    #[test]
    fn months_are_bucketed_within_the_year() {
        let rows = [
            expense("Sam", 100, 2025, 1, 31),
            expense("Sam", 40, 2025, 12, 31),
            expense("Sam", 60, 2025, 1, 1),
            expense("Sam", 999, 2024, 1, 1),
        ];
        let report = monthly_expenses(2025, &rows);
        assert_eq!(report.month("January"), Some(Decimal::from(160)));
        assert_eq!(report.month("December"), Some(Decimal::from(40)));
        assert_eq!(report.month("June"), Some(Decimal::ZERO));
        assert_eq!(report.month("Smarch"), None);
    }

    #[test]
    fn serializes_every_month_by_name() {
        let report = monthly_expenses(2025, &[expense("Sam", 10, 2025, 3, 3)]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["year"], 2025);
        let months = json["monthlyExpenses"].as_object().unwrap();
        assert_eq!(months.len(), 12);
        assert_eq!(months["March"], serde_json::json!(10.0));
    }

    proptest::proptest! {
        #[test]
        fn buckets_sum_to_the_year_total(
            rows in proptest::collection::vec((2023i32..2026, 1u32..=12, 1u32..=28, 0i64..5_000), 0..50)
        ) {
            let expenses: Vec<Expense> = rows
                .iter()
                .map(|(y, m, d, amount)| expense("Sam", *amount, *y, *m, *d))
                .collect();
            let report = monthly_expenses(2024, &expenses);
            let bucketed: Decimal = report.months.iter().copied().sum();
            let expected: Decimal = expenses
                .iter()
                .filter(|e| e.date.year() == 2024)
                .map(|e| e.amount)
                .sum();
            proptest::prop_assert_eq!(bucketed, expected);
        }
    }
}
