use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use backoffice_core::{Document, DomainError, DomainResult, Sequence, Validate, require_text};

/// A business expense. `image` holds a receipt URL; uploading it is handled elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub expense_id: i64,
    pub paid_by: String,
    pub expense_type: String,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    #[serde(default)]
    pub paid_by: String,
    #[serde(default)]
    pub expense_type: String,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub image: String,
}

impl Validate for NewExpense {
    fn validate(&self) -> DomainResult<()> {
        require_text("PaidBy", &self.paid_by)?;
        require_text("Expense type", &self.expense_type)?;
        ensure_amount(self.amount)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Validate for ExpensePatch {
    fn validate(&self) -> DomainResult<()> {
        if let Some(paid_by) = &self.paid_by {
            require_text("PaidBy", paid_by)?;
        }
        if let Some(kind) = &self.expense_type {
            require_text("Expense type", kind)?;
        }
        self.amount.map_or(Ok(()), ensure_amount)
    }
}

fn ensure_amount(amount: Decimal) -> DomainResult<()> {
    if amount < Decimal::ZERO {
        return Err(DomainError::validation("Amount cannot be negative."));
    }
    Ok(())
}

impl Document for Expense {
    const COLLECTION: &'static str = "expenses";
    const LABEL: &'static str = "Expense";
    const SEQUENCE: Sequence = Sequence::EXPENSE;
    const SEARCH_FIELDS: &'static [&'static str] = &["paidBy", "expenseType"];

    type Draft = NewExpense;
    type Patch = ExpensePatch;

    fn from_draft(seq: i64, draft: NewExpense, _now: DateTime<Utc>) -> Self {
        Self {
            expense_id: seq,
            paid_by: draft.paid_by,
            expense_type: draft.expense_type,
            amount: draft.amount,
            date: draft.date,
            image: draft.image,
        }
    }

    fn seq(&self) -> i64 {
        self.expense_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_defaults_to_empty() {
        let draft: NewExpense = serde_json::from_value(serde_json::json!({
            "paidBy": "Sam",
            "expenseType": "Fuel",
            "amount": 45.5,
            "date": "2025-03-04T00:00:00Z",
        }))
        .unwrap();
        assert!(draft.validate().is_ok());
        let expense = Expense::from_draft(5001, draft, Utc::now());
        assert_eq!(expense.image, "");
        assert_eq!(expense.amount, Decimal::new(455, 1));
        assert_eq!(expense.seq(), 5001);
    }

    #[test]
    fn date_is_required() {
        let missing = serde_json::from_value::<NewExpense>(serde_json::json!({
            "paidBy": "Sam",
            "expenseType": "Fuel",
            "amount": 10,
        }));
        assert!(missing.is_err());
    }

    #[test]
    fn negative_amount_is_rejected() {
        let patch = ExpensePatch {
            amount: Some(Decimal::from(-5)),
            ..Default::default()
        };
        assert_eq!(
            patch.validate().unwrap_err().to_string(),
            "Amount cannot be negative."
        );
    }
}
