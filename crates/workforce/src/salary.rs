use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use backoffice_core::{
    Document, DomainError, DomainResult, PayerTotal, Sequence, Validate, group_by_payer,
    require_text,
};

use crate::staff::Gender;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalaryStatus {
    Paid,
    #[default]
    Unpaid,
}

impl std::str::FromStr for SalaryStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Paid" => Ok(Self::Paid),
            "Unpaid" => Ok(Self::Unpaid),
            _ => Err(DomainError::validation(
                "Invalid status value. Must be 'Paid' or 'Unpaid'.",
            )),
        }
    }
}

/// A salary payment record for one staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Salary {
    pub salary_id: i64,
    pub staff_name: String,
    pub gender: Gender,
    pub salary: Decimal,
    pub phone: String,
    pub paid_by: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub status: SalaryStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSalary {
    #[serde(default)]
    pub staff_name: String,
    pub gender: Gender,
    pub salary: Decimal,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub paid_by: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: SalaryStatus,
}

impl Validate for NewSalary {
    fn validate(&self) -> DomainResult<()> {
        require_text("Staff name", &self.staff_name)?;
        require_text("Phone number", &self.phone)?;
        require_text("PaidBy", &self.paid_by)?;
        ensure_amount(self.salary)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SalaryStatus>,
}

impl SalaryPatch {
    /// Patch that only flips the payment status.
    pub fn status(status: SalaryStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

impl Validate for SalaryPatch {
    fn validate(&self) -> DomainResult<()> {
        for (field, value) in [
            ("Staff name", &self.staff_name),
            ("Phone number", &self.phone),
            ("PaidBy", &self.paid_by),
        ] {
            if let Some(value) = value {
                require_text(field, value)?;
            }
        }
        match self.salary {
            Some(amount) => ensure_amount(amount),
            None => Ok(()),
        }
    }
}

fn ensure_amount(amount: Decimal) -> DomainResult<()> {
    if amount < Decimal::ZERO {
        return Err(DomainError::validation("Salary cannot be negative."));
    }
    Ok(())
}

/// Totals of paid salaries grouped by who paid them. Unpaid records are ignored.
pub fn totals_by_payer<'a>(salaries: impl IntoIterator<Item = &'a Salary>) -> Vec<PayerTotal> {
    group_by_payer(
        salaries
            .into_iter()
            .filter(|s| s.status == SalaryStatus::Paid)
            .map(|s| (s.paid_by.as_str(), s.salary)),
    )
}

impl Document for Salary {
    const COLLECTION: &'static str = "salaries";
    const LABEL: &'static str = "Salary record";
    const SEQUENCE: Sequence = Sequence::SALARY;
    const SEARCH_FIELDS: &'static [&'static str] =
        &["staffName", "gender", "phone", "paidBy", "status"];

    type Draft = NewSalary;
    type Patch = SalaryPatch;

    fn from_draft(seq: i64, draft: NewSalary, now: DateTime<Utc>) -> Self {
        Self {
            salary_id: seq,
            staff_name: draft.staff_name,
            gender: draft.gender,
            salary: draft.salary,
            phone: draft.phone,
            paid_by: draft.paid_by,
            date: draft.date.unwrap_or(now),
            status: draft.status,
        }
    }

    fn seq(&self) -> i64 {
        self.salary_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salary(payer: &str, amount: i64, status: SalaryStatus) -> Salary {
        let mut s = Salary::from_draft(
            1001,
            NewSalary {
                staff_name: "Lina".into(),
                gender: Gender::Female,
                salary: Decimal::from(amount),
                phone: "5550101".into(),
                paid_by: payer.into(),
                date: None,
                status: SalaryStatus::default(),
            },
            Utc::now(),
        );
        s.status = status;
        s
    }

    #[test]
    fn status_defaults_to_unpaid() {
        let draft: NewSalary = serde_json::from_value(serde_json::json!({
            "staffName": "Lina",
            "gender": "Female",
            "salary": 1200,
            "phone": "5550101",
            "paidBy": "Sam",
        }))
        .unwrap();
        assert_eq!(draft.status, SalaryStatus::Unpaid);
    }

    #[test]
    fn status_parses_exact_names_only() {
        assert_eq!("Paid".parse::<SalaryStatus>().unwrap(), SalaryStatus::Paid);
        assert!("paid".parse::<SalaryStatus>().is_err());
    }

    #[test]
    fn totals_only_count_paid_salaries() {
        let records = [
            salary("Sam", 1000, SalaryStatus::Paid),
            salary("Sam", 500, SalaryStatus::Paid),
            salary("Jose", 700, SalaryStatus::Unpaid),
        ];
        let totals = totals_by_payer(&records);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].paid_by, "Sam");
        assert_eq!(totals[0].total_amount, Decimal::from(1500));
        assert_eq!(totals[0].count, 2);
    }

    #[test]
    fn status_patch_serializes_alone() {
        let json = serde_json::to_value(SalaryPatch::status(SalaryStatus::Paid)).unwrap();
        assert_eq!(json, serde_json::json!({"status": "Paid"}));
    }

    #[test]
    fn negative_salary_is_rejected() {
        let patch = SalaryPatch {
            salary: Some(Decimal::from(-1)),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    proptest::proptest! {
        #[test]
        fn grand_total_matches_paid_sum(
            rows in proptest::collection::vec((0usize..3, 0i64..10_000, proptest::bool::ANY), 0..40)
        ) {
            let payers = ["Sam", "Jose", "Rita"];
            let records: Vec<Salary> = rows
                .iter()
                .map(|(p, amount, paid)| {
                    let status = if *paid { SalaryStatus::Paid } else { SalaryStatus::Unpaid };
                    salary(payers[*p], *amount, status)
                })
                .collect();
            let expected: Decimal = records
                .iter()
                .filter(|s| s.status == SalaryStatus::Paid)
                .map(|s| s.salary)
                .sum();
            let totals = totals_by_payer(&records);
            let grand: Decimal = totals.iter().map(|t| t.total_amount).sum();
            proptest::prop_assert_eq!(grand, expected);
            let count: u64 = totals.iter().map(|t| t.count).sum();
            proptest::prop_assert_eq!(count as usize, rows.iter().filter(|r| r.2).count());
        }
    }
}
