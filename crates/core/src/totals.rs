//! Per-payer money totals shared by salaries and expenses.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayerTotal {
    pub paid_by: String,
    pub total_amount: Decimal,
    pub count: u64,
}

/// Sum amounts per payer, ordered by payer name.
pub fn group_by_payer<'a>(entries: impl IntoIterator<Item = (&'a str, Decimal)>) -> Vec<PayerTotal> {
    let mut groups: BTreeMap<&str, (Decimal, u64)> = BTreeMap::new();
    for (payer, amount) in entries {
        let slot = groups.entry(payer).or_insert((Decimal::ZERO, 0));
        slot.0 += amount;
        slot.1 += 1;
    }
    groups
        .into_iter()
        .map(|(payer, (total_amount, count))| PayerTotal {
            paid_by: payer.to_string(),
            total_amount,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_and_counts_per_payer() {
        let totals = group_by_payer([
            ("Sam", Decimal::from(100)),
            ("Jose", Decimal::from(40)),
            ("Sam", Decimal::new(255, 1)),
        ]);
        assert_eq!(
            totals,
            vec![
                PayerTotal {
                    paid_by: "Jose".into(),
                    total_amount: Decimal::from(40),
                    count: 1,
                },
                PayerTotal {
                    paid_by: "Sam".into(),
                    total_amount: Decimal::new(1255, 1),
                    count: 2,
                },
            ]
        );
    }

    #[test]
    fn nothing_in_nothing_out() {
        assert!(group_by_payer(std::iter::empty()).is_empty());
    }
}
