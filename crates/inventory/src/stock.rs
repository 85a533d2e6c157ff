//! Stock ledger rules.
//!
//! A product holds two stock categories (`a` and `b`). Orders draw from both.
//! The rules here decide whether a draw is allowed and what the product's stock
//! becomes; they never touch storage.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use backoffice_core::{DomainError, DomainResult, ValueObject};

pub const INSUFFICIENT_ON_PLACE: &str = "Insufficient stock in the selected product.";
pub const INSUFFICIENT_ON_REVISE: &str = "Not enough stock to update this order.";

/// Current quantities of both stock categories of one product.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevels {
    pub a: Decimal,
    pub b: Decimal,
}

impl ValueObject for StockLevels {}

impl StockLevels {
    pub fn new(a: Decimal, b: Decimal) -> Self {
        Self { a, b }
    }

    pub fn is_non_negative(&self) -> bool {
        self.a >= Decimal::ZERO && self.b >= Decimal::ZERO
    }

    pub fn total(&self) -> Decimal {
        self.a + self.b
    }
}

/// Amounts an order takes from a product. Both components are `>= 0`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StockDraw {
    a: Decimal,
    b: Decimal,
}

impl ValueObject for StockDraw {}

impl StockDraw {
    pub fn new(a: Decimal, b: Decimal) -> DomainResult<Self> {
        if a < Decimal::ZERO || b < Decimal::ZERO {
            return Err(DomainError::validation("Stock amounts cannot be negative."));
        }
        Ok(Self { a, b })
    }

    pub fn a(&self) -> Decimal {
        self.a
    }

    pub fn b(&self) -> Decimal {
        self.b
    }
}

/// Take `draw` from `current` (order placement).
///
/// Fails when either component exceeds what the product holds.
pub fn debit(current: StockLevels, draw: StockDraw) -> DomainResult<StockLevels> {
    if draw.a > current.a || draw.b > current.b {
        return Err(DomainError::insufficient_stock(INSUFFICIENT_ON_PLACE));
    }
    Ok(StockLevels::new(current.a - draw.a, current.b - draw.b))
}

/// Restore `old` then take `new` (order edit).
///
/// The result is the same as if the order had drawn `new` in the first place.
pub fn adjust(current: StockLevels, old: StockDraw, new: StockDraw) -> DomainResult<StockLevels> {
    let restored = credit(current, old);
    let next = StockLevels::new(restored.a - new.a, restored.b - new.b);
    if !next.is_non_negative() {
        return Err(DomainError::insufficient_stock(INSUFFICIENT_ON_REVISE));
    }
    Ok(next)
}

/// Give `draw` back. Only used to compensate a draw whose order was never written.
pub fn credit(current: StockLevels, draw: StockDraw) -> StockLevels {
    StockLevels::new(current.a + draw.a, current.b + draw.b)
}

/// A single ledger operation against one product's stock.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StockMove {
    Debit(StockDraw),
    Adjust { old: StockDraw, new: StockDraw },
    Credit(StockDraw),
}

impl StockMove {
    pub fn apply(&self, current: StockLevels) -> DomainResult<StockLevels> {
        match *self {
            StockMove::Debit(draw) => debit(current, draw),
            StockMove::Adjust { old, new } => adjust(current, old, new),
            StockMove::Credit(draw) => Ok(credit(current, draw)),
        }
    }

    /// Signed change applied to each category. The move is allowed when
    /// `current + delta` stays non-negative.
    pub fn delta(&self) -> (Decimal, Decimal) {
        match *self {
            StockMove::Debit(draw) => (-draw.a, -draw.b),
            StockMove::Adjust { old, new } => (old.a - new.a, old.b - new.b),
            StockMove::Credit(draw) => (draw.a, draw.b),
        }
    }

    /// The move that undoes this one.
    pub fn reverse(&self) -> StockMove {
        match *self {
            StockMove::Debit(draw) => StockMove::Credit(draw),
            StockMove::Adjust { old, new } => StockMove::Adjust { old: new, new: old },
            StockMove::Credit(draw) => StockMove::Debit(draw),
        }
    }

    pub fn insufficient(&self) -> DomainError {
        match self {
            StockMove::Adjust { .. } => DomainError::insufficient_stock(INSUFFICIENT_ON_REVISE),
            _ => DomainError::insufficient_stock(INSUFFICIENT_ON_PLACE),
        }
    }
}

/// One stock category of a product: amount, unit and unit price.
///
/// Amount and unit are kept apart; the `"1200lb"` display form is rebuilt only
/// when rendering a response. The legacy combined form is still accepted on
/// input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawStockLine")]
pub struct StockLine {
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
}

impl ValueObject for StockLine {}

impl StockLine {
    pub fn new(quantity: Decimal, unit: impl Into<String>, unit_price: Decimal) -> DomainResult<Self> {
        if quantity < Decimal::ZERO {
            return Err(DomainError::validation("Stock quantity cannot be negative."));
        }
        if unit_price < Decimal::ZERO {
            return Err(DomainError::validation("Stock price cannot be negative."));
        }
        Ok(Self {
            quantity,
            unit: unit.into(),
            unit_price,
        })
    }

    /// `"1200lb"`, `"35"`.
    pub fn display(&self) -> String {
        format!("{}{}", self.quantity.normalize(), self.unit)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStockLine {
    quantity: RawQuantity,
    #[serde(default)]
    unit: Option<String>,
    unit_price: Decimal,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuantity {
    Number(Decimal),
    Text(String),
}

impl TryFrom<RawStockLine> for StockLine {
    type Error = DomainError;

    fn try_from(raw: RawStockLine) -> Result<Self, Self::Error> {
        let (quantity, parsed_unit) = match raw.quantity {
            RawQuantity::Number(n) => (n, String::new()),
            RawQuantity::Text(s) => split_legacy_quantity(&s)?,
        };
        // An explicit unit wins over one embedded in the quantity string.
        let unit = raw
            .unit
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or(parsed_unit);
        StockLine::new(quantity, unit, raw.unit_price)
    }
}

/// Split a legacy `"<number><unit>"` string into its amount and unit.
///
/// The unit is everything left after removing digits and dots, trimmed, so
/// `"1200 lb"` and `"1200lb"` both give `(1200, "lb")`.
pub fn split_legacy_quantity(s: &str) -> DomainResult<(Decimal, String)> {
    let s = s.trim();
    let numeric: String = s
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if numeric.is_empty() {
        return Err(DomainError::validation(format!("Invalid stock quantity: {s:?}")));
    }
    let amount: Decimal = numeric
        .parse()
        .map_err(|_| DomainError::validation(format!("Invalid stock quantity: {s:?}")))?;
    let unit: String = s
        .chars()
        .filter(|c| !c.is_ascii_digit() && *c != '.')
        .collect::<String>()
        .trim()
        .to_string();
    Ok((amount, unit))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels(a: i64, b: i64) -> StockLevels {
        StockLevels::new(Decimal::from(a), Decimal::from(b))
    }

    fn draw(a: i64, b: i64) -> StockDraw {
        StockDraw::new(Decimal::from(a), Decimal::from(b)).unwrap()
    }

    #[test]
    fn move_delta_agrees_with_apply() {
        let current = levels(100, 50);
        let moves = [
            StockMove::Debit(draw(10, 5)),
            StockMove::Adjust { old: draw(10, 5), new: draw(20, 0) },
            StockMove::Credit(draw(3, 3)),
        ];
        for mv in moves {
            let (da, db) = mv.delta();
            let applied = mv.apply(current).unwrap();
            assert_eq!(applied, StockLevels::new(current.a + da, current.b + db));
            assert_eq!(mv.reverse().apply(applied).unwrap(), current);
        }
    }

    #[test]
    fn move_errors_carry_the_operation_message() {
        let err = StockMove::Debit(draw(10, 0)).apply(levels(5, 5)).unwrap_err();
        assert_eq!(err, StockMove::Debit(draw(10, 0)).insufficient());
        assert_eq!(err.to_string(), INSUFFICIENT_ON_PLACE);

        let revise = StockMove::Adjust { old: draw(0, 0), new: draw(10, 0) };
        assert_eq!(revise.apply(levels(5, 5)).unwrap_err().to_string(), INSUFFICIENT_ON_REVISE);
    }

    #[test]
    fn debit_subtracts_both_categories() {
        assert_eq!(debit(levels(100, 50), draw(10, 5)).unwrap(), levels(90, 45));
    }

    #[test]
    fn debit_rejects_overdraw_of_either_category() {
        let err = debit(levels(5, 5), draw(10, 0)).unwrap_err();
        assert_eq!(err, DomainError::insufficient_stock(INSUFFICIENT_ON_PLACE));

        assert!(debit(levels(5, 5), draw(0, 6)).is_err());
    }

    #[test]
    fn debit_can_empty_the_product() {
        assert_eq!(debit(levels(5, 5), draw(5, 5)).unwrap(), levels(0, 0));
    }

    #[test]
    fn edit_reverses_then_reapplies() {
        let after_place = debit(levels(100, 50), draw(10, 5)).unwrap();
        assert_eq!(after_place, levels(90, 45));

        let after_edit = adjust(after_place, draw(10, 5), draw(20, 0)).unwrap();
        assert_eq!(after_edit, levels(80, 50));
    }

    #[test]
    fn edit_rejects_when_result_would_be_negative() {
        let err = adjust(levels(0, 0), draw(10, 5), draw(11, 0)).unwrap_err();
        assert_eq!(err, DomainError::insufficient_stock(INSUFFICIENT_ON_REVISE));
    }

    #[test]
    fn negative_draws_are_invalid() {
        assert!(StockDraw::new(Decimal::from(-1), Decimal::ZERO).is_err());
        assert!(StockDraw::new(Decimal::ZERO, Decimal::ZERO).is_ok());
    }

    #[test]
    fn legacy_quantity_keeps_unit_verbatim() {
        assert_eq!(split_legacy_quantity("1200lb").unwrap(), (Decimal::from(1200), "lb".to_string()));
        assert_eq!(split_legacy_quantity("12.5 kg").unwrap(), (Decimal::new(125, 1), "kg".to_string()));
        assert_eq!(split_legacy_quantity("40").unwrap(), (Decimal::from(40), String::new()));
        assert!(split_legacy_quantity("lb").is_err());
    }

    #[test]
    fn stock_line_accepts_number_or_legacy_string() {
        let from_number: StockLine =
            serde_json::from_value(serde_json::json!({"quantity": 35, "unitPrice": 2.5})).unwrap();
        assert_eq!(from_number.quantity, Decimal::from(35));
        assert_eq!(from_number.unit, "");
        assert_eq!(from_number.display(), "35");

        let from_legacy: StockLine =
            serde_json::from_value(serde_json::json!({"quantity": "1200lb", "unitPrice": 3})).unwrap();
        assert_eq!(from_legacy.quantity, Decimal::from(1200));
        assert_eq!(from_legacy.unit, "lb");
        assert_eq!(from_legacy.display(), "1200lb");
    }

    #[test]
    fn stock_line_rejects_negative_quantity() {
        let res: Result<StockLine, _> =
            serde_json::from_value(serde_json::json!({"quantity": -1, "unitPrice": 1}));
        assert!(res.is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Place(u32, u32),
            Edit(usize, u32, u32),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0u32..60, 0u32..60).prop_map(|(a, b)| Op::Place(a, b)),
                (0usize..8, 0u32..60, 0u32..60).prop_map(|(i, a, b)| Op::Edit(i, a, b)),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig { cases: 500, ..ProptestConfig::default() })]

            /// Property: no sequence of placements and edits drives stock below zero,
            /// and rejected operations leave the stock untouched.
            #[test]
            fn stock_never_goes_negative(
                start_a in 0u32..200,
                start_b in 0u32..200,
                ops in prop::collection::vec(op(), 1..40)
            ) {
                let mut stock = StockLevels::new(Decimal::from(start_a), Decimal::from(start_b));
                let mut live: Vec<StockDraw> = Vec::new();

                for op in ops {
                    let before = stock;
                    match op {
                        Op::Place(a, b) => {
                            let d = StockDraw::new(Decimal::from(a), Decimal::from(b)).unwrap();
                            match debit(stock, d) {
                                Ok(next) => { stock = next; live.push(d); }
                                Err(_) => prop_assert_eq!(stock, before),
                            }
                        }
                        Op::Edit(i, a, b) => {
                            if live.is_empty() { continue; }
                            let idx = i % live.len();
                            let d = StockDraw::new(Decimal::from(a), Decimal::from(b)).unwrap();
                            match adjust(stock, live[idx], d) {
                                Ok(next) => { stock = next; live[idx] = d; }
                                Err(_) => prop_assert_eq!(stock, before),
                            }
                        }
                    }
                    prop_assert!(stock.is_non_negative());
                }

                // Conservation: start = current + everything still drawn by live orders.
                let drawn_a: Decimal = live.iter().map(|d| d.a()).sum();
                let drawn_b: Decimal = live.iter().map(|d| d.b()).sum();
                prop_assert_eq!(stock.a + drawn_a, Decimal::from(start_a));
                prop_assert_eq!(stock.b + drawn_b, Decimal::from(start_b));
            }

            /// Property: an edit lands on the same stock regardless of the path taken.
            #[test]
            fn edit_is_path_independent(
                a in 0u32..500, b in 0u32..500,
                x in 0u32..100, y in 0u32..100,
                x2 in 0u32..100, y2 in 0u32..100
            ) {
                let start = StockLevels::new(Decimal::from(a), Decimal::from(b));
                let first = StockDraw::new(Decimal::from(x), Decimal::from(y)).unwrap();
                let second = StockDraw::new(Decimal::from(x2), Decimal::from(y2)).unwrap();

                if let Ok(placed) = debit(start, first) {
                    let edited = adjust(placed, first, second);
                    let direct = debit(start, second);
                    prop_assert_eq!(edited.is_ok(), direct.is_ok());
                    if let (Ok(e), Ok(d)) = (edited, direct) {
                        prop_assert_eq!(e, d);
                    }
                }
            }
        }
    }
}
