//! Display-ID sequences.
//!
//! Each entity kind gets a monotonically increasing integer ID from a named
//! counter. The counter name doubles as the JSON field that carries the ID on
//! the document (`productId`, `orderId`, ...).

/// A named counter and the value it starts from.
///
/// The first allocation returns `base + 1`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Sequence {
    pub name: &'static str,
    pub base: i64,
}

impl Sequence {
    pub const fn new(name: &'static str, base: i64) -> Self {
        Self { name, base }
    }

    pub const PRODUCT: Sequence = Sequence::new("productId", 1000);
    pub const ORDER: Sequence = Sequence::new("orderId", 1000);
    pub const CUSTOMER: Sequence = Sequence::new("customerId", 500);
    pub const STAFF: Sequence = Sequence::new("staffId", 200);
    pub const SALARY: Sequence = Sequence::new("salaryId", 1000);
    pub const EXPENSE: Sequence = Sequence::new("expenseId", 5000);

    /// All sequences known to the system.
    pub const ALL: [Sequence; 6] = [
        Sequence::PRODUCT,
        Sequence::ORDER,
        Sequence::CUSTOMER,
        Sequence::STAFF,
        Sequence::SALARY,
        Sequence::EXPENSE,
    ];
}

impl core::fmt::Display for Sequence {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sequence_names_are_unique() {
        let names: HashSet<_> = Sequence::ALL.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), Sequence::ALL.len());
    }

    #[test]
    fn bases_match_entity_conventions() {
        assert_eq!(Sequence::ORDER.base, 1000);
        assert_eq!(Sequence::PRODUCT.base, 1000);
        assert_eq!(Sequence::STAFF.base, 200);
        assert_eq!(Sequence::CUSTOMER.base, 500);
        assert_eq!(Sequence::EXPENSE.base, 5000);
    }
}
