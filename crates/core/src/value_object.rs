//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**: two instances with the same attribute
/// values are equal. They are immutable; "changing" one means building a new
/// one (e.g. a stock level after a debit).
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Phone(String);
///
/// impl ValueObject for Phone {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
