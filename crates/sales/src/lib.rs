//! Sales domain module.
//!
//! Orders reference exactly one product and record how much of each of its
//! stock categories they take.

pub mod order;

pub use order::{NewOrder, Order, OrderPatch};
