//! Parties domain module: the business's customers.

pub mod customer;
pub mod phone;

pub use customer::{Customer, CustomerPatch, NewCustomer};
pub use phone::Phone;
