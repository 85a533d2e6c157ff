//! Inventory domain module.
//!
//! Products and the stock ledger rules that keep their two stock categories
//! non-negative. Implemented purely as deterministic domain logic (no IO, no
//! HTTP, no storage); storage applies these rules as conditional writes.

pub mod product;
pub mod stock;

pub use product::{NewProduct, Product, ProductPatch};
pub use stock::{StockDraw, StockLevels, StockLine, StockMove};
