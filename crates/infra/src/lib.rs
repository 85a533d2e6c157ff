//! Infrastructure layer: storage backends, configuration and the services
//! that compose domain rules with storage.

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod orders;
pub mod repository;
pub mod store;

pub use auth::{AuthService, LoggingMailer, Mailer};
pub use config::AppConfig;
pub use dashboard::{CounterDetails, DashboardService};
pub use error::{ServiceError, ServiceResult};
pub use orders::{OrderService, OrderView};
pub use repository::Repository;
pub use store::{
    DocumentFilter, DocumentStore, InMemoryStore, PostgresStore, SequenceAllocator,
    StockLedgerStore, StoreError, StoreResult, StoredDocument,
};
