//! Service wiring: one storage backend shared by every repository and service.

use std::sync::Arc;

use chrono::Duration;

use backoffice_accounting::Expense;
use backoffice_auth::JwtService;
use backoffice_infra::{
    AppConfig, AuthService, DashboardService, DocumentStore, InMemoryStore, LoggingMailer, Mailer,
    OrderService, PostgresStore, Repository, SequenceAllocator, StockLedgerStore,
};
use backoffice_inventory::Product;
use backoffice_parties::Customer;
use backoffice_workforce::{Salary, Staff};

pub struct AppServices {
    pub auth: AuthService,
    pub products: Repository<Product>,
    pub customers: Repository<Customer>,
    pub staff: Repository<Staff>,
    pub salaries: Repository<Salary>,
    pub expenses: Repository<Expense>,
    pub orders: OrderService,
    pub dashboard: DashboardService,
}

impl AppServices {
    /// Wire every service over one store.
    pub fn new<S>(store: Arc<S>, jwt: JwtService, mailer: Arc<dyn Mailer>, otp_ttl: Duration) -> Self
    where
        S: DocumentStore + SequenceAllocator + StockLedgerStore + 'static,
    {
        let docs: Arc<dyn DocumentStore> = store.clone();
        let sequences: Arc<dyn SequenceAllocator> = store.clone();
        let ledger: Arc<dyn StockLedgerStore> = store;

        Self {
            auth: AuthService::new(docs.clone(), jwt, mailer, otp_ttl),
            products: Repository::new(docs.clone(), sequences.clone()),
            customers: Repository::new(docs.clone(), sequences.clone()),
            staff: Repository::new(docs.clone(), sequences.clone()),
            salaries: Repository::new(docs.clone(), sequences.clone()),
            expenses: Repository::new(docs.clone(), sequences.clone()),
            orders: OrderService::new(docs.clone(), sequences.clone(), ledger),
            dashboard: DashboardService::new(docs, sequences),
        }
    }

    /// In-memory storage, log-only mail. Used by tests and local runs.
    pub fn in_memory(jwt_secret: &str) -> Self {
        Self::new(
            Arc::new(InMemoryStore::new()),
            JwtService::new(jwt_secret.as_bytes(), Duration::days(1)),
            Arc::new(LoggingMailer),
            Duration::minutes(10),
        )
    }

    /// Postgres when `DATABASE_URL` is configured, in-memory otherwise.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let jwt = JwtService::new(config.jwt_secret.as_bytes(), config.jwt_ttl);
        let mailer: Arc<dyn Mailer> = Arc::new(LoggingMailer);

        match &config.database_url {
            Some(url) => {
                let store = PostgresStore::connect(url, config.db_max_connections).await?;
                tracing::info!("using postgres storage");
                Ok(Self::new(Arc::new(store), jwt, mailer, config.otp_ttl))
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory storage");
                Ok(Self::new(Arc::new(InMemoryStore::new()), jwt, mailer, config.otp_ttl))
            }
        }
    }
}
