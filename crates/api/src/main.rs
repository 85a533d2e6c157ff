use std::sync::Arc;

use anyhow::Context;

use backoffice_api::app::{AppServices, build_app};
use backoffice_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    backoffice_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let services = Arc::new(AppServices::from_config(&config).await?);

    if let Some(admin) = config.admin.clone() {
        let services = services.clone();
        tokio::spawn(async move {
            match services.auth.ensure_admin(&admin.email, &admin.password).await {
                Ok(true) => tracing::info!(email = %admin.email, "admin account seeded"),
                Ok(false) => tracing::debug!("admin account already present"),
                Err(e) => tracing::error!(error = %e, "admin bootstrap failed"),
            }
        });
    }

    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
