//! Back-office server — application entry point.
//!
//! Connects to SurrealDB, applies pending migrations, and wires the
//! directory services over the Surreal repositories.

use backoffice_db::repository::{
    SurrealCommentRepository, SurrealGroupRepository, SurrealManagerRepository,
    SurrealOrderRepository,
};
use backoffice_db::{DbConfig, DbManager};
use backoffice_directory::{ManagerDirectory, OrderDirectory};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("backoffice=info".parse()?),
        )
        .json()
        .init();

    tracing::info!("Starting back-office server...");

    let config = DbConfig::from_env();
    let manager = DbManager::connect(&config).await?;
    backoffice_db::run_migrations(manager.client()).await?;

    let db = manager.client().clone();
    let managers = ManagerDirectory::new(
        SurrealManagerRepository::new(db.clone()),
        SurrealOrderRepository::new(db.clone()),
    );
    let orders = OrderDirectory::new(
        SurrealOrderRepository::new(db.clone()),
        SurrealGroupRepository::new(db.clone()),
        SurrealCommentRepository::new(db.clone()),
        SurrealManagerRepository::new(db),
    );

    let manager_page = managers
        .list(backoffice_core::query::PageQuery::default())
        .await?;
    let order_stats = orders.statistic().await?;
    tracing::info!(
        managers = manager_page.total_count,
        orders = order_stats.total,
        "Back-office directories ready"
    );

    Ok(())
}
