//! Database layer for scribe.
//!
//! SeaORM entities, schema migrations, and the repository structs the
//! service layer is built on. Repositories share one connection pool
//! behind an `Arc<DatabaseConnection>`.

pub mod entities;
pub mod migrations;
pub mod repositories;
pub mod test_utils;

use std::time::Duration;

use scribe_common::{AppError, Config};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::log::LevelFilter;

/// Open the connection pool described by the configuration.
///
/// Feed pages fan out into short counted/windowed queries, so the pool
/// is tuned for many brief checkouts rather than long transactions.
pub async fn init(config: &Config) -> Result<DatabaseConnection, AppError> {
    let mut opts = ConnectOptions::new(&config.database.url);
    opts.max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    Database::connect(opts)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Apply any pending schema migrations.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), AppError> {
    migrations::Migrator::up(db, None)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}
