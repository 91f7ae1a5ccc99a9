//! Schema migrations applied at startup

use std::path::Path;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use tracing::info;

/// Apply every pending migration found in `dir`
///
/// Migrations are read at runtime so the binary does not embed SQL.
pub async fn run_migrations(pool: &PgPool, dir: impl AsRef<Path>) -> Result<(), MigrateError> {
    let dir = dir.as_ref();
    let migrator = Migrator::new(dir).await?;
    info!(path = %dir.display(), count = migrator.iter().count(), "Running migrations");
    migrator.run(pool).await?;
    info!("Migrations applied");
    Ok(())
}
