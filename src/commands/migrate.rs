//! Migrate command - schema management outside of `serve`.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    // Pending migrations stay pending until the chosen action runs
    let db = Database::connect_without_migrations(&config).await?;
    run(&db, args.action).await
}

/// Apply one migration action to an open database.
pub async fn run(db: &Database, action: MigrateAction) -> AppResult<()> {
    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            tracing::info!("Schema is up to date");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            tracing::info!("Rolled back the latest migration");
        }
        MigrateAction::Status => {
            for (name, applied) in db.migration_status().await? {
                tracing::info!(migration = %name, applied, "Migration status");
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping every table before re-applying migrations");
            db.fresh_migrations().await?;
            tracing::info!("Schema rebuilt from scratch");
        }
    }

    Ok(())
}
