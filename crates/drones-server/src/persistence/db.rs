//! Database connection and initialization.

use anyhow::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::{info, warn};

/// Database connection wrapper.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Get the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Initialize the SQLite database.
///
/// Creates the database file if it doesn't exist, runs migrations,
/// and returns a connection pool.
pub async fn init_database(db_path: &str, max_connections: u32) -> Result<Database> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path);

    info!("Connecting to database: {}", db_path);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(&db_url)
        .await?;

    run_migrations(&pool).await?;

    Ok(Database { pool })
}

/// Apply the embedded schema. Safe to run against an existing database.
async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    info!("Running database migrations...");

    for statement in migration_statements(include_str!("../../migrations/001_init.sql")) {
        let Err(e) = sqlx::query(&statement).execute(pool).await else {
            continue;
        };
        if e.to_string().contains("already exists") {
            continue;
        }
        if statement.to_uppercase().starts_with("CREATE") {
            anyhow::bail!("Migration failed on CREATE statement: {}", e);
        }
        warn!("Migration statement failed: {}", e);
    }

    info!("Database migrations complete");
    Ok(())
}

/// Split a migration script into statements, dropping `--` comment lines.
fn migration_statements(sql: &str) -> impl Iterator<Item = String> + '_ {
    sql.split(';').filter_map(|chunk| {
        let statement = chunk
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let statement = statement.trim();
        (!statement.is_empty()).then(|| statement.to_string())
    })
}

/// True when `err` is a SQLite UNIQUE constraint violation.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_database() {
        let db = init_database(":memory:", 1).await.unwrap();

        for table in ["drone_categories", "drones", "pilots", "competitions"] {
            let result: (i32,) = sqlx::query_as(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            )
            .bind(table)
            .fetch_one(db.pool())
            .await
            .unwrap();
            assert_eq!(result.0, 1, "missing table {}", table);
        }
    }

    #[tokio::test]
    async fn migrations_are_rerunnable() {
        let db = init_database(":memory:", 1).await.unwrap();
        run_migrations(db.pool()).await.unwrap();
    }

    #[test]
    fn comments_and_blank_chunks_are_skipped() {
        let sql = "-- header\nCREATE TABLE a (id INTEGER);\n\n-- trailing\n;";
        let statements: Vec<String> = migration_statements(sql).collect();
        assert_eq!(statements, ["CREATE TABLE a (id INTEGER)"]);
    }
}
