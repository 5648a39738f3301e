use std::str::FromStr;

use crate::config::DatabaseConfig;
use crate::error::MoodlogError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

const CREATE_ENTRIES: &str = r#"
CREATE TABLE IF NOT EXISTS entries (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    content   TEXT    NOT NULL,
    timestamp TEXT    NOT NULL,
    sentiment REAL    NOT NULL
)
"#;

/// Open the SQLite file named by `config.url`, creating it if missing.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, MoodlogError> {
    let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Create the `entries` table if it does not exist yet. Safe to run on every start.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), MoodlogError> {
    sqlx::query(CREATE_ENTRIES).execute(pool).await?;
    Ok(())
}

pub async fn health_check(pool: &SqlitePool) -> Result<String, sqlx::Error> {
    let row: (String,) = sqlx::query_as("SELECT sqlite_version()")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}
