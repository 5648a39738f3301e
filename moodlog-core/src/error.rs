use thiserror::Error;

/// Startup errors: loading config, opening the pool, creating the schema.
#[derive(Error, Debug)]
pub enum MoodlogError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Errors surfaced by the entry store.
#[derive(Error, Debug)]
pub enum JournalError {
    #[error("{0}")]
    Validation(String),

    #[error("Entry {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
