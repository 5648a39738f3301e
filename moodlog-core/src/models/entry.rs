use serde::{Deserialize, Serialize};

/// Format of the `timestamp` column. Lexicographic order matches time order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct JournalEntry {
    pub id: i64,
    pub content: String,
    pub timestamp: String,
    pub sentiment: f64,
}
