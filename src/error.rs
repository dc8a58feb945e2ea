use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, KpiError>;

#[derive(Error, Debug)]
pub enum KpiError {
    #[error("Invalid URL: {0} (expected https://github.com/<owner>/<repo>)")]
    InvalidUrl(String),
    #[error("Repeat entries in store for repo '{repo_name}': found {count} rows")]
    DuplicateRecord { repo_name: String, count: usize },
    #[error("DB file not present or unreadable: {}", .0.display())]
    StoreUnavailable(PathBuf),
    #[error("Credentials error: {0}")]
    Credentials(String),
    #[error("Forge API error {status} for {url}: {message}")]
    Api {
        status: u16,
        url: String,
        message: String,
    },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Stats store {} has schema version {found}, expected {expected}", .path.display())]
    SchemaMismatch {
        path: PathBuf,
        expected: u32,
        found: i64,
    },
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid chart: {0}")]
    InvalidChart(String),
    #[error("Other: {0}")]
    Other(String),
}
