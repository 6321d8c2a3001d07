//! Error types for kurumadai

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Roster error: {0}")]
    Roster(String),

    #[error("Distance lookup error: {0}")]
    Distance(String),

    #[error("Excel export error: {0}")]
    Excel(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("More than one record matches: {0}")]
    AmbiguousRecord(String),
}

pub type Result<T> = std::result::Result<T, Error>;
