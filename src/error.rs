// src/error.rs
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("Invalid argument: {class} count must not be negative (got {count})")]
    InvalidArgument { class: &'static str, count: i64 },
    #[error("Invalid argument: password length must not exceed {max} characters")]
    TooLong { max: i64 },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage unavailable at {path}: {reason}")]
    Unavailable { path: String, reason: String },
    #[error("Storage error: {0}")]
    Query(#[from] rusqlite::Error),
}

#[derive(Debug, Error)]
pub enum TuiError {
    #[error("Terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error("TUI error: {0}")]
    Tui(#[from] TuiError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CLI error: {0}")]
    Cli(String),
}

pub type AppResult<T> = Result<T, AppError>;
pub type StoreResult<T> = Result<T, StoreError>;
