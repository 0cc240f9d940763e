//! Error types for the cinedice core
//!
//! All errors use thiserror for structured error handling. They only
//! surface from the repository and bootstrap layers; the `App` context
//! treats persistence as best-effort and never returns these to the UI.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Generic(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
