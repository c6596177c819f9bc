use thiserror::Error;

/// Custom error type for database and reporting operations.
#[derive(Error, Debug)]
pub enum DbError {
    /// Error that occurs during database interactions (e.g., introspection query failure).
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    /// Connection error (e.g., issues with network or database connection).
    #[error("Connection error: {0}")]
    Connection(String),
    /// Configuration error (e.g., invalid connection profile or missing parameters).
    #[error("Configuration error: {0}")]
    Config(String),
    /// Credential encryption or decryption failure.
    #[error("Crypto error: {0}")]
    Crypto(String),
    /// Export error (e.g., failed to write a rendered report).
    #[error("Export error: {0}")]
    Export(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
