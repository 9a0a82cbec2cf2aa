use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid database connection settings: {0}")]
    ConnectionConfigError(String),

    #[error("Database operation failed: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("The requested data was not found in the database.")]
    NotFound,

    #[error("A row with this {0} already exists.")]
    Conflict(String),

    #[error("Agency with id {0} does not exist.")]
    InvalidReference(i64),
}
