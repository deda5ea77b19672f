use thiserror::Error;

/// Startup and server lifecycle errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<shared::AppError> for ServerError {
    fn from(err: shared::AppError) -> Self {
        ServerError::Database(err.message)
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
