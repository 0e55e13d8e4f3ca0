use thiserror::Error;

#[derive(Error, Debug)]
pub enum CareerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("User data not found")]
    NotFound,

    #[error("Upstream request failed: {0}")]
    Upstream(String),

    #[error("Malformed data: {0}")]
    Malformed(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type CareerResult<T> = Result<T, CareerError>;
