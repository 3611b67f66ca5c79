use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid repository url")]
    InvalidRepositoryUrl(String),

    #[error("Repository doesn't exist")]
    RepoNotFound(String),

    #[error("Branch doesn't exist in the repository")]
    BranchNotFound(String),

    #[error("Invalid date {0:?}, expected YYYY-MM-DD or dd.mm.yyyy")]
    InvalidDate(String),

    #[error("Start date {start} is after end date {end}")]
    InvalidDateWindow { start: String, end: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Transport failures worth another attempt. HTTP status errors never are.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(e) => e.is_connect() || e.is_timeout() || e.is_body(),
            _ => false,
        }
    }

    /// Errors that end the run before any analysis starts.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidRepositoryUrl(_)
                | Error::RepoNotFound(_)
                | Error::BranchNotFound(_)
                | Error::InvalidDate(_)
                | Error::InvalidDateWindow { .. }
        )
    }
}
