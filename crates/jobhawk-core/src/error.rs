use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to access state file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse state file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid listing record: {0}")]
    InvalidRecord(String),

    #[error("Unknown site: {0}")]
    UnknownSite(String),
}

pub type Result<T> = std::result::Result<T, Error>;
