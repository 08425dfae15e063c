use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("HTTP error {status}")]
    Http { status: u16 },
    #[error("no album found for '{term}'")]
    NotFound { term: String },

    #[error("failed to send request: {0}")]
    SendRequestFailed(reqwest::Error),
    #[error("failed to parse response: {0}")]
    ResponseParseFailed(reqwest::Error),

    #[error("failed to read config: {0}")]
    ReadConfig(std::io::Error),
    #[error("{0:?} is not a valid page config: {1}")]
    InvalidConfig(PathBuf, serde_json::Error),
    #[error("album pool must contain at least one entry")]
    EmptyPool,
}

pub type Result<T> = std::result::Result<T, Error>;
