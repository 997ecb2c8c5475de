use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("navigation to {url} failed: {source}")]
    Navigation {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid URL {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid email address {address:?}: {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("failed to build email message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP delivery failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("email task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("seen store connection lock poisoned")]
    Poisoned,
}
