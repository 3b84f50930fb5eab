use std::path::PathBuf;
use thiserror::Error;

/// Every failure the scraper can report. All of them are fatal.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("unexpected page structure at {url}: {message}")]
    Parse { url: String, message: String },

    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScrapeError {
    pub fn network(url: impl ToString, message: impl ToString) -> Self {
        Self::Network {
            url: url.to_string(),
            message: message.to_string(),
        }
    }

    pub fn parse(url: impl ToString, message: impl ToString) -> Self {
        Self::Parse {
            url: url.to_string(),
            message: message.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;
