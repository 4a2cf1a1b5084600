use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[cfg(windows)]
    #[error("platform error: {0}")]
    Platform(#[from] windows::core::Error),

    #[error("failed to install the log subscriber: {0}")]
    Logging(String),

    #[error("the desktop shell is not available on {0}")]
    UnsupportedPlatform(&'static str),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
