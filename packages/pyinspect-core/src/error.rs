//! Error types for pyinspect-core.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InspectError {
    /// A collaborator was called with an argument it cannot accept (for
    /// example a negative or non-integer line number).
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed error cache at {path}: {message}")]
    CacheFormat { path: PathBuf, message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("render error: {message}")]
    Render { message: String },

    /// Failure reported by the host runtime while probing a live value.
    #[error("runtime error: {message}")]
    Runtime { message: String },
}

impl InspectError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        InspectError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        InspectError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn cache_format(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        InspectError::CacheFormat {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        InspectError::Config {
            message: message.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        InspectError::Render {
            message: message.into(),
        }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        InspectError::Runtime {
            message: message.into(),
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, InspectError::InvalidArgument { .. })
    }
}

pub type Result<T> = std::result::Result<T, InspectError>;
