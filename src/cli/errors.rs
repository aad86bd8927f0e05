//! CLI-specific error types
//!
//! Every CLI error ends the process. Library errors keep their own codes so
//! the JSON error response names the failing subsystem.

use std::io;

use thiserror::Error;

use crate::index::IndexError;
use crate::ranking::RankingError;
use crate::store::StoreError;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file missing, unreadable or invalid
    #[error("config error: {0}")]
    Config(String),

    #[error("empty input")]
    EmptyInput,

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Ranking(#[from] RankingError),
}

impl CliError {
    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        CliError::Config(msg.into())
    }

    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "CLI_CONFIG_ERROR",
            CliError::EmptyInput => "CLI_EMPTY_INPUT",
            CliError::Io(_) => "CLI_IO_ERROR",
            CliError::Json(_) => "CLI_INVALID_JSON",
            CliError::Store(err) => err.code(),
            CliError::Index(err) => err.code(),
            CliError::Ranking(err) => err.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(CliError::config_error("x").code(), "CLI_CONFIG_ERROR");
        assert_eq!(CliError::EmptyInput.code(), "CLI_EMPTY_INPUT");

        let err: CliError = io::Error::new(io::ErrorKind::Other, "boom").into();
        assert_eq!(err.code(), "CLI_IO_ERROR");
    }

    #[test]
    fn test_library_codes_pass_through() {
        let err = CliError::from(IndexError::PipelineClosed);
        assert_eq!(err.code(), IndexError::PipelineClosed.code());
    }
}
