use thiserror::Error;

use crate::{WidgetError, services::media::MediaError};

/// Errors that can occur during CLI command execution.
#[derive(Error, Debug)]
pub enum CliError {
    /// An argument could not be parsed or is out of range.
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// Argument name
        arg: String,
        /// What was wrong with it
        reason: String,
    },

    /// A backing service failed or is unavailable.
    #[error("{service} service error: {details}")]
    ServiceError {
        /// Service name
        service: String,
        /// Error details
        details: String,
    },

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] WidgetError),
}

impl CliError {
    pub(crate) fn invalid(arg: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg: arg.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<MediaError> for CliError {
    fn from(error: MediaError) -> Self {
        Self::ServiceError {
            service: "Media".to_string(),
            details: error.to_string(),
        }
    }
}

/// Type alias for command execution results.
///
/// Commands return the text to print on success.
pub type CommandResult = Result<String, CliError>;
