use thiserror::Error;

use waypoint_core::RecordId;
use waypoint_infra::DirectoryError;

use crate::validate::ValidationErrors;

/// Why a console operation did not change the list.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("only admins can manage user records")]
    Forbidden,

    #[error("invalid record: {0}")]
    Validation(ValidationErrors),

    #[error("the last admin cannot be removed")]
    LastAdmin,

    #[error("record {0} is not in the list")]
    NotFound(RecordId),

    #[error("directory request failed: {0}")]
    Remote(#[from] DirectoryError),
}

impl ConsoleError {
    /// Message suitable for showing to the operator.
    ///
    /// Remote failures are reported generically; the detail goes to the log.
    pub fn user_message(&self) -> String {
        match self {
            ConsoleError::Remote(_) => {
                "The operation could not be completed. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            ConsoleError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for ConsoleError {
    fn from(errors: ValidationErrors) -> Self {
        ConsoleError::Validation(errors)
    }
}
