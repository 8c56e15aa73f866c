//! Error types for buildversion.
//!
//! Extraction never surfaces these; they only come out of rendering and of
//! the build-script helpers.

use crate::exit_codes;
use crate::template::TemplateError;
use thiserror::Error;

/// Main error type for buildversion operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Git could not be executed or exited unsuccessfully.
    #[error("Git operation failed: {0}")]
    Git(String),

    /// Reading a template or writing build-script output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Embedded build settings could not be encoded or decoded.
    #[error("Invalid build settings: {0}")]
    Settings(#[from] serde_json::Error),

    /// A template could not be rendered.
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
}

impl Error {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Git(_) => exit_codes::GIT_FAILURE,
            Error::Io(_) => exit_codes::USER_ERROR,
            Error::Settings(_) => exit_codes::USER_ERROR,
            Error::Template(_) => exit_codes::TEMPLATE_FAILURE,
        }
    }
}

/// Result type alias for buildversion operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn git_error_has_correct_exit_code() {
        let err = Error::Git("rev-parse failed".to_string());
        assert_eq!(err.exit_code(), exit_codes::GIT_FAILURE);
    }

    #[test]
    fn template_error_has_correct_exit_code() {
        let err = Error::from(TemplateError::EmptyDirective { position: 0 });
        assert_eq!(err.exit_code(), exit_codes::TEMPLATE_FAILURE);
    }

    #[test]
    fn io_error_is_a_user_error() {
        let err = Error::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "version.tmpl",
        ));
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn settings_error_is_a_user_error() {
        let err = Error::from(serde_json::from_str::<serde_json::Value>("{").unwrap_err());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = Error::Git("not a repository".to_string());
        assert_eq!(err.to_string(), "Git operation failed: not a repository");

        let err = Error::from(TemplateError::UnmatchedBrace { position: 3 });
        assert_eq!(
            err.to_string(),
            "Template error: unmatched '{' at position 3 in template"
        );
    }
}
