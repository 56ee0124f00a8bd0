//! Error types for annuaire.
//!
//! Every fallible library call returns [`Result`]. Unknown ids are not errors
//! at the store level; [`Error::NotFound`] is raised by callers that need the
//! record to exist.

use std::path::PathBuf;

use thiserror::Error;

use crate::person::PersonId;
use crate::validation::ValidationErrors;

/// Errors raised by the directory, its store and its configuration.
#[derive(Error, Debug)]
pub enum Error {
    /// The database file could not be opened.
    #[error("cannot open database {path}: {source}")]
    OpenDatabase {
        /// Database file.
        path: PathBuf,
        /// Cause reported by `SQLite`.
        #[source]
        source: rusqlite::Error,
    },

    /// A statement failed.
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The stored schema cannot be brought to the current version.
    #[error("schema: {0}")]
    Schema(String),

    /// A configuration source could not be read or parsed.
    #[error("cannot load configuration: {0}")]
    Config(Box<figment::Error>),

    /// Configuration values were read but are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Submitted person fields were rejected.
    #[error("invalid person: {0}")]
    InvalidPerson(ValidationErrors),

    /// No person has this id.
    #[error("no person with id {0}")]
    NotFound(PersonId),

    /// The parent directory of the database could not be created.
    #[error("cannot create {path}: {source}")]
    CreateDir {
        /// Directory that was being created.
        path: PathBuf,
        /// Cause reported by the file system.
        #[source]
        source: std::io::Error,
    },

    /// Any other file system failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Stored people could not be encoded or decoded.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::InvalidPerson(errors)
    }
}

impl Error {
    /// Shorthand for [`Error::InvalidConfig`].
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Whether the error is a rejected form submission.
    #[must_use]
    pub fn is_invalid_person(&self) -> bool {
        matches!(self, Self::InvalidPerson(_))
    }

    /// Whether the error reports an unknown id.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{Field, FieldError};

    #[test]
    fn test_invalid_config_message() {
        let err = Error::invalid_config("stats.top_jobs must be greater than 0");
        assert_eq!(
            err.to_string(),
            "invalid configuration: stats.top_jobs must be greater than 0"
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = Error::NotFound(PersonId::from("42"));
        assert_eq!(err.to_string(), "no person with id 42");
        assert!(err.is_not_found());
        assert!(!err.is_invalid_person());
    }

    #[test]
    fn test_invalid_person_lists_field_errors() {
        let err: Error =
            ValidationErrors::from(vec![FieldError::new(Field::Email, "email is required")])
                .into();
        assert!(err.is_invalid_person());
        assert_eq!(err.to_string(), "invalid person: email: email is required");
    }

    #[test]
    fn test_io_error_is_transparent() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.to_string(), "gone");
    }

    #[test]
    fn test_json_error_converts() {
        let err: Error = serde_json::from_str::<Vec<u8>>("[oops")
            .map_err(Error::from)
            .unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_sqlite_error_converts() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err: Error = conn.execute("SELECT * FROM missing", []).unwrap_err().into();
        assert!(matches!(err, Error::Sqlite(_)));
    }

    #[test]
    fn test_create_dir_names_path() {
        let err = Error::CreateDir {
            path: PathBuf::from("/root/forbidden"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "cannot create /root/forbidden: denied");
    }
}
