//! Field validation for submitted person data.
//!
//! The directory itself accepts any strings; these rules are applied by the
//! entry points (the CLI) before records are added or edited. Failures are
//! returned per field so callers can report each one next to its input.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::person::{NewPerson, PersonUpdate};

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-ZÀ-ÿ\s'-]+$").expect("valid name regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Minimum length of names and jobs, in characters.
pub const MIN_TEXT_LEN: usize = 2;
/// Maximum length of a name.
pub const MAX_NAME_LEN: usize = 50;
/// Maximum length of a job.
pub const MAX_JOB_LEN: usize = 100;
/// Maximum length of an email address.
pub const MAX_EMAIL_LEN: usize = 100;

/// A validated input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// The display name.
    Name,
    /// The job title.
    Job,
    /// The email address.
    Email,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Job => write!(f, "job"),
            Self::Email => write!(f, "email"),
        }
    }
}

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field that failed.
    pub field: Field,
    /// Human-readable reason.
    pub message: String,
}

impl FieldError {
    /// Create a field error.
    #[must_use]
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All field errors found in one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// The individual field errors.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Error for the given field, if it failed.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    /// Check whether no rule failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, error: Option<FieldError>) {
        if let Some(error) = error {
            self.errors.push(error);
        }
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Check one field value against its rules.
#[must_use]
pub fn validate_field(field: Field, value: &str) -> Option<FieldError> {
    let value = value.trim();
    let len = value.chars().count();
    let fail = |message: String| Some(FieldError::new(field, message));

    match field {
        Field::Name => {
            if value.is_empty() {
                fail("name is required".to_string())
            } else if len < MIN_TEXT_LEN {
                fail(format!("name must be at least {MIN_TEXT_LEN} characters"))
            } else if len > MAX_NAME_LEN {
                fail(format!("name cannot exceed {MAX_NAME_LEN} characters"))
            } else if !NAME_RE.is_match(value) {
                fail("name may only contain letters, spaces, apostrophes and hyphens".to_string())
            } else {
                None
            }
        }
        Field::Job => {
            if value.is_empty() {
                fail("job is required".to_string())
            } else if len < MIN_TEXT_LEN {
                fail(format!("job must be at least {MIN_TEXT_LEN} characters"))
            } else if len > MAX_JOB_LEN {
                fail(format!("job cannot exceed {MAX_JOB_LEN} characters"))
            } else {
                None
            }
        }
        Field::Email => {
            if value.is_empty() {
                fail("email is required".to_string())
            } else if !EMAIL_RE.is_match(value) {
                fail("email address is not valid".to_string())
            } else if len > MAX_EMAIL_LEN {
                fail(format!("email cannot exceed {MAX_EMAIL_LEN} characters"))
            } else {
                None
            }
        }
    }
}

/// Validate every field of an add payload.
///
/// # Errors
///
/// Returns every failing field.
pub fn validate_new_person(person: &NewPerson) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    errors.push(validate_field(Field::Name, &person.name));
    errors.push(validate_field(Field::Job, &person.job));
    errors.push(validate_field(Field::Email, &person.email));
    errors.into_result()
}

/// Validate the fields present in an update payload.
///
/// # Errors
///
/// Returns every failing field among those provided.
pub fn validate_update(update: &PersonUpdate) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if let Some(name) = &update.name {
        errors.push(validate_field(Field::Name, name));
    }
    if let Some(job) = &update.job {
        errors.push(validate_field(Field::Job, job));
    }
    if let Some(email) = &update.email {
        errors.push(validate_field(Field::Email, email));
    }
    errors.into_result()
}
