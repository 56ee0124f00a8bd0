//! Core record types for annuaire.
//!
//! This module defines the `Person` record held by the directory together
//! with the payloads used to create and update it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Opaque, unique identifier of a person.
///
/// New records receive a UUID v4. Older persisted blobs stored numeric ids,
/// so numbers are accepted on input and kept in their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PersonId(String);

impl PersonId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PersonId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PersonId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for PersonId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(number) => Self(number.to_string()),
        })
    }
}

/// One entry of the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Unique identifier, assigned at creation.
    pub id: PersonId,

    /// Display name.
    pub name: String,

    /// Free-text role.
    pub job: String,

    /// Contact address, expected to look like `local@domain.tld`.
    pub email: String,

    /// When the record was added. Never changes after creation.
    ///
    /// Older stored records may lack it; they count as added at an unknown
    /// time and never fall in a date window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<DateTime<Utc>>,
}

impl Person {
    /// Create a new record with a fresh id, stamped with the current time.
    #[must_use]
    pub fn new(fields: NewPerson) -> Self {
        Self::with_id(PersonId::generate(), fields, Utc::now())
    }

    /// Create a record with an explicit id and creation time.
    #[must_use]
    pub fn with_id(id: PersonId, fields: NewPerson, date_added: DateTime<Utc>) -> Self {
        Self {
            id,
            name: fields.name,
            job: fields.job,
            email: fields.email,
            date_added: Some(date_added),
        }
    }

    /// Merge the fields present in `update` into this record.
    ///
    /// Fields absent from the update are left untouched; `id` and
    /// `date_added` cannot be changed.
    pub fn apply(&mut self, update: PersonUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(job) = update.job {
            self.job = job;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
    }

    /// The job lower-cased and trimmed, as used for grouping.
    #[must_use]
    pub fn normalized_job(&self) -> String {
        self.job.trim().to_lowercase()
    }

    /// The part of the email after the first `@`, if any.
    #[must_use]
    pub fn email_domain(&self) -> Option<&str> {
        self.email
            .split('@')
            .nth(1)
            .filter(|domain| !domain.is_empty())
    }
}

/// Fields submitted when adding a person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
    /// Display name.
    pub name: String,
    /// Role.
    pub job: String,
    /// Contact address.
    pub email: String,
}

impl NewPerson {
    /// Build an add payload.
    #[must_use]
    pub fn new(name: impl Into<String>, job: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            job: job.into(),
            email: email.into(),
        }
    }

    /// Copy of this payload with surrounding whitespace removed.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            job: self.job.trim().to_string(),
            email: self.email.trim().to_string(),
        }
    }
}

/// Partial set of fields merged into an existing person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonUpdate {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    /// New contact address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl PersonUpdate {
    /// Check whether the update carries no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.job.is_none() && self.email.is_none()
    }

    /// Copy of this update with surrounding whitespace removed.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let trim = |value: &Option<String>| value.as_deref().map(|v| v.trim().to_string());
        Self {
            name: trim(&self.name),
            job: trim(&self.job),
            email: trim(&self.email),
        }
    }
}
