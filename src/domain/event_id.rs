//! Natural key of an Event record.
//!
//! [`EventId`] wraps the organiser-chosen identifier (e.g. `"sprint-1"`).
//! It is always stored trimmed and is never empty, so two ids that differ
//! only in surrounding whitespace collide.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use super::validation::{FieldError, FieldErrorKind, ValidationError};

/// Message reported when the id is missing or blank.
pub const EVENT_ID_REQUIRED: &str = "Event ID is required";

/// Unique, trimmed identifier of an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Sorts before every valid id. Only used as a lower range bound.
    pub(crate) const MIN: Self = Self(String::new());

    /// Parses and normalizes an event id.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] on the `eventId` field if the input is
    /// empty after trimming.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::single(FieldError::new(
                "eventId",
                FieldErrorKind::Required,
                EVENT_ID_REQUIRED,
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EventId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
