//! Closed set of event categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{FieldError, FieldErrorKind, ValidationError};

/// Message reported when a category outside the closed set is submitted.
pub const CATEGORY_ENUM_MESSAGE: &str = "Category must be either technical, cultural, or convenor";

/// Category an event is published under.
///
/// Serialized as the lowercase variant name. No other value is accepted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Technical events (hackathons, coding contests, workshops).
    Technical,
    /// Cultural events (music, dance, drama).
    Cultural,
    /// Events run by the convenor body.
    Convenor,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Self; 3] = [Self::Technical, Self::Cultural, Self::Convenor];

    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Cultural => "cultural",
            Self::Convenor => "convenor",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    /// Parses the exact lowercase form. Matching is case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "technical" => Ok(Self::Technical),
            "cultural" => Ok(Self::Cultural),
            "convenor" => Ok(Self::Convenor),
            _ => Err(ValidationError::single(FieldError::new(
                "category",
                FieldErrorKind::InvalidEnum,
                CATEGORY_ENUM_MESSAGE,
            ))),
        }
    }
}
