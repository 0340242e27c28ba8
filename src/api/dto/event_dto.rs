//! Event DTOs for list queries and responses.
//!
//! Create and update bodies use [`crate::domain::EventDraft`] directly and
//! single-event responses use [`crate::domain::Event`]; both already carry
//! the camelCase document shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::{PaginationMeta, default_page, default_per_page};
use crate::domain::{Category, Event};
use crate::error::EventError;
use crate::persistence::EventQuery;

/// Query parameters for `GET /events`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListEventsParams {
    /// Only events in this category.
    #[serde(default)]
    pub category: Option<String>,
    /// Only events at or after this instant (RFC 3339).
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    /// Only events at or before this instant (RFC 3339).
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (max 100). Defaults to 20.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl ListEventsParams {
    /// Converts the filters into a store query.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::InvalidQuery`] on an unknown category or when
    /// `from` is after `to`.
    pub fn to_query(&self) -> Result<EventQuery, EventError> {
        let category = self
            .category
            .as_deref()
            .map(str::parse::<Category>)
            .transpose()
            .map_err(|e| EventError::InvalidQuery(e.to_string()))?;
        if let (Some(from), Some(to)) = (self.from, self.to)
            && from > to
        {
            return Err(EventError::InvalidQuery(
                "`from` must not be after `to`".to_string(),
            ));
        }
        Ok(EventQuery {
            category,
            from: self.from,
            to: self.to,
        })
    }
}

/// Paginated list response for `GET /events`.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventListResponse {
    /// Events on this page, ordered by date.
    pub data: Vec<Event>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
