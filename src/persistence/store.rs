//! Storage abstraction for Event records.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Category, Event, EventId, EventRecord, EventSchema};
use crate::error::EventError;

/// Filter for listing events.
///
/// `category` uses the category index; `from`/`to` form an inclusive range
/// over `dateTime`. Results are ordered by `dateTime`, then `eventId`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventQuery {
    /// Only events in this category.
    pub category: Option<Category>,
    /// Only events at or after this instant.
    pub from: Option<DateTime<Utc>>,
    /// Only events at or before this instant.
    pub to: Option<DateTime<Utc>>,
}

impl EventQuery {
    /// Returns `true` if `record` passes every filter.
    #[must_use]
    pub fn matches(&self, record: &EventRecord) -> bool {
        self.category.is_none_or(|c| record.category() == c)
            && self.from.is_none_or(|from| record.date_time() >= from)
            && self.to.is_none_or(|to| record.date_time() <= to)
    }
}

/// Persistence boundary for the Event collection.
///
/// Implementations only ever receive validated [`EventRecord`]s. Each
/// single-record write is atomic; there are no multi-record transactions.
/// Stores own `createdAt`/`updatedAt`: `insert` sets both, every later
/// write refreshes `updatedAt` and keeps `createdAt`.
#[async_trait]
pub trait EventStore: Send + Sync + Debug {
    /// Registers the collection and its indexes. Must be idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Persistence`] if the backend rejects the
    /// definitions.
    async fn register_indexes(&self, schema: &EventSchema) -> Result<(), EventError>;

    /// Inserts a new record.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::DuplicateKey`] if the `eventId` is taken.
    async fn insert(&self, record: EventRecord) -> Result<Event, EventError>;

    /// Fetches a record by id.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::NotFound`] if no record has this id.
    async fn get(&self, event_id: &EventId) -> Result<Event, EventError>;

    /// Replaces the record stored under `event_id`. The new record may carry
    /// a different `eventId`.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::NotFound`] if `event_id` does not exist, or
    /// [`EventError::DuplicateKey`] if the new id belongs to another record.
    async fn replace(&self, event_id: &EventId, record: EventRecord) -> Result<Event, EventError>;

    /// Deletes a record, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::NotFound`] if no record has this id.
    async fn delete(&self, event_id: &EventId) -> Result<Event, EventError>;

    /// Lists records matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Persistence`] on backend failure.
    async fn list(&self, query: &EventQuery) -> Result<Vec<Event>, EventError>;

    /// Number of stored records.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Persistence`] on backend failure.
    async fn count(&self) -> Result<u64, EventError>;
}
