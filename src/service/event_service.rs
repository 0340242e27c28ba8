//! Event service: validates writes and forwards them to the store.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::domain::{DraftDocument, Event, EventDraft, EventId, EventSchema};
use crate::error::EventError;
use crate::persistence::{EventQuery, EventStore};

static HANDLE: OnceCell<Arc<EventService>> = OnceCell::const_new();

/// Handle for create/read/update/delete against the Event collection.
///
/// Every write is validated synchronously before the store is touched, so
/// a rejected write never leaves a partial record behind.
#[derive(Debug, Clone)]
pub struct EventService {
    store: Arc<dyn EventStore>,
}

impl EventService {
    /// Wraps a store whose indexes are already registered.
    #[must_use]
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Registers the Event schema's indexes with `store` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Persistence`] if index registration fails.
    pub async fn initialize(store: Arc<dyn EventStore>) -> Result<Self, EventError> {
        let schema = EventSchema::get();
        store.register_indexes(schema).await?;
        tracing::info!(
            collection = schema.collection,
            indexes = schema.indexes.len(),
            "event schema registered"
        );
        Ok(Self::new(store))
    }

    /// Returns the process-wide handle, initializing it on first use.
    ///
    /// Only the first successful call runs `init` and registers indexes.
    /// Later calls return the same handle and never register again, so
    /// repeated initialization is harmless. A failed initialization is not
    /// cached; the next call retries.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `init` or by index registration.
    pub async fn handle<F, Fut>(init: F) -> Result<Arc<Self>, EventError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<dyn EventStore>, EventError>>,
    {
        HANDLE
            .get_or_try_init(|| async move {
                let store = init().await?;
                let service = Self::initialize(store).await?;
                Ok::<_, EventError>(Arc::new(service))
            })
            .await
            .map(Arc::clone)
    }

    /// Validates and inserts a new event.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Validation`] if the draft violates the schema,
    /// or [`EventError::DuplicateKey`] if the id is taken.
    pub async fn create(&self, draft: impl Into<DraftDocument>) -> Result<Event, EventError> {
        let record = draft.into().validate()?;
        match self.store.insert(record).await {
            Ok(event) => {
                tracing::info!(
                    event_id = %event.event_id(),
                    category = %event.record.category(),
                    "event created"
                );
                Ok(event)
            }
            Err(e @ EventError::DuplicateKey { .. }) => {
                tracing::warn!(error = %e, "event create rejected");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Fetches an event by id.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::NotFound`] if no event has this id.
    pub async fn get(&self, event_id: &EventId) -> Result<Event, EventError> {
        self.store.get(event_id).await
    }

    /// Applies a partial update and re-validates the whole record.
    ///
    /// Fields present in `patch` replace the stored values; the merged
    /// record must satisfy the full schema. `createdAt` is kept.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::NotFound`], [`EventError::Validation`], or
    /// [`EventError::DuplicateKey`] when the patch renames onto a taken id.
    pub async fn update(
        &self,
        event_id: &EventId,
        patch: impl Into<DraftDocument>,
    ) -> Result<Event, EventError> {
        let DraftDocument { draft, type_errors } = patch.into();
        let current = self.store.get(event_id).await?;
        let merged = DraftDocument {
            draft: EventDraft::from(&current.record).merge(draft),
            type_errors,
        };
        let record = merged.validate()?;
        let event = self.store.replace(event_id, record).await?;
        tracing::info!(
            event_id = %event.event_id(),
            previous_id = %event_id,
            "event updated"
        );
        Ok(event)
    }

    /// Deletes an event, returning the removed record.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::NotFound`] if no event has this id.
    pub async fn delete(&self, event_id: &EventId) -> Result<Event, EventError> {
        let event = self.store.delete(event_id).await?;
        tracing::info!(%event_id, "event deleted");
        Ok(event)
    }

    /// Lists events matching `query`, ordered by date.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Persistence`] on store failure.
    pub async fn list(&self, query: &EventQuery) -> Result<Vec<Event>, EventError> {
        self.store.list(query).await
    }

    /// Number of stored events.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Persistence`] on store failure.
    pub async fn count(&self) -> Result<u64, EventError> {
        self.store.count().await
    }
}
