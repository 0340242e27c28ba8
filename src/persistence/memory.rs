//! In-process Event store with index maps.
//!
//! [`MemoryEventStore`] keeps the primary map and the secondary indexes
//! behind a single [`tokio::sync::RwLock`], so every write updates all of
//! them atomically. Reads run concurrently.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::ops::Bound;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::store::{EventQuery, EventStore};
use crate::domain::{Category, Event, EventId, EventRecord, EventSchema, IndexSpec};
use crate::error::EventError;

#[derive(Debug, Default)]
struct Inner {
    by_id: HashMap<EventId, Event>,
    by_category: HashMap<Category, HashSet<EventId>>,
    by_date: BTreeSet<(DateTime<Utc>, EventId)>,
    registered: Vec<IndexSpec>,
}

impl Inner {
    fn index(&mut self, event: &Event) {
        let id = event.event_id().clone();
        self.by_category
            .entry(event.record.category())
            .or_default()
            .insert(id.clone());
        self.by_date.insert((event.record.date_time(), id));
    }

    fn unindex(&mut self, event: &Event) {
        let id = event.event_id();
        if let Some(ids) = self.by_category.get_mut(&event.record.category()) {
            ids.remove(id);
        }
        self.by_date.remove(&(event.record.date_time(), id.clone()));
    }
}

/// Event store held entirely in memory.
///
/// # Concurrency
///
/// - Reads share the lock.
/// - Writes are serialized; each one is atomic across the primary map and
///   both indexes.
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    inner: RwLock<Inner>,
}

impl MemoryEventStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the indexes registered so far.
    pub async fn registered_indexes(&self) -> Vec<&'static str> {
        self.inner
            .read()
            .await
            .registered
            .iter()
            .map(|i| i.name)
            .collect()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn register_indexes(&self, schema: &EventSchema) -> Result<(), EventError> {
        let mut inner = self.inner.write().await;
        for spec in &schema.indexes {
            if !inner.registered.iter().any(|r| r.name == spec.name) {
                inner.registered.push(*spec);
            }
        }
        Ok(())
    }

    async fn insert(&self, record: EventRecord) -> Result<Event, EventError> {
        let mut inner = self.inner.write().await;
        if inner.by_id.contains_key(record.event_id()) {
            return Err(EventError::DuplicateKey {
                event_id: record.event_id().clone(),
            });
        }
        let now = Utc::now();
        let event = Event {
            record,
            created_at: now,
            updated_at: now,
        };
        inner.index(&event);
        inner.by_id.insert(event.event_id().clone(), event.clone());
        Ok(event)
    }

    async fn get(&self, event_id: &EventId) -> Result<Event, EventError> {
        self.inner
            .read()
            .await
            .by_id
            .get(event_id)
            .cloned()
            .ok_or_else(|| EventError::NotFound(event_id.clone()))
    }

    async fn replace(&self, event_id: &EventId, record: EventRecord) -> Result<Event, EventError> {
        let mut inner = self.inner.write().await;
        let renamed = record.event_id() != event_id;
        if renamed && inner.by_id.contains_key(record.event_id()) {
            return Err(EventError::DuplicateKey {
                event_id: record.event_id().clone(),
            });
        }
        let old = inner
            .by_id
            .remove(event_id)
            .ok_or_else(|| EventError::NotFound(event_id.clone()))?;
        inner.unindex(&old);

        // Never move backwards even if the clock does.
        let updated_at = Utc::now().max(old.updated_at);
        let event = Event {
            record,
            created_at: old.created_at,
            updated_at,
        };
        inner.index(&event);
        inner.by_id.insert(event.event_id().clone(), event.clone());
        Ok(event)
    }

    async fn delete(&self, event_id: &EventId) -> Result<Event, EventError> {
        let mut inner = self.inner.write().await;
        let event = inner
            .by_id
            .remove(event_id)
            .ok_or_else(|| EventError::NotFound(event_id.clone()))?;
        inner.unindex(&event);
        Ok(event)
    }

    async fn list(&self, query: &EventQuery) -> Result<Vec<Event>, EventError> {
        let inner = self.inner.read().await;
        let candidates: Option<&HashSet<EventId>> =
            query.category.and_then(|c| inner.by_category.get(&c));
        if query.category.is_some() && candidates.is_none() {
            return Ok(Vec::new());
        }

        // Scan the date index from `from` and stop past `to`; it yields the
        // required sort.
        let lower = match query.from {
            Some(from) => Bound::Included((from, EventId::MIN)),
            None => Bound::Unbounded,
        };
        let mut out = Vec::new();
        for (date, id) in inner
            .by_date
            .range::<(DateTime<Utc>, EventId), _>((lower, Bound::Unbounded)) {
            if query.to.is_some_and(|to| *date > to) {
                break;
            }
            if let Some(ids) = candidates
                && !ids.contains(id)
            {
                continue;
            }
            if let Some(event) = inner.by_id.get(id)
                && query.matches(&event.record)
            {
                out.push(event.clone());
            }
        }
        Ok(out)
    }

    async fn count(&self) -> Result<u64, EventError> {
        Ok(self.inner.read().await.by_id.len() as u64)
    }
}
