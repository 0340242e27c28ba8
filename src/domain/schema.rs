//! Declarative description of the Event collection.
//!
//! [`EventSchema`] names the collection and the indexes a store must
//! maintain for it. It is built once per process and shared by reference.

use std::sync::OnceLock;

use serde::Serialize;

/// How an index is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    /// Unique lookup key; duplicate values are rejected.
    Unique,
    /// Non-unique equality lookups.
    Equality,
    /// Ordered range scans and sorting.
    Range,
}

/// One secondary index over a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexSpec {
    /// Index name as registered with the store.
    pub name: &'static str,
    /// Document field the index covers.
    pub field: &'static str,
    /// Storage column backing the field.
    pub column: &'static str,
    /// Lookup semantics.
    pub kind: IndexKind,
}

/// Shape of the Event collection as seen by a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventSchema {
    /// Collection (table) name.
    pub collection: &'static str,
    /// Indexes to register at initialisation.
    pub indexes: Vec<IndexSpec>,
}

static SCHEMA: OnceLock<EventSchema> = OnceLock::new();

impl EventSchema {
    /// Returns the process-wide schema, building it on first use.
    #[must_use]
    pub fn get() -> &'static Self {
        SCHEMA.get_or_init(|| Self {
            collection: "events",
            indexes: vec![
                IndexSpec {
                    name: "events_event_id_key",
                    field: "eventId",
                    column: "event_id",
                    kind: IndexKind::Unique,
                },
                IndexSpec {
                    name: "events_category_idx",
                    field: "category",
                    column: "category",
                    kind: IndexKind::Equality,
                },
                IndexSpec {
                    name: "events_date_time_idx",
                    field: "dateTime",
                    column: "date_time",
                    kind: IndexKind::Range,
                },
            ],
        })
    }

    /// Looks up the index covering `field`.
    #[must_use]
    pub fn index_for(&self, field: &str) -> Option<&IndexSpec> {
        self.indexes.iter().find(|i| i.field == field)
    }
}
