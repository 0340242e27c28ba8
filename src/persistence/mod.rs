//! Persistence layer: the Event store trait and its backends.
//!
//! Provides the [`EventStore`] trait for durable storage of validated
//! Event records, an in-memory backend for development and tests, and a
//! PostgreSQL backend using `sqlx::PgPool`.

pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use memory::MemoryEventStore;
pub use postgres::PgEventStore;
pub use store::{EventQuery, EventStore};
