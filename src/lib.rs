//! # fest-events
//!
//! Event records for a college-fest service: the Event schema, its
//! validation rules, the indexes its collection declares and a one-time
//! persistence handle, exposed over a small REST API.
//!
//! Every write goes through [`domain::EventDraft::validate`] before it
//! reaches a store. A record that violates the schema is never persisted.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── EventService (service/)   one process-wide handle
//!     │
//!     ├── Event schema (domain/)    validation, indexes
//!     │
//!     └── EventStore (persistence/)
//!           ├── MemoryEventStore
//!           └── PgEventStore (PostgreSQL)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
