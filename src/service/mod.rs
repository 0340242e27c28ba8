//! Service layer: the Event collection handle.
//!
//! [`EventService`] validates every write against the Event schema and
//! delegates storage to an [`crate::persistence::EventStore`].

pub mod event_service;

pub use event_service::EventService;
