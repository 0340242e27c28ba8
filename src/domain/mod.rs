//! Domain layer: the Event record and its validation rules.
//!
//! This module contains the Event entity, the closed category set, the
//! embedded map coordinates value object, field-level validation errors
//! and the declarative collection schema used by stores.

pub mod category;
pub mod coordinates;
pub mod document;
pub mod event;
pub mod event_id;
pub mod schema;
pub mod validation;

pub use category::Category;
pub use coordinates::{CoordinatesDraft, MapCoordinates};
pub use document::DraftDocument;
pub use event::{Event, EventDraft, EventRecord};
pub use event_id::EventId;
pub use schema::{EventSchema, IndexKind, IndexSpec};
pub use validation::{FieldError, FieldErrorKind, ValidationError};
