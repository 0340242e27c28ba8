//! Database row model for the `events` table.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::{CoordinatesDraft, Event, EventDraft};
use crate::error::EventError;

/// Column list selected and returned by every statement.
pub const EVENT_COLUMNS: &str = "event_id, category, society_name, event_name, reg_fees, \
     date_time, location, brief_description, pdf_link, image, latitude, longitude, \
     contact_info, team, team_limit, created_at, updated_at";

/// A stored row from the `events` table.
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    /// Natural key.
    pub event_id: String,
    /// Category string.
    pub category: String,
    /// Organising society.
    pub society_name: String,
    /// Event name.
    pub event_name: String,
    /// Registration fee.
    pub reg_fees: f64,
    /// Scheduled date and time.
    pub date_time: DateTime<Utc>,
    /// Venue.
    pub location: String,
    /// Brief description.
    pub brief_description: String,
    /// PDF link.
    pub pdf_link: String,
    /// Poster image text.
    pub image: String,
    /// Latitude, set together with `longitude`.
    pub latitude: Option<f64>,
    /// Longitude, set together with `latitude`.
    pub longitude: Option<f64>,
    /// Contact info.
    pub contact_info: String,
    /// Registered team count.
    pub team: i64,
    /// Team capacity.
    pub team_limit: i64,
    /// Insert timestamp.
    pub created_at: DateTime<Utc>,
    /// Last write timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = EventError;

    /// Rebuilds the domain event, re-checking the row against the schema.
    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let event_id = row.event_id.clone();
        let map_coordinates = match (row.latitude, row.longitude) {
            (None, None) => None,
            (latitude, longitude) => Some(CoordinatesDraft {
                latitude,
                longitude,
            }),
        };
        let draft = EventDraft {
            event_id: Some(row.event_id),
            category: Some(row.category),
            society_name: Some(row.society_name),
            event_name: Some(row.event_name),
            reg_fees: Some(row.reg_fees),
            date_time: Some(row.date_time),
            location: Some(row.location),
            brief_description: Some(row.brief_description),
            pdf_link: Some(row.pdf_link),
            image: Some(row.image),
            map_coordinates,
            contact_info: Some(row.contact_info),
            team: Some(row.team),
            team_limit: Some(row.team_limit),
        };
        let record = draft.validate().map_err(|e| {
            EventError::Persistence(format!("stored event {event_id} violates schema: {e}"))
        })?;
        Ok(Self {
            record,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Category;

    fn row() -> EventRow {
        let now = Utc::now();
        EventRow {
            event_id: "sprint-1".to_string(),
            category: "cultural".to_string(),
            society_name: "Dance Society".to_string(),
            event_name: "Nritya".to_string(),
            reg_fees: 0.0,
            date_time: now,
            location: "Open Air Theatre".to_string(),
            brief_description: "Group dance".to_string(),
            pdf_link: "https://fest.example/nritya.pdf".to_string(),
            image: "aW1n".to_string(),
            latitude: Some(28.54),
            longitude: Some(77.19),
            contact_info: "dance@fest.example".to_string(),
            team: 4,
            team_limit: 12,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn converts_valid_row() {
        let Ok(event) = Event::try_from(row()) else {
            panic!("valid row");
        };
        assert_eq!(event.record.category(), Category::Cultural);
        assert_eq!(event.record.team(), 4);
        assert_eq!(
            event.record.map_coordinates().map(|c| c.latitude()),
            Some(28.54)
        );
    }

    #[test]
    fn row_without_coordinates() {
        let mut r = row();
        r.latitude = None;
        r.longitude = None;
        let Ok(event) = Event::try_from(r) else {
            panic!("valid row");
        };
        assert!(event.record.map_coordinates().is_none());
    }

    #[test]
    fn corrupt_row_is_a_persistence_error() {
        let mut r = row();
        r.category = "sports".to_string();
        assert!(matches!(
            Event::try_from(r),
            Err(EventError::Persistence(_))
        ));

        let mut r = row();
        r.longitude = None;
        assert!(matches!(
            Event::try_from(r),
            Err(EventError::Persistence(_))
        ));
    }
}
