//! Reading an [`EventDraft`] out of a raw JSON document.
//!
//! Serde rejects a whole body when any one field has the wrong JSON type.
//! [`DraftDocument`] reads field by field instead: a mistyped field is left
//! out of the draft and recorded as an `InvalidType` failure, so it is
//! reported next to the presence, enum and range failures of the rest of
//! the record.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::coordinates::CoordinatesDraft;
use super::event::{EventDraft, EventRecord};
use super::validation::{FieldError, FieldErrorKind, ValidationError};

/// Document paths in schema declaration order.
const FIELD_ORDER: [&str; 16] = [
    "eventId",
    "category",
    "societyName",
    "eventName",
    "regFees",
    "dateTime",
    "location",
    "briefDescription",
    "pdfLink",
    "image",
    "mapCoordinates",
    "mapCoordinates.latitude",
    "mapCoordinates.longitude",
    "contactInfo",
    "team",
    "teamLimit",
];

/// A draft read from a JSON object, plus the fields whose JSON type was
/// wrong.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftDocument {
    /// Every correctly typed field. Mistyped fields are `None`.
    pub draft: EventDraft,
    /// One `InvalidType` failure per mistyped field.
    pub type_errors: Vec<FieldError>,
}

impl DraftDocument {
    /// Reads every known field of `doc`. Unknown keys are ignored and
    /// `null` counts as absent.
    #[must_use]
    pub fn from_map(doc: &Map<String, Value>) -> Self {
        let mut reader = Reader::default();
        let draft = EventDraft {
            event_id: reader.string(doc, "eventId", "Event ID"),
            category: reader.string(doc, "category", "Category"),
            society_name: reader.string(doc, "societyName", "Society name"),
            event_name: reader.string(doc, "eventName", "Event name"),
            reg_fees: reader.number(doc, "regFees", "regFees", "Registration fees"),
            date_time: reader.date_time(doc, "dateTime"),
            location: reader.string(doc, "location", "Location"),
            brief_description: reader.string(doc, "briefDescription", "Brief description"),
            pdf_link: reader.string(doc, "pdfLink", "PDF link"),
            image: reader.string(doc, "image", "Image"),
            map_coordinates: reader.coordinates(doc),
            contact_info: reader.string(doc, "contactInfo", "Contact info"),
            team: reader.integer(doc, "team", "Team count"),
            team_limit: reader.integer(doc, "teamLimit", "Team limit"),
        };
        Self {
            draft,
            type_errors: reader.errors,
        }
    }

    /// Returns `true` if every present field had the expected JSON type.
    #[must_use]
    pub fn is_well_typed(&self) -> bool {
        self.type_errors.is_empty()
    }

    /// Validates the draft and reports type failures together with the
    /// schema failures.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every failing field in
    /// declaration order. A mistyped field is reported once, as
    /// `InvalidType`.
    pub fn validate(self) -> Result<EventRecord, ValidationError> {
        let Self { draft, type_errors } = self;
        match draft.validate() {
            Ok(record) if type_errors.is_empty() => Ok(record),
            Ok(_) => Err(merge_errors(type_errors, Vec::new())),
            Err(e) => Err(merge_errors(type_errors, e.errors)),
        }
    }
}

impl From<EventDraft> for DraftDocument {
    fn from(draft: EventDraft) -> Self {
        Self {
            draft,
            type_errors: Vec::new(),
        }
    }
}

/// Drops schema failures on fields that already failed their type check,
/// then orders everything by declaration.
fn merge_errors(
    type_errors: Vec<FieldError>,
    schema_errors: Vec<FieldError>,
) -> ValidationError {
    let shadowed = |field: &str| {
        type_errors.iter().any(|t| {
            field == t.field
                || field
                    .strip_prefix(t.field.as_str())
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    };
    let kept: Vec<FieldError> = schema_errors
        .into_iter()
        .filter(|e| !shadowed(&e.field))
        .collect();

    let mut errors = type_errors;
    errors.extend(kept);
    errors.sort_by_key(|e| position(&e.field));
    ValidationError { errors }
}

fn position(field: &str) -> usize {
    FIELD_ORDER
        .iter()
        .position(|f| *f == field)
        .unwrap_or(FIELD_ORDER.len())
}

#[derive(Debug, Default)]
struct Reader {
    errors: Vec<FieldError>,
}

impl Reader {
    fn mistyped(&mut self, path: &str, message: String) {
        self.errors
            .push(FieldError::new(path, FieldErrorKind::InvalidType, message));
    }

    fn string(&mut self, doc: &Map<String, Value>, key: &str, label: &str) -> Option<String> {
        match doc.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            _ => {
                self.mistyped(key, format!("{label} must be a string"));
                None
            }
        }
    }

    /// Integers and floats are both accepted.
    fn number(
        &mut self,
        doc: &Map<String, Value>,
        key: &str,
        path: &str,
        label: &str,
    ) -> Option<f64> {
        match doc.get(key)? {
            Value::Null => None,
            Value::Number(n) => n.as_f64(),
            _ => {
                self.mistyped(path, format!("{label} must be a number"));
                None
            }
        }
    }

    /// Floats are rejected even when they have no fractional part.
    fn integer(&mut self, doc: &Map<String, Value>, key: &str, label: &str) -> Option<i64> {
        match doc.get(key)? {
            Value::Null => None,
            Value::Number(n) if n.is_i64() => n.as_i64(),
            _ => {
                self.mistyped(key, format!("{label} must be an integer"));
                None
            }
        }
    }

    /// RFC 3339 strings, or integer milliseconds since the Unix epoch.
    fn date_time(&mut self, doc: &Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
        let parsed = match doc.get(key)? {
            Value::Null => return None,
            Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
                .ok()
                .map(|d| d.with_timezone(&Utc)),
            Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
            _ => None,
        };
        if parsed.is_none() {
            self.mistyped(key, "Date and time must be a valid date".to_string());
        }
        parsed
    }

    fn coordinates(&mut self, doc: &Map<String, Value>) -> Option<CoordinatesDraft> {
        match doc.get("mapCoordinates")? {
            Value::Null => None,
            Value::Object(point) => Some(CoordinatesDraft {
                latitude: self.number(point, "latitude", "mapCoordinates.latitude", "Latitude"),
                longitude: self.number(
                    point,
                    "longitude",
                    "mapCoordinates.longitude",
                    "Longitude",
                ),
            }),
            _ => {
                self.mistyped(
                    "mapCoordinates",
                    "Map coordinates must be an object".to_string(),
                );
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::fixtures::sample_draft;

    fn document(value: Value) -> Map<String, Value> {
        let Value::Object(map) = value else {
            panic!("test documents are objects");
        };
        map
    }

    fn sample_with(key: &str, value: Value) -> Map<String, Value> {
        let Ok(Value::Object(mut map)) = serde_json::to_value(sample_draft("sprint-1")) else {
            panic!("fixture serializes to an object");
        };
        map.insert(key.to_string(), value);
        map
    }

    fn failures(doc: &Map<String, Value>) -> Vec<(String, FieldErrorKind)> {
        let Err(err) = DraftDocument::from_map(doc).validate() else {
            panic!("document must be rejected");
        };
        err.errors.into_iter().map(|e| (e.field, e.kind)).collect()
    }

    #[test]
    fn well_typed_document_matches_serde() {
        let doc = sample_with("team", json!(3));
        let parsed = DraftDocument::from_map(&doc);
        assert!(parsed.is_well_typed());

        let Ok(expected) = serde_json::from_value::<EventDraft>(Value::Object(doc)) else {
            panic!("serde accepts the same document");
        };
        assert_eq!(parsed.draft, expected);
    }

    #[test]
    fn each_mistyped_field_is_named() {
        let cases = [
            ("regFees", json!("free"), "regFees"),
            ("teamLimit", json!(2.5), "teamLimit"),
            ("category", json!(5), "category"),
            ("dateTime", json!("14 March"), "dateTime"),
            ("mapCoordinates", json!({ "latitude": "north", "longitude": 0.0 }), "mapCoordinates.latitude"),
            ("mapCoordinates", json!([1, 2]), "mapCoordinates"),
            ("image", json!(true), "image"),
        ];
        for (key, value, path) in cases {
            assert_eq!(
                failures(&sample_with(key, value)),
                vec![(path.to_string(), FieldErrorKind::InvalidType)],
                "{key}"
            );
        }
    }

    #[test]
    fn type_failures_are_reported_with_schema_failures() {
        let mut doc = sample_with("regFees", json!("free"));
        doc.insert("category".to_string(), json!("sports"));
        doc.insert("teamLimit".to_string(), json!(-1));
        doc.remove("location");

        assert_eq!(
            failures(&doc),
            vec![
                ("category".to_string(), FieldErrorKind::InvalidEnum),
                ("regFees".to_string(), FieldErrorKind::InvalidType),
                ("location".to_string(), FieldErrorKind::Required),
                ("teamLimit".to_string(), FieldErrorKind::Negative),
            ]
        );
    }

    #[test]
    fn mistyped_latitude_does_not_hide_missing_longitude() {
        let doc = sample_with("mapCoordinates", json!({ "latitude": "north" }));
        assert_eq!(
            failures(&doc),
            vec![
                (
                    "mapCoordinates.latitude".to_string(),
                    FieldErrorKind::InvalidType
                ),
                (
                    "mapCoordinates.longitude".to_string(),
                    FieldErrorKind::Required
                ),
            ]
        );
    }

    #[test]
    fn null_counts_as_absent() {
        let parsed = DraftDocument::from_map(&document(json!({
            "eventId": null,
            "mapCoordinates": null,
            "team": null
        })));
        assert!(parsed.is_well_typed());
        assert_eq!(parsed.draft, EventDraft::default());
    }

    #[test]
    fn date_accepts_epoch_millis() {
        let parsed = DraftDocument::from_map(&document(json!({ "dateTime": 0 })));
        assert!(parsed.is_well_typed());
        assert_eq!(parsed.draft.date_time, DateTime::from_timestamp_millis(0));
    }

    #[test]
    fn message_uses_field_label() {
        let parsed = DraftDocument::from_map(&document(json!({ "regFees": "free" })));
        assert_eq!(
            parsed.type_errors.first().map(|e| e.message.as_str()),
            Some("Registration fees must be a number")
        );
    }
}
