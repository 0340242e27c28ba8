//! The Event record: untrusted draft, validated record, persisted event.
//!
//! Writes flow `EventDraft` → [`EventDraft::validate`] → [`EventRecord`]
//! → store → [`Event`]. Only a validated record can reach a store, so
//! every stored event satisfies the schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::category::{CATEGORY_ENUM_MESSAGE, Category};
use super::coordinates::{CoordinatesDraft, MapCoordinates};
use super::event_id::{EVENT_ID_REQUIRED, EventId};
use super::validation::{Collector, FieldError, FieldErrorKind, ValidationError};

/// An event as submitted by a client, before any checks.
///
/// Every field is optional so that a missing field surfaces as a
/// field-level validation message rather than a parse failure. The same
/// shape doubles as a partial update, see [`EventDraft::merge`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    /// Natural key, e.g. `"sprint-1"`.
    #[serde(default)]
    pub event_id: Option<String>,
    /// One of `technical`, `cultural`, `convenor`.
    #[serde(default)]
    pub category: Option<String>,
    /// Organising society.
    #[serde(default)]
    pub society_name: Option<String>,
    /// Display name of the event.
    #[serde(default)]
    pub event_name: Option<String>,
    /// Registration fee.
    #[serde(default)]
    pub reg_fees: Option<f64>,
    /// When the event takes place (RFC 3339).
    #[serde(default)]
    pub date_time: Option<DateTime<Utc>>,
    /// Venue.
    #[serde(default)]
    pub location: Option<String>,
    /// Short description shown in listings.
    #[serde(default)]
    pub brief_description: Option<String>,
    /// Link to the event's PDF brochure or rulebook.
    #[serde(default)]
    pub pdf_link: Option<String>,
    /// Poster image as URL-safe base64 text.
    #[serde(default)]
    pub image: Option<String>,
    /// Optional venue coordinates.
    #[serde(default)]
    pub map_coordinates: Option<CoordinatesDraft>,
    /// Contact details of the organisers.
    #[serde(default)]
    pub contact_info: Option<String>,
    /// Registered team count. Defaults to 0.
    #[serde(default)]
    pub team: Option<i64>,
    /// Team capacity.
    #[serde(default)]
    pub team_limit: Option<i64>,
}

impl EventDraft {
    /// Overlays `patch` on this draft: every field present in the patch
    /// replaces the current value, absent fields are kept.
    #[must_use]
    pub fn merge(self, patch: Self) -> Self {
        Self {
            event_id: patch.event_id.or(self.event_id),
            category: patch.category.or(self.category),
            society_name: patch.society_name.or(self.society_name),
            event_name: patch.event_name.or(self.event_name),
            reg_fees: patch.reg_fees.or(self.reg_fees),
            date_time: patch.date_time.or(self.date_time),
            location: patch.location.or(self.location),
            brief_description: patch.brief_description.or(self.brief_description),
            pdf_link: patch.pdf_link.or(self.pdf_link),
            image: patch.image.or(self.image),
            map_coordinates: patch.map_coordinates.or(self.map_coordinates),
            contact_info: patch.contact_info.or(self.contact_info),
            team: patch.team.or(self.team),
            team_limit: patch.team_limit.or(self.team_limit),
        }
    }

    /// Normalizes and checks the draft against the Event schema.
    ///
    /// Strings other than `image` are trimmed first; a required string that
    /// is blank after trimming counts as missing. `team` defaults to 0.
    /// `team <= teamLimit` is not checked.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every failing field, in
    /// declaration order.
    pub fn validate(self) -> Result<EventRecord, ValidationError> {
        let mut errors = Collector::default();

        let event_id = errors.required_trimmed("eventId", self.event_id, EVENT_ID_REQUIRED);
        let category = match self.category {
            None => {
                errors.push(FieldError::new(
                    "category",
                    FieldErrorKind::Required,
                    "Category is required",
                ));
                None
            }
            Some(raw) => match raw.parse::<Category>() {
                Ok(c) => Some(c),
                Err(_) => {
                    errors.push(FieldError::new(
                        "category",
                        FieldErrorKind::InvalidEnum,
                        CATEGORY_ENUM_MESSAGE,
                    ));
                    None
                }
            },
        };
        let society_name =
            errors.required_trimmed("societyName", self.society_name, "Society name is required");
        let event_name =
            errors.required_trimmed("eventName", self.event_name, "Event name is required");
        let reg_fees = errors.non_negative_f64(
            "regFees",
            self.reg_fees,
            "Registration fees is required",
            "Registration fees cannot be negative",
            "Registration fees must be a finite number",
        );
        let date_time = self.date_time;
        if date_time.is_none() {
            errors.push(FieldError::new(
                "dateTime",
                FieldErrorKind::Required,
                "Date and time is required",
            ));
        }
        let location = errors.required_trimmed("location", self.location, "Location is required");
        let brief_description = errors.required_trimmed(
            "briefDescription",
            self.brief_description,
            "Brief description is required",
        );
        let pdf_link = errors.required_trimmed("pdfLink", self.pdf_link, "PDF link is required");
        let image = errors.required_raw("image", self.image, "Image is required");
        let map_coordinates = match self.map_coordinates.map(CoordinatesDraft::validate) {
            None => None,
            Some(Ok(point)) => Some(point),
            Some(Err(e)) => {
                errors.extend(e);
                None
            }
        };
        let contact_info =
            errors.required_trimmed("contactInfo", self.contact_info, "Contact info is required");
        let team = errors.non_negative_i64(
            "team",
            Some(self.team.unwrap_or(0)),
            "Team count is required",
            "Team count cannot be negative",
        );
        let team_limit = errors.non_negative_i64(
            "teamLimit",
            self.team_limit,
            "Team limit is required",
            "Team limit cannot be negative",
        );

        // Every `None` below pushed a field error.
        let (
            Some(event_id),
            Some(category),
            Some(society_name),
            Some(event_name),
            Some(reg_fees),
            Some(date_time),
            Some(location),
            Some(brief_description),
            Some(pdf_link),
            Some(image),
            Some(contact_info),
            Some(team),
            Some(team_limit),
        ) = (
            event_id,
            category,
            society_name,
            event_name,
            reg_fees,
            date_time,
            location,
            brief_description,
            pdf_link,
            image,
            contact_info,
            team,
            team_limit,
        )
        else {
            return Err(errors.into_error());
        };
        errors.finish()?;

        Ok(EventRecord {
            event_id: EventId::parse(&event_id)?,
            category,
            society_name,
            event_name,
            reg_fees,
            date_time,
            location,
            brief_description,
            pdf_link,
            image,
            map_coordinates,
            contact_info,
            team,
            team_limit,
        })
    }
}

/// Validated, normalized content of an Event.
///
/// Can only be obtained from [`EventDraft::validate`], so every instance
/// satisfies the schema. Carries no timestamps; those belong to the store.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    event_id: EventId,
    category: Category,
    society_name: String,
    event_name: String,
    reg_fees: f64,
    date_time: DateTime<Utc>,
    location: String,
    brief_description: String,
    pdf_link: String,
    image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    map_coordinates: Option<MapCoordinates>,
    contact_info: String,
    team: i64,
    team_limit: i64,
}

impl EventRecord {
    /// Natural key.
    #[must_use]
    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }

    /// Category.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Organising society, trimmed.
    #[must_use]
    pub fn society_name(&self) -> &str {
        &self.society_name
    }

    /// Event name, trimmed.
    #[must_use]
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    /// Registration fee, finite and `>= 0`.
    #[must_use]
    pub const fn reg_fees(&self) -> f64 {
        self.reg_fees
    }

    /// Scheduled date and time.
    #[must_use]
    pub const fn date_time(&self) -> DateTime<Utc> {
        self.date_time
    }

    /// Venue, trimmed.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Brief description, trimmed.
    #[must_use]
    pub fn brief_description(&self) -> &str {
        &self.brief_description
    }

    /// PDF link, trimmed. The format is not checked.
    #[must_use]
    pub fn pdf_link(&self) -> &str {
        &self.pdf_link
    }

    /// Poster image text, stored exactly as submitted.
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Venue coordinates, if any.
    #[must_use]
    pub const fn map_coordinates(&self) -> Option<MapCoordinates> {
        self.map_coordinates
    }

    /// Contact info, trimmed.
    #[must_use]
    pub fn contact_info(&self) -> &str {
        &self.contact_info
    }

    /// Registered team count, `>= 0`.
    #[must_use]
    pub const fn team(&self) -> i64 {
        self.team
    }

    /// Team capacity, `>= 0`.
    #[must_use]
    pub const fn team_limit(&self) -> i64 {
        self.team_limit
    }
}

impl From<&EventRecord> for EventDraft {
    fn from(r: &EventRecord) -> Self {
        Self {
            event_id: Some(r.event_id.to_string()),
            category: Some(r.category.as_str().to_string()),
            society_name: Some(r.society_name.clone()),
            event_name: Some(r.event_name.clone()),
            reg_fees: Some(r.reg_fees),
            date_time: Some(r.date_time),
            location: Some(r.location.clone()),
            brief_description: Some(r.brief_description.clone()),
            pdf_link: Some(r.pdf_link.clone()),
            image: Some(r.image.clone()),
            map_coordinates: r.map_coordinates.map(CoordinatesDraft::from),
            contact_info: Some(r.contact_info.clone()),
            team: Some(r.team),
            team_limit: Some(r.team_limit),
        }
    }
}

/// A persisted Event: validated content plus store-managed timestamps.
///
/// Serializes flat, in the document shape clients see.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Validated content.
    #[serde(flatten)]
    pub record: EventRecord,
    /// Set once when the record is inserted.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every write.
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Natural key of the persisted record.
    #[must_use]
    pub fn event_id(&self) -> &EventId {
        self.record.event_id()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::fixtures::sample_draft;

    #[test]
    fn valid_draft_is_normalized() {
        let Ok(record) = sample_draft(" sprint-1 ").validate() else {
            panic!("valid draft");
        };
        assert_eq!(record.event_id().as_str(), "sprint-1");
        assert_eq!(record.society_name(), "Coding Club");
        assert_eq!(record.category(), Category::Technical);
        assert_eq!(record.reg_fees(), 150.75);
        assert_eq!(record.team(), 0);
        assert_eq!(record.team_limit(), 40);
        assert!(record.map_coordinates().is_none());
    }

    #[test]
    fn image_is_not_trimmed() {
        let mut draft = sample_draft("img");
        draft.image = Some(" abc-_ ".to_string());
        let Ok(record) = draft.validate() else {
            panic!("valid draft");
        };
        assert_eq!(record.image(), " abc-_ ");
    }

    #[test]
    fn each_missing_required_field_is_named() {
        let cases: Vec<(&str, &str, fn(&mut EventDraft))> = vec![
            ("eventId", "Event ID is required", |d| d.event_id = None),
            ("category", "Category is required", |d| d.category = None),
            ("societyName", "Society name is required", |d| {
                d.society_name = None;
            }),
            ("eventName", "Event name is required", |d| d.event_name = None),
            ("regFees", "Registration fees is required", |d| {
                d.reg_fees = None;
            }),
            ("dateTime", "Date and time is required", |d| d.date_time = None),
            ("location", "Location is required", |d| d.location = None),
            ("briefDescription", "Brief description is required", |d| {
                d.brief_description = None;
            }),
            ("pdfLink", "PDF link is required", |d| d.pdf_link = None),
            ("image", "Image is required", |d| d.image = None),
            ("contactInfo", "Contact info is required", |d| {
                d.contact_info = None;
            }),
            ("teamLimit", "Team limit is required", |d| d.team_limit = None),
        ];
        for (field, message, strip) in cases {
            let mut draft = sample_draft("e1");
            strip(&mut draft);
            let Err(err) = draft.validate() else {
                panic!("missing {field} must fail");
            };
            assert_eq!(err.field_names(), vec![field]);
            assert_eq!(err.message_for(field), Some(message));
        }
    }

    #[test]
    fn blank_string_counts_as_missing() {
        let mut draft = sample_draft("e1");
        draft.location = Some(" \t ".to_string());
        let Err(err) = draft.validate() else {
            panic!("blank location must fail");
        };
        assert_eq!(err.message_for("location"), Some("Location is required"));
    }

    #[test]
    fn unknown_category_fails() {
        let mut draft = sample_draft("e1");
        draft.category = Some("sports".to_string());
        let Err(err) = draft.validate() else {
            panic!("unknown category must fail");
        };
        assert_eq!(err.message_for("category"), Some(CATEGORY_ENUM_MESSAGE));
    }

    #[test]
    fn negative_numbers_fail() {
        let mut draft = sample_draft("e1");
        draft.reg_fees = Some(-1.0);
        draft.team = Some(-2);
        draft.team_limit = Some(-3);
        let Err(err) = draft.validate() else {
            panic!("negative numbers must fail");
        };
        assert_eq!(err.field_names(), vec!["regFees", "team", "teamLimit"]);
        assert_eq!(
            err.message_for("regFees"),
            Some("Registration fees cannot be negative")
        );
        assert_eq!(err.message_for("team"), Some("Team count cannot be negative"));
        assert_eq!(
            err.message_for("teamLimit"),
            Some("Team limit cannot be negative")
        );
    }

    #[test]
    fn non_finite_fee_has_its_own_message() {
        for fee in [f64::NAN, f64::INFINITY] {
            let mut draft = sample_draft("e1");
            draft.reg_fees = Some(fee);
            let Err(err) = draft.validate() else {
                panic!("non-finite fee must fail");
            };
            assert_eq!(err.errors.first().map(|e| e.kind), Some(FieldErrorKind::NotFinite));
            assert_eq!(
                err.message_for("regFees"),
                Some("Registration fees must be a finite number")
            );
        }
    }

    #[test]
    fn team_above_limit_is_accepted() {
        let mut draft = sample_draft("e1");
        draft.team = Some(50);
        draft.team_limit = Some(10);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn all_failures_are_reported_together() {
        let Err(err) = EventDraft::default().validate() else {
            panic!("empty draft must fail");
        };
        // Every required field except `team`, which defaults to 0.
        assert_eq!(err.errors.len(), 12);
        assert!(!err.has_field("team"));
        assert!(!err.has_field("mapCoordinates"));
    }

    #[test]
    fn coordinates_are_validated_with_the_record() {
        let mut draft = sample_draft("e1");
        draft.map_coordinates = Some(CoordinatesDraft {
            latitude: Some(91.0),
            longitude: Some(0.0),
        });
        let Err(err) = draft.validate() else {
            panic!("latitude 91 must fail");
        };
        assert!(err.is_geo_range());

        let mut draft = sample_draft("e1");
        draft.map_coordinates = Some(CoordinatesDraft {
            latitude: Some(90.0),
            longitude: Some(180.0),
        });
        let Ok(record) = draft.validate() else {
            panic!("boundary coordinates are valid");
        };
        let point = record.map_coordinates();
        assert_eq!(point.map(|p| p.latitude()), Some(90.0));
        assert_eq!(point.map(|p| p.longitude()), Some(180.0));
    }

    #[test]
    fn merge_overrides_only_present_fields() {
        let base = sample_draft("e1");
        let patch = EventDraft {
            event_name: Some("Sprint II".to_string()),
            team: Some(3),
            ..EventDraft::default()
        };
        let merged = base.clone().merge(patch);
        assert_eq!(merged.event_name.as_deref(), Some("Sprint II"));
        assert_eq!(merged.team, Some(3));
        assert_eq!(merged.location, base.location);
        assert_eq!(merged.event_id, base.event_id);
    }

    #[test]
    fn record_converts_back_to_equivalent_draft() {
        let Ok(record) = sample_draft("e1").validate() else {
            panic!("valid draft");
        };
        let again = EventDraft::from(&record).validate().ok();
        assert_eq!(again, Some(record));
    }

    #[test]
    fn serialized_document_shape() {
        let Ok(record) = sample_draft("e1").validate() else {
            panic!("valid draft");
        };
        let now = Utc::now();
        let event = Event {
            record,
            created_at: now,
            updated_at: now,
        };
        let Ok(json) = serde_json::to_value(&event) else {
            panic!("serialization failed");
        };
        assert_eq!(json["eventId"], "e1");
        assert_eq!(json["category"], "technical");
        assert_eq!(json["regFees"], 150.75);
        assert_eq!(json["team"], 0);
        assert_eq!(json["teamLimit"], 40);
        assert!(json.get("mapCoordinates").is_none());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("record").is_none());
    }
}
