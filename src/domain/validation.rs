//! Field-level validation failures for Event writes.
//!
//! A write is validated as a whole: every failing field contributes one
//! [`FieldError`] and the write is rejected with a single
//! [`ValidationError`] carrying all of them. Nothing is persisted when
//! validation fails.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

/// Kind of constraint a field violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// A required field was absent, or blank after trimming.
    Required,
    /// A value outside a closed set of allowed values.
    InvalidEnum,
    /// A numeric value below its minimum of zero.
    Negative,
    /// A latitude or longitude outside geographic bounds.
    GeoRange,
    /// A numeric value that is NaN or infinite.
    NotFinite,
    /// A value of the wrong JSON type, e.g. a string where a number belongs.
    InvalidType,
}

/// One failing field with its human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    /// Document path of the field (e.g. `"eventId"`, `"mapCoordinates.latitude"`).
    pub field: String,
    /// Which constraint failed.
    pub kind: FieldErrorKind,
    /// Message suitable for showing to the person who submitted the record.
    pub message: String,
}

impl FieldError {
    /// Creates a field error.
    #[must_use]
    pub fn new(field: impl Into<String>, kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Rejection of a record that does not satisfy the Event schema.
///
/// Always holds at least one [`FieldError`]. A validation error whose
/// failures are all coordinate-range failures is a *geo range error*, see
/// [`ValidationError::is_geo_range`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationError {
    /// Every failing field, in schema declaration order.
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Creates a validation error from a single field failure.
    #[must_use]
    pub fn single(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    /// Returns the names of all failing fields.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }

    /// Returns the message reported for `field`, if that field failed.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Returns `true` if `field` is among the failing fields.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Returns `true` if every failure is a latitude/longitude range failure.
    #[must_use]
    pub fn is_geo_range(&self) -> bool {
        !self.errors.is_empty()
            && self
                .errors
                .iter()
                .all(|e| e.kind == FieldErrorKind::GeoRange)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for e in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Accumulates field failures while a record is checked.
#[derive(Debug, Default)]
pub(crate) struct Collector {
    errors: Vec<FieldError>,
}

impl Collector {
    pub(crate) fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub(crate) fn extend(&mut self, other: ValidationError) {
        self.errors.extend(other.errors);
    }

    /// Trims `value` and requires the result to be non-empty.
    pub(crate) fn required_trimmed(
        &mut self,
        field: &str,
        value: Option<String>,
        message: &str,
    ) -> Option<String> {
        match value.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => Some(v.to_string()),
            _ => {
                self.push(FieldError::new(field, FieldErrorKind::Required, message));
                None
            }
        }
    }

    /// Requires `value` to be present and non-empty without trimming it.
    pub(crate) fn required_raw(
        &mut self,
        field: &str,
        value: Option<String>,
        message: &str,
    ) -> Option<String> {
        match value {
            Some(v) if !v.is_empty() => Some(v),
            _ => {
                self.push(FieldError::new(field, FieldErrorKind::Required, message));
                None
            }
        }
    }

    /// Requires a finite, non-negative number.
    pub(crate) fn non_negative_f64(
        &mut self,
        field: &str,
        value: Option<f64>,
        required_message: &str,
        negative_message: &str,
        not_finite_message: &str,
    ) -> Option<f64> {
        let Some(v) = value else {
            self.push(FieldError::new(
                field,
                FieldErrorKind::Required,
                required_message,
            ));
            return None;
        };
        if !v.is_finite() {
            self.push(FieldError::new(
                field,
                FieldErrorKind::NotFinite,
                not_finite_message,
            ));
            return None;
        }
        if v < 0.0 {
            self.push(FieldError::new(
                field,
                FieldErrorKind::Negative,
                negative_message,
            ));
            return None;
        }
        Some(v)
    }

    /// Requires a non-negative integer.
    pub(crate) fn non_negative_i64(
        &mut self,
        field: &str,
        value: Option<i64>,
        required_message: &str,
        negative_message: &str,
    ) -> Option<i64> {
        match value {
            None => {
                self.push(FieldError::new(
                    field,
                    FieldErrorKind::Required,
                    required_message,
                ));
                None
            }
            Some(v) if v < 0 => {
                self.push(FieldError::new(
                    field,
                    FieldErrorKind::Negative,
                    negative_message,
                ));
                None
            }
            Some(v) => Some(v),
        }
    }

    /// Converts the collected failures into an error. Only call when at
    /// least one failure was pushed.
    pub(crate) fn into_error(self) -> ValidationError {
        ValidationError {
            errors: self.errors,
        }
    }

    /// Finishes collection. `Ok(())` when nothing failed.
    pub(crate) fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                errors: self.errors,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn required_trimmed_rejects_blank() {
        let mut c = Collector::default();
        assert_eq!(
            c.required_trimmed("eventName", Some("   ".to_string()), "Event name is required"),
            None
        );
        let Err(err) = c.finish() else {
            panic!("blank string must fail");
        };
        assert_eq!(err.message_for("eventName"), Some("Event name is required"));
        assert_eq!(err.errors.first().map(|e| e.kind), Some(FieldErrorKind::Required));
    }

    #[test]
    fn required_trimmed_trims() {
        let mut c = Collector::default();
        let v = c.required_trimmed("location", Some("  Main Hall \n".to_string()), "x");
        assert_eq!(v.as_deref(), Some("Main Hall"));
        assert!(c.finish().is_ok());
    }

    #[test]
    fn required_raw_keeps_whitespace() {
        let mut c = Collector::default();
        let v = c.required_raw("image", Some(" abc ".to_string()), "Image is required");
        assert_eq!(v.as_deref(), Some(" abc "));
    }

    #[test]
    fn negative_and_non_finite_numbers() {
        let mut c = Collector::default();
        c.non_negative_f64("regFees", Some(-0.5), "req", "neg", "inf");
        c.non_negative_f64("regFees", Some(f64::NAN), "req", "neg", "inf");
        c.non_negative_i64("team", Some(-1), "req", "Team count cannot be negative");
        let Err(err) = c.finish() else {
            panic!("expected failures");
        };
        let kinds: Vec<_> = err.errors.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                FieldErrorKind::Negative,
                FieldErrorKind::NotFinite,
                FieldErrorKind::Negative
            ]
        );
    }

    #[test]
    fn zero_is_accepted() {
        let mut c = Collector::default();
        assert_eq!(c.non_negative_f64("regFees", Some(0.0), "r", "n", "i"), Some(0.0));
        assert_eq!(c.non_negative_i64("teamLimit", Some(0), "r", "n"), Some(0));
        assert!(c.finish().is_ok());
    }

    #[test]
    fn geo_range_classification() {
        let geo = ValidationError::single(FieldError::new(
            "mapCoordinates.latitude",
            FieldErrorKind::GeoRange,
            "Latitude must be between -90 and 90",
        ));
        assert!(geo.is_geo_range());

        let mut mixed = geo.clone();
        mixed.errors.push(FieldError::new(
            "eventId",
            FieldErrorKind::Required,
            "Event ID is required",
        ));
        assert!(!mixed.is_geo_range());
    }

    #[test]
    fn display_joins_fields() {
        let err = ValidationError {
            errors: vec![
                FieldError::new("a", FieldErrorKind::Required, "A is required"),
                FieldError::new("b", FieldErrorKind::Negative, "B cannot be negative"),
            ],
        };
        assert_eq!(err.to_string(), "a: A is required; b: B cannot be negative");
    }
}
