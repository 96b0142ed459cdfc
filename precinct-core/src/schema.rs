//! Typed payload schemas
//!
//! A [`Schema`] describes the fields a write payload may carry. The same
//! descriptor validates both full writes (create/replace: every required field
//! must be present) and partial writes (patch: every field optional, at least
//! one must be present). Validation collects every violation before returning,
//! so a client sees all problems with a payload at once.
//!
//! Validation is pure: it reads the payload and the evaluation date, nothing
//! else.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{FieldError, ValidationErrors};
use crate::identity::parse_entity_id;

/// Strict lexical form accepted for date fields.
static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("date pattern is valid")
});

/// Field name used for errors about the payload as a whole.
pub const BODY_FIELD: &str = "body";

/// Field name of the server-assigned identifier.
pub const ID_FIELD: &str = "id";

// ============================================================================
// DESCRIPTORS
// ============================================================================

/// Which write is being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Create or replace: required fields must be present.
    Full,
    /// Patch: fields are optional but at least one must be present.
    Partial,
}

/// Type and constraints of a single field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Trimmed, non-empty text with character-length bounds.
    Text {
        min_len: usize,
        max_len: Option<usize>,
    },
    /// `YYYY-MM-DD` calendar date, not later than the evaluation date.
    PastDate,
    /// Member of a fixed enumeration, matched case-insensitively.
    Choice {
        allowed: &'static [&'static str],
        parse: fn(&str) -> Option<&'static str>,
    },
    /// Identifier of another record. Format only, never existence.
    Reference,
}

/// One entry of a schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            required: true,
            kind,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            required: false,
            kind,
        }
    }
}

/// Field descriptors for one record type.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub fields: &'static [FieldSpec],
}

// ============================================================================
// VALIDATED OUTPUT
// ============================================================================

/// A normalized, typed field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Date(NaiveDate),
    Choice(&'static str),
    Reference(Uuid),
}

/// The fields that passed validation, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validated {
    values: Vec<(&'static str, FieldValue)>,
}

impl Validated {
    fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.iter().map(|(field, _)| *field)
    }

    pub fn text(&self, name: &str) -> Option<String> {
        match self.get(name) {
            Some(FieldValue::Text(text)) => Some(text.clone()),
            _ => None,
        }
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        match self.get(name) {
            Some(FieldValue::Date(date)) => Some(*date),
            _ => None,
        }
    }

    pub fn choice(&self, name: &str) -> Option<&'static str> {
        match self.get(name) {
            Some(FieldValue::Choice(choice)) => Some(*choice),
            _ => None,
        }
    }

    pub fn reference(&self, name: &str) -> Option<Uuid> {
        match self.get(name) {
            Some(FieldValue::Reference(id)) => Some(*id),
            _ => None,
        }
    }

    /// Text field that a full payload is guaranteed to carry.
    pub fn require_text(&self, name: &str) -> Result<String, ValidationErrors> {
        self.text(name).ok_or_else(|| missing(name))
    }

    pub fn require_date(&self, name: &str) -> Result<NaiveDate, ValidationErrors> {
        self.date(name).ok_or_else(|| missing(name))
    }

    pub fn require_choice(&self, name: &str) -> Result<&'static str, ValidationErrors> {
        self.choice(name).ok_or_else(|| missing(name))
    }

    pub fn require_reference(&self, name: &str) -> Result<Uuid, ValidationErrors> {
        self.reference(name).ok_or_else(|| missing(name))
    }
}

fn missing(name: &str) -> ValidationErrors {
    ValidationErrors::single(FieldError::required(name))
}

// ============================================================================
// EVALUATION
// ============================================================================

impl Schema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    /// Validate `payload` against this schema.
    ///
    /// `today` is the evaluation date used for the not-in-the-future rule.
    pub fn validate(
        &self,
        payload: &Value,
        mode: Mode,
        today: NaiveDate,
    ) -> Result<Validated, ValidationErrors> {
        let Some(object) = payload.as_object() else {
            return Err(ValidationErrors::single(FieldError::new(
                BODY_FIELD,
                "request body must be a JSON object",
            )));
        };

        let mut errors = Vec::new();
        let mut validated = Validated::default();

        for spec in self.fields {
            match object.get(spec.name) {
                Some(raw) => match check_field(spec, raw, today) {
                    Ok(value) => validated.values.push((spec.name, value)),
                    Err(error) => errors.push(error),
                },
                None if mode == Mode::Full && spec.required => {
                    errors.push(FieldError::required(spec.name));
                }
                None => {}
            }
        }

        let mut recognized = 0usize;
        for key in object.keys() {
            if self.field(key).is_some() {
                recognized += 1;
            } else if key == ID_FIELD {
                errors.push(FieldError::new(
                    ID_FIELD,
                    "id is assigned by the server and cannot be set or changed",
                ));
            } else {
                errors.push(FieldError::new(key.as_str(), format!("{} is not allowed", key)));
            }
        }

        if mode == Mode::Partial && recognized == 0 {
            errors.insert(
                0,
                FieldError::new(BODY_FIELD, "at least one field must be provided for update"),
            );
        }

        match ValidationErrors::from_vec(errors) {
            Some(errors) => Err(errors),
            None => Ok(validated),
        }
    }
}

fn check_field(spec: &FieldSpec, raw: &Value, today: NaiveDate) -> Result<FieldValue, FieldError> {
    let name = spec.name;
    let Some(text) = raw.as_str() else {
        return Err(FieldError::new(name, format!("{} must be a string", name)));
    };

    match spec.kind {
        FieldKind::Text { min_len, max_len } => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(FieldError::new(name, format!("{} must not be empty", name)));
            }
            let len = trimmed.chars().count();
            if len < min_len {
                return Err(FieldError::new(
                    name,
                    format!("{} must be at least {} characters long", name, min_len),
                ));
            }
            if let Some(max_len) = max_len {
                if len > max_len {
                    return Err(FieldError::new(
                        name,
                        format!("{} must be at most {} characters long", name, max_len),
                    ));
                }
            }
            Ok(FieldValue::Text(trimmed.to_string()))
        }
        FieldKind::PastDate => {
            let date = parse_calendar_date(text)
                .map_err(|problem| FieldError::new(name, problem.message(name)))?;
            if date > today {
                return Err(FieldError::new(
                    name,
                    format!("{} must not be in the future", name),
                ));
            }
            Ok(FieldValue::Date(date))
        }
        FieldKind::Choice { allowed, parse } => parse(text).map(FieldValue::Choice).ok_or_else(|| {
            FieldError::new(
                name,
                format!("{} must be one of: {}", name, allowed.join(", ")),
            )
        }),
        FieldKind::Reference => parse_entity_id(text)
            .map(FieldValue::Reference)
            .ok_or_else(|| FieldError::new(name, format!("{} must be a valid UUID", name))),
    }
}

/// Why a date string was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateProblem {
    /// Not of the form `YYYY-MM-DD`.
    Format,
    /// Well-formed but names no real day (e.g. `2024-02-31`).
    Calendar,
}

impl DateProblem {
    pub fn message(&self, field: &str) -> String {
        match self {
            DateProblem::Format => format!("{} must be a date in YYYY-MM-DD format", field),
            DateProblem::Calendar => format!("{} must be a valid calendar date", field),
        }
    }
}

/// Parse a strict `YYYY-MM-DD` date whose components name a real day.
pub fn parse_calendar_date(text: &str) -> Result<NaiveDate, DateProblem> {
    let captures = DATE_PATTERN.captures(text).ok_or(DateProblem::Format)?;
    let component = |index: usize| {
        captures
            .get(index)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .ok_or(DateProblem::Format)
    };
    let (year, month, day) = (component(1)?, component(2)?, component(3)?);

    // from_ymd_opt only succeeds when year, month and day all exist as given.
    i32::try_from(year)
        .ok()
        .and_then(|year| NaiveDate::from_ymd_opt(year, month, day))
        .ok_or(DateProblem::Calendar)
}
