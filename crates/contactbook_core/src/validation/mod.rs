//! Declarative request validation.
//!
//! # Responsibility
//! - Describe each operation's payload as a static [`Schema`].
//! - Check typed requests ([`Validate`]) and raw JSON payloads
//!   ([`Schema::parse`]) with one rule engine.
//!
//! # Invariants
//! - Validation is pure: no I/O, no logging, no repository access.
//! - Fields are checked in schema order and the first violation wins.
//! - Lengths are counted in Unicode scalar values.

pub mod schemas;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("valid email regex")
});
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9(][0-9 ()\-]*$").expect("valid phone regex"));

/// First violated constraint for a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Payload is not a JSON object.
    NotAnObject,
    MissingField {
        field: &'static str,
    },
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
    },
    TooShort {
        field: &'static str,
        min: usize,
    },
    TooLong {
        field: &'static str,
        max: usize,
    },
    InvalidFormat {
        field: &'static str,
        format: TextFormat,
    },
    NotPositive {
        field: &'static str,
    },
    /// Value is positive but too large for the storage window.
    OutOfRange {
        field: &'static str,
    },
}

impl ValidationError {
    /// Field that triggered the violation, when there is one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::NotAnObject => None,
            Self::MissingField { field }
            | Self::TypeMismatch { field, .. }
            | Self::TooShort { field, .. }
            | Self::TooLong { field, .. }
            | Self::InvalidFormat { field, .. }
            | Self::NotPositive { field }
            | Self::OutOfRange { field } => Some(field),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "payload must be a JSON object"),
            Self::MissingField { field } => write!(f, "`{field}` is required"),
            Self::TypeMismatch { field, expected } => {
                write!(f, "`{field}` must be {expected}")
            }
            Self::TooShort { field, min } => {
                write!(f, "`{field}` must be at least {min} characters")
            }
            Self::TooLong { field, max } => {
                write!(f, "`{field}` must be at most {max} characters")
            }
            Self::InvalidFormat { field, format } => {
                write!(f, "`{field}` must be a valid {}", format.as_str())
            }
            Self::NotPositive { field } => write!(f, "`{field}` must be a positive integer"),
            Self::OutOfRange { field } => write!(f, "`{field}` is out of range"),
        }
    }
}

impl Error for ValidationError {}

/// Format constraint on a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Email,
    Phone,
}

impl TextFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone number",
        }
    }

    fn matches(self, value: &str) -> bool {
        match self {
            Self::Email => EMAIL_RE.is_match(value),
            Self::Phone => PHONE_RE.is_match(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text {
        min: usize,
        max: usize,
        format: Option<TextFormat>,
    },
    PositiveInt,
}

/// One declarative field rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub name: &'static str,
    pub required: bool,
    /// Treat `""` as if the field were absent (search criteria).
    pub blank_as_absent: bool,
    pub kind: FieldKind,
}

impl FieldRule {
    pub const fn required_text(name: &'static str, min: usize, max: usize) -> Self {
        Self {
            name,
            required: true,
            blank_as_absent: false,
            kind: FieldKind::Text {
                min,
                max,
                format: None,
            },
        }
    }

    pub const fn optional_text(name: &'static str, min: usize, max: usize) -> Self {
        Self {
            required: false,
            ..Self::required_text(name, min, max)
        }
    }

    /// Optional text where blank input means "no criterion".
    pub const fn criterion(name: &'static str, min: usize, max: usize) -> Self {
        Self {
            blank_as_absent: true,
            ..Self::optional_text(name, min, max)
        }
    }

    pub const fn required_id(name: &'static str) -> Self {
        Self {
            name,
            required: true,
            blank_as_absent: false,
            kind: FieldKind::PositiveInt,
        }
    }

    /// Positive integer that falls back to a default when omitted.
    pub const fn optional_count(name: &'static str) -> Self {
        Self {
            required: false,
            ..Self::required_id(name)
        }
    }

    pub const fn with_format(self, format: TextFormat) -> Self {
        match self.kind {
            FieldKind::Text { min, max, .. } => Self {
                kind: FieldKind::Text {
                    min,
                    max,
                    format: Some(format),
                },
                ..self
            },
            FieldKind::PositiveInt => self,
        }
    }

    fn check(&self, value: FieldValue<'_>) -> Result<(), ValidationError> {
        let field = self.name;
        let value = match value {
            FieldValue::Text("") if self.blank_as_absent => FieldValue::Absent,
            other => other,
        };

        match (self.kind, value) {
            (_, FieldValue::Absent) if self.required => Err(ValidationError::MissingField { field }),
            (_, FieldValue::Absent) => Ok(()),
            (FieldKind::Text { min, max, format }, FieldValue::Text(text)) => {
                let length = text.chars().count();
                if length < min {
                    return Err(ValidationError::TooShort { field, min });
                }
                if length > max {
                    return Err(ValidationError::TooLong { field, max });
                }
                match format {
                    Some(format) if !format.matches(text) => {
                        Err(ValidationError::InvalidFormat { field, format })
                    }
                    _ => Ok(()),
                }
            }
            (FieldKind::Text { .. }, _) => Err(ValidationError::TypeMismatch {
                field,
                expected: "a string",
            }),
            (FieldKind::PositiveInt, FieldValue::Integer(number)) if number > 0 => Ok(()),
            (FieldKind::PositiveInt, FieldValue::Integer(_)) => {
                Err(ValidationError::NotPositive { field })
            }
            (FieldKind::PositiveInt, _) => Err(ValidationError::TypeMismatch {
                field,
                expected: "an integer",
            }),
        }
    }
}

/// Value observed for one field, independent of its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Absent,
    Text(&'a str),
    Integer(i64),
    /// JSON value of another type (`null`, bool, float, array, object).
    Other,
}

impl<'a> From<Option<&'a str>> for FieldValue<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(Self::Absent, FieldValue::Text)
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue<'_> {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl<'a> From<&'a Value> for FieldValue<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text.as_str()),
            Value::Number(number) => number.as_i64().map_or(Self::Other, Self::Integer),
            _ => Self::Other,
        }
    }
}

/// Named, ordered list of field rules for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [FieldRule],
}

impl Schema {
    /// Checks observed values against every rule in declaration order.
    ///
    /// Fields missing from `values` are treated as absent; values for names
    /// the schema does not declare are ignored.
    pub fn check(&self, values: &[(&str, FieldValue<'_>)]) -> Result<(), ValidationError> {
        for rule in self.fields {
            let value = values
                .iter()
                .find(|(name, _)| *name == rule.name)
                .map_or(FieldValue::Absent, |(_, value)| *value);
            rule.check(value)?;
        }
        Ok(())
    }

    /// Validates a raw JSON payload, then decodes it into `T`.
    ///
    /// Unknown keys are ignored.
    pub fn parse<T: DeserializeOwned>(&self, payload: &Value) -> Result<T, ValidationError> {
        let Value::Object(map) = payload else {
            return Err(ValidationError::NotAnObject);
        };

        let values = self
            .fields
            .iter()
            .map(|rule| {
                let value = map.get(rule.name).map_or(FieldValue::Absent, FieldValue::from);
                (rule.name, value)
            })
            .collect::<Vec<_>>();
        self.check(&values)?;

        serde_json::from_value(payload.clone()).map_err(|_| ValidationError::TypeMismatch {
            field: self.name,
            expected: "a well-formed payload",
        })
    }
}

/// Typed request bound to its schema.
pub trait Validate {
    const SCHEMA: Schema;

    /// Observed values keyed by schema field name.
    fn values(&self) -> Vec<(&'static str, FieldValue<'_>)>;

    fn validate(&self) -> Result<(), ValidationError> {
        Self::SCHEMA.check(&self.values())
    }
}
