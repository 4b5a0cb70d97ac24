//! The fingerprinted view of a grant.

use crate::error::{FingerprintError, json_kind};
use grantprint_types::ids;
use serde_json::{Number, Value};
use time::{Date, OffsetDateTime};

/// One of the eight fields that make up a grant's fingerprint.
///
/// Variants are declared in canonical (byte-sorted by name) order, so the
/// discriminant doubles as the position in the canonical encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Deadline,
    Description,
    FundingAmount,
    Source,
    Status,
    Summary,
    Title,
    Url,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Deadline,
        Field::Description,
        Field::FundingAmount,
        Field::Source,
        Field::Status,
        Field::Summary,
        Field::Title,
        Field::Url,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Deadline => ids::FIELD_DEADLINE,
            Field::Description => ids::FIELD_DESCRIPTION,
            Field::FundingAmount => ids::FIELD_FUNDING_AMOUNT,
            Field::Source => ids::FIELD_SOURCE,
            Field::Status => ids::FIELD_STATUS,
            Field::Summary => ids::FIELD_SUMMARY,
            Field::Title => ids::FIELD_TITLE,
            Field::Url => ids::FIELD_URL,
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Normalized value of an absent or empty field.
    pub fn default_text(self) -> &'static str {
        match self {
            Field::Status => ids::STATUS_UNKNOWN,
            _ => "",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// A present field value. Absence is modelled as `None` on [`GrantRecord`].
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(Number),
    Date(Date),
    DateTime(OffsetDateTime),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Number> for FieldValue {
    fn from(value: Number) -> Self {
        FieldValue::Number(value)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<Date> for FieldValue {
    fn from(value: Date) -> Self {
        FieldValue::Date(value)
    }
}

impl From<OffsetDateTime> for FieldValue {
    fn from(value: OffsetDateTime) -> Self {
        FieldValue::DateTime(value)
    }
}

/// The subset of a grant's attributes that participate in fingerprinting.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GrantRecord {
    values: [Option<FieldValue>; 8],
}

impl GrantRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.values[field.index()].as_ref()
    }

    pub fn set(&mut self, field: Field, value: Option<FieldValue>) {
        self.values[field.index()] = value;
    }

    /// Builder form of [`GrantRecord::set`] for a present value.
    pub fn with(mut self, field: Field, value: impl Into<FieldValue>) -> Self {
        self.set(field, Some(value.into()));
        self
    }

    /// Text of a field if it is present as a non-empty string.
    pub fn text(&self, field: Field) -> Option<&str> {
        match self.get(field) {
            Some(FieldValue::Text(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// Read the eight fingerprint fields from a JSON object.
    ///
    /// `null` and missing keys are both absent. Strings and numbers are taken
    /// as-is. Any other value in a fingerprint field is an error. Keys outside
    /// the fingerprint field set are ignored.
    pub fn from_json(value: &Value) -> Result<Self, FingerprintError> {
        let Value::Object(map) = value else {
            return Err(FingerprintError::NotAnObject {
                kind: json_kind(value),
            });
        };

        let mut record = GrantRecord::new();
        for field in Field::ALL {
            let parsed = match map.get(field.name()) {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) => Some(FieldValue::Text(s.clone())),
                Some(Value::Number(n)) => Some(FieldValue::Number(n.clone())),
                Some(other) => {
                    return Err(FingerprintError::UnsupportedValue {
                        field: field.name(),
                        kind: json_kind(other),
                    });
                }
            };
            record.set(field, parsed);
        }
        Ok(record)
    }
}
