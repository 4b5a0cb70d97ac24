use grantprint_types::ids;

/// Why a JSON value could not be read as a grant record.
///
/// These are never downgraded to defaults: a value that is silently
/// normalized the wrong way yields a fingerprint nobody else reproduces.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FingerprintError {
    #[error("grant record must be a JSON object, got {kind}")]
    NotAnObject { kind: &'static str },

    #[error("field `{field}` holds {kind}, which has no text form")]
    UnsupportedValue {
        field: &'static str,
        kind: &'static str,
    },
}

impl FingerprintError {
    /// Stable finding code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            FingerprintError::NotAnObject { .. } => ids::CODE_NOT_AN_OBJECT,
            FingerprintError::UnsupportedValue { .. } => ids::CODE_UNSUPPORTED_VALUE,
        }
    }

    pub fn field(&self) -> Option<&'static str> {
        match self {
            FingerprintError::NotAnObject { .. } => None,
            FingerprintError::UnsupportedValue { field, .. } => Some(*field),
        }
    }
}

/// Human name of a JSON value's type, for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
