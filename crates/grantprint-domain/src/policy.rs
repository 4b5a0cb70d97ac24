use crate::record::Field;

/// How a record's own `hash_checksum` is treated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChecksumMode {
    /// Use the computed fingerprint; report supplied values that disagree.
    Verify,
    /// Use a well-formed supplied checksum as-is. A malformed one is
    /// reported as `malformed_checksum` and the computed fingerprint is used.
    Trust,
    /// Use the computed fingerprint and never look at supplied values.
    Ignore,
}

impl ChecksumMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ChecksumMode::Verify => "verify",
            ChecksumMode::Trust => "trust",
            ChecksumMode::Ignore => "ignore",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailOn {
    Error,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngestPolicy {
    pub profile: String,
    /// Records missing any of these (absent or empty text) are skipped.
    pub required_fields: Vec<Field>,
    pub checksum_mode: ChecksumMode,
    pub fail_on: FailOn,
}

impl Default for IngestPolicy {
    fn default() -> Self {
        Self {
            profile: "strict".to_string(),
            required_fields: vec![Field::Source, Field::Title],
            checksum_mode: ChecksumMode::Verify,
            fail_on: FailOn::Error,
        }
    }
}
