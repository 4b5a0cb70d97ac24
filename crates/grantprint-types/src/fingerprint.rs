use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hex length of a SHA-256 digest.
pub const FINGERPRINT_HEX_LEN: usize = 64;

/// A grant content fingerprint: 64 lowercase hex characters.
///
/// The string form is the wire format; it is compared byte-for-byte against
/// digests produced by other ingestion processes.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint(String);

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FingerprintParseError {
    #[error("fingerprint must be {FINGERPRINT_HEX_LEN} characters, got {0}")]
    Length(usize),
    #[error("fingerprint must be lowercase hex, found {0:?}")]
    Character(char),
}

impl Fingerprint {
    /// Parse a rendered digest, such as a checksum supplied by a scraper.
    pub fn parse(s: &str) -> Result<Self, FingerprintParseError> {
        if s.len() != FINGERPRINT_HEX_LEN {
            return Err(FingerprintParseError::Length(s.chars().count()));
        }
        if let Some(c) = s
            .chars()
            .find(|c| !matches!(c, '0'..='9' | 'a'..='f'))
        {
            return Err(FingerprintParseError::Character(c));
        }
        Ok(Self(s.to_string()))
    }

    /// Render raw digest bytes as a fingerprint.
    pub fn from_digest(digest: impl AsRef<[u8]>) -> Self {
        let digest = digest.as_ref();
        debug_assert_eq!(digest.len() * 2, FINGERPRINT_HEX_LEN);
        Self(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Fingerprint {
    type Err = FingerprintParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fingerprint::parse(s)
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = FingerprintParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Fingerprint::parse(&value)
    }
}

impl From<Fingerprint> for String {
    fn from(value: Fingerprint) -> Self {
        value.0
    }
}

impl PartialEq<str> for Fingerprint {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Fingerprint {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
