use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One grant the system of record already stores for a source.
///
/// The shape matches the rows returned by the "existing grants for a source"
/// endpoint, so a saved response body can be fed to the planner directly.
/// `hash_checksum` is kept as a plain string: legacy rows may hold values that
/// are not SHA-256 hex, and those simply never match a fresh fingerprint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct KnownGrant {
    pub slug: String,
    pub hash_checksum: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A snapshot of stored grants for a single source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct KnownGrants {
    pub source: String,
    #[serde(default)]
    pub grants: Vec<KnownGrant>,
}
