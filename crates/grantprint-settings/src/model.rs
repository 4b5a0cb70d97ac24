use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `grantprint.toml` schema v1.
///
/// Every key is optional; a missing file and an empty file resolve the same way.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GrantprintConfigV1 {
    /// Optional schema string for tooling (`grantprint.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// `strict` (default), `trusting`, or `audit`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// `verify`, `trust`, or `ignore`: what to do with a record's own `hash_checksum`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum_mode: Option<String>,

    /// Records missing any of these fields are skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_fields: Option<Vec<String>>,

    /// When to fail the plan: `error` (default) or `warning`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,
}
