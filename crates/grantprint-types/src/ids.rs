//! Stable identifiers for fingerprint fields, checks, and finding codes.
//!
//! `check_id` is a dotted namespace. `code` is a short snake_case discriminator.

// Fingerprint fields
pub const FIELD_TITLE: &str = "title";
pub const FIELD_SOURCE: &str = "source";
pub const FIELD_SUMMARY: &str = "summary";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_URL: &str = "url";
pub const FIELD_FUNDING_AMOUNT: &str = "funding_amount";
pub const FIELD_DEADLINE: &str = "deadline";
pub const FIELD_STATUS: &str = "status";

/// The complete fingerprint field set, in canonical (byte-sorted) order.
pub const FINGERPRINT_FIELDS: [&str; 8] = [
    FIELD_DEADLINE,
    FIELD_DESCRIPTION,
    FIELD_FUNDING_AMOUNT,
    FIELD_SOURCE,
    FIELD_STATUS,
    FIELD_SUMMARY,
    FIELD_TITLE,
    FIELD_URL,
];

/// Default for an absent or empty `status`.
pub const STATUS_UNKNOWN: &str = "unknown";

// Meta keys carried next to a record (never fingerprinted)
pub const META_SLUG: &str = "slug";
pub const META_HASH_CHECKSUM: &str = "hash_checksum";

// Checks
pub const CHECK_INGEST_FIELD_TYPES: &str = "ingest.field_types";
pub const CHECK_INGEST_REQUIRED_FIELDS: &str = "ingest.required_fields";
pub const CHECK_INGEST_CHECKSUM: &str = "ingest.checksum";

// Codes: ingest.field_types
pub const CODE_NOT_AN_OBJECT: &str = "not_an_object";
pub const CODE_UNSUPPORTED_VALUE: &str = "unsupported_value";

// Codes: ingest.required_fields
pub const CODE_MISSING_REQUIRED_FIELD: &str = "missing_required_field";

// Codes: ingest.checksum
pub const CODE_CHECKSUM_MISMATCH: &str = "checksum_mismatch";
pub const CODE_MALFORMED_CHECKSUM: &str = "malformed_checksum";

// Decision reasons
pub const REASON_UNCHANGED: &str = "unchanged";
pub const REASON_NEW: &str = "new";
pub const REASON_CONTENT_CHANGED: &str = "content_changed";

// Tool-level
pub const CHECK_TOOL_RUNTIME: &str = "tool.runtime";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";

/// Returns true when `name` is one of the eight fingerprint fields.
pub fn is_fingerprint_field(name: &str) -> bool {
    FINGERPRINT_FIELDS.contains(&name)
}
