//! Explain registry for checks and codes.
//!
//! Maps check IDs and codes to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a check or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the check/code.
    pub title: &'static str,
    /// What the check does and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after record examples.
    pub examples: ExamplePair,
}

/// Before and after record examples (JSON).
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// A record that would trigger a finding.
    pub before: &'static str,
    /// A record that passes the check.
    pub after: &'static str,
}

/// Look up an explanation by check_id or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        // Check IDs
        ids::CHECK_INGEST_FIELD_TYPES => Some(explain_field_types()),
        ids::CHECK_INGEST_REQUIRED_FIELDS => Some(explain_required_fields()),
        ids::CHECK_INGEST_CHECKSUM => Some(explain_checksum()),

        // Codes
        ids::CODE_NOT_AN_OBJECT => Some(explain_not_an_object()),
        ids::CODE_UNSUPPORTED_VALUE => Some(explain_unsupported_value()),
        ids::CODE_MISSING_REQUIRED_FIELD => Some(explain_missing_required_field()),
        ids::CODE_CHECKSUM_MISMATCH => Some(explain_checksum_mismatch()),
        ids::CODE_MALFORMED_CHECKSUM => Some(explain_malformed_checksum()),

        _ => None,
    }
}

/// List all known check IDs.
pub fn all_check_ids() -> &'static [&'static str] {
    &[
        ids::CHECK_INGEST_FIELD_TYPES,
        ids::CHECK_INGEST_REQUIRED_FIELDS,
        ids::CHECK_INGEST_CHECKSUM,
    ]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_NOT_AN_OBJECT,
        ids::CODE_UNSUPPORTED_VALUE,
        ids::CODE_MISSING_REQUIRED_FIELD,
        ids::CODE_CHECKSUM_MISMATCH,
        ids::CODE_MALFORMED_CHECKSUM,
    ]
}

// --- Check-level explanations ---

fn explain_field_types() -> Explanation {
    Explanation {
        title: "Fingerprint Field Types",
        description: "\
Rejects records whose fingerprint fields hold values that have no text form.

The eight fingerprint fields (title, source, summary, description, url,
funding_amount, deadline, status) must each be a string, a number, or null.
Booleans, arrays and objects are refused instead of being coerced, because a
silently-wrong normalization produces a fingerprint no other ingestion process
will ever reproduce, and deduplication quietly stops working.",
        remediation: "\
Fix the scraper so it emits plain text for the offending field:
- flatten structured funding data into a display string
- render dates as text before emitting the record
- emit null (or omit the key) when the value is unknown",
        examples: ExamplePair {
            before: r#"{"title": "Net Zero Fund", "source": "ukri", "funding_amount": {"min": 1000, "max": 5000}}"#,
            after: r#"{"title": "Net Zero Fund", "source": "ukri", "funding_amount": "£1,000 - £5,000"}"#,
        },
    }
}

fn explain_required_fields() -> Explanation {
    Explanation {
        title: "Required Identity Fields",
        description: "\
Skips records that lack the fields the system of record needs to store a grant.

By default a grant without a `source` or a `title` cannot be given a slug and is
skipped rather than created. The required set is configurable in grantprint.toml
(`required_fields`).",
        remediation: "\
Make sure every emitted record carries a non-empty title and the scraper's source
identifier. Records that legitimately lack them should not be emitted.",
        examples: ExamplePair {
            before: r#"{"title": "", "source": "nihr", "url": "https://example.org/call"}"#,
            after: r#"{"title": "Health Research Call", "source": "nihr", "url": "https://example.org/call"}"#,
        },
    }
}

fn explain_checksum() -> Explanation {
    Explanation {
        title: "Supplied Checksums",
        description: "\
Compares a record's supplied `hash_checksum` with the fingerprint computed from
its content.

Scrapers may precompute the checksum. When that precomputation uses a different
rule (a different field set, separator, or escaping), stored checksums drift away
from the canonical fingerprint and every later comparison reports an update.",
        remediation: "\
Drop `hash_checksum` from emitted records and let the planner compute it, or fix
the scraper to use the canonical rule and validate it with `grantprint verify`.
Use `checksum_mode = \"trust\"` only for sources whose checksums are known good.",
        examples: ExamplePair {
            before: r#"{"title": "Test Grant", "source": "UKRI", "hash_checksum": "0d1f..."}"#,
            after: r#"{"title": "Test Grant", "source": "UKRI"}"#,
        },
    }
}

// --- Code-level explanations ---

fn explain_not_an_object() -> Explanation {
    let mut exp = explain_field_types();
    exp.title = "Record Is Not An Object";
    exp.description = "\
An entry in the incoming batch is not a JSON object, so it has no fields to
fingerprint. The entry is reported as invalid.";
    exp.examples = ExamplePair {
        before: r#"["Test Grant", "ukri"]"#,
        after: r#"{"title": "Test Grant", "source": "ukri"}"#,
    };
    exp
}

fn explain_unsupported_value() -> Explanation {
    let mut exp = explain_field_types();
    exp.title = "Unsupported Field Value";
    exp
}

fn explain_missing_required_field() -> Explanation {
    let mut exp = explain_required_fields();
    exp.title = "Missing Required Field";
    exp
}

fn explain_checksum_mismatch() -> Explanation {
    let mut exp = explain_checksum();
    exp.title = "Checksum Mismatch";
    exp
}

fn explain_malformed_checksum() -> Explanation {
    let mut exp = explain_checksum();
    exp.title = "Malformed Checksum";
    exp.description = "\
A supplied `hash_checksum` is not 64 lowercase hexadecimal characters, so it
cannot be a SHA-256 fingerprint. The computed fingerprint is used instead.";
    exp
}
