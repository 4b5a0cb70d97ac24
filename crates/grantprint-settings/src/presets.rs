use grantprint_domain::Field;
use grantprint_domain::policy::{ChecksumMode, FailOn, IngestPolicy};

pub const PROFILES: [&str; 3] = ["strict", "trusting", "audit"];

/// Preset profiles are opinionated defaults. Anything finer goes into `grantprint.toml`.
pub fn preset(profile: &str) -> Option<IngestPolicy> {
    match profile {
        "strict" => Some(strict_profile()),
        "trusting" => Some(trusting_profile()),
        "audit" => Some(audit_profile()),
        _ => None,
    }
}

fn strict_profile() -> IngestPolicy {
    IngestPolicy {
        profile: "strict".to_string(),
        required_fields: default_required(),
        checksum_mode: ChecksumMode::Verify,
        fail_on: FailOn::Error,
    }
}

// Behaves like the system of record: a supplied checksum is taken at its word.
fn trusting_profile() -> IngestPolicy {
    IngestPolicy {
        profile: "trusting".to_string(),
        required_fields: default_required(),
        checksum_mode: ChecksumMode::Trust,
        fail_on: FailOn::Error,
    }
}

fn audit_profile() -> IngestPolicy {
    IngestPolicy {
        profile: "audit".to_string(),
        required_fields: default_required(),
        checksum_mode: ChecksumMode::Verify,
        fail_on: FailOn::Warning,
    }
}

fn default_required() -> Vec<Field> {
    vec![Field::Source, Field::Title]
}
