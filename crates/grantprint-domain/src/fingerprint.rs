use crate::canonical::canonical_text;
use crate::error::FingerprintError;
use crate::normalize::{NormalizedRecord, normalize};
use crate::record::GrantRecord;
use grantprint_types::Fingerprint;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Compute the stable SHA-256 fingerprint for a grant record.
///
/// Identity fields (and nothing else):
/// - title, source, summary, description, url
/// - funding_amount
/// - deadline
/// - status (absent or empty reads as `unknown`)
pub fn fingerprint(record: &GrantRecord) -> Fingerprint {
    fingerprint_normalized(&normalize(record))
}

pub fn fingerprint_normalized(record: &NormalizedRecord) -> Fingerprint {
    let canonical = canonical_text(record);

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    Fingerprint::from_digest(digest)
}

/// Fingerprint a raw JSON record, failing on values with no text form.
pub fn fingerprint_json(value: &Value) -> Result<Fingerprint, FingerprintError> {
    Ok(fingerprint(&GrantRecord::from_json(value)?))
}
