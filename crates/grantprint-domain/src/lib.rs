//! Pure grant fingerprinting and ingest planning (no IO).
//!
//! Input: grant records as JSON values, plus snapshots of what the system of
//! record already stores.
//! Output: fingerprints, and per-record create/update/skip decisions.

#![forbid(unsafe_code)]

pub mod canonical;
pub mod deadline;
pub mod error;
pub mod normalize;
pub mod plan;
pub mod policy;
pub mod record;
pub mod slug;

mod fingerprint;

#[cfg(test)]
mod proptest;

pub use canonical::canonical_text;
pub use error::FingerprintError;
pub use fingerprint::{fingerprint, fingerprint_json, fingerprint_normalized};
pub use normalize::{NormalizedRecord, normalize};
pub use plan::{IngestPlan, KnownIndex, plan_ingest};
pub use record::{Field, FieldValue, GrantRecord};
