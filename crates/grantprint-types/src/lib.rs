//! Stable DTOs and IDs used across the grantprint workspace.
//!
//! This crate is intentionally boring:
//! - the eight fingerprint field names and finding codes
//! - the validated `Fingerprint` string
//! - snapshot rows of grants the system of record already stores
//! - the emitted ingest plan report
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod explain;
pub mod fingerprint;
pub mod ids;
pub mod known;
pub mod report;

pub use explain::{ExamplePair, Explanation, lookup_explanation};
pub use fingerprint::{Fingerprint, FingerprintParseError};
pub use known::{KnownGrant, KnownGrants};
pub use report::{
    Decision, DecisionAction, Finding, IngestCounts, IngestData, IngestReport, SCHEMA_PLAN_V1,
    Severity, ToolMeta, Verdict,
};
