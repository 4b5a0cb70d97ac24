//! Use case orchestration for grantprint.
//!
//! This crate provides the application layer: use cases that coordinate the domain, settings, and
//! render layers. It is intentionally thin and delegates heavy lifting to the appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and process concerns.

#![forbid(unsafe_code)]

mod derive;
mod explain;
mod hash;
mod input;
mod plan;
mod render;
mod report;
mod verify;

pub use derive::{run_deadline, run_slug};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use hash::{HashInput, HashOutput, HashedRecord, format_hash_output, run_hash};
pub use input::{parse_known_snapshots, parse_records};
pub use plan::{PlanInput, PlanOutput, run_plan, runtime_error_report, verdict_exit_code};
pub use render::{render_markdown, write_text};
pub use report::{parse_report_json, serialize_report, to_renderable};
pub use verify::{
    FingerprintFixture, FingerprintFixtures, FixtureOutcome, SCHEMA_FINGERPRINTS_V1, VerifyOutput,
    format_verify_output, run_verify_fixtures,
};
