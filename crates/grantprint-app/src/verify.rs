//! The `verify` use case: check known record/fingerprint pairs.
//!
//! Fixture files are shared with other ingestion processes, so a mismatch here
//! means two writers would disagree about whether a grant changed.

use anyhow::Context;
use grantprint_domain::{GrantRecord, canonical_text, fingerprint_normalized, normalize};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SCHEMA_FINGERPRINTS_V1: &str = "grantprint.fingerprints.v1";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FingerprintFixture {
    pub name: String,
    pub record: Value,
    /// Expected digest, as produced by an independent implementation.
    pub fingerprint: String,
    /// Expected canonical text, when the producer recorded it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FingerprintFixtures {
    pub schema: String,
    pub fixtures: Vec<FingerprintFixture>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixtureOutcome {
    pub name: String,
    pub expected: String,
    /// Computed digest, or the reason none could be computed.
    pub actual: Result<String, String>,
    pub canonical_mismatch: Option<(String, String)>,
}

impl FixtureOutcome {
    pub fn passed(&self) -> bool {
        self.canonical_mismatch.is_none() && self.actual.as_deref() == Ok(self.expected.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct VerifyOutput {
    pub outcomes: Vec<FixtureOutcome>,
}

impl VerifyOutput {
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(FixtureOutcome::passed)
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.passed()).count()
    }
}

pub fn run_verify_fixtures(text: &str) -> anyhow::Result<VerifyOutput> {
    let fixtures: FingerprintFixtures =
        serde_json::from_str(text).context("parse fingerprint fixtures")?;
    if fixtures.schema != SCHEMA_FINGERPRINTS_V1 {
        anyhow::bail!(
            "unknown fixtures schema: {} (expected {SCHEMA_FINGERPRINTS_V1})",
            fixtures.schema
        );
    }

    let outcomes: Vec<FixtureOutcome> = fixtures.fixtures.iter().map(check_fixture).collect();
    let output = VerifyOutput { outcomes };

    tracing::info!(
        fixtures = output.outcomes.len(),
        failed = output.failed(),
        "verified fingerprint fixtures"
    );
    Ok(output)
}

fn check_fixture(fixture: &FingerprintFixture) -> FixtureOutcome {
    let normalized = GrantRecord::from_json(&fixture.record).map(|record| normalize(&record));
    let (actual, canonical_mismatch) = match normalized {
        Ok(normalized) => {
            let canonical = canonical_text(&normalized);
            let mismatch = fixture
                .canonical
                .as_ref()
                .filter(|expected| **expected != canonical)
                .map(|expected| (expected.clone(), canonical));
            (Ok(fingerprint_normalized(&normalized).to_string()), mismatch)
        }
        Err(err) => (Err(err.to_string()), None),
    };

    FixtureOutcome {
        name: fixture.name.clone(),
        expected: fixture.fingerprint.clone(),
        actual,
        canonical_mismatch,
    }
}

/// One line per fixture, plus detail lines for failures.
pub fn format_verify_output(output: &VerifyOutput) -> String {
    let mut out = String::new();
    for o in &output.outcomes {
        if o.passed() {
            out.push_str(&format!("ok    {}\n", o.name));
            continue;
        }
        out.push_str(&format!("FAIL  {}\n", o.name));
        match &o.actual {
            Ok(actual) if *actual != o.expected => {
                out.push_str(&format!("      expected {}\n", o.expected));
                out.push_str(&format!("      computed {}\n", actual));
            }
            Ok(_) => {}
            Err(err) => out.push_str(&format!("      error: {}\n", err)),
        }
        if let Some((expected, actual)) = &o.canonical_mismatch {
            out.push_str(&format!("      expected canonical {}\n", expected));
            out.push_str(&format!("      computed canonical {}\n", actual));
        }
    }
    out.push_str(&format!(
        "{} fixtures, {} failed\n",
        output.outcomes.len(),
        output.failed()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixtures(entries: Vec<FingerprintFixture>) -> String {
        serde_json::to_string(&FingerprintFixtures {
            schema: SCHEMA_FINGERPRINTS_V1.to_string(),
            fixtures: entries,
        })
        .expect("serialize")
    }

    #[test]
    fn matching_fixtures_pass() {
        let text = fixtures(vec![FingerprintFixture {
            name: "empty".to_string(),
            record: json!({}),
            fingerprint: "20112928ede7aa3ac15c3503114ee442120ace39f553875160a4fa87a428318e"
                .to_string(),
            canonical: Some(
                "{\"deadline\": \"\", \"description\": \"\", \"funding_amount\": \"\", \"source\": \"\", \"status\": \"unknown\", \"summary\": \"\", \"title\": \"\", \"url\": \"\"}"
                    .to_string(),
            ),
        }]);

        let output = run_verify_fixtures(&text).expect("verify");
        assert!(output.passed());
        assert!(format_verify_output(&output).starts_with("ok    empty\n"));
    }

    #[test]
    fn mismatches_and_errors_fail() {
        let text = fixtures(vec![
            FingerprintFixture {
                name: "wrong".to_string(),
                record: json!({"title": "x"}),
                fingerprint: "0".repeat(64),
                canonical: None,
            },
            FingerprintFixture {
                name: "broken".to_string(),
                record: json!({"title": ["x"]}),
                fingerprint: "0".repeat(64),
                canonical: None,
            },
        ]);

        let output = run_verify_fixtures(&text).expect("verify");
        assert!(!output.passed());
        assert_eq!(output.failed(), 2);

        let formatted = format_verify_output(&output);
        assert!(formatted.contains("FAIL  wrong"));
        assert!(formatted.contains("computed "));
        assert!(formatted.contains("FAIL  broken"));
        assert!(formatted.contains("error: field `title`"));
        assert!(formatted.ends_with("2 fixtures, 2 failed\n"));
    }

    #[test]
    fn rejects_unknown_schema() {
        assert!(run_verify_fixtures(r#"{"schema": "other", "fixtures": []}"#).is_err());
    }
}
