//! The `plan` use case: decide create/update/skip for a batch and produce a report.

use anyhow::Context;
use grantprint_domain::{IngestPlan, KnownIndex, plan_ingest};
use grantprint_settings::{GrantprintConfigV1, Overrides, ResolvedConfig};
use grantprint_types::{
    Finding, IngestData, IngestReport, SCHEMA_PLAN_V1, Severity, ToolMeta, Verdict, ids,
};
use time::OffsetDateTime;

use crate::input::{parse_known_snapshots, parse_records};

/// Input for the plan use case.
#[derive(Clone, Debug)]
pub struct PlanInput<'a> {
    /// Incoming records (JSON object, array, or JSON Lines).
    pub incoming_text: &'a str,
    /// Contents of each known-grants snapshot file.
    pub known_texts: Vec<String>,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the plan use case.
#[derive(Clone, Debug)]
pub struct PlanOutput {
    pub report: IngestReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the plan use case: parse config and inputs, plan the batch, produce a report.
pub fn run_plan(input: PlanInput<'_>) -> anyhow::Result<PlanOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        GrantprintConfigV1::default()
    } else {
        grantprint_settings::parse_config_toml(input.config_text).context("parse config")?
    };
    let resolved = grantprint_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;

    let incoming = parse_records(input.incoming_text).context("parse incoming records")?;

    let mut snapshots = Vec::new();
    for (i, text) in input.known_texts.iter().enumerate() {
        let parsed =
            parse_known_snapshots(text).with_context(|| format!("parse known snapshot #{}", i + 1))?;
        snapshots.extend(parsed);
    }
    let known = KnownIndex::from_snapshots(&snapshots);

    tracing::debug!(
        profile = %resolved.policy.profile,
        checksum_mode = resolved.policy.checksum_mode.as_str(),
        records = incoming.len(),
        known_grants = known.len(),
        "planning ingest"
    );

    let IngestPlan {
        decisions,
        findings,
        counts,
        verdict,
    } = plan_ingest(&incoming, &known, &resolved.policy);

    for decision in &decisions {
        tracing::debug!(
            index = decision.index,
            action = ?decision.action,
            reason = %decision.reason,
            slug = decision.slug.as_deref().unwrap_or(""),
            "decision"
        );
    }
    for finding in findings.iter().filter(|f| f.code == ids::CODE_CHECKSUM_MISMATCH) {
        tracing::warn!(record = ?finding.record_index, "{}", finding.message);
    }
    tracing::info!(
        created = counts.created,
        updated = counts.updated,
        skipped = counts.skipped,
        invalid = counts.invalid,
        verdict = ?verdict,
        "planned ingest"
    );

    let data = IngestData {
        profile: resolved.policy.profile.clone(),
        checksum_mode: resolved.policy.checksum_mode.as_str().to_string(),
        records_total: incoming.len(),
        known_grants: known.len(),
        counts,
    };

    let report = IngestReport {
        schema: SCHEMA_PLAN_V1.to_string(),
        tool: tool_meta(),
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict,
        decisions,
        findings,
        data,
    };

    Ok(PlanOutput {
        report,
        resolved_config: resolved,
    })
}

/// A failing report that carries a runtime error, so CI still gets an artifact.
pub fn runtime_error_report(message: &str) -> IngestReport {
    let now = OffsetDateTime::now_utc();
    IngestReport {
        schema: SCHEMA_PLAN_V1.to_string(),
        tool: tool_meta(),
        started_at: now,
        finished_at: now,
        verdict: Verdict::Fail,
        decisions: Vec::new(),
        findings: vec![Finding {
            severity: Severity::Error,
            check_id: ids::CHECK_TOOL_RUNTIME.to_string(),
            code: ids::CODE_RUNTIME_ERROR.to_string(),
            message: message.to_string(),
            record_index: None,
            field: None,
            help: Some("Fix the input or configuration and re-run.".to_string()),
        }],
        data: IngestData::default(),
    }
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}

fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: "grantprint".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INCOMING: &str = r#"[
        {"title": "Test Grant", "source": "ukri", "url": "https://example.org/a", "status": "open"},
        {"title": "Other Grant", "source": "ukri", "url": "https://example.org/b"},
        {"source": "ukri"}
    ]"#;

    fn input<'a>(known_texts: Vec<String>, config_text: &'a str) -> PlanInput<'a> {
        PlanInput {
            incoming_text: INCOMING,
            known_texts,
            config_text,
            overrides: Overrides::default(),
        }
    }

    #[test]
    fn empty_config_uses_defaults() {
        let output = run_plan(input(Vec::new(), "")).expect("run_plan");
        assert_eq!(output.resolved_config.policy.profile, "strict");

        let report = output.report;
        assert_eq!(report.schema, SCHEMA_PLAN_V1);
        assert_eq!(report.tool.name, "grantprint");
        assert_eq!(report.verdict, Verdict::Warn);
        assert_eq!(report.data.records_total, 3);
        assert_eq!(report.data.counts.created, 2);
        assert_eq!(report.data.counts.skipped, 1);
        assert_eq!(report.data.checksum_mode, "verify");
    }

    #[test]
    fn known_snapshots_feed_the_plan() {
        let known = r#"{"source": "ukri", "grants": [
            {"slug": "test-grant-ukri", "hash_checksum": "stale", "url": "https://example.org/a"}
        ]}"#;
        let output = run_plan(input(vec![known.to_string()], "")).expect("run_plan");
        assert_eq!(output.report.data.known_grants, 1);
        assert_eq!(output.report.data.counts.updated, 1);
        assert_eq!(
            output.report.decisions[0].previous_fingerprint.as_deref(),
            Some("stale")
        );
    }

    #[test]
    fn config_profile_applies() {
        let output = run_plan(input(Vec::new(), "profile = \"audit\"\n")).expect("run_plan");
        assert_eq!(output.report.data.profile, "audit");
        assert_eq!(output.report.verdict, Verdict::Fail);
    }

    #[test]
    fn bad_inputs_are_runtime_errors() {
        assert!(run_plan(input(vec!["not json".to_string()], "")).is_err());
        assert!(run_plan(input(Vec::new(), "profile = 3")).is_err());
    }

    #[test]
    fn runtime_error_report_fails() {
        let report = runtime_error_report("boom");
        assert_eq!(report.verdict, Verdict::Fail);
        assert_eq!(report.findings[0].check_id, ids::CHECK_TOOL_RUNTIME);
        assert_eq!(verdict_exit_code(report.verdict), 2);
    }

    #[test]
    fn verdict_exit_codes() {
        assert_eq!(verdict_exit_code(Verdict::Pass), 0);
        assert_eq!(verdict_exit_code(Verdict::Warn), 0);
        assert_eq!(verdict_exit_code(Verdict::Fail), 2);
    }
}
