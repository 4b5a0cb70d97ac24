use anyhow::Context;
use grantprint_render::{
    RenderableAction, RenderableCounts, RenderableData, RenderableDecision, RenderableFinding,
    RenderableReport, RenderableSeverity, RenderableVerdictStatus,
};
use grantprint_types::{DecisionAction, IngestReport, SCHEMA_PLAN_V1, Severity, Verdict};

pub fn parse_report_json(text: &str) -> anyhow::Result<IngestReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_PLAN_V1 {
        anyhow::bail!("unknown report schema: {schema} (expected {SCHEMA_PLAN_V1})");
    }

    serde_json::from_value(value).context("parse grantprint plan report")
}

pub fn serialize_report(report: &IngestReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize plan report")
}

pub fn to_renderable(report: &IngestReport) -> RenderableReport {
    let counts = &report.data.counts;
    RenderableReport {
        verdict: match report.verdict {
            Verdict::Pass => RenderableVerdictStatus::Pass,
            Verdict::Warn => RenderableVerdictStatus::Warn,
            Verdict::Fail => RenderableVerdictStatus::Fail,
        },
        decisions: report
            .decisions
            .iter()
            .map(|d| RenderableDecision {
                index: d.index,
                action: match d.action {
                    DecisionAction::Create => RenderableAction::Create,
                    DecisionAction::Update => RenderableAction::Update,
                    DecisionAction::Skip => RenderableAction::Skip,
                    DecisionAction::Invalid => RenderableAction::Invalid,
                },
                reason: d.reason.clone(),
                source: d.source.clone(),
                slug: d.slug.clone(),
                slug_changed: d.slug_changed,
            })
            .collect(),
        findings: report
            .findings
            .iter()
            .map(|f| RenderableFinding {
                severity: match f.severity {
                    Severity::Info => RenderableSeverity::Info,
                    Severity::Warning => RenderableSeverity::Warning,
                    Severity::Error => RenderableSeverity::Error,
                },
                check_id: f.check_id.clone(),
                code: f.code.clone(),
                message: f.message.clone(),
                record_index: f.record_index,
                help: f.help.clone(),
            })
            .collect(),
        data: RenderableData {
            profile: report.data.profile.clone(),
            checksum_mode: report.data.checksum_mode.clone(),
            records_total: report.data.records_total,
            known_grants: report.data.known_grants,
            counts: RenderableCounts {
                created: counts.created,
                updated: counts.updated,
                skipped: counts.skipped,
                invalid: counts.invalid,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::runtime_error_report;

    #[test]
    fn report_round_trips_through_json() {
        let report = runtime_error_report("boom");
        let bytes = serialize_report(&report).expect("serialize");
        let text = String::from_utf8(bytes).expect("utf8");
        let parsed = parse_report_json(&text).expect("parse");
        assert_eq!(parsed, report);
    }

    #[test]
    fn rejects_foreign_schemas() {
        let err = parse_report_json(r#"{"schema": "other.report.v1"}"#).expect_err("schema");
        assert!(err.to_string().contains("other.report.v1"));
        assert!(parse_report_json("[]").is_err());
    }

    #[test]
    fn renderable_carries_counts_and_findings() {
        let renderable = to_renderable(&runtime_error_report("boom"));
        assert_eq!(renderable.verdict, RenderableVerdictStatus::Fail);
        assert_eq!(renderable.findings.len(), 1);
        assert_eq!(renderable.findings[0].code, "runtime_error");
        assert_eq!(renderable.data.counts, RenderableCounts::default());
    }
}
