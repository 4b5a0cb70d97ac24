use crate::{RenderableAction, RenderableReport, RenderableSeverity, RenderableVerdictStatus};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Grantprint ingest plan\n\n");
    let verdict = match report.verdict {
        RenderableVerdictStatus::Pass => "PASS",
        RenderableVerdictStatus::Warn => "WARN",
        RenderableVerdictStatus::Fail => "FAIL",
    };
    let d = &report.data;
    out.push_str(&format!(
        "- Verdict: **{}**\n- Profile: `{}` (checksum mode `{}`)\n- Records: {} (created {}, updated {}, skipped {}, invalid {})\n- Known grants: {}\n\n",
        verdict,
        d.profile,
        d.checksum_mode,
        d.records_total,
        d.counts.created,
        d.counts.updated,
        d.counts.skipped,
        d.counts.invalid,
        d.known_grants
    ));

    if report.decisions.is_empty() {
        out.push_str("No records.\n");
    } else {
        out.push_str("## Decisions\n\n");
        out.push_str("| # | Action | Source | Slug | Reason |\n");
        out.push_str("|---|---|---|---|---|\n");
        for dec in &report.decisions {
            let action = match dec.action {
                RenderableAction::Create => "create",
                RenderableAction::Update => "update",
                RenderableAction::Skip => "skip",
                RenderableAction::Invalid => "invalid",
            };
            let slug = match (&dec.slug, dec.slug_changed) {
                (Some(s), true) => format!("`{}` (moved)", cell(s)),
                (Some(s), false) => format!("`{}`", cell(s)),
                (None, _) => String::new(),
            };
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                dec.index,
                action,
                cell(dec.source.as_deref().unwrap_or("")),
                slug,
                cell(&dec.reason)
            ));
        }
        out.push('\n');
    }

    if report.findings.is_empty() {
        out.push_str("No findings.\n");
        return out;
    }

    out.push_str("## Findings\n\n");

    for f in &report.findings {
        let sev = match f.severity {
            RenderableSeverity::Info => "INFO",
            RenderableSeverity::Warning => "WARN",
            RenderableSeverity::Error => "ERROR",
        };

        match f.record_index {
            Some(i) => out.push_str(&format!(
                "- [{}] `{}` / `{}` (record {}): {}\n",
                sev, f.check_id, f.code, i, f.message
            )),
            None => out.push_str(&format!(
                "- [{}] `{}` / `{}`: {}\n",
                sev, f.check_id, f.code, f.message
            )),
        }

        if let Some(help) = &f.help {
            out.push_str(&format!("  - help: {}\n", help));
        }
    }

    out
}

// Table cells: pipes and newlines would break the row.
fn cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\r', '\n'], " ")
}
