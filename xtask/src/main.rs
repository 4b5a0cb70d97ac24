//! Developer tasks (schema generation, contract checks, golden conformance).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use schemars::schema_for;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));

    if manifest_dir.ends_with("xtask") {
        manifest_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(manifest_dir)
    } else {
        manifest_dir
    }
}

fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

fn contracts_fixtures_dir() -> PathBuf {
    project_root().join("contracts").join("fixtures")
}

fn golden_fixtures_dir() -> PathBuf {
    project_root().join("tests").join("fixtures")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_plan_schema() -> schemars::Schema {
    schema_for!(grantprint_types::IngestReport)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(grantprint_settings::GrantprintConfigV1)
}

fn generate_known_schema() -> schemars::Schema {
    schema_for!(grantprint_types::KnownGrants)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "grantprint.plan.v1.json",
            generate: generate_plan_schema,
        },
        SchemaSpec {
            filename: "grantprint.config.v1.json",
            generate: generate_config_schema,
        },
        SchemaSpec {
            filename: "grantprint.known.v1.json",
            generate: generate_known_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Check that schemas/ matches what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }

    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {name}");
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {name}");
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Check fingerprint fixtures and golden plan reports");
    eprintln!("  conform-full      conform, plus run the grantprint binary against golden fixtures");
    eprintln!("  explain-coverage  Validate all check IDs and codes have explanations");
}

/// Token pattern for reasons and codes.
fn is_valid_token(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Compile the plan report schema straight from the Rust types.
fn plan_validator() -> anyhow::Result<jsonschema::Validator> {
    let schema = serde_json::to_value(generate_plan_schema()).context("Failed to encode schema")?;
    jsonschema::draft202012::new(&schema)
        .map_err(|e| anyhow::anyhow!("Failed to compile plan schema: {}", e))
}

/// Schema and token checks for one plan report.
fn check_report(label: &str, report: &Value, validator: &jsonschema::Validator) -> Vec<String> {
    let mut errors = Vec::new();

    for err in validator.iter_errors(report) {
        errors.push(format!("{label}: schema validation: {err}"));
    }

    if let Some(decisions) = report.get("decisions").and_then(Value::as_array) {
        for (i, decision) in decisions.iter().enumerate() {
            if let Some(reason) = decision.get("reason").and_then(Value::as_str)
                && !is_valid_token(reason)
            {
                errors.push(format!(
                    "{label}: decisions[{i}].reason '{reason}' is not a valid token"
                ));
            }
        }
    }

    if let Some(findings) = report.get("findings").and_then(Value::as_array) {
        for (i, finding) in findings.iter().enumerate() {
            if let Some(code) = finding.get("code").and_then(Value::as_str)
                && !is_valid_token(code)
            {
                errors.push(format!(
                    "{label}: findings[{i}].code '{code}' is not a valid token"
                ));
            }
        }
    }

    errors
}

fn fixture_dirs() -> anyhow::Result<Vec<PathBuf>> {
    let root = golden_fixtures_dir();
    let mut dirs = Vec::new();
    for entry in fs::read_dir(&root)
        .with_context(|| format!("Failed to read {}", root.display()))?
    {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Contract conformance.
///
/// This checks:
/// 1. Every fingerprint fixture in contracts/fixtures/ hashes to its recorded digest
/// 2. Every golden expected.report.json validates against the plan schema
/// 3. Decision reasons and finding codes match the token pattern
fn conform() -> anyhow::Result<()> {
    let fixtures_path = contracts_fixtures_dir().join("fingerprints.json");
    let text = fs::read_to_string(&fixtures_path)
        .with_context(|| format!("Failed to read {}", fixtures_path.display()))?;
    let output = grantprint_app::run_verify_fixtures(&text)?;
    print!("{}", grantprint_app::format_verify_output(&output));
    if !output.passed() {
        bail!("{} fingerprint fixtures failed", output.failed());
    }
    println!("✓ fingerprint fixtures match\n");

    let validator = plan_validator()?;
    println!("✓ grantprint.plan.v1 schema compiles");

    let mut errors = Vec::new();
    let mut count = 0;
    for dir in fixture_dirs()? {
        let golden = dir.join("expected.report.json");
        if !golden.exists() {
            continue;
        }
        let name = dir_name(&dir);
        let report = read_json(&golden)?;
        let found = check_report(&name, &report, &validator);
        if found.is_empty() {
            println!("  ✓ {name} validates");
        }
        errors.extend(found);
        count += 1;
    }

    if count == 0 {
        bail!("No golden reports found in {}", golden_fixtures_dir().display());
    }

    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ All {count} golden reports pass conformance checks!");
    Ok(())
}

/// Full conformance: `conform`, then run the built binary on each golden
/// fixture and compare its report with expected.report.json.
fn conform_full() -> anyhow::Result<()> {
    conform()?;

    println!("\n--- Full conformance: grantprint binary output ---\n");

    let validator = plan_validator()?;
    let bin = project_root().join("target").join("debug").join("grantprint");
    #[cfg(target_os = "windows")]
    let bin = bin.with_extension("exe");

    if !bin.exists() {
        bail!(
            "grantprint binary not found at {}.\n\
            Run `cargo build -p grantprint-cli` first.",
            bin.display()
        );
    }

    let mut errors = Vec::new();
    for dir in fixture_dirs()? {
        let incoming = dir.join("incoming.json");
        let golden = dir.join("expected.report.json");
        if !incoming.exists() || !golden.exists() {
            continue;
        }
        let name = dir_name(&dir);

        let temp_dir = tempfile::tempdir().context("Failed to create temp dir")?;
        let report_out = temp_dir.path().join("report.json");

        let mut cmd = std::process::Command::new(&bin);
        cmd.arg("--config")
            .arg(dir.join("grantprint.toml"))
            .arg("plan")
            .arg("--incoming")
            .arg(&incoming)
            .arg("--report-out")
            .arg(&report_out);
        let known = dir.join("known.json");
        if known.exists() {
            cmd.arg("--known").arg(known);
        }
        let output = cmd
            .output()
            .with_context(|| format!("Failed to run grantprint on fixture '{name}'"))?;

        // 0 = pass/warn, 2 = fail verdict; anything else is a runtime error.
        if !matches!(output.status.code(), Some(0 | 2)) {
            errors.push(format!(
                "fixture '{name}': grantprint exited with {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr)
            ));
            continue;
        }
        if !report_out.exists() {
            errors.push(format!("fixture '{name}': no report output generated"));
            continue;
        }

        let report = read_json(&report_out)?;
        errors.extend(check_report(&name, &report, &validator));

        let actual = grantprint_test_util::normalize_nondeterministic(report);
        if actual != read_json(&golden)? {
            errors.push(format!(
                "fixture '{name}': output differs from expected.report.json"
            ));
        } else {
            println!("  ✓ fixture '{name}' matches golden report");
        }
    }

    if !errors.is_empty() {
        eprintln!("\nFull conformance errors:");
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!(
            "Full conformance validation failed with {} errors",
            errors.len()
        );
    }

    println!("\n✓ Full conformance checks passed!");
    Ok(())
}

/// Validate that all check IDs and codes have explanations.
fn explain_coverage() -> anyhow::Result<()> {
    use grantprint_types::explain::{all_check_ids, all_codes, lookup_explanation};

    let mut errors = Vec::new();
    for (kind, ids) in [("Check ID", all_check_ids()), ("Code", all_codes())] {
        for id in ids {
            let Some(exp) = lookup_explanation(id) else {
                errors.push(format!("{kind} '{id}' has no explanation"));
                continue;
            };
            for (part, text) in [
                ("title", exp.title),
                ("description", exp.description),
                ("remediation", exp.remediation),
                ("before example", exp.examples.before),
                ("after example", exp.examples.after),
            ] {
                if text.is_empty() {
                    errors.push(format!("{kind} '{id}' has empty {part}"));
                }
            }
        }
    }

    if errors.is_empty() {
        println!("✓ {} check IDs have explanations", all_check_ids().len());
        println!("✓ {} codes have explanations", all_codes().len());
        println!("\n✓ All explain coverage checks passed!");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {error}");
        }
        bail!(
            "Explain coverage validation failed with {} errors",
            errors.len()
        )
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "conform-full" => conform_full(),
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            println!("{}", grantprint_app::SCHEMA_FINGERPRINTS_V1);
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_pattern() {
        assert!(is_valid_token("content_changed"));
        assert!(is_valid_token("missing_required_field"));
        assert!(!is_valid_token("Content"));
        assert!(!is_valid_token("_leading"));
        assert!(!is_valid_token("has-dash"));
        assert!(!is_valid_token(""));
    }

    #[test]
    fn schema_filenames_are_unique() {
        let specs = schema_specs();
        let mut names: Vec<_> = specs.iter().map(|s| s.filename).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), specs.len());
    }

    #[test]
    fn bad_reason_is_reported() {
        let validator = plan_validator().expect("schema compiles");
        let report = serde_json::json!({
            "decisions": [{"reason": "Not-A-Token"}],
            "findings": [{"code": "ok_code"}],
        });
        let errors = check_report("t", &report, &validator);
        assert!(errors.iter().any(|e| e.contains("decisions[0].reason")));
        assert!(!errors.iter().any(|e| e.contains("findings[0].code")));
    }
}
