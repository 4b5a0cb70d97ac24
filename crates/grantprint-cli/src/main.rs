//! CLI entry point for grantprint.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, logging setup, and exit
//! codes. All business logic lives in the `grantprint-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use grantprint_app::{
    ExplainOutput, HashInput, PlanInput, format_explanation, format_hash_output,
    format_not_found, format_verify_output, parse_report_json, render_markdown, run_deadline,
    run_explain, run_hash, run_plan, run_slug, run_verify_fixtures, runtime_error_report,
    serialize_report, verdict_exit_code, write_text,
};
use grantprint_settings::Overrides;
use std::io::Read;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "grantprint",
    version,
    about = "Stable content fingerprints and ingest plans for grant records"
)]
struct Cli {
    /// Path to grantprint config TOML (missing file means defaults).
    #[arg(long, default_value = "grantprint.toml")]
    config: Utf8PathBuf,

    /// Override profile (strict|trusting|audit).
    #[arg(long)]
    profile: Option<String>,

    /// Override checksum handling (verify|trust|ignore).
    #[arg(long)]
    checksum_mode: Option<String>,

    /// Log filter for stderr (e.g. "debug", "grantprint_app=debug"). Defaults to RUST_LOG, then "warn".
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fingerprint records (a JSON object, a JSON array, or JSON Lines).
    Hash {
        /// Input file (reads stdin when omitted).
        #[arg(long)]
        input: Option<Utf8PathBuf>,

        /// Print the canonical text instead of the digest.
        #[arg(long)]
        canonical: bool,

        /// Print one JSON object per record.
        #[arg(long)]
        json: bool,
    },

    /// Plan create/update/skip for incoming records and write artifacts.
    Plan {
        /// Incoming records (a JSON object, a JSON array, or JSON Lines).
        #[arg(long)]
        incoming: Utf8PathBuf,

        /// Snapshot of stored grants (repeatable).
        #[arg(long)]
        known: Vec<Utf8PathBuf>,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/grantprint/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/grantprint/comment.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/grantprint/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Check record/fingerprint fixture pairs shared with other implementations.
    Verify {
        #[arg(long, default_value = "contracts/fixtures/fingerprints.json")]
        fixtures: Utf8PathBuf,
    },

    /// Parse scraped deadline text and print its ISO 8601 form.
    Deadline {
        /// The deadline text, e.g. "Monday 2 December 2025 5:00 PM".
        raw: String,
    },

    /// Print the slug the system of record derives for a grant.
    Slug { title: String, source: String },

    /// Explain a check_id or code with remediation guidance.
    Explain {
        /// The check_id (e.g., "ingest.checksum") or code (e.g., "checksum_mismatch") to explain.
        identifier: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match cli.cmd {
        Commands::Hash {
            ref input,
            canonical,
            json,
        } => cmd_hash(input.as_deref(), canonical, json),
        Commands::Plan {
            ref incoming,
            ref known,
            ref report_out,
            write_markdown,
            ref markdown_out,
        } => cmd_plan(
            &cli,
            incoming,
            known,
            report_out,
            write_markdown.then_some(markdown_out.as_path()),
        ),
        Commands::Md {
            ref report,
            ref output,
        } => cmd_md(report, output.as_deref()),
        Commands::Verify { ref fixtures } => cmd_verify(fixtures),
        Commands::Deadline { ref raw } => cmd_deadline(raw),
        Commands::Slug {
            ref title,
            ref source,
        } => {
            println!("{}", run_slug(title, source));
            Ok(())
        }
        Commands::Explain { ref identifier } => cmd_explain(identifier),
    }
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn")),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn cmd_hash(input: Option<&Utf8Path>, canonical: bool, json: bool) -> anyhow::Result<()> {
    let text = match input {
        Some(path) => read_text(path)?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("read stdin")?;
            text
        }
    };

    let output = run_hash(HashInput {
        text: &text,
        canonical,
    })?;
    print!("{}", format_hash_output(&output, json)?);
    Ok(())
}

fn cmd_plan(
    cli: &Cli,
    incoming: &Utf8Path,
    known: &[Utf8PathBuf],
    report_out: &Utf8Path,
    markdown_out: Option<&Utf8Path>,
) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        // Missing config file is allowed (defaults apply).
        let config_text = if cli.config.exists() {
            read_text(&cli.config)?
        } else {
            String::new()
        };
        let incoming_text = read_text(incoming)?;
        let known_texts = known
            .iter()
            .map(|path| read_text(path))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let output = run_plan(PlanInput {
            incoming_text: &incoming_text,
            known_texts,
            config_text: &config_text,
            overrides: Overrides {
                profile: cli.profile.clone(),
                checksum_mode: cli.checksum_mode.clone(),
            },
        })?;

        let data = serialize_report(&output.report)?;
        write_text(report_out, &data).context("write report json")?;

        if let Some(markdown_out) = markdown_out {
            let md = render_markdown(&output.report);
            write_text(markdown_out, md.as_bytes()).context("write markdown")?;
        }

        Ok(verdict_exit_code(output.report.verdict))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            tracing::error!("{err:#}");
            let report = runtime_error_report(&format!("{err:#}"));
            if let Ok(data) = serialize_report(&report) {
                let _ = write_text(report_out, &data);
            }
            eprintln!("grantprint error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let report = parse_report_json(&read_text(report_path)?)?;
    let md = render_markdown(&report);

    if let Some(out_path) = output {
        write_text(out_path, md.as_bytes()).context("write markdown output")?;
    } else {
        print!("{}", md);
    }

    Ok(())
}

fn cmd_verify(fixtures: &Utf8Path) -> anyhow::Result<()> {
    let output = run_verify_fixtures(&read_text(fixtures)?)?;
    print!("{}", format_verify_output(&output));
    if !output.passed() {
        std::process::exit(2);
    }
    Ok(())
}

fn cmd_deadline(raw: &str) -> anyhow::Result<()> {
    match run_deadline(raw) {
        Some(iso) => {
            println!("{iso}");
            Ok(())
        }
        None => {
            eprintln!("grantprint: unrecognised deadline: {raw}");
            std::process::exit(1);
        }
    }
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_check_ids,
            available_codes,
        } => {
            eprint!(
                "{}",
                format_not_found(&identifier, available_check_ids, available_codes)
            );
            std::process::exit(1);
        }
    }
}

fn read_text(path: &Utf8Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read {path}"))
}
