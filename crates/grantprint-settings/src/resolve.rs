use crate::{model::GrantprintConfigV1, presets};
use anyhow::Context;
use grantprint_domain::Field;
use grantprint_domain::policy::{ChecksumMode, FailOn, IngestPolicy};

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub checksum_mode: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub policy: IngestPolicy,
}

pub fn resolve_config(
    cfg: GrantprintConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "strict".to_string());

    let mut policy = presets::preset(&profile).with_context(|| {
        format!(
            "unknown profile: {profile} (expected {})",
            presets::PROFILES.join("|")
        )
    })?;

    if let Some(mode) = overrides.checksum_mode.as_deref().or(cfg.checksum_mode.as_deref()) {
        policy.checksum_mode = parse_checksum_mode(mode)?;
    }

    if let Some(fields) = cfg.required_fields.as_deref() {
        policy.required_fields = parse_required_fields(fields)?;
    }

    if let Some(fail_on_s) = cfg.fail_on.as_deref() {
        policy.fail_on = parse_fail_on(fail_on_s)?;
    }

    Ok(ResolvedConfig { policy })
}

fn parse_required_fields(names: &[String]) -> anyhow::Result<Vec<Field>> {
    let mut fields = Vec::with_capacity(names.len());
    for name in names {
        let field = Field::from_name(name)
            .with_context(|| format!("invalid required_fields entry: {name}"))?;
        if !fields.contains(&field) {
            fields.push(field);
        }
    }
    Ok(fields)
}

fn parse_checksum_mode(v: &str) -> anyhow::Result<ChecksumMode> {
    match v {
        "verify" => Ok(ChecksumMode::Verify),
        "trust" => Ok(ChecksumMode::Trust),
        "ignore" => Ok(ChecksumMode::Ignore),
        other => anyhow::bail!("unknown checksum_mode: {other} (expected verify|trust|ignore)"),
    }
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "error" => Ok(FailOn::Error),
        "warning" | "warn" => Ok(FailOn::Warning),
        other => anyhow::bail!("unknown fail_on: {other} (expected error|warning)"),
    }
}
