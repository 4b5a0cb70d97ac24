//! Reading record batches and stored-grant snapshots from text.

use anyhow::Context;
use grantprint_types::KnownGrants;
use serde_json::Value;

/// Parse a batch of records: one JSON value, a JSON array of values, or JSON Lines.
///
/// Elements are returned as-is; whether each is a usable record is decided later.
pub fn parse_records(text: &str) -> anyhow::Result<Vec<Value>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Ok(match value {
            Value::Array(items) => items,
            other => vec![other],
        });
    }

    let mut records = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value: Value =
            serde_json::from_str(line).with_context(|| format!("parse JSON line {}", i + 1))?;
        records.push(value);
    }
    Ok(records)
}

/// Parse one snapshot file: a single `{source, grants}` object or an array of them.
pub fn parse_known_snapshots(text: &str) -> anyhow::Result<Vec<KnownGrants>> {
    let value: Value = serde_json::from_str(text).context("parse known grants json")?;
    match value {
        Value::Array(_) => serde_json::from_value(value).context("parse known grants list"),
        _ => {
            let snapshot: KnownGrants =
                serde_json::from_value(value).context("parse known grants snapshot")?;
            Ok(vec![snapshot])
        }
    }
}
