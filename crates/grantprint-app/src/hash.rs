//! The `hash` use case: fingerprint a batch of records.

use anyhow::Context;
use grantprint_domain::{GrantRecord, canonical_text, fingerprint_normalized, normalize};
use grantprint_types::Fingerprint;
use rayon::prelude::*;
use serde::Serialize;

use crate::input::parse_records;

#[derive(Clone, Debug)]
pub struct HashInput<'a> {
    /// A JSON object, a JSON array of objects, or JSON Lines.
    pub text: &'a str,
    /// Keep the canonical text next to each digest.
    pub canonical: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HashedRecord {
    pub index: usize,
    pub fingerprint: Fingerprint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
}

#[derive(Clone, Debug)]
pub struct HashOutput {
    /// In input order.
    pub records: Vec<HashedRecord>,
}

/// Fingerprint every record in the input. Fails on the first record that cannot be read.
pub fn run_hash(input: HashInput<'_>) -> anyhow::Result<HashOutput> {
    let values = parse_records(input.text).context("parse records")?;

    let records = values
        .par_iter()
        .enumerate()
        .map(|(index, value)| -> anyhow::Result<HashedRecord> {
            let record =
                GrantRecord::from_json(value).with_context(|| format!("record {index}"))?;
            let normalized = normalize(&record);
            Ok(HashedRecord {
                index,
                fingerprint: fingerprint_normalized(&normalized),
                canonical: input.canonical.then(|| canonical_text(&normalized)),
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    tracing::info!(records = records.len(), "fingerprinted records");
    Ok(HashOutput { records })
}

/// One line per record: the digest, the canonical text, or a JSON object.
pub fn format_hash_output(output: &HashOutput, json: bool) -> anyhow::Result<String> {
    let mut out = String::new();
    for record in &output.records {
        let line = if json {
            serde_json::to_string(record).context("serialize hash record")?
        } else {
            match &record.canonical {
                Some(canonical) => canonical.clone(),
                None => record.fingerprint.to_string(),
            }
        };
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}
