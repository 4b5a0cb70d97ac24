//! Create/update/skip planning against snapshots of stored grants.

use crate::fingerprint::fingerprint_normalized;
use crate::normalize::{normalize, value_text};
use crate::policy::{ChecksumMode, FailOn, IngestPolicy};
use crate::record::{Field, GrantRecord};
use crate::slug::{grant_slug, unique_slug};
use grantprint_types::{
    Decision, DecisionAction, Fingerprint, Finding, IngestCounts, KnownGrant, KnownGrants,
    Severity, Verdict, ids,
};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq)]
struct Entry {
    source: String,
    slug: String,
    url: Option<String>,
    hash_checksum: String,
}

/// Stored grants, indexed the way the system of record looks them up.
///
/// Slugs are unique across all sources; urls are only unique within one.
#[derive(Clone, Debug, Default)]
pub struct KnownIndex {
    entries: Vec<Entry>,
    by_slug: BTreeMap<String, usize>,
    by_url: BTreeMap<(String, String), usize>,
}

impl KnownIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshots(snapshots: &[KnownGrants]) -> Self {
        let mut index = Self::new();
        for snapshot in snapshots {
            for grant in &snapshot.grants {
                index.insert(&snapshot.source, grant);
            }
        }
        index
    }

    /// Add a stored grant. The first grant seen for a slug or url wins.
    pub fn insert(&mut self, source: &str, grant: &KnownGrant) {
        if self.by_slug.contains_key(&grant.slug) {
            return;
        }
        self.push(Entry {
            source: source.to_string(),
            slug: grant.slug.clone(),
            url: grant.url.clone().filter(|u| !u.is_empty()),
            hash_checksum: grant.hash_checksum.clone(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_slug_taken(&self, slug: &str) -> bool {
        self.by_slug.contains_key(slug)
    }

    fn push(&mut self, entry: Entry) {
        let idx = self.entries.len();
        self.by_slug.insert(entry.slug.clone(), idx);
        if let Some(url) = &entry.url {
            self.by_url
                .entry((entry.source.clone(), url.clone()))
                .or_insert(idx);
        }
        self.entries.push(entry);
    }

    /// `(source, slug)` first, then `(source, url)` for a non-empty url.
    fn lookup(&self, source: &str, slug: &str, url: &str) -> Option<(usize, Via)> {
        if let Some(&idx) = self.by_slug.get(slug)
            && self.entries[idx].source == source
        {
            return Some((idx, Via::Slug));
        }
        if url.is_empty() {
            return None;
        }
        self.by_url
            .get(&(source.to_string(), url.to_string()))
            .map(|&idx| (idx, Via::Url))
    }

    /// Point a stored grant at a new url, keeping `by_url` in step.
    fn set_url(&mut self, idx: usize, url: &str) {
        let entry = &self.entries[idx];
        if entry.url.as_deref() == Some(url) {
            return;
        }
        let source = entry.source.clone();
        if let Some(old) = entry.url.clone() {
            let key = (source.clone(), old);
            if self.by_url.get(&key) == Some(&idx) {
                self.by_url.remove(&key);
                // Another grant may still carry the old url.
                let other = self.entries.iter().enumerate().find(|(i, e)| {
                    *i != idx && e.source == key.0 && e.url.as_ref() == Some(&key.1)
                });
                if let Some((other, _)) = other {
                    self.by_url.insert(key, other);
                }
            }
        }
        self.by_url
            .entry((source, url.to_string()))
            .or_insert(idx);
        self.entries[idx].url = Some(url.to_string());
    }

    fn rename(&mut self, idx: usize, slug: String) {
        self.by_slug.remove(&self.entries[idx].slug);
        self.by_slug.insert(slug.clone(), idx);
        self.entries[idx].slug = slug;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Via {
    Slug,
    Url,
}

/// Outcome of planning one batch of incoming records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngestPlan {
    pub decisions: Vec<Decision>,
    pub findings: Vec<Finding>,
    pub counts: IngestCounts,
    pub verdict: Verdict,
}

/// Decide, record by record, what the system of record would do with a batch.
///
/// Records are planned in input order against `known` plus every record
/// already planned earlier in the same batch.
pub fn plan_ingest(incoming: &[Value], known: &KnownIndex, policy: &IngestPolicy) -> IngestPlan {
    let mut index = known.clone();
    let mut decisions = Vec::with_capacity(incoming.len());
    let mut findings = Vec::new();
    let mut counts = IngestCounts::default();

    for (position, value) in incoming.iter().enumerate() {
        let decision = plan_one(position, value, &mut index, policy, &mut findings);
        match decision.action {
            DecisionAction::Create => counts.created += 1,
            DecisionAction::Update => counts.updated += 1,
            DecisionAction::Skip => counts.skipped += 1,
            DecisionAction::Invalid => counts.invalid += 1,
        }
        decisions.push(decision);
    }

    let verdict = compute_verdict(&findings, policy.fail_on);
    IngestPlan {
        decisions,
        findings,
        counts,
        verdict,
    }
}

fn plan_one(
    position: usize,
    value: &Value,
    index: &mut KnownIndex,
    policy: &IngestPolicy,
    findings: &mut Vec<Finding>,
) -> Decision {
    let record = match GrantRecord::from_json(value) {
        Ok(record) => record,
        Err(err) => {
            findings.push(Finding {
                severity: Severity::Error,
                check_id: ids::CHECK_INGEST_FIELD_TYPES.to_string(),
                code: err.code().to_string(),
                message: err.to_string(),
                record_index: Some(position),
                field: err.field().map(str::to_string),
                help: Some("Send strings or numbers for fingerprint fields, or omit them.".into()),
            });
            return bare_decision(position, DecisionAction::Invalid, err.code(), None);
        }
    };

    let normalized = normalize(&record);
    let source = normalized.get(Field::Source).to_string();
    let reported_source = Some(source.clone()).filter(|s| !s.is_empty());

    let missing: Vec<Field> = policy
        .required_fields
        .iter()
        .copied()
        .filter(|&field| !has_text(&record, field))
        .collect();
    if !missing.is_empty() {
        for field in &missing {
            findings.push(Finding {
                severity: Severity::Warning,
                check_id: ids::CHECK_INGEST_REQUIRED_FIELDS.to_string(),
                code: ids::CODE_MISSING_REQUIRED_FIELD.to_string(),
                message: format!("record has no `{}`; it will not be stored", field.name()),
                record_index: Some(position),
                field: Some(field.name().to_string()),
                help: None,
            });
        }
        return bare_decision(
            position,
            DecisionAction::Skip,
            ids::CODE_MISSING_REQUIRED_FIELD,
            reported_source,
        );
    }

    let computed = fingerprint_normalized(&normalized);
    let fingerprint = resolve_checksum(position, value, computed, policy.checksum_mode, findings);

    let slug = match value.get(ids::META_SLUG) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => grant_slug(normalized.get(Field::Title), &source),
    };
    let url = normalized.get(Field::Url);

    match index.lookup(&source, &slug, url) {
        Some((idx, _)) if index.entries[idx].hash_checksum == fingerprint.as_str() => Decision {
            index: position,
            action: DecisionAction::Skip,
            reason: ids::REASON_UNCHANGED.to_string(),
            source: reported_source,
            slug: Some(index.entries[idx].slug.clone()),
            fingerprint: Some(fingerprint),
            previous_fingerprint: None,
            slug_changed: false,
        },
        Some((idx, via)) => {
            let previous = index.entries[idx].hash_checksum.clone();
            let mut stored_slug = index.entries[idx].slug.clone();
            let slug_changed = via == Via::Url && stored_slug != slug;
            if slug_changed {
                let renamed = unique_slug(&slug, |s| index.is_slug_taken(s));
                index.rename(idx, renamed.clone());
                stored_slug = renamed;
            }
            index.entries[idx].hash_checksum = fingerprint.as_str().to_string();
            if !url.is_empty() {
                index.set_url(idx, url);
            }

            Decision {
                index: position,
                action: DecisionAction::Update,
                reason: ids::REASON_CONTENT_CHANGED.to_string(),
                source: reported_source,
                slug: Some(stored_slug),
                fingerprint: Some(fingerprint),
                previous_fingerprint: Some(previous),
                slug_changed,
            }
        }
        None => {
            let slug = unique_slug(&slug, |s| index.is_slug_taken(s));
            index.push(Entry {
                source,
                slug: slug.clone(),
                url: Some(url.to_string()).filter(|u| !u.is_empty()),
                hash_checksum: fingerprint.as_str().to_string(),
            });

            Decision {
                index: position,
                action: DecisionAction::Create,
                reason: ids::REASON_NEW.to_string(),
                source: reported_source,
                slug: Some(slug),
                fingerprint: Some(fingerprint),
                previous_fingerprint: None,
                slug_changed: false,
            }
        }
    }
}

/// Present with a non-empty text form.
fn has_text(record: &GrantRecord, field: Field) -> bool {
    record
        .get(field)
        .is_some_and(|value| !value_text(value).is_empty())
}

fn resolve_checksum(
    position: usize,
    value: &Value,
    computed: Fingerprint,
    mode: ChecksumMode,
    findings: &mut Vec<Finding>,
) -> Fingerprint {
    if mode == ChecksumMode::Ignore {
        return computed;
    }
    let supplied = match value.get(ids::META_HASH_CHECKSUM) {
        None | Some(Value::Null) => return computed,
        Some(Value::String(s)) if s.is_empty() => return computed,
        Some(Value::String(s)) => s.as_str(),
        Some(other) => {
            findings.push(malformed_checksum(position, &other.to_string()));
            return computed;
        }
    };

    let supplied = match Fingerprint::parse(supplied) {
        Ok(fp) => fp,
        Err(_) => {
            findings.push(malformed_checksum(position, supplied));
            return computed;
        }
    };

    match mode {
        ChecksumMode::Trust => supplied,
        _ => {
            if supplied != computed {
                findings.push(Finding {
                    severity: Severity::Warning,
                    check_id: ids::CHECK_INGEST_CHECKSUM.to_string(),
                    code: ids::CODE_CHECKSUM_MISMATCH.to_string(),
                    message: format!(
                        "supplied hash_checksum {supplied} does not match computed {computed}"
                    ),
                    record_index: Some(position),
                    field: Some(ids::META_HASH_CHECKSUM.to_string()),
                    help: Some(
                        "Recompute the checksum with the shared fingerprint rule, or drop it."
                            .into(),
                    ),
                });
            }
            computed
        }
    }
}

fn malformed_checksum(position: usize, supplied: &str) -> Finding {
    Finding {
        severity: Severity::Warning,
        check_id: ids::CHECK_INGEST_CHECKSUM.to_string(),
        code: ids::CODE_MALFORMED_CHECKSUM.to_string(),
        message: format!("supplied hash_checksum `{supplied}` is not 64 lowercase hex characters"),
        record_index: Some(position),
        field: Some(ids::META_HASH_CHECKSUM.to_string()),
        help: None,
    }
}

fn bare_decision(
    position: usize,
    action: DecisionAction,
    reason: &str,
    source: Option<String>,
) -> Decision {
    Decision {
        index: position,
        action,
        reason: reason.to_string(),
        source,
        slug: None,
        fingerprint: None,
        previous_fingerprint: None,
        slug_changed: false,
    }
}

fn compute_verdict(findings: &[Finding], fail_on: FailOn) -> Verdict {
    let has_error = findings.iter().any(|f| f.severity == Severity::Error);
    if has_error {
        return Verdict::Fail;
    }

    let has_warn = findings.iter().any(|f| f.severity == Severity::Warning);
    if has_warn {
        return match fail_on {
            FailOn::Warning => Verdict::Fail,
            FailOn::Error => Verdict::Warn,
        };
    }

    Verdict::Pass
}
