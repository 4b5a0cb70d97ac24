//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Fingerprint determinism and default equivalence
//! - Extra keys never affecting the digest
//! - Every fingerprint field contributing to the digest
//! - Canonical text always being valid JSON with the expected content

use crate::canonical::canonical_text;
use crate::fingerprint::{fingerprint, fingerprint_json};
use crate::normalize::normalize;
use crate::plan::{KnownIndex, plan_ingest};
use crate::policy::IngestPolicy;
use crate::record::{Field, GrantRecord};
use crate::slug::{SLUG_MAX_LEN, grant_slug};
use grantprint_types::{DecisionAction, ids};
use proptest::prelude::*;
use serde_json::{Map, Value, json};

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

fn arb_field() -> impl Strategy<Value = Field> {
    prop::sample::select(Field::ALL.to_vec())
}

/// Any text, including control characters, quotes and non-ASCII.
fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-zA-Z0-9 ]{1,24}",
        any::<String>(),
        prop::string::string_regex(r#"["\\\x00-\x1F\x7Fé€😀]{1,8}"#).unwrap(),
    ]
}

/// A JSON value a fingerprint field may legally hold.
fn arb_field_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        arb_text().prop_map(Value::String),
        any::<u32>().prop_map(|n| json!(n)),
        any::<i64>().prop_map(|n| json!(n)),
    ]
}

fn arb_record_json() -> impl Strategy<Value = Value> {
    prop::collection::vec((arb_field(), arb_field_value()), 0..8).prop_map(|pairs| {
        let mut map = Map::new();
        for (field, value) in pairs {
            map.insert(field.name().to_string(), value);
        }
        Value::Object(map)
    })
}

/// Records shaped like one scraper run: few sources, short titles, shared urls.
fn arb_batch_record() -> impl Strategy<Value = Value> {
    (
        arb_record_json(),
        prop::sample::select(vec!["ukri", "nihr"]),
        "[A-Za-z0-9 ]{0,40}",
        prop::sample::select(vec!["", "https://a.example", "https://b.example"]),
    )
        .prop_map(|(mut record, source, title, url)| {
            record[ids::FIELD_SOURCE] = json!(source);
            record[ids::FIELD_TITLE] = json!(title);
            record[ids::FIELD_URL] = json!(url);
            record
        })
}

/// Keys that are never fingerprint fields.
fn arb_extra_key() -> impl Strategy<Value = String> {
    "[a-z_]{1,16}".prop_filter("must not be a fingerprint field", |k| {
        !ids::is_fingerprint_field(k)
    })
}

// ============================================================================
// Fingerprint properties
// ============================================================================

proptest! {
    /// Same record, same digest.
    #[test]
    fn fingerprint_is_deterministic(record in arb_record_json()) {
        let a = fingerprint_json(&record).expect("generated records are valid");
        let b = fingerprint_json(&record.clone()).expect("generated records are valid");
        prop_assert_eq!(a, b);
    }

    /// A field set to its default reads exactly like the field being absent.
    #[test]
    fn defaults_are_equivalent_to_absence(record in arb_record_json(), field in arb_field()) {
        let mut absent = record.clone();
        absent.as_object_mut().expect("object").remove(field.name());

        let mut default = record.clone();
        default[field.name()] = json!(field.default_text());

        let mut null = record;
        null[field.name()] = Value::Null;

        let base = fingerprint_json(&absent).expect("valid");
        prop_assert_eq!(&base, &fingerprint_json(&default).expect("valid"));
        prop_assert_eq!(&base, &fingerprint_json(&null).expect("valid"));
    }

    /// Keys outside the fingerprint field set never matter, whatever they hold.
    #[test]
    fn extra_keys_are_ignored(
        record in arb_record_json(),
        key in arb_extra_key(),
        value in prop_oneof![
            Just(json!(true)),
            Just(json!([1, 2, 3])),
            Just(json!({"nested": {"deep": null}})),
            arb_text().prop_map(Value::String),
        ],
    ) {
        let mut extended = record.clone();
        extended[key.as_str()] = value;
        prop_assert_eq!(
            fingerprint_json(&record).expect("valid"),
            fingerprint_json(&extended).expect("valid")
        );
    }

    /// Changing one normalized field changes the digest.
    #[test]
    fn every_field_is_significant(
        record in arb_record_json(),
        field in arb_field(),
        a in "[a-z]{1,12}",
        b in "[a-z]{1,12}",
    ) {
        prop_assume!(a != b);
        let mut left = record.clone();
        left[field.name()] = json!(a);
        let mut right = record;
        right[field.name()] = json!(b);

        prop_assert_ne!(
            fingerprint_json(&left).expect("valid"),
            fingerprint_json(&right).expect("valid")
        );
    }

    /// The canonical text is a JSON object whose members are the normalized fields.
    #[test]
    fn canonical_text_parses_back_to_normalized_fields(record in arb_record_json()) {
        let parsed = GrantRecord::from_json(&record).expect("valid");
        let normalized = normalize(&parsed);
        let text = canonical_text(&normalized);

        let decoded: Value = serde_json::from_str(&text).expect("canonical text is JSON");
        let object = decoded.as_object().expect("object");
        prop_assert_eq!(object.len(), Field::ALL.len());
        for (name, value) in normalized.iter() {
            prop_assert_eq!(object.get(name).and_then(Value::as_str), Some(value));
        }
    }

    /// Digests are always 64 lowercase hex characters.
    #[test]
    fn digest_shape(record in arb_record_json()) {
        let parsed = GrantRecord::from_json(&record).expect("valid");
        let fp = fingerprint(&parsed);
        prop_assert_eq!(fp.as_str().len(), 64);
        prop_assert!(fp.as_str().bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')));
    }
}

// ============================================================================
// Slug and planning properties
// ============================================================================

proptest! {
    /// Slugs are ASCII, bounded, and never start with a separator.
    #[test]
    fn slugs_are_ascii_and_bounded(title in any::<String>(), source in "[a-z]{0,8}") {
        let slug = grant_slug(&title, &source);
        prop_assert!(slug.len() <= SLUG_MAX_LEN);
        prop_assert!(slug.is_ascii());
        prop_assert!(!slug.starts_with('-') && !slug.starts_with('_'));
        prop_assert!(
            slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        );
    }

    /// Every incoming record gets exactly one decision, in input order.
    #[test]
    fn plan_has_one_decision_per_record(records in prop::collection::vec(arb_record_json(), 0..12)) {
        let plan = plan_ingest(&records, &KnownIndex::new(), &IngestPolicy::default());

        prop_assert_eq!(plan.decisions.len(), records.len());
        for (i, decision) in plan.decisions.iter().enumerate() {
            prop_assert_eq!(decision.index, i);
            prop_assert_ne!(decision.action, DecisionAction::Invalid);
        }
        let c = &plan.counts;
        prop_assert_eq!(c.created + c.updated + c.skipped + c.invalid, records.len());
    }

    /// Replanning a batch against its own outcome changes nothing.
    #[test]
    fn replanning_creates_nothing(records in prop::collection::vec(arb_batch_record(), 0..8)) {
        let first = plan_ingest(&records, &KnownIndex::new(), &IngestPolicy::default());
        let mut index = KnownIndex::new();
        for d in first.decisions.iter().filter(|d| d.action == DecisionAction::Create) {
            let (Some(source), Some(slug), Some(fp)) = (&d.source, &d.slug, &d.fingerprint) else {
                continue;
            };
            let record = GrantRecord::from_json(&records[d.index]).expect("valid");
            let url = Some(normalize(&record).get(Field::Url).to_string());
            index.insert(
                source,
                &grantprint_types::KnownGrant {
                    slug: slug.clone(),
                    hash_checksum: fp.to_string(),
                    url,
                    title: None,
                },
            );
        }

        let second = plan_ingest(&records, &index, &IngestPolicy::default());
        prop_assert_eq!(second.counts.created, 0);
    }
}
