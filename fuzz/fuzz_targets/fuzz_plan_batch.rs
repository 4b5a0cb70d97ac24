//! Fuzz target for ingest planning.
//!
//! Goal: planning a batch against a snapshot should **never panic**, and it
//! always yields exactly one decision per incoming record.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_plan_batch
//! ```

#![no_main]

use arbitrary::Arbitrary;
use grantprint_domain::plan::{KnownIndex, plan_ingest};
use grantprint_domain::policy::IngestPolicy;
use grantprint_types::KnownGrant;
use libfuzzer_sys::fuzz_target;
use serde_json::json;

#[derive(Arbitrary, Debug)]
struct IncomingRecord {
    title: Option<String>,
    source: Option<String>,
    url: Option<String>,
    slug: Option<String>,
    hash_checksum: Option<String>,
}

#[derive(Arbitrary, Debug)]
struct StoredGrant {
    source: String,
    slug: String,
    url: Option<String>,
    hash_checksum: String,
}

#[derive(Arbitrary, Debug)]
struct PlanInput {
    incoming: Vec<IncomingRecord>,
    known: Vec<StoredGrant>,
}

fuzz_target!(|input: PlanInput| {
    if input.incoming.len() > 64 || input.known.len() > 64 {
        return;
    }

    let mut index = KnownIndex::new();
    for stored in &input.known {
        index.insert(
            &stored.source,
            &KnownGrant {
                slug: stored.slug.clone(),
                hash_checksum: stored.hash_checksum.clone(),
                url: stored.url.clone(),
                title: None,
            },
        );
    }

    let records: Vec<_> = input
        .incoming
        .iter()
        .map(|r| {
            json!({
                "title": r.title,
                "source": r.source,
                "url": r.url,
                "slug": r.slug,
                "hash_checksum": r.hash_checksum,
            })
        })
        .collect();

    let plan = plan_ingest(&records, &index, &IngestPolicy::default());
    assert_eq!(plan.decisions.len(), records.len());
});
