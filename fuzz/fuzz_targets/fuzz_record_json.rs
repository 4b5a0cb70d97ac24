//! Fuzz target for record parsing and fingerprinting.
//!
//! Goal: any JSON value either fails `GrantRecord::from_json` with an error
//! or fingerprints to 64 lowercase hex characters. Never a panic.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_record_json
//! ```

#![no_main]

use grantprint_domain::{GrantRecord, canonical_text, fingerprint, normalize};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let Ok(record) = GrantRecord::from_json(&value) else {
        return;
    };

    let fp = fingerprint(&record);
    assert_eq!(fp.as_str().len(), 64);

    // The canonical text must always be valid JSON.
    let text = canonical_text(&normalize(&record));
    assert!(serde_json::from_str::<serde_json::Value>(&text).is_ok());
});
