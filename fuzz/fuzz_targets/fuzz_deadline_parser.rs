//! Fuzz target for free-text deadline parsing.
//!
//! Goal: the parser should **never panic** on any input, and whatever it
//! accepts must format back to an ISO-8601 string.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_deadline_parser
//! ```

#![no_main]

use grantprint_domain::deadline::{deadline_to_iso, parse_deadline};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        // Keep inputs near the length of a scraped deadline cell.
        if text.len() > 512 {
            return;
        }
        if let Some(dt) = parse_deadline(text) {
            assert!(deadline_to_iso(dt).contains('T'));
        }
    }
});
