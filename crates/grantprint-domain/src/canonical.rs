//! Canonical text for a normalized grant record.
//!
//! This encoding is part of the fingerprint wire contract. Other ingestion
//! processes reproduce it byte-for-byte, so nothing here may change without
//! changing every stored fingerprint:
//!
//! - keys in byte-sorted order
//! - `{"key": "value", "key": "value"}`: item separator `", "`, key separator `": "`
//! - minimal string escaping (`\"`, `\\`, `\b`, `\f`, `\n`, `\r`, `\t`, `\u00xx`)
//! - every other character, non-ASCII included, written literally as UTF-8

use crate::normalize::NormalizedRecord;
use std::fmt::Write as _;

pub const ITEM_SEPARATOR: &str = ", ";
pub const KEY_SEPARATOR: &str = ": ";

/// Render the canonical text that gets hashed.
pub fn canonical_text(record: &NormalizedRecord) -> String {
    let mut out = String::with_capacity(256);
    out.push('{');
    for (i, (key, value)) in record.iter().enumerate() {
        if i > 0 {
            out.push_str(ITEM_SEPARATOR);
        }
        emit_string(key, &mut out);
        out.push_str(KEY_SEPARATOR);
        emit_string(value, &mut out);
    }
    out.push('}');
    out
}

fn emit_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c < '\u{0020}' => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::record::{Field, GrantRecord};

    #[test]
    fn empty_record_text() {
        assert_eq!(
            canonical_text(&normalize(&GrantRecord::new())),
            r#"{"deadline": "", "description": "", "funding_amount": "", "source": "", "status": "unknown", "summary": "", "title": "", "url": ""}"#
        );
    }

    #[test]
    fn fixture_record_text() {
        let record = GrantRecord::new()
            .with(Field::Title, "Test Grant")
            .with(Field::Source, "UKRI")
            .with(Field::Summary, "")
            .with(Field::Description, "")
            .with(Field::Url, "https://example.org")
            .with(Field::FundingAmount, "50000")
            .with(Field::Deadline, "2025-01-01")
            .with(Field::Status, "open");
        assert_eq!(
            canonical_text(&normalize(&record)),
            r#"{"deadline": "2025-01-01", "description": "", "funding_amount": "50000", "source": "UKRI", "status": "open", "summary": "", "title": "Test Grant", "url": "https://example.org"}"#
        );
    }

    #[test]
    fn non_ascii_is_written_literally() {
        let record = GrantRecord::new().with(Field::Title, "Bourse d’innovation — Énergie");
        let text = canonical_text(&normalize(&record));
        assert!(text.contains(r#""title": "Bourse d’innovation — Énergie""#));
        assert!(!text.contains("\\u"));
    }

    #[test]
    fn control_characters_and_quotes_are_escaped() {
        let record =
            GrantRecord::new().with(Field::Title, "Line\nbreak \"quoted\" \\ tab\t\u{1}\u{7f}");
        let text = canonical_text(&normalize(&record));
        assert!(
            text.contains(r#""title": "Line\nbreak \"quoted\" \\ tab\t\u0001"#),
            "{text}"
        );
        assert!(text.contains('\u{7f}'));
    }

    #[test]
    fn matches_serde_json_string_escaping() {
        let tricky = "\u{0}\u{8}\u{c}\u{1f} / é 🎓 \"\\";
        let mut ours = String::new();
        emit_string(tricky, &mut ours);
        assert_eq!(ours, serde_json::to_string(tricky).expect("serialize"));
    }
}
