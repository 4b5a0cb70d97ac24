//! Field normalization: every fingerprint field becomes exactly one string.

use crate::record::{Field, FieldValue, GrantRecord};
use std::fmt::Write as _;
use time::{Date, OffsetDateTime};

/// The eight normalized field values, in canonical order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NormalizedRecord {
    values: [String; 8],
}

impl NormalizedRecord {
    pub fn get(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    /// `(name, value)` pairs in canonical (byte-sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        Field::ALL
            .into_iter()
            .map(|field| (field.name(), self.get(field)))
    }
}

/// Apply the per-field normalization rules.
///
/// Absent fields and empty strings take the field default (`""`, or
/// `"unknown"` for status). Present values are rendered with
/// [`value_text`].
pub fn normalize(record: &GrantRecord) -> NormalizedRecord {
    let values = Field::ALL.map(|field| match record.get(field).map(value_text) {
        Some(text) if !text.is_empty() => text,
        _ => field.default_text().to_string(),
    });
    NormalizedRecord { values }
}

/// Text form of a present field value.
///
/// Text passes through verbatim. Dates and timestamps use the textual
/// convention of the system of record's deadline column, so a typed value and
/// the string a scraper would have emitted for it fingerprint identically.
pub fn value_text(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(s) => s.clone(),
        FieldValue::Number(n) => n.to_string(),
        FieldValue::Date(d) => date_text(*d),
        FieldValue::DateTime(dt) => datetime_text(*dt, ' '),
    }
}

fn date_text(d: Date) -> String {
    format!("{:04}-{:02}-{:02}", d.year(), u8::from(d.month()), d.day())
}

/// `YYYY-MM-DD{sep}HH:MM:SS[.ffffff]+HH:MM`
pub(crate) fn datetime_text(dt: OffsetDateTime, sep: char) -> String {
    let mut out = date_text(dt.date());
    let _ = write!(
        out,
        "{sep}{:02}:{:02}:{:02}",
        dt.hour(),
        dt.minute(),
        dt.second()
    );
    let micros = dt.microsecond();
    if micros != 0 {
        let _ = write!(out, ".{micros:06}");
    }

    let offset = dt.offset();
    let sign = if offset.is_negative() { '-' } else { '+' };
    let _ = write!(
        out,
        "{sign}{:02}:{:02}",
        offset.whole_hours().unsigned_abs(),
        offset.minutes_past_hour().unsigned_abs()
    );
    let seconds = offset.seconds_past_minute().unsigned_abs();
    if seconds != 0 {
        let _ = write!(out, ":{seconds:02}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn empty_record_takes_defaults() {
        let n = normalize(&GrantRecord::new());
        for field in Field::ALL {
            assert_eq!(n.get(field), field.default_text());
        }
        assert_eq!(n.get(Field::Status), "unknown");
    }

    #[test]
    fn empty_status_becomes_unknown() {
        let n = normalize(&GrantRecord::new().with(Field::Status, ""));
        assert_eq!(n.get(Field::Status), "unknown");
    }

    #[test]
    fn text_is_not_trimmed() {
        let n = normalize(&GrantRecord::new().with(Field::Title, "  Test Grant "));
        assert_eq!(n.get(Field::Title), "  Test Grant ");
    }

    #[test]
    fn numbers_use_json_number_text() {
        let n = normalize(&GrantRecord::new().with(Field::FundingAmount, 50000u64));
        assert_eq!(n.get(Field::FundingAmount), "50000");

        let float = serde_json::Number::from_f64(1250.5).expect("finite");
        let n = normalize(&GrantRecord::new().with(Field::FundingAmount, float));
        assert_eq!(n.get(Field::FundingAmount), "1250.5");
    }

    #[test]
    fn dates_and_timestamps_use_deadline_column_text() {
        let n = normalize(&GrantRecord::new().with(Field::Deadline, date!(2025 - 01 - 01)));
        assert_eq!(n.get(Field::Deadline), "2025-01-01");

        let n = normalize(
            &GrantRecord::new().with(Field::Deadline, datetime!(2025-01-01 00:00:00 UTC)),
        );
        assert_eq!(n.get(Field::Deadline), "2025-01-01 00:00:00+00:00");

        let n = normalize(
            &GrantRecord::new().with(Field::Deadline, datetime!(2025-03-31 17:05:09.25 -05:30)),
        );
        assert_eq!(n.get(Field::Deadline), "2025-03-31 17:05:09.250000-05:30");
    }

    #[test]
    fn iter_is_canonical_order() {
        let names: Vec<_> = normalize(&GrantRecord::new()).iter().map(|(k, _)| k).collect();
        assert_eq!(
            names,
            [
                "deadline",
                "description",
                "funding_amount",
                "source",
                "status",
                "summary",
                "title",
                "url"
            ]
        );
    }
}
