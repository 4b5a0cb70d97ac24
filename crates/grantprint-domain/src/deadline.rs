//! Deadline text parsing for scraped grant pages.
//!
//! Scrapers see deadlines in many shapes ("2 December 2025", "12/02/2025",
//! "Monday 2 December 2025 10:30 AM", ...). [`parse_deadline`] turns the known
//! shapes into a timestamp so every ingestion process emits the same deadline
//! text, and therefore the same fingerprint, for the same page. Text that
//! matches no known shape yields `None`; a guessed date would be worse than
//! no date.

use crate::normalize::datetime_text;
use regex::{Captures, Regex};
use std::sync::OnceLock;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

/// Exact shapes, tried in order. The first full match wins, so day-first
/// numeric dates take precedence over month-first ones.
const EXACT_PATTERNS: &[&str] = &[
    // 2025-12-02
    r"^(?P<y>\d{4})-(?P<m>\d{1,2})-(?P<d>\d{1,2})$",
    // 2025-12-02T10:30:00
    r"^(?P<y>\d{4})-(?P<m>\d{1,2})-(?P<d>\d{1,2})T(?P<H>\d{1,2}):(?P<M>\d{1,2}):(?P<S>\d{1,2})$",
    // 2025-12-02T10:30:00+00:00
    r"^(?P<y>\d{4})-(?P<m>\d{1,2})-(?P<d>\d{1,2})T(?P<H>\d{1,2}):(?P<M>\d{1,2}):(?P<S>\d{1,2})(?P<tz>Z|[+-]\d{2}:?\d{2})$",
    // 02/12/2025
    r"^(?P<d>\d{1,2})/(?P<m>\d{1,2})/(?P<y>\d{4})$",
    // 12/02/2025
    r"^(?P<m>\d{1,2})/(?P<d>\d{1,2})/(?P<y>\d{4})$",
    // 02-12-2025
    r"^(?P<d>\d{1,2})-(?P<m>\d{1,2})-(?P<y>\d{4})$",
    // 2 December 2025, 2 Dec 2025
    r"^(?P<d>\d{1,2})\s+(?P<mon>[a-z]+)\s+(?P<y>\d{4})$",
    // December 2, 2025, Dec 2, 2025
    r"^(?P<mon>[a-z]+)\s+(?P<d>\d{1,2}),\s+(?P<y>\d{4})$",
    // 2 December 2025 10:30
    r"^(?P<d>\d{1,2})\s+(?P<mon>[a-z]+)\s+(?P<y>\d{4})\s+(?P<H>\d{1,2}):(?P<M>\d{1,2})$",
    // 2 December 2025 10:30 AM
    r"^(?P<d>\d{1,2})\s+(?P<mon>[a-z]+)\s+(?P<y>\d{4})\s+(?P<I>\d{1,2}):(?P<M>\d{1,2})\s+(?P<p>am|pm)$",
    // Monday 2 December 2025
    r"^(?P<wd>[a-z]+)\s+(?P<d>\d{1,2})\s+(?P<mon>[a-z]+)\s+(?P<y>\d{4})$",
    // Monday 2 December 2025 10:30
    r"^(?P<wd>[a-z]+)\s+(?P<d>\d{1,2})\s+(?P<mon>[a-z]+)\s+(?P<y>\d{4})\s+(?P<H>\d{1,2}):(?P<M>\d{1,2})$",
    // Monday 2 December 2025 10:30 AM
    r"^(?P<wd>[a-z]+)\s+(?P<d>\d{1,2})\s+(?P<mon>[a-z]+)\s+(?P<y>\d{4})\s+(?P<I>\d{1,2}):(?P<M>\d{1,2})\s+(?P<p>am|pm)$",
];

/// Free-text fallbacks: a date (optionally with a time) somewhere in the text.
const EMBEDDED_PATTERNS: &[&str] = &[
    r"(?P<d>\d{1,2})\s+(?P<mon>[A-Za-z]+)\s+(?P<y>\d{4})(?:\s+(?P<H>\d{1,2}):(?P<M>\d{2})(?:\s*(?P<p>AM|PM))?)?",
    r"(?P<mon>[A-Za-z]+)\s+(?P<d>\d{1,2})(?P<comma>,)?\s+(?P<y>\d{4})(?:\s+(?P<H>\d{1,2}):(?P<M>\d{2})(?:\s*(?P<p>AM|PM))?)?",
];

const MONTHS: [(&str, Month); 12] = [
    ("january", Month::January),
    ("february", Month::February),
    ("march", Month::March),
    ("april", Month::April),
    ("may", Month::May),
    ("june", Month::June),
    ("july", Month::July),
    ("august", Month::August),
    ("september", Month::September),
    ("october", Month::October),
    ("november", Month::November),
    ("december", Month::December),
];

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

fn exact_res() -> &'static [Regex] {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        EXACT_PATTERNS
            .iter()
            .map(|p| Regex::new(&format!("(?i){p}")).expect("deadline pattern must compile"))
            .collect()
    })
}

fn embedded_res() -> &'static [Regex] {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        EMBEDDED_PATTERNS
            .iter()
            .map(|p| Regex::new(&format!("(?i){p}")).expect("deadline pattern must compile"))
            .collect()
    })
}

/// Parse a scraped deadline. Naive values are taken as UTC.
pub fn parse_deadline(raw: &str) -> Option<OffsetDateTime> {
    let cleaned = clean(raw);
    if cleaned.is_empty() {
        return None;
    }

    for re in exact_res() {
        if let Some(caps) = re.captures(&cleaned)
            && let Some(dt) = assemble(&caps, TwelveHourRule::Strict)
        {
            return Some(dt);
        }
    }

    for re in embedded_res() {
        // Only the first occurrence of each shape is considered.
        let Some(caps) = re.captures(&cleaned) else {
            continue;
        };
        // "December 2 2025" is not one of the accepted shapes.
        if re_has_group(re, "comma") && caps.name("comma").is_none() {
            continue;
        }
        if let Some(dt) = assemble(&caps, TwelveHourRule::AddNoonForPm) {
            return Some(dt);
        }
    }

    None
}

/// ISO 8601 text of a parsed deadline: `YYYY-MM-DDTHH:MM:SS+HH:MM`.
pub fn deadline_to_iso(dt: OffsetDateTime) -> String {
    datetime_text(dt, 'T')
}

/// Trim whitespace and surrounding quotes (straight or curly).
fn clean(raw: &str) -> String {
    let straight: String = raw
        .trim()
        .chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            c => c,
        })
        .collect();
    straight
        .trim_matches('"')
        .trim_matches('\'')
        .trim()
        .to_string()
}

#[derive(Clone, Copy)]
enum TwelveHourRule {
    /// `12 AM` is midnight, `12 PM` is noon, hours outside 1..=12 are rejected.
    Strict,
    /// Free text: add 12 to PM hours below 12 and leave everything else alone.
    AddNoonForPm,
}

fn re_has_group(re: &Regex, name: &str) -> bool {
    re.capture_names().flatten().any(|n| n == name)
}

fn assemble(caps: &Captures<'_>, rule: TwelveHourRule) -> Option<OffsetDateTime> {
    let year: i32 = caps.name("y")?.as_str().parse().ok()?;
    let day: u8 = caps.name("d")?.as_str().parse().ok()?;
    let month = match (caps.name("m"), caps.name("mon")) {
        (Some(m), _) => Month::try_from(m.as_str().parse::<u8>().ok()?).ok()?,
        (None, Some(name)) => month_from_name(name.as_str())?,
        (None, None) => return None,
    };
    if let Some(wd) = caps.name("wd")
        && !WEEKDAYS.contains(&wd.as_str().to_ascii_lowercase().as_str())
    {
        return None;
    }
    let date = Date::from_calendar_date(year, month, day).ok()?;

    let minute: u8 = match caps.name("M") {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    let second: u8 = match caps.name("S") {
        Some(s) => s.as_str().parse().ok()?,
        None => 0,
    };
    let hour = match (caps.name("H"), caps.name("I")) {
        (Some(h), _) => {
            let h: u8 = h.as_str().parse().ok()?;
            apply_meridiem(h, caps.name("p").map(|p| p.as_str()), rule)?
        }
        (None, Some(i)) => {
            let h: u8 = i.as_str().parse().ok()?;
            apply_meridiem(h, caps.name("p").map(|p| p.as_str()), rule)?
        }
        (None, None) => 0,
    };
    let time = Time::from_hms(hour, minute, second).ok()?;

    let offset = match caps.name("tz") {
        Some(tz) => parse_offset(tz.as_str())?,
        None => UtcOffset::UTC,
    };
    Some(PrimitiveDateTime::new(date, time).assume_offset(offset))
}

fn apply_meridiem(hour: u8, meridiem: Option<&str>, rule: TwelveHourRule) -> Option<u8> {
    let Some(meridiem) = meridiem else {
        return Some(hour);
    };
    let pm = meridiem.eq_ignore_ascii_case("pm");
    match rule {
        TwelveHourRule::Strict => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            Some(match (pm, hour) {
                (false, 12) => 0,
                (true, 12) => 12,
                (true, h) => h + 12,
                (false, h) => h,
            })
        }
        TwelveHourRule::AddNoonForPm => Some(if pm && hour < 12 { hour + 12 } else { hour }),
    }
}

fn month_from_name(name: &str) -> Option<Month> {
    let name = name.to_ascii_lowercase();
    MONTHS
        .iter()
        .find(|(full, _)| *full == name || (name.len() == 3 && full.starts_with(&name)))
        .map(|(_, month)| *month)
}

/// `Z`, `+HH:MM` or `+HHMM`.
fn parse_offset(tz: &str) -> Option<UtcOffset> {
    if tz.eq_ignore_ascii_case("z") {
        return Some(UtcOffset::UTC);
    }
    let (sign, rest) = tz.split_at(1);
    let digits: String = rest.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 4 {
        return None;
    }
    let hours: i8 = digits[..2].parse().ok()?;
    let minutes: i8 = digits[2..].parse().ok()?;
    let (hours, minutes) = if sign == "-" {
        (-hours, -minutes)
    } else {
        (hours, minutes)
    };
    UtcOffset::from_hms(hours, minutes, 0).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iso(raw: &str) -> Option<String> {
        parse_deadline(raw).map(deadline_to_iso)
    }

    #[test]
    fn numeric_shapes() {
        assert_eq!(iso("2025-12-02").as_deref(), Some("2025-12-02T00:00:00+00:00"));
        assert_eq!(
            iso("2025-12-02T10:30:00").as_deref(),
            Some("2025-12-02T10:30:00+00:00")
        );
        assert_eq!(
            iso("2025-12-02T10:30:00+01:00").as_deref(),
            Some("2025-12-02T10:30:00+01:00")
        );
        assert_eq!(
            iso("2025-12-02T10:30:00-0500").as_deref(),
            Some("2025-12-02T10:30:00-05:00")
        );
    }

    #[test]
    fn day_first_wins_for_ambiguous_slashes() {
        assert_eq!(iso("02/12/2025").as_deref(), Some("2025-12-02T00:00:00+00:00"));
        // Only valid month-first.
        assert_eq!(iso("12/25/2025").as_deref(), Some("2025-12-25T00:00:00+00:00"));
        assert_eq!(iso("02-12-2025").as_deref(), Some("2025-12-02T00:00:00+00:00"));
    }

    #[test]
    fn month_name_shapes() {
        for raw in [
            "2 December 2025",
            "2 Dec 2025",
            "December 2, 2025",
            "dec 2, 2025",
            "Tuesday 2 December 2025",
        ] {
            assert_eq!(
                iso(raw).as_deref(),
                Some("2025-12-02T00:00:00+00:00"),
                "{raw}"
            );
        }
    }

    #[test]
    fn times_and_meridiem() {
        assert_eq!(
            iso("2 December 2025 10:30").as_deref(),
            Some("2025-12-02T10:30:00+00:00")
        );
        assert_eq!(
            iso("2 December 2025 5:00 PM").as_deref(),
            Some("2025-12-02T17:00:00+00:00")
        );
        assert_eq!(
            iso("Monday 1 December 2025 12:15 AM").as_deref(),
            Some("2025-12-01T00:15:00+00:00")
        );
    }

    #[test]
    fn quotes_and_whitespace_are_stripped() {
        assert_eq!(
            iso("  \u{201C}2 December 2025\u{201D} ").as_deref(),
            Some("2025-12-02T00:00:00+00:00")
        );
        assert_eq!(iso("'2025-12-02'").as_deref(), Some("2025-12-02T00:00:00+00:00"));
    }

    #[test]
    fn embedded_dates_are_found() {
        assert_eq!(
            iso("Closes: 2 December 2025 4:00pm UK time").as_deref(),
            Some("2025-12-02T16:00:00+00:00")
        );
        assert_eq!(
            iso("Deadline is March 3, 2026").as_deref(),
            Some("2026-03-03T00:00:00+00:00")
        );
    }

    #[test]
    fn unparseable_text_is_none() {
        assert_eq!(iso(""), None);
        assert_eq!(iso("Open - rolling deadline"), None);
        assert_eq!(iso("31 February 2025"), None);
        assert_eq!(iso("December 2 2025"), None);
        assert_eq!(iso("TBC"), None);
    }

    #[test]
    fn unknown_weekday_falls_back_to_embedded_date() {
        assert_eq!(
            iso("Someday 2 December 2025 10:30").as_deref(),
            Some("2025-12-02T10:30:00+00:00")
        );
    }
}
