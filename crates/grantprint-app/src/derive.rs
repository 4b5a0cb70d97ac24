//! Small derivations the scrapers need to agree on: deadlines and slugs.

use grantprint_domain::deadline::{deadline_to_iso, parse_deadline};
use grantprint_domain::slug::grant_slug;

/// ISO 8601 form of a scraped deadline, or `None` when the text is not a known date shape.
pub fn run_deadline(raw: &str) -> Option<String> {
    let parsed = parse_deadline(raw).map(deadline_to_iso);
    if parsed.is_none() {
        tracing::debug!(raw, "deadline text not recognised");
    }
    parsed
}

pub fn run_slug(title: &str, source: &str) -> String {
    grant_slug(title, source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_and_slug() {
        assert_eq!(
            run_deadline("2 December 2025").as_deref(),
            Some("2025-12-02T00:00:00+00:00")
        );
        assert_eq!(run_deadline("rolling"), None);
        assert_eq!(run_slug("Test Grant", "ukri"), "test-grant-ukri");
    }
}
