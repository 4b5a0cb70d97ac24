//! Grant slugs, derived the way the system of record derives them.

use unicode_normalization::UnicodeNormalization;

/// Column width of a stored slug.
pub const SLUG_MAX_LEN: usize = 500;

/// Base length kept when a `-N` counter suffix is appended.
const SLUG_COUNTER_BASE_LEN: usize = 490;

/// ASCII slug of free text.
///
/// Decomposes to NFKD and drops what is left outside ASCII, lowercases,
/// removes everything but word characters, whitespace and hyphens, collapses
/// runs of hyphens/whitespace into one hyphen, and trims `-`/`_` from both ends.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_sep = false;

    for c in text.nfkd().filter(char::is_ascii) {
        let c = c.to_ascii_lowercase();
        if c == '-' || is_space(c) {
            pending_sep = true;
        } else if c.is_ascii_alphanumeric() || c == '_' {
            if pending_sep {
                out.push('-');
                pending_sep = false;
            }
            out.push(c);
        }
        // Anything else is dropped without breaking a separator run.
    }
    if pending_sep {
        out.push('-');
    }

    out.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Slug for a grant: `slugify("{title} {source}")`, cut to the column width.
pub fn grant_slug(title: &str, source: &str) -> String {
    let mut slug = slugify(&format!("{title} {source}"));
    slug.truncate(SLUG_MAX_LEN);
    slug
}

/// First free slug: `base`, then `base[..490]-1`, `base[..490]-2`, ...
pub fn unique_slug(base: &str, is_taken: impl Fn(&str) -> bool) -> String {
    let base = truncate_ascii(base, SLUG_MAX_LEN);
    if !is_taken(base) {
        return base.to_string();
    }
    let stem = truncate_ascii(base, SLUG_COUNTER_BASE_LEN);
    let mut counter: u32 = 1;
    loop {
        let candidate = format!("{stem}-{counter}");
        if !is_taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

fn truncate_ascii(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// Whitespace as the reference slugifier's regex sees it, restricted to ASCII.
fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r' | '\u{1C}'..='\u{1F}')
}
