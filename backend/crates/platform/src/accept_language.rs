//! Accept-Language Negotiation
//!
//! Weighted language negotiation for the locale redirect at the site root.
//! Pure and total: malformed header content never panics, it just loses
//! the malformed entry.

/// A parsed Accept-Language entry
#[derive(Debug, Clone, PartialEq)]
struct LanguageEntry {
    /// Primary subtag, lowercased ("es" from "es-ES")
    primary: String,
    /// q-value, 1.0 when absent or unparsable
    weight: f32,
}

/// Parse an Accept-Language header value into weighted entries
///
/// Entries look like `tag` or `tag;q=0.8`. Empty tags are dropped,
/// missing or non-numeric weights default to 1.0.
fn parse_header(header: &str) -> Vec<LanguageEntry> {
    let mut entries: Vec<LanguageEntry> = header
        .split(',')
        .filter_map(|part| {
            let mut sections = part.trim().split(';');
            let tag = sections.next()?.trim();
            if tag.is_empty() {
                return None;
            }

            let weight = sections
                .find_map(|param| {
                    let (key, value) = param.trim().split_once('=')?;
                    if key.trim() == "q" {
                        value.trim().parse::<f32>().ok()
                    } else {
                        None
                    }
                })
                .filter(|q| q.is_finite())
                .unwrap_or(1.0);

            let primary = tag
                .split('-')
                .next()
                .unwrap_or(tag)
                .to_ascii_lowercase();

            Some(LanguageEntry { primary, weight })
        })
        .collect();

    // Stable sort: ties keep header order
    entries.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    entries
}

/// Pick the best supported locale for an Accept-Language header
///
/// Returns the first primary subtag (by descending weight) that equals a
/// supported locale, case-insensitively. Absent or unmatched headers
/// resolve to the default.
pub fn negotiate<'a>(
    header: Option<&str>,
    supported: &[&'a str],
    default: &'a str,
) -> &'a str {
    let Some(header) = header else {
        return default;
    };

    for entry in parse_header(header) {
        if let Some(locale) = supported
            .iter()
            .find(|locale| locale.eq_ignore_ascii_case(&entry.primary))
        {
            return locale;
        }
    }

    default
}
