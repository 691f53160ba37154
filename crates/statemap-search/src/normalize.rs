use regex::Regex;
use statemap_core::STATEMENT_PREFIX;
use std::sync::LazyLock;

static DIGITS_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("static pattern"));
static PREFIX_SPACED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^MAG\s*([0-9]+)$").expect("static pattern"));
static PREFIX_DASHED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^MAG-([0-9]+)$").expect("static pattern"));

/// A trimmed, non-empty query in the two forms the matcher compares against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    /// Canonical statement id when the input looks like one, otherwise the
    /// upper-cased input.
    pub term: String,
    /// The trimmed input, upper-cased.
    pub raw_upper: String,
}

/// Normalize free-text input. Returns `None` for empty or whitespace-only input.
///
/// `7`, `MAG 7`, `mag7` and `mag-7` all become `MAG-007`; anything else is
/// upper-cased verbatim.
pub fn normalize(raw: &str) -> Option<NormalizedQuery> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let digits = if DIGITS_ONLY.is_match(trimmed) {
        Some(trimmed)
    } else {
        PREFIX_SPACED
            .captures(trimmed)
            .or_else(|| PREFIX_DASHED.captures(trimmed))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    };

    let raw_upper = trimmed.to_uppercase();
    let term = match digits {
        Some(digits) => canonical_id(digits),
        None => raw_upper.clone(),
    };
    Some(NormalizedQuery { term, raw_upper })
}

/// `MAG-` plus the digits left-padded with zeros to at least three places.
pub fn canonical_id(digits: &str) -> String {
    format!("{STATEMENT_PREFIX}-{digits:0>3}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(raw: &str) -> String {
        normalize(raw).unwrap().term
    }

    #[test]
    fn test_digits_are_padded() {
        assert_eq!(term("7"), "MAG-007");
        assert_eq!(term("42"), "MAG-042");
        assert_eq!(term("001"), "MAG-001");
        assert_eq!(term("1234"), "MAG-1234");
    }

    #[test]
    fn test_prefix_forms() {
        assert_eq!(term("MAG 7"), "MAG-007");
        assert_eq!(term("mag7"), "MAG-007");
        assert_eq!(term("Mag   12"), "MAG-012");
        assert_eq!(term("mag-7"), "MAG-007");
        assert_eq!(term("MAG-0160"), "MAG-0160");
    }

    #[test]
    fn test_other_input_is_upper_cased() {
        let q = normalize("  lighthouse ").unwrap();
        assert_eq!(q.term, "LIGHTHOUSE");
        assert_eq!(q.raw_upper, "LIGHTHOUSE");
        assert_eq!(term("MAG-7a"), "MAG-7A");
        assert_eq!(term("MAG -7"), "MAG -7");
    }

    #[test]
    fn test_raw_upper_keeps_input_shape() {
        let q = normalize("mag 7").unwrap();
        assert_eq!(q.term, "MAG-007");
        assert_eq!(q.raw_upper, "MAG 7");
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("   \t"), None);
    }
}
