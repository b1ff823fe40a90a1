//! Word-boundary-anchored phrase matching
//!
//! Crypto tickers are short and collide with ordinary words ("ETH" in
//! "Ethan", "SOL" in "solution"), so a plain `contains` is not enough.
//! A match only counts when the characters on both sides of it are not
//! word characters (letters, digits, `_`). String edges, whitespace and
//! punctuation such as `$`, `-`, `/` or `.` are boundaries.
//!
//! Both arguments are expected in [`normalize`]d form.

/// Lowercase `text` and collapse whitespace runs into single spaces
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.extend(word.chars().flat_map(char::to_lowercase));
    }
    out
}

/// Byte offset of the first boundary-anchored occurrence of `needle`
pub fn find_bounded(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }

    let mut from = 0;
    while let Some(offset) = haystack[from..].find(needle) {
        let start = from + offset;
        let end = start + needle.len();
        if boundary_before(haystack, start) && boundary_after(haystack, end) {
            return Some(start);
        }
        // Resume one character later so overlapping candidates are seen
        from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
    }
    None
}

/// Whether `needle` occurs in `haystack` on word boundaries
pub fn contains_bounded(haystack: &str, needle: &str) -> bool {
    find_bounded(haystack, needle).is_some()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn boundary_before(haystack: &str, start: usize) -> bool {
    haystack[..start]
        .chars()
        .next_back()
        .is_none_or(|c| !is_word_char(c))
}

fn boundary_after(haystack: &str, end: usize) -> bool {
    haystack[end..].chars().next().is_none_or(|c| !is_word_char(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Bitcoin\tHits\n\nNEW  High "), "bitcoin hits new high");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_whole_word_match() {
        assert_eq!(find_bounded("eth rallies", "eth"), Some(0));
        assert_eq!(find_bounded("buy eth now", "eth"), Some(4));
        assert_eq!(find_bounded("all about eth", "eth"), Some(10));
    }

    #[test]
    fn test_embedded_symbol_rejected() {
        assert!(!contains_bounded("beth is a token", "eth"));
        assert!(!contains_bounded("ethan bought lunch", "eth"));
        assert!(!contains_bounded("a new solution", "sol"));
        assert!(!contains_bounded("eth2 staking", "eth"));
        assert!(!contains_bounded("eth_usd pair", "eth"));
    }

    #[test]
    fn test_later_bounded_occurrence_found() {
        // First candidate is embedded, second is bounded
        assert_eq!(find_bounded("beth and eth", "eth"), Some(9));
    }

    #[test]
    fn test_punctuation_is_boundary() {
        assert!(contains_bounded("$btc pumps", "btc"));
        assert!(contains_bounded("btc-usd broke out", "btc"));
        assert!(contains_bounded("(eth) and sol.", "eth"));
        assert!(contains_bounded("(eth) and sol.", "sol"));
        assert!(contains_bounded("eth/btc ratio", "btc"));
    }

    #[test]
    fn test_multi_word_phrase() {
        assert!(contains_bounded("exchange faces regulatory ban today", "regulatory ban"));
        assert!(!contains_bounded("regulatory bank rules", "regulatory ban"));
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(find_bounded("", "eth"), None);
        assert_eq!(find_bounded("eth", ""), None);
    }

    #[test]
    fn test_unicode_neighbours() {
        // Non-ASCII letters are word characters too
        assert!(!contains_bounded("éeth", "eth"));
        assert!(contains_bounded("— eth —", "eth"));
        assert_eq!(find_bounded("ééeth eth", "eth"), Some(8));
    }
}
