use regex::{NoExpand, Regex, RegexBuilder};

/// Literal substring matcher
///
/// Case-insensitive matching folds both sides with Unicode simple case
/// folding, so every match is a span of the original haystack.
#[derive(Debug, Clone)]
pub(crate) enum Matcher {
    Exact(String),
    Folded(Regex),
    /// Needles too large for a compiled regex, compared char by char
    FoldedScan(Vec<char>),
}

impl Matcher {
    /// `needle` must be non-empty; callers skip empty rules before compiling
    pub(crate) fn new(needle: &str, case_sensitive: bool) -> Self {
        debug_assert!(!needle.is_empty());

        if case_sensitive {
            return Matcher::Exact(needle.to_string());
        }

        match RegexBuilder::new(&regex::escape(needle))
            .case_insensitive(true)
            .build()
        {
            Ok(re) => Matcher::Folded(re),
            Err(_) => Matcher::FoldedScan(needle.chars().collect()),
        }
    }

    pub(crate) fn is_found(&self, haystack: &str) -> bool {
        match self {
            Matcher::Exact(needle) => haystack.contains(needle.as_str()),
            Matcher::Folded(re) => re.is_match(haystack),
            Matcher::FoldedScan(needle) => !folded_spans(needle, haystack).is_empty(),
        }
    }

    /// Replace every non-overlapping occurrence, left to right
    ///
    /// Returns `None` when nothing matched so callers can keep the haystack.
    pub(crate) fn replace_all(&self, haystack: &str, replacement: &str) -> Option<(String, usize)> {
        match self {
            Matcher::Exact(needle) => {
                let count = haystack.matches(needle.as_str()).count();
                (count > 0).then(|| (haystack.replace(needle.as_str(), replacement), count))
            }
            Matcher::Folded(re) => {
                let count = re.find_iter(haystack).count();
                (count > 0).then(|| {
                    let replaced = re.replace_all(haystack, NoExpand(replacement));
                    (replaced.into_owned(), count)
                })
            }
            Matcher::FoldedScan(needle) => {
                let spans = folded_spans(needle, haystack);
                if spans.is_empty() {
                    return None;
                }

                let mut replaced = String::with_capacity(haystack.len());
                let mut last = 0;
                for &(start, end) in &spans {
                    replaced.push_str(&haystack[last..start]);
                    replaced.push_str(replacement);
                    last = end;
                }
                replaced.push_str(&haystack[last..]);

                Some((replaced, spans.len()))
            }
        }
    }
}

fn chars_fold_equal(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase()) || a.to_uppercase().eq(b.to_uppercase())
}

/// Byte spans of non-overlapping folded matches, left to right
fn folded_spans(needle: &[char], haystack: &str) -> Vec<(usize, usize)> {
    let chars: Vec<(usize, char)> = haystack.char_indices().collect();
    let mut spans = Vec::new();
    let mut i = 0;

    while i + needle.len() <= chars.len() {
        let window = &chars[i..i + needle.len()];
        if needle
            .iter()
            .zip(window)
            .all(|(&n, &(_, h))| chars_fold_equal(n, h))
        {
            let start = chars[i].0;
            let end = chars
                .get(i + needle.len())
                .map_or(haystack.len(), |&(pos, _)| pos);
            spans.push((start, end));
            i += needle.len();
        } else {
            i += 1;
        }
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_counts_non_overlapping() {
        let matcher = Matcher::new("aa", true);
        let (out, count) = matcher.replace_all("aaaa a aaa", "b").unwrap();
        assert_eq!(out, "bb a ba");
        assert_eq!(count, 3);
    }

    #[test]
    fn test_folded_keeps_surrounding_text() {
        let matcher = Matcher::new("ssn", false);
        let (out, count) = matcher.replace_all("SSN: 1, Ssn: 2, ssn: 3", "[ID]").unwrap();
        assert_eq!(out, "[ID]: 1, [ID]: 2, [ID]: 3");
        assert_eq!(count, 3);
    }

    #[test]
    fn test_special_characters_are_literal() {
        let matcher = Matcher::new("a.b*(c)", false);
        assert!(!matcher.is_found("axb*(c)"));
        assert!(matcher.is_found("A.B*(C)"));
    }

    #[test]
    fn test_replacement_is_not_expanded() {
        let matcher = Matcher::new("price", false);
        let (out, _) = matcher.replace_all("Price", "$0 ${1}").unwrap();
        assert_eq!(out, "$0 ${1}");
    }

    #[test]
    fn test_no_match_returns_none() {
        let matcher = Matcher::new("zzz", true);
        assert!(matcher.replace_all("abc", "x").is_none());
        assert!(!matcher.is_found(""));
    }

    #[test]
    fn test_oversized_needle_falls_back_to_scan() {
        let needle = "ab".repeat(100_000);
        let matcher = Matcher::new(&needle, false);
        assert!(matches!(matcher, Matcher::FoldedScan(_)));

        let haystack = format!("<{}>", needle.to_uppercase());
        assert!(matcher.is_found(&haystack));
        let (out, count) = matcher.replace_all(&haystack, "[X]").unwrap();
        assert_eq!(out, "<[X]>");
        assert_eq!(count, 1);
    }

    #[test]
    fn test_scan_folds_unicode_and_keeps_offsets() {
        let matcher = Matcher::FoldedScan("straße".chars().collect());
        let (out, count) = matcher
            .replace_all("STRASSE, STRAẞE, Straße and straßen", "[S]")
            .unwrap();
        assert_eq!(out, "STRASSE, [S], [S] and [S]n");
        assert_eq!(count, 3);

        let sigma = Matcher::FoldedScan("σ".chars().collect());
        assert!(sigma.is_found("ΟΔΟΣ"));
        assert!(!sigma.is_found("odos"));
    }

    #[test]
    fn test_scan_matches_are_non_overlapping() {
        let matcher = Matcher::FoldedScan("aa".chars().collect());
        let (out, count) = matcher.replace_all("AAAA a aAa", "b").unwrap();
        assert_eq!(out, "bb a ba");
        assert_eq!(count, 3);
    }
}
