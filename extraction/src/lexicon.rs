//! Keyword matching helpers and shared word lists.
//!
//! Two matching flavours are used across the representations:
//!
//! - [`contains_word`] matches a keyword or phrase only on word boundaries,
//!   which is what sentence classification wants ("but" must not fire on
//!   "attribute").
//! - [`mentions`] is a looser substring test used when classifying short
//!   entity names ("Neural Networks" mentions "network"). Keywords of three
//!   characters or fewer still require word boundaries there.

/// Common English function words ignored by keyword extraction.
pub const STOP_WORDS: &[&str] = &[
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "from", "as",
    "is", "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will",
    "would", "could", "should", "may", "might", "can", "must", "this", "that", "these", "those",
];

/// Capitalized words that open sentences without naming anything.
pub const CAPITALIZED_FUNCTION_WORDS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "in", "on", "at", "for", "with", "by",
    "it", "its", "he", "she", "they", "we", "you", "i", "his", "her", "their", "our", "there",
    "here", "when", "while", "if", "but", "and", "or", "so", "as", "after", "before", "during",
    "however", "also", "then", "thus", "some", "many", "most", "each", "every", "one", "what",
    "which", "who", "why", "how", "is", "are", "was", "were",
];

/// Whether `text` contains `keyword` as a whole word or phrase.
///
/// Matching is ASCII case-insensitive; callers usually pass lower-cased
/// text anyway.
pub fn contains_word(text: &str, keyword: &str) -> bool {
    find_word(text, keyword, 0).is_some()
}

/// Whether `text` mentions `keyword` anywhere, requiring word boundaries
/// only for keywords of three characters or fewer.
pub fn mentions(text: &str, keyword: &str) -> bool {
    if keyword.chars().count() <= 3 {
        contains_word(text, keyword)
    } else {
        text.to_lowercase().contains(&keyword.to_lowercase())
    }
}

/// Whether any keyword in `keywords` is contained as a whole word.
pub fn contains_any_word(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| contains_word(text, kw))
}

/// Number of keywords in `keywords` contained as whole words.
pub fn count_words(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|kw| contains_word(text, kw)).count()
}

/// Whether any keyword in `keywords` is mentioned (see [`mentions`]).
pub fn mentions_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| mentions(text, kw))
}

/// Count word-bounded, case-insensitive occurrences of `needle`.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    let mut count = 0;
    let mut from = 0;
    while let Some((_, end)) = find_word(haystack, needle, from) {
        count += 1;
        from = end;
    }
    count
}

/// Byte offset of the first word-bounded, case-insensitive occurrence.
pub fn first_occurrence(haystack: &str, needle: &str) -> Option<usize> {
    find_word(haystack, needle, 0).map(|(start, _)| start)
}

/// Whether `word` is a stop word.
pub fn is_stop_word(word: &str) -> bool {
    let lower = word.to_lowercase();
    STOP_WORDS.contains(&lower.as_str())
}

/// Whether `word` is a capitalized function word such as "The" or "In".
pub fn is_function_word(word: &str) -> bool {
    let lower = word.to_lowercase();
    CAPITALIZED_FUNCTION_WORDS.contains(&lower.as_str())
}

/// Find `needle` in `haystack` at or after `from`, on word boundaries.
///
/// Returns the byte range of the match in `haystack`.
fn find_word(haystack: &str, needle: &str, from: usize) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }
    let hay = haystack.to_ascii_lowercase();
    let pat = needle.to_ascii_lowercase();
    let mut search_from = from;

    while search_from <= hay.len() {
        let rel = hay.get(search_from..)?.find(&pat)?;
        let start = search_from + rel;
        let end = start + pat.len();

        let before_ok = hay[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !is_word_char(c));
        let after_ok = hay[end..].chars().next().is_none_or(|c| !is_word_char(c));

        if before_ok && after_ok {
            return Some((start, end));
        }

        search_from = start + hay[start..].chars().next().map_or(1, char::len_utf8);
    }

    None
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_contains_word_respects_boundaries() {
        assert!(contains_word("but it works", "but"));
        assert!(!contains_word("an attribute", "but"));
        assert!(contains_word("for example, this", "for example"));
        assert!(contains_word("See e.g. the docs", "e.g."));
        assert!(!contains_word("likely", "like"));
    }

    #[test]
    fn test_mentions_uses_substrings_for_long_keywords() {
        assert!(mentions("Neural Networks", "network"));
        assert!(!mentions("Britain", "ai"));
        assert!(mentions("AI", "ai"));
    }

    #[test]
    fn test_count_occurrences_is_word_bounded() {
        let text = "AI helps. Said AI: the aim of AI is clear.";
        assert_eq!(count_occurrences(text, "ai"), 3);
        assert_eq!(first_occurrence(text, "AI"), Some(0));
        assert_eq!(count_occurrences(text, "missing"), 0);
    }

    #[test]
    fn test_function_words() {
        assert!(is_function_word("The"));
        assert!(!is_function_word("Einstein"));
        assert!(is_stop_word("WITH"));
    }
}
