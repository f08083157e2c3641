//! Token-overlap similarity.

use std::collections::BTreeSet;

use crate::lexicon;

/// Lower-cased whitespace tokens of `text`.
pub fn tokens(text: &str) -> BTreeSet<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Overlap ratio `|A ∩ B| / min(|A|, |B|)`, or 0 when either side is empty.
pub fn overlap_ratio(a: &str, b: &str) -> f64 {
    let a = tokens(a);
    let b = tokens(b);
    let smaller = a.len().min(b.len());
    if smaller == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / smaller as f64
}

/// Whether the two texts share at least one token that is not a stop word.
pub fn shares_content_token(a: &str, b: &str) -> bool {
    let b = tokens(b);
    tokens(a)
        .iter()
        .any(|token| !lexicon::is_stop_word(token) && b.contains(token))
}
