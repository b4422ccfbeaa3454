use crate::types::TokenSet;

/// Split text into its set of distinct whitespace-delimited tokens.
///
/// Each maximal non-whitespace run is one token, attached punctuation
/// included. No case-folding, no stemming. Empty text yields an empty
/// set.
pub fn token_set(text: &str) -> TokenSet {
    text.split_whitespace().map(str::to_string).collect()
}

/// Jaccard index of two token sets: intersection size over union size,
/// in `[0, 1]`.
///
/// Defined as 0.0 when both sets are empty, so comparisons against a
/// fixed threshold stay well-defined. Symmetric in its arguments.
pub fn jaccard(a: &TokenSet, b: &TokenSet) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}
