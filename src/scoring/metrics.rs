/*!
 * Quality metrics for sentence pairs.
 *
 * This module computes the surface statistics a pair is judged by:
 * - Word counts for the source and target sentence
 * - Punctuation counts for the source and target sentence
 * - Symmetric similarity ratios derived from those counts
 */

use serde::Serialize;

/// Punctuation marks counted by [`count_punctuation`].
///
/// Covers the marks that occur in the corpus texts: sentence punctuation,
/// dashes, German-style low/high quotes and guillemets. The plain ASCII
/// apostrophe and double quote are deliberately absent so contractions such
/// as "geht's" do not register as punctuation.
const PUNCTUATION_CHARS: &[char] = &[
    '.', ',', '!', '?', ';', ':', '–', '—', '„', '“', '‘', '’', '»', '«',
];

/// Count the words in a sentence.
///
/// A word is a maximal run of non-whitespace characters; leading, trailing
/// and repeated whitespace contribute nothing.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Count the punctuation marks in a sentence.
///
/// Only characters in [`PUNCTUATION_CHARS`] are counted; everything else,
/// including the ASCII apostrophe, is ignored.
pub fn count_punctuation(text: &str) -> usize {
    text.chars().filter(|c| PUNCTUATION_CHARS.contains(c)).count()
}

/// Calculate the symmetric similarity ratio of two counts.
///
/// Both zero means the sentences agree perfectly (ratio 1.0). Exactly one
/// zero means maximal disagreement (ratio 0.0). Otherwise the smaller count
/// is divided by the larger, so the result is always in `[0.0, 1.0]` and
/// independent of argument order.
pub fn compute_ratio(a: usize, b: usize) -> f64 {
    if a == 0 && b == 0 {
        1.0
    } else if a == 0 || b == 0 {
        0.0
    } else {
        a.min(b) as f64 / a.max(b) as f64
    }
}

/// Surface metrics of a single sentence pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PairMetrics {
    /// Number of words in the source sentence
    pub source_word_count: usize,
    /// Number of words in the target sentence
    pub target_word_count: usize,
    /// Number of punctuation marks in the source sentence
    pub source_punct_count: usize,
    /// Number of punctuation marks in the target sentence
    pub target_punct_count: usize,
    /// Word-count similarity, in `[0.0, 1.0]`
    pub length_ratio: f64,
    /// Punctuation-count similarity, in `[0.0, 1.0]`
    pub punctuation_ratio: f64,
}

impl PairMetrics {
    /// Compute the metrics for a source/target sentence pair
    pub fn compute(source: &str, target: &str) -> Self {
        let source_word_count = count_words(source);
        let target_word_count = count_words(target);
        let source_punct_count = count_punctuation(source);
        let target_punct_count = count_punctuation(target);

        Self {
            source_word_count,
            target_word_count,
            source_punct_count,
            target_punct_count,
            length_ratio: compute_ratio(source_word_count, target_word_count),
            punctuation_ratio: compute_ratio(source_punct_count, target_punct_count),
        }
    }
}
