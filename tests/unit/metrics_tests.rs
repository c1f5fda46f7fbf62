/*!
 * Tests for the pure metric calculator
 */

use halcor::scoring::metrics::{compute_ratio, count_punctuation, count_words};
use halcor::PairMetrics;

#[test]
fn test_countWords_withEmptyText_shouldReturnZero() {
    assert_eq!(count_words(""), 0);
}

#[test]
fn test_countWords_withWhitespaceOnlyText_shouldReturnZero() {
    for text in [" ", "   ", "\t", "\n", " \t \r\n "] {
        assert_eq!(count_words(text), 0, "counted words in {:?}", text);
    }
}

#[test]
fn test_countWords_withHalunderSentence_shouldReturnFour() {
    assert_eq!(count_words("Ik hoa iaan Oapel"), 4);
}

#[test]
fn test_countWords_shouldTreatPunctuationAsPartOfWords() {
    // Words are whitespace-delimited; attached punctuation does not split them
    assert_eq!(count_words("Moin, moin!"), 2);
    assert_eq!(count_words("„Jä“ – sagte er."), 4);
}

#[test]
fn test_countPunctuation_withApostropheContraction_shouldNotCountIt() {
    // Comma and question mark count; the ASCII apostrophe in "geht's" does not
    assert_eq!(count_punctuation("Hallo, wie geht's?"), 2);
}

#[test]
fn test_countPunctuation_withGermanTypography_shouldCountQuotesAndDashes() {
    assert_eq!(count_punctuation("„Moin“"), 2);
    assert_eq!(count_punctuation("»Moin«"), 2);
    assert_eq!(count_punctuation("foo – bar — baz"), 2);
    assert_eq!(count_punctuation("‘so’"), 2);
}

#[test]
fn test_countPunctuation_withEmptyText_shouldReturnZero() {
    assert_eq!(count_punctuation(""), 0);
}

#[test]
fn test_computeRatio_withBothZero_shouldReturnOne() {
    assert_eq!(compute_ratio(0, 0), 1.0);
}

#[test]
fn test_computeRatio_withExactlyOneZero_shouldReturnZero() {
    assert_eq!(compute_ratio(5, 0), 0.0);
    assert_eq!(compute_ratio(0, 5), 0.0);
}

#[test]
fn test_computeRatio_withFourAndFive_shouldReturnPointEight() {
    assert_eq!(compute_ratio(4, 5), 0.8);
}

#[test]
fn test_computeRatio_shouldBeSymmetricForAllSmallCounts() {
    for a in 0..50usize {
        for b in 0..50usize {
            assert_eq!(
                compute_ratio(a, b),
                compute_ratio(b, a),
                "ratio not symmetric for ({}, {})",
                a,
                b
            );
        }
    }
}

#[test]
fn test_computeRatio_withNonZeroCounts_shouldStayInHalfOpenInterval() {
    for a in 1..50usize {
        for b in 1..50usize {
            let ratio = compute_ratio(a, b);
            assert!(ratio > 0.0 && ratio <= 1.0, "ratio {} for ({}, {})", ratio, a, b);
        }
    }
}

#[test]
fn test_pairMetrics_compute_shouldBeDeterministic() {
    let first = PairMetrics::compute("Deät Wäär es gud, Mem.", "Das Wetter ist gut, Mutter.");
    let second = PairMetrics::compute("Deät Wäär es gud, Mem.", "Das Wetter ist gut, Mutter.");

    assert_eq!(first, second);
}

#[test]
fn test_pairMetrics_compute_withBothSidesEmpty_shouldYieldPerfectRatios() {
    let metrics = PairMetrics::compute("", "");

    assert_eq!(metrics.source_word_count, 0);
    assert_eq!(metrics.target_word_count, 0);
    assert_eq!(metrics.length_ratio, 1.0);
    assert_eq!(metrics.punctuation_ratio, 1.0);
}
