/*!
 * Tests for tag derivation and the bucket decision table
 */

use rand::Rng;

use halcor::scoring::policy::{classify, derive_tags};
use halcor::{PairMetrics, QualityBucket, QualityTag};

fn metrics_with_ratios(length_ratio: f64, punctuation_ratio: f64) -> PairMetrics {
    PairMetrics {
        source_word_count: 0,
        target_word_count: 0,
        source_punct_count: 0,
        target_punct_count: 0,
        length_ratio,
        punctuation_ratio,
    }
}

fn bucket_for(length_ratio: f64, punctuation_ratio: f64) -> QualityBucket {
    classify(&derive_tags(&metrics_with_ratios(
        length_ratio,
        punctuation_ratio,
    )))
}

#[test]
fn test_bucketPolicy_withBothSimilar_shouldReturnHighQuality() {
    assert_eq!(bucket_for(1.0, 1.0), QualityBucket::HighQuality);
    assert_eq!(bucket_for(0.8, 0.8), QualityBucket::HighQuality);
}

#[test]
fn test_bucketPolicy_withBothDifferent_shouldReturnPoorQuality() {
    assert_eq!(bucket_for(0.3, 0.2), QualityBucket::PoorQuality);
    assert_eq!(bucket_for(0.0, 0.0), QualityBucket::PoorQuality);
}

#[test]
fn test_bucketPolicy_withOnlyPunctuationSimilar_shouldReturnGoodQuality() {
    // Neutral length band plus a similar punctuation tag: rule 3 on its own
    assert_eq!(bucket_for(0.7, 0.9), QualityBucket::GoodQuality);
}

#[test]
fn test_bucketPolicy_withOneSimilarAndOneDifferent_shouldReturnGoodQuality() {
    // Rule 3 outranks rule 4 even when the other dimension is clearly off
    assert_eq!(bucket_for(0.9, 0.1), QualityBucket::GoodQuality);
    assert_eq!(bucket_for(0.1, 0.9), QualityBucket::GoodQuality);
}

#[test]
fn test_bucketPolicy_withNothingStandingOut_shouldReturnNeedsReview() {
    assert_eq!(bucket_for(0.7, 0.6), QualityBucket::NeedsReview);
    assert_eq!(bucket_for(0.5, 0.7), QualityBucket::NeedsReview);
    assert_eq!(bucket_for(0.7, 0.3), QualityBucket::NeedsReview);
}

#[test]
fn test_bucketPolicy_onThresholdBoundaries_shouldBeInclusiveOnSimilarity() {
    // >= 0.8 counts as similar on both dimensions
    assert_eq!(bucket_for(0.8, 0.79), QualityBucket::GoodQuality);
    assert_eq!(bucket_for(0.79, 0.8), QualityBucket::GoodQuality);
    // 0.6 and 0.5 sit just inside the neutral bands
    assert_eq!(bucket_for(0.6, 0.5), QualityBucket::NeedsReview);
    assert_eq!(bucket_for(0.59, 0.49), QualityBucket::PoorQuality);
}

#[test]
fn test_bucketPolicy_overRandomRatios_shouldBeTotalAndDeterministic() {
    let mut rng = rand::rng();

    for _ in 0..10_000 {
        let length_ratio: f64 = rng.random_range(0.0..=1.0);
        let punctuation_ratio: f64 = rng.random_range(0.0..=1.0);

        let first = bucket_for(length_ratio, punctuation_ratio);
        let second = bucket_for(length_ratio, punctuation_ratio);

        assert_eq!(
            first, second,
            "policy not deterministic at ({}, {})",
            length_ratio, punctuation_ratio
        );
        assert_ne!(
            first,
            QualityBucket::Unreviewed,
            "policy produced unreviewed at ({}, {})",
            length_ratio,
            punctuation_ratio
        );
    }
}

#[test]
fn test_bucketPolicy_overBoundaryGrid_shouldNeverReturnUnreviewed() {
    let boundary_values = [0.0, 0.49, 0.5, 0.59, 0.6, 0.79, 0.8, 1.0];

    for &length_ratio in &boundary_values {
        for &punctuation_ratio in &boundary_values {
            let bucket = bucket_for(length_ratio, punctuation_ratio);
            assert_ne!(bucket, QualityBucket::Unreviewed);
        }
    }
}

#[test]
fn test_deriveTags_shouldMatchGlossaryStringForms() {
    let tags = derive_tags(&metrics_with_ratios(0.9, 0.1));
    let names: Vec<String> = tags.iter().map(|t| t.to_string()).collect();

    assert_eq!(names, vec!["similar_length", "very_different_punctuation"]);
}

#[test]
fn test_qualityTag_serde_shouldUseSnakeCase() {
    let json = serde_json::to_string(&vec![
        QualityTag::SimilarLength,
        QualityTag::VeryDifferentPunctuation,
    ])
    .unwrap();

    assert_eq!(json, r#"["similar_length","very_different_punctuation"]"#);

    let parsed: Vec<QualityTag> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0], QualityTag::SimilarLength);
}

#[test]
fn test_qualityBucket_serde_shouldRoundTrip() {
    for bucket in [
        QualityBucket::HighQuality,
        QualityBucket::GoodQuality,
        QualityBucket::NeedsReview,
        QualityBucket::PoorQuality,
        QualityBucket::Unreviewed,
    ] {
        let json = serde_json::to_string(&bucket).unwrap();
        let parsed: QualityBucket = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, bucket);
    }
}
