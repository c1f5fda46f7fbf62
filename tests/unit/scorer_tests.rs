/*!
 * Tests for the shared pair scorer: end-to-end scenarios, idempotence
 * and the manual-override rules.
 */

use halcor::scoring::scorer::{
    pair_text_hash, rescore_record, score_pair, score_pair_with_override,
};
use halcor::store::models::SentencePairRecord;
use halcor::{QualityBucket, QualityTag};

use crate::common::{ALIGNED_PAIR, MISALIGNED_PAIR};

#[test]
fn test_scorePair_withAlignedApfelPair_shouldLandInHighQuality() {
    let (source, target) = ALIGNED_PAIR;
    let score = score_pair(source, target);

    assert_eq!(score.metrics.source_word_count, 4);
    assert_eq!(score.metrics.target_word_count, 4);
    assert_eq!(score.metrics.length_ratio, 1.0);
    assert_eq!(score.metrics.source_punct_count, 1);
    assert_eq!(score.metrics.target_punct_count, 1);
    assert_eq!(score.metrics.punctuation_ratio, 1.0);
    assert_eq!(
        score.tags,
        vec![QualityTag::SimilarLength, QualityTag::SimilarPunctuation]
    );
    assert_eq!(score.bucket, QualityBucket::HighQuality);
}

#[test]
fn test_scorePair_withMisalignedPair_shouldLandInPoorQuality() {
    // 3 words and no punctuation vs 12 words and 5 marks
    let (source, target) = MISALIGNED_PAIR;
    let score = score_pair(source, target);

    assert!(score.metrics.length_ratio < 0.6);
    assert_eq!(score.metrics.punctuation_ratio, 0.0);
    assert!(score.tags.contains(&QualityTag::DifferentLength));
    assert!(score.tags.contains(&QualityTag::VeryDifferentPunctuation));
    assert_eq!(score.bucket, QualityBucket::PoorQuality);
}

#[test]
fn test_scorePair_withMatchingPunctuationOnly_shouldLandInGoodQuality() {
    // 7 vs 10 words (ratio 0.7, no length tag), 1 period each (ratio 1.0)
    let source = "Hi wul ham en letj Hüs bau.";
    let target = "Er wollte sich dort ein kleines neues Haus bauen lassen.";
    let score = score_pair(source, target);

    assert_eq!(score.metrics.source_word_count, 7);
    assert_eq!(score.metrics.target_word_count, 10);
    assert_eq!(score.metrics.punctuation_ratio, 1.0);
    assert_eq!(score.tags, vec![QualityTag::SimilarPunctuation]);
    assert_eq!(score.bucket, QualityBucket::GoodQuality);
}

#[test]
fn test_scorePair_calledTwice_shouldReturnIdenticalScores() {
    let (source, target) = ALIGNED_PAIR;

    assert_eq!(score_pair(source, target), score_pair(source, target));
}

#[test]
fn test_scorePairWithOverride_withoutBucket_shouldBehaveLikeScorePair() {
    let (source, target) = ALIGNED_PAIR;

    assert_eq!(
        score_pair_with_override(source, target, None),
        score_pair(source, target)
    );
}

#[test]
fn test_scorePairWithOverride_withBucket_shouldKeepHonestTags() {
    let (source, target) = ALIGNED_PAIR;
    let score = score_pair_with_override(source, target, Some(QualityBucket::NeedsReview));

    assert_eq!(score.bucket, QualityBucket::NeedsReview);
    assert!(score.is_manual);
    assert_eq!(
        score.tags,
        vec![QualityTag::SimilarLength, QualityTag::SimilarPunctuation]
    );
}

fn stored_pair(source: &str, target: &str) -> SentencePairRecord {
    let mut record = SentencePairRecord::unscored(source.to_string(), target.to_string());
    record.id = 7;
    record
}

#[test]
fn test_rescoreRecord_appliedTwice_shouldBeIdempotent() {
    let (source, target) = ALIGNED_PAIR;
    let mut record = stored_pair(source, target);

    let first = rescore_record(&record);
    record.apply_score(&first);
    let second = rescore_record(&record);

    assert_eq!(first.quality_tags, second.quality_tags);
    assert_eq!(first.quality_bucket, second.quality_bucket);
    assert_eq!(first.scored_text_hash, second.scored_text_hash);
}

#[test]
fn test_rescoreRecord_withManualBucketAndUnchangedText_shouldPreserveBucket() {
    let (source, target) = ALIGNED_PAIR;
    let mut record = stored_pair(source, target);

    // Score, then pin the bucket the way a reviewer would
    record.apply_score(&rescore_record(&record));
    record.quality_bucket = QualityBucket::PoorQuality;
    record.bucket_manual = true;

    let update = rescore_record(&record);

    assert_eq!(update.quality_bucket, QualityBucket::PoorQuality);
    assert!(update.bucket_manual);
    // The other derived columns are still refreshed
    assert_eq!(
        update.quality_tags,
        vec![QualityTag::SimilarLength, QualityTag::SimilarPunctuation]
    );
}

#[test]
fn test_rescoreRecord_withManualBucketAndEditedText_shouldRecompute() {
    let (source, target) = ALIGNED_PAIR;
    let mut record = stored_pair(source, target);

    record.apply_score(&rescore_record(&record));
    record.quality_bucket = QualityBucket::NeedsReview;
    record.bucket_manual = true;

    // The text is edited after the override; the stored fingerprint goes stale.
    // The new target has 7 words and no punctuation against 4 words and a
    // period, so the computed bucket is poor quality.
    record.target_text = "Ich habe gestern zwei sehr große Äpfel gegessen".to_string();

    let update = rescore_record(&record);

    assert_eq!(update.quality_bucket, QualityBucket::PoorQuality);
    assert!(!update.bucket_manual);
}

#[test]
fn test_pairTextHash_shouldChangeWithEitherSide() {
    let base = pair_text_hash("Moin", "Hallo");

    assert_ne!(pair_text_hash("Moin!", "Hallo"), base);
    assert_ne!(pair_text_hash("Moin", "Hallo!"), base);
    assert_eq!(pair_text_hash("Moin", "Hallo"), base);
}
