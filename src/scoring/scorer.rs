/*!
 * Shared pair scorer.
 *
 * Every consumer that scores a sentence pair (the update path, the batch
 * recalculation, the CLI one-off command) goes through this module, so the
 * calculator and the bucket policy are applied in exactly one place.
 */

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::scoring::metrics::PairMetrics;
use crate::scoring::policy::{self, QualityBucket, QualityTag};
use crate::store::models::SentencePairRecord;

/// Byte inserted between source and target before hashing, so that moving
/// characters across the boundary changes the fingerprint.
const HASH_SEPARATOR: [u8; 1] = [0x1f];

/// Full scoring result for one sentence pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairScore {
    /// Surface metrics of the pair
    pub metrics: PairMetrics,
    /// Tags derived from the metrics
    pub tags: Vec<QualityTag>,
    /// Bucket decided by the policy (or pinned by a caller)
    pub bucket: QualityBucket,
    /// Whether the bucket was pinned by the caller rather than computed
    pub is_manual: bool,
}

/// Score a source/target sentence pair.
pub fn score_pair(source: &str, target: &str) -> PairScore {
    let metrics = PairMetrics::compute(source, target);
    let tags = policy::derive_tags(&metrics);
    let bucket = policy::classify(&tags);

    PairScore {
        metrics,
        tags,
        bucket,
        is_manual: false,
    }
}

/// Score a pair, optionally pinning the bucket.
///
/// `force_bucket` is the manual-override entry point: tags and metrics are
/// still computed honestly, only the bucket is replaced and the score is
/// marked as a manual assignment.
pub fn score_pair_with_override(
    source: &str,
    target: &str,
    force_bucket: Option<QualityBucket>,
) -> PairScore {
    let mut score = score_pair(source, target);
    if let Some(bucket) = force_bucket {
        score.bucket = bucket;
        score.is_manual = true;
    }
    score
}

/// SHA256 fingerprint of a pair's text, used to detect whether the text has
/// changed since the pair was last scored or manually bucketed.
pub fn pair_text_hash(source: &str, target: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update(HASH_SEPARATOR);
    hasher.update(target.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Column values written back to a pair after scoring
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreUpdate {
    /// Number of words in the source sentence
    pub source_word_count: i64,
    /// Number of words in the target sentence
    pub target_word_count: i64,
    /// Number of punctuation marks in the source sentence
    pub source_punct_count: i64,
    /// Number of punctuation marks in the target sentence
    pub target_punct_count: i64,
    /// Word-count similarity ratio
    pub length_ratio: f64,
    /// Punctuation-count similarity ratio
    pub punctuation_ratio: f64,
    /// Derived quality tags
    pub quality_tags: Vec<QualityTag>,
    /// Bucket to store (computed, or preserved manual value)
    pub quality_bucket: QualityBucket,
    /// Whether the stored bucket is a manual override
    pub bucket_manual: bool,
    /// Fingerprint of the text this score was computed from
    pub scored_text_hash: String,
}

impl ScoreUpdate {
    /// Build an update from a score, a manual flag and a text fingerprint
    pub fn from_score(score: &PairScore, bucket_manual: bool, scored_text_hash: String) -> Self {
        Self {
            source_word_count: score.metrics.source_word_count as i64,
            target_word_count: score.metrics.target_word_count as i64,
            source_punct_count: score.metrics.source_punct_count as i64,
            target_punct_count: score.metrics.target_punct_count as i64,
            length_ratio: score.metrics.length_ratio,
            punctuation_ratio: score.metrics.punctuation_ratio,
            quality_tags: score.tags.clone(),
            quality_bucket: score.bucket,
            bucket_manual,
            scored_text_hash,
        }
    }
}

/// Re-score a stored pair, honoring a still-valid manual bucket.
///
/// Metrics and tags are always refreshed. The stored bucket survives only
/// when it was manually set and the pair text is unchanged since then (the
/// stored fingerprint matches the current text); otherwise the policy's
/// bucket replaces it and the manual flag is cleared.
pub fn rescore_record(record: &SentencePairRecord) -> ScoreUpdate {
    let score = score_pair(&record.source_text, &record.target_text);
    let hash = pair_text_hash(&record.source_text, &record.target_text);

    let keep_manual =
        record.bucket_manual && record.scored_text_hash.as_deref() == Some(hash.as_str());

    let mut update = ScoreUpdate::from_score(&score, keep_manual, hash);
    if keep_manual {
        update.quality_bucket = record.quality_bucket;
    }
    update
}
