/*!
 * Quality tags and bucket classification for sentence pairs.
 *
 * Tags describe how the two sides of a pair compare on one dimension
 * (word count or punctuation count). The bucket is decided from the tags
 * alone by a fixed rule table; every caller goes through [`classify`] so
 * the same pair can never land in two different buckets.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scoring::metrics::PairMetrics;

/// Length ratio at or above which the sides count as similar in length
pub const SIMILAR_LENGTH_MIN: f64 = 0.8;

/// Length ratio below which the sides count as different in length
pub const DIFFERENT_LENGTH_MAX: f64 = 0.6;

/// Punctuation ratio at or above which punctuation counts as similar
pub const SIMILAR_PUNCTUATION_MIN: f64 = 0.8;

/// Punctuation ratio below which punctuation counts as very different
pub const VERY_DIFFERENT_PUNCTUATION_MAX: f64 = 0.5;

/// Quality tag describing one comparison dimension of a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTag {
    /// Word counts agree closely (ratio >= 0.8)
    SimilarLength,
    /// Word counts disagree strongly (ratio < 0.6)
    DifferentLength,
    /// Punctuation counts agree closely (ratio >= 0.8)
    SimilarPunctuation,
    /// Punctuation counts disagree strongly (ratio < 0.5)
    VeryDifferentPunctuation,
}

impl fmt::Display for QualityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityTag::SimilarLength => write!(f, "similar_length"),
            QualityTag::DifferentLength => write!(f, "different_length"),
            QualityTag::SimilarPunctuation => write!(f, "similar_punctuation"),
            QualityTag::VeryDifferentPunctuation => write!(f, "very_different_punctuation"),
        }
    }
}

impl std::str::FromStr for QualityTag {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "similar_length" => Ok(QualityTag::SimilarLength),
            "different_length" => Ok(QualityTag::DifferentLength),
            "similar_punctuation" => Ok(QualityTag::SimilarPunctuation),
            "very_different_punctuation" => Ok(QualityTag::VeryDifferentPunctuation),
            _ => Err(anyhow::anyhow!("Invalid quality tag: {}", s)),
        }
    }
}

/// Quality bucket a scored pair is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityBucket {
    /// Both dimensions agree closely
    HighQuality,
    /// At least one dimension agrees closely
    GoodQuality,
    /// Neither clearly good nor clearly bad
    NeedsReview,
    /// Both dimensions disagree strongly
    PoorQuality,
    /// Pair has never been scored; storage default, never produced by [`classify`]
    Unreviewed,
}

impl fmt::Display for QualityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityBucket::HighQuality => write!(f, "high_quality"),
            QualityBucket::GoodQuality => write!(f, "good_quality"),
            QualityBucket::NeedsReview => write!(f, "needs_review"),
            QualityBucket::PoorQuality => write!(f, "poor_quality"),
            QualityBucket::Unreviewed => write!(f, "unreviewed"),
        }
    }
}

impl std::str::FromStr for QualityBucket {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high_quality" => Ok(QualityBucket::HighQuality),
            "good_quality" => Ok(QualityBucket::GoodQuality),
            "needs_review" => Ok(QualityBucket::NeedsReview),
            "poor_quality" => Ok(QualityBucket::PoorQuality),
            "unreviewed" => Ok(QualityBucket::Unreviewed),
            _ => Err(anyhow::anyhow!("Invalid quality bucket: {}", s)),
        }
    }
}

/// Derive the quality tags for a pair from its metrics.
///
/// Each dimension contributes at most one tag; ratios in the middle band
/// (neither similar nor clearly different) contribute none.
pub fn derive_tags(metrics: &PairMetrics) -> Vec<QualityTag> {
    let mut tags = Vec::with_capacity(2);

    if metrics.length_ratio >= SIMILAR_LENGTH_MIN {
        tags.push(QualityTag::SimilarLength);
    } else if metrics.length_ratio < DIFFERENT_LENGTH_MAX {
        tags.push(QualityTag::DifferentLength);
    }

    if metrics.punctuation_ratio >= SIMILAR_PUNCTUATION_MIN {
        tags.push(QualityTag::SimilarPunctuation);
    } else if metrics.punctuation_ratio < VERY_DIFFERENT_PUNCTUATION_MAX {
        tags.push(QualityTag::VeryDifferentPunctuation);
    }

    tags
}

/// Decide the bucket for a set of tags. First matching rule wins:
///
/// 1. similar length AND similar punctuation -> high quality
/// 2. different length AND very different punctuation -> poor quality
/// 3. similar length OR similar punctuation -> good quality
/// 4. anything else -> needs review
pub fn classify(tags: &[QualityTag]) -> QualityBucket {
    let similar_length = tags.contains(&QualityTag::SimilarLength);
    let different_length = tags.contains(&QualityTag::DifferentLength);
    let similar_punct = tags.contains(&QualityTag::SimilarPunctuation);
    let very_different_punct = tags.contains(&QualityTag::VeryDifferentPunctuation);

    if similar_length && similar_punct {
        QualityBucket::HighQuality
    } else if different_length && very_different_punct {
        QualityBucket::PoorQuality
    } else if similar_length || similar_punct {
        QualityBucket::GoodQuality
    } else {
        QualityBucket::NeedsReview
    }
}
