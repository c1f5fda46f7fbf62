/*!
 * Scoring module for sentence pair quality assessment.
 *
 * This module provides the full quality scoring pipeline:
 * - Surface metrics (word counts, punctuation counts, similarity ratios)
 * - Threshold tagging and the deterministic bucket policy
 * - Single-pair scoring with manual override bookkeeping
 * - Batch recalculation over the persistence layer
 *
 * # Architecture
 *
 * - `metrics`: Counts and ratios computed from the raw sentence texts
 * - `policy`: Turns metrics into tags and tags into a bucket
 * - `scorer`: Scores one pair and decides when overrides survive
 * - `recalc`: Applies the scorer across stored pairs in chunks
 */

pub mod metrics;
pub mod policy;
pub mod scorer;
pub mod recalc;

// Re-export main types
pub use metrics::PairMetrics;
pub use policy::{QualityBucket, QualityTag};
pub use recalc::{RecalcFilter, RecalcOptions, RecalcReport, Recalculator};
pub use scorer::{PairScore, ScoreUpdate};
