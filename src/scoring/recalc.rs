/*!
 * Batch recalculation of quality scores.
 *
 * This module contains functionality for re-scoring stored sentence pairs
 * in bounded chunks, with support for concurrent write-back, progress
 * tracking, and per-pair error isolation.
 */

use futures::stream::{self, StreamExt};
use log::error;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::RecalcError;
use crate::scoring::policy::QualityBucket;
use crate::scoring::scorer;
use crate::store::PairStore;

/// Selects which stored pairs a recalculation run operates on
#[derive(Debug, Clone, PartialEq)]
pub enum RecalcFilter {
    /// Every pair in the store
    All,
    /// Only pairs that have never been scored
    Unscored,
    /// Only pairs belonging to one document
    Document(String),
    /// An explicit list of pair IDs
    Ids(Vec<i64>),
}

impl fmt::Display for RecalcFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecalcFilter::All => write!(f, "all"),
            RecalcFilter::Unscored => write!(f, "unscored"),
            RecalcFilter::Document(id) => write!(f, "document {}", id),
            RecalcFilter::Ids(ids) => write!(f, "{} explicit ids", ids.len()),
        }
    }
}

/// Options controlling a recalculation run
#[derive(Debug, Clone, Copy)]
pub struct RecalcOptions {
    /// Number of pairs written per chunk
    pub chunk_size: usize,
    /// Maximum number of concurrent store writes within a chunk
    pub max_concurrent_writes: usize,
    /// Maximum number of bucket changes echoed back in the report
    pub sample_size: usize,
}

impl Default for RecalcOptions {
    fn default() -> Self {
        Self {
            chunk_size: 50,
            max_concurrent_writes: 4,
            sample_size: 5,
        }
    }
}

/// One bucket transition recorded in the run report
#[derive(Debug, Clone, PartialEq)]
pub struct BucketChange {
    /// The pair whose bucket changed
    pub pair_id: i64,
    /// Bucket before the run
    pub previous: QualityBucket,
    /// Bucket after the run
    pub current: QualityBucket,
}

/// Summary of a recalculation run
#[derive(Debug, Clone, Default)]
pub struct RecalcReport {
    /// Number of pairs selected by the filter
    pub processed: usize,
    /// Number of pairs successfully written back
    pub updated: usize,
    /// Number of pairs whose manually set bucket was kept
    pub preserved_overrides: usize,
    /// Final bucket tallies over all written pairs
    pub bucket_counts: HashMap<QualityBucket, usize>,
    /// First few bucket changes, in pair ID order
    pub sample: Vec<BucketChange>,
    /// Per-pair write errors (the run itself still succeeds)
    pub errors: Vec<String>,
}

/// Batch recalculator applying the scoring engine across stored pairs
pub struct Recalculator {
    /// Store to read pairs from and write scores back to
    store: Arc<dyn PairStore>,

    /// Run options
    options: RecalcOptions,
}

impl Recalculator {
    /// Create a recalculator with default options
    pub fn new(store: Arc<dyn PairStore>) -> Self {
        Self {
            store,
            options: RecalcOptions::default(),
        }
    }

    /// Create a recalculator with explicit options
    pub fn with_options(store: Arc<dyn PairStore>, options: RecalcOptions) -> Self {
        Self { store, options }
    }

    /// Re-score every pair selected by the filter and write the results back.
    ///
    /// Scoring itself is pure arithmetic; only the write-back goes through
    /// the store, with up to `max_concurrent_writes` writes in flight at
    /// once. A failing write is recorded in the report and the run carries
    /// on with the remaining pairs. Only a failure to fetch the selected
    /// pairs aborts the run.
    ///
    /// # Arguments
    /// * `filter` - Which pairs to re-score
    /// * `progress_callback` - Called with (done, total) after each write completes
    pub async fn run(
        &self,
        filter: &RecalcFilter,
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Result<RecalcReport, RecalcError> {
        let pairs = self.store.fetch_pairs(filter).await?;
        let total = pairs.len();

        let mut report = RecalcReport {
            processed: total,
            ..Default::default()
        };

        if pairs.is_empty() {
            return Ok(report);
        }

        let completed = Arc::new(AtomicUsize::new(0));
        let chunk_size = self.options.chunk_size.max(1);
        let max_concurrent_writes = self.options.max_concurrent_writes.max(1);

        for chunk in pairs.chunks(chunk_size) {
            let mut results = stream::iter(chunk.iter())
                .map(|pair| {
                    let store = Arc::clone(&self.store);
                    let completed = Arc::clone(&completed);
                    let progress_callback = progress_callback.clone();
                    let pair_id = pair.id;
                    let previous_bucket = pair.quality_bucket;
                    let update = scorer::rescore_record(pair);

                    async move {
                        let result = store.apply_score(pair_id, &update).await;

                        let current = completed.fetch_add(1, Ordering::SeqCst) + 1;
                        progress_callback(current, total);

                        (pair_id, previous_bucket, update, result)
                    }
                })
                .buffer_unordered(max_concurrent_writes)
                .collect::<Vec<_>>()
                .await;

            // Writes complete in arbitrary order; put the chunk back in ID order
            results.sort_by_key(|(pair_id, ..)| *pair_id);

            for (pair_id, previous_bucket, update, result) in results {
                match result {
                    Ok(()) => {
                        report.updated += 1;
                        if update.bucket_manual {
                            report.preserved_overrides += 1;
                        }
                        *report.bucket_counts.entry(update.quality_bucket).or_insert(0) += 1;

                        if update.quality_bucket != previous_bucket
                            && report.sample.len() < self.options.sample_size
                        {
                            report.sample.push(BucketChange {
                                pair_id,
                                previous: previous_bucket,
                                current: update.quality_bucket,
                            });
                        }
                    }
                    Err(e) => {
                        let message = format!("Pair {} failed: {}", pair_id, e);
                        error!("{}", message);
                        report.errors.push(message);
                    }
                }
            }
        }

        Ok(report)
    }
}
