/*!
 * Persistence layer for the Halunder corpus database.
 *
 * This module provides SQLite-based storage for:
 * - Documents, prose texts, and sentence pairs
 * - Dictionary entries and word frequency counts
 * - Derived quality columns written back by the scoring engine
 */

// Allow dead code and unused imports - store types are for library consumers
#![allow(dead_code)]
#![allow(unused_imports)]

use async_trait::async_trait;

use crate::errors::StoreError;
use crate::scoring::recalc::RecalcFilter;
use crate::scoring::scorer::ScoreUpdate;

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;
pub mod memory;

// Re-export main types
pub use connection::DatabaseConnection;
pub use memory::MemoryPairStore;
pub use repository::CorpusRepository;

use models::SentencePairRecord;

/// Storage interface the batch recalculation workflow runs against
///
/// This trait covers exactly the two operations recalculation needs,
/// allowing the workflow to run against the SQLite repository or an
/// in-memory store in tests.
#[async_trait]
pub trait PairStore: Send + Sync {
    /// Fetch the sentence pairs selected by a filter
    ///
    /// # Arguments
    /// * `filter` - Which pairs to load
    ///
    /// # Returns
    /// * `Result<Vec<SentencePairRecord>, StoreError>` - The matching pairs, ordered by ID
    async fn fetch_pairs(
        &self,
        filter: &RecalcFilter,
    ) -> Result<Vec<SentencePairRecord>, StoreError>;

    /// Persist a scoring result for a single pair
    ///
    /// # Arguments
    /// * `pair_id` - The pair to update
    /// * `update` - The derived columns to write
    ///
    /// # Returns
    /// * `Result<(), StoreError>` - Ok on success, `NotFound` if the pair vanished
    async fn apply_score(&self, pair_id: i64, update: &ScoreUpdate) -> Result<(), StoreError>;
}

/// Surface a typed store error from an `anyhow` chain, if one is there
fn to_store_error(err: anyhow::Error) -> StoreError {
    match err.downcast::<StoreError>() {
        Ok(store_err) => store_err,
        Err(other) => StoreError::Database(other.to_string()),
    }
}

#[async_trait]
impl PairStore for CorpusRepository {
    async fn fetch_pairs(
        &self,
        filter: &RecalcFilter,
    ) -> Result<Vec<SentencePairRecord>, StoreError> {
        CorpusRepository::fetch_pairs(self, filter)
            .await
            .map_err(to_store_error)
    }

    async fn apply_score(&self, pair_id: i64, update: &ScoreUpdate) -> Result<(), StoreError> {
        CorpusRepository::apply_score(self, pair_id, update)
            .await
            .map_err(to_store_error)
    }
}
