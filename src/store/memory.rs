/*!
 * In-memory pair store for exercising the recalculation workflow.
 *
 * This module provides a store that simulates different behaviors:
 * - `MemoryPairStore::working()` - All operations succeed
 * - `MemoryPairStore::intermittent(n)` - Every nth write fails
 * - `MemoryPairStore::failing_writes()` - Every write fails
 */

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

use super::models::SentencePairRecord;
use super::PairStore;
use crate::errors::StoreError;
use crate::scoring::recalc::RecalcFilter;
use crate::scoring::scorer::ScoreUpdate;

/// Behavior mode for the in-memory store
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoreBehavior {
    /// All operations succeed
    Working,
    /// Writes fail intermittently (every nth write)
    Intermittent { fail_every: usize },
    /// All writes fail with a storage error
    FailingWrites,
}

/// In-memory implementation of [`PairStore`]
pub struct MemoryPairStore {
    /// Pairs keyed by ID (BTreeMap keeps fetch results in ID order)
    pairs: Arc<RwLock<BTreeMap<i64, SentencePairRecord>>>,
    /// Next ID to assign
    next_id: Arc<AtomicI64>,
    /// Behavior mode
    behavior: StoreBehavior,
    /// Write counter for intermittent failures
    write_count: Arc<AtomicUsize>,
}

impl MemoryPairStore {
    /// Create a new store with the specified behavior
    pub fn new(behavior: StoreBehavior) -> Self {
        Self {
            pairs: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            behavior,
            write_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a store where every operation succeeds
    pub fn working() -> Self {
        Self::new(StoreBehavior::Working)
    }

    /// Create a store where every nth write fails.
    ///
    /// A `fail_every` of 0 means no write ever fails.
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(StoreBehavior::Intermittent { fail_every })
    }

    /// Create a store where every write fails
    pub fn failing_writes() -> Self {
        Self::new(StoreBehavior::FailingWrites)
    }

    /// Insert a fresh, unscored pair and return its ID
    pub fn insert(&self, source_text: &str, target_text: &str) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut pair =
            SentencePairRecord::unscored(source_text.to_string(), target_text.to_string());
        pair.id = id;
        self.pairs.write().insert(id, pair);
        id
    }

    /// Insert a prepared record, assigning it a fresh ID
    pub fn insert_record(&self, mut record: SentencePairRecord) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        record.id = id;
        self.pairs.write().insert(id, record);
        id
    }

    /// Get a pair by ID
    pub fn get(&self, pair_id: i64) -> Option<SentencePairRecord> {
        self.pairs.read().get(&pair_id).cloned()
    }

    /// Write a record back under its own ID, returning false if it is unknown
    pub fn update_record(&self, record: SentencePairRecord) -> bool {
        let mut pairs = self.pairs.write();
        match pairs.get_mut(&record.id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    /// Remove a pair by ID
    pub fn remove(&self, pair_id: i64) -> Option<SentencePairRecord> {
        self.pairs.write().remove(&pair_id)
    }

    /// Number of stored pairs
    pub fn len(&self) -> usize {
        self.pairs.read().len()
    }

    /// Check whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.pairs.read().is_empty()
    }

    /// Number of write attempts seen so far
    pub fn write_attempts(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }
}

impl Clone for MemoryPairStore {
    fn clone(&self) -> Self {
        Self {
            pairs: Arc::clone(&self.pairs),
            next_id: Arc::clone(&self.next_id),
            behavior: self.behavior,
            write_count: Arc::clone(&self.write_count),
        }
    }
}

#[async_trait]
impl PairStore for MemoryPairStore {
    async fn fetch_pairs(
        &self,
        filter: &RecalcFilter,
    ) -> Result<Vec<SentencePairRecord>, StoreError> {
        let pairs = self.pairs.read();

        let selected: Vec<SentencePairRecord> = match filter {
            RecalcFilter::All => pairs.values().cloned().collect(),
            RecalcFilter::Unscored => pairs
                .values()
                .filter(|p| p.scored_text_hash.is_none())
                .cloned()
                .collect(),
            RecalcFilter::Document(document_id) => pairs
                .values()
                .filter(|p| p.document_id.as_deref() == Some(document_id.as_str()))
                .cloned()
                .collect(),
            RecalcFilter::Ids(ids) => pairs
                .values()
                .filter(|p| ids.contains(&p.id))
                .cloned()
                .collect(),
        };

        Ok(selected)
    }

    async fn apply_score(&self, pair_id: i64, update: &ScoreUpdate) -> Result<(), StoreError> {
        let count = self.write_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            StoreBehavior::Intermittent { fail_every }
                if fail_every > 0 && count % fail_every == fail_every - 1 =>
            {
                return Err(StoreError::Database(format!(
                    "Simulated intermittent write failure (write #{})",
                    count + 1
                )));
            }
            StoreBehavior::FailingWrites => {
                return Err(StoreError::Database(
                    "Simulated write failure".to_string(),
                ));
            }
            _ => {}
        }

        let mut pairs = self.pairs.write();
        match pairs.get_mut(&pair_id) {
            Some(pair) => {
                pair.apply_score(update);
                Ok(())
            }
            None => Err(StoreError::NotFound {
                entity: "sentence_pair",
                id: pair_id.to_string(),
            }),
        }
    }
}
