/*!
 * Word frequency tracking across the corpus.
 *
 * This module tokenizes stored texts and sentence pairs into words and
 * maintains per-language occurrence counts in the database. Counts are
 * rebuilt from scratch rather than updated incrementally, so the table
 * always reflects exactly what is currently stored.
 */

use anyhow::Result;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::language_utils::{SOURCE_LANGUAGE_CODE, TARGET_LANGUAGE_CODE};
use crate::scoring::recalc::RecalcFilter;
use crate::store::models::WordFrequencyRecord;
use crate::store::CorpusRepository;

/// Matches a word, keeping internal apostrophes ("geht's" stays one token)
static WORD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{Alphabetic}+(?:['’]\p{Alphabetic}+)*").unwrap());

/// Tokenize a text into lowercased words
pub fn tokenize(text: &str) -> Vec<String> {
    WORD_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Count word occurrences in a single text
pub fn word_counts(text: &str) -> HashMap<String, i64> {
    let mut counts = HashMap::new();
    for word in tokenize(text) {
        *counts.entry(word).or_insert(0) += 1;
    }
    counts
}

/// Maintains the per-language word frequency table
pub struct FrequencyTracker {
    /// Repository the counts are read from and written to
    repository: CorpusRepository,
}

impl FrequencyTracker {
    /// Create a tracker over the given repository
    pub fn new(repository: CorpusRepository) -> Self {
        Self { repository }
    }

    /// Rebuild the frequency table from every stored text and sentence pair.
    ///
    /// Prose texts are counted under their own language; for sentence pairs
    /// the source side is Halunder and the target side German. Returns the
    /// number of distinct (word, language) entries written.
    pub async fn rebuild(&self) -> Result<usize> {
        let mut counts: HashMap<(String, String), i64> = HashMap::new();

        for text in self.repository.list_texts().await? {
            for (word, count) in word_counts(&text.body) {
                *counts.entry((word, text.language.clone())).or_insert(0) += count;
            }
        }

        for pair in self.repository.fetch_pairs(&RecalcFilter::All).await? {
            for (word, count) in word_counts(&pair.source_text) {
                *counts
                    .entry((word, SOURCE_LANGUAGE_CODE.to_string()))
                    .or_insert(0) += count;
            }
            for (word, count) in word_counts(&pair.target_text) {
                *counts
                    .entry((word, TARGET_LANGUAGE_CODE.to_string()))
                    .or_insert(0) += count;
            }
        }

        let records: Vec<WordFrequencyRecord> = counts
            .into_iter()
            .map(|((word, language), occurrences)| {
                WordFrequencyRecord::new(word, language, occurrences)
            })
            .collect();

        let total = records.len();
        self.repository.replace_frequencies(records).await?;
        info!("Rebuilt word frequencies: {} distinct entries", total);

        Ok(total)
    }

    /// Most frequent words for a language
    pub async fn top(&self, language: &str, limit: usize) -> Result<Vec<WordFrequencyRecord>> {
        self.repository.top_words(language, limit).await
    }
}
