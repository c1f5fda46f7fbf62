/*!
 * Repository layer for corpus database operations.
 *
 * This module provides a high-level API for all database operations,
 * abstracting away the SQL details and providing type-safe access.
 */

use anyhow::Result;
use log::{debug, info};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use uuid::Uuid;

use super::connection::DatabaseConnection;
use super::models::{
    DictionaryEntryRecord, DocumentRecord, NewDictionaryEntry, NewSentencePair, PairUpdate,
    SentencePairRecord, TextRecord, WordFrequencyRecord,
};
use crate::errors::StoreError;
use crate::scoring::policy::QualityBucket;
use crate::scoring::recalc::RecalcFilter;
use crate::scoring::scorer::{self, ScoreUpdate};

/// Repository for corpus database operations
#[derive(Clone)]
pub struct CorpusRepository {
    /// Database connection
    db: DatabaseConnection,
}

impl CorpusRepository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Access the underlying database connection
    pub fn database(&self) -> &DatabaseConnection {
        &self.db
    }

    // =========================================================================
    // Document Operations
    // =========================================================================

    /// Create a new document
    pub async fn create_document(
        &self,
        title: &str,
        provenance: Option<String>,
        year: Option<i64>,
    ) -> Result<DocumentRecord> {
        let document = DocumentRecord::new(
            Uuid::new_v4().to_string(),
            title.to_string(),
            provenance,
            year,
        );
        let record = document.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO documents (id, title, provenance, year, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    "#,
                    params![
                        record.id,
                        record.title,
                        record.provenance,
                        record.year,
                        record.created_at,
                        record.updated_at,
                    ],
                )?;
                Ok(())
            })
            .await?;

        Ok(document)
    }

    /// Get a document by ID
    pub async fn get_document(&self, document_id: &str) -> Result<Option<DocumentRecord>> {
        let document_id = document_id.to_string();

        self.db
            .execute_async(move |conn| {
                let result = conn
                    .query_row(
                        r#"
                        SELECT id, title, provenance, year, created_at, updated_at
                        FROM documents WHERE id = ?1
                        "#,
                        [&document_id],
                        |row| {
                            Ok(DocumentRecord {
                                id: row.get(0)?,
                                title: row.get(1)?,
                                provenance: row.get(2)?,
                                year: row.get(3)?,
                                created_at: row.get(4)?,
                                updated_at: row.get(5)?,
                            })
                        },
                    )
                    .optional()?;

                Ok(result)
            })
            .await
    }

    /// List all documents, newest first
    pub async fn list_documents(&self) -> Result<Vec<DocumentRecord>> {
        self.db
            .execute_async(|conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, title, provenance, year, created_at, updated_at
                    FROM documents
                    ORDER BY created_at DESC
                    "#,
                )?;

                let rows = stmt.query_map([], |row| {
                    Ok(DocumentRecord {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        provenance: row.get(2)?,
                        year: row.get(3)?,
                        created_at: row.get(4)?,
                        updated_at: row.get(5)?,
                    })
                })?;

                let documents: Vec<DocumentRecord> = rows.filter_map(|r| r.ok()).collect();
                Ok(documents)
            })
            .await
    }

    /// Delete a document; its texts go with it, its pairs are detached
    pub async fn delete_document(&self, document_id: &str) -> Result<()> {
        let document_id = document_id.to_string();

        self.db
            .execute_async(move |conn| {
                conn.execute("DELETE FROM documents WHERE id = ?1", [&document_id])?;
                Ok(())
            })
            .await
    }

    // =========================================================================
    // Text Operations
    // =========================================================================

    /// Insert a prose text for a document
    pub async fn insert_text(&self, text: &TextRecord) -> Result<i64> {
        let text = text.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO texts (document_id, title, body, language, created_at)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                    params![
                        text.document_id,
                        text.title,
                        text.body,
                        text.language,
                        text.created_at,
                    ],
                )?;

                Ok(conn.last_insert_rowid())
            })
            .await
    }

    /// List every stored text
    pub async fn list_texts(&self) -> Result<Vec<TextRecord>> {
        self.db
            .execute_async(|conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, document_id, title, body, language, created_at
                    FROM texts
                    ORDER BY id
                    "#,
                )?;

                let rows = stmt.query_map([], |row| {
                    Ok(TextRecord {
                        id: row.get(0)?,
                        document_id: row.get(1)?,
                        title: row.get(2)?,
                        body: row.get(3)?,
                        language: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                })?;

                let texts: Vec<TextRecord> = rows.filter_map(|r| r.ok()).collect();
                Ok(texts)
            })
            .await
    }

    // =========================================================================
    // Sentence Pair Operations
    // =========================================================================

    /// Insert a batch of new, unscored sentence pairs
    pub async fn insert_pairs(&self, pairs: Vec<NewSentencePair>) -> Result<i64> {
        self.db
            .transaction_async(move |tx| {
                let now = chrono::Utc::now().to_rfc3339();
                let mut inserted = 0i64;

                for pair in pairs {
                    tx.execute(
                        r#"
                        INSERT INTO sentence_pairs (document_id, source_text, target_text, created_at, updated_at)
                        VALUES (?1, ?2, ?3, ?4, ?5)
                        "#,
                        params![pair.document_id, pair.source_text, pair.target_text, now, now],
                    )?;
                    inserted += 1;
                }

                Ok(inserted)
            })
            .await
    }

    /// Parse a sentence pair row in SELECT column order
    fn parse_pair_row(row: &rusqlite::Row) -> rusqlite::Result<SentencePairRecord> {
        Ok(SentencePairRecord {
            id: row.get(0)?,
            document_id: row.get(1)?,
            source_text: row.get(2)?,
            target_text: row.get(3)?,
            source_word_count: row.get(4)?,
            target_word_count: row.get(5)?,
            length_ratio: row.get(6)?,
            source_punct_count: row.get(7)?,
            target_punct_count: row.get(8)?,
            punctuation_ratio: row.get(9)?,
            quality_tags: serde_json::from_str(&row.get::<_, String>(10)?).unwrap_or_default(),
            quality_bucket: row
                .get::<_, String>(11)?
                .parse()
                .unwrap_or(QualityBucket::Unreviewed),
            bucket_manual: row.get::<_, i32>(12)? != 0,
            scored_text_hash: row.get(13)?,
            reviewed: row.get::<_, i32>(14)? != 0,
            reviewer_notes: row.get(15)?,
            created_at: row.get(16)?,
            updated_at: row.get(17)?,
        })
    }

    /// Columns selected for sentence pair queries, in [`Self::parse_pair_row`] order
    const PAIR_COLUMNS: &'static str = "id, document_id, source_text, target_text, \
         source_word_count, target_word_count, length_ratio, \
         source_punct_count, target_punct_count, punctuation_ratio, \
         quality_tags, quality_bucket, bucket_manual, scored_text_hash, \
         reviewed, reviewer_notes, created_at, updated_at";

    /// Get a sentence pair by ID
    pub async fn get_pair(&self, pair_id: i64) -> Result<Option<SentencePairRecord>> {
        self.db
            .execute_async(move |conn| Self::get_pair_sync(conn, pair_id))
            .await
    }

    /// Get a sentence pair by ID (synchronous version for use within transactions)
    fn get_pair_sync(conn: &Connection, pair_id: i64) -> Result<Option<SentencePairRecord>> {
        let sql = format!(
            "SELECT {} FROM sentence_pairs WHERE id = ?1",
            Self::PAIR_COLUMNS
        );

        let result = conn
            .query_row(&sql, [pair_id], Self::parse_pair_row)
            .optional()?;

        Ok(result)
    }

    /// Fetch the sentence pairs selected by a recalculation filter
    pub async fn fetch_pairs(&self, filter: &RecalcFilter) -> Result<Vec<SentencePairRecord>> {
        let filter = filter.clone();

        self.db
            .execute_async(move |conn| {
                let pairs: Vec<SentencePairRecord> = match filter {
                    RecalcFilter::All => {
                        let sql = format!(
                            "SELECT {} FROM sentence_pairs ORDER BY id",
                            Self::PAIR_COLUMNS
                        );
                        let mut stmt = conn.prepare(&sql)?;
                        let rows = stmt.query_map([], Self::parse_pair_row)?;
                        rows.filter_map(|r| r.ok()).collect()
                    }
                    RecalcFilter::Unscored => {
                        let sql = format!(
                            "SELECT {} FROM sentence_pairs WHERE scored_text_hash IS NULL ORDER BY id",
                            Self::PAIR_COLUMNS
                        );
                        let mut stmt = conn.prepare(&sql)?;
                        let rows = stmt.query_map([], Self::parse_pair_row)?;
                        rows.filter_map(|r| r.ok()).collect()
                    }
                    RecalcFilter::Document(document_id) => {
                        let sql = format!(
                            "SELECT {} FROM sentence_pairs WHERE document_id = ?1 ORDER BY id",
                            Self::PAIR_COLUMNS
                        );
                        let mut stmt = conn.prepare(&sql)?;
                        let rows = stmt.query_map([&document_id], Self::parse_pair_row)?;
                        rows.filter_map(|r| r.ok()).collect()
                    }
                    RecalcFilter::Ids(ids) => {
                        if ids.is_empty() {
                            return Ok(vec![]);
                        }
                        let placeholders = vec!["?"; ids.len()].join(", ");
                        let sql = format!(
                            "SELECT {} FROM sentence_pairs WHERE id IN ({}) ORDER BY id",
                            Self::PAIR_COLUMNS,
                            placeholders
                        );
                        let mut stmt = conn.prepare(&sql)?;
                        let rows = stmt.query_map(params_from_iter(ids.iter()), Self::parse_pair_row)?;
                        rows.filter_map(|r| r.ok()).collect()
                    }
                };

                Ok(pairs)
            })
            .await
    }

    /// Apply a validated update to a sentence pair, returning the new record.
    ///
    /// A text change re-scores the pair immediately, which also drops any
    /// manual bucket (the override was for the old text). A `quality_bucket`
    /// field pins the bucket manually and fingerprints the current text so
    /// later recalculations know the override is still valid.
    pub async fn update_pair(
        &self,
        pair_id: i64,
        update: &PairUpdate,
    ) -> Result<SentencePairRecord> {
        update.validate()?;
        let update = update.clone();

        self.db
            .transaction_async(move |tx| {
                let mut pair = Self::get_pair_sync(tx, pair_id)?.ok_or_else(|| {
                    anyhow::Error::from(StoreError::NotFound {
                        entity: "sentence_pair",
                        id: pair_id.to_string(),
                    })
                })?;

                let changes_text = update.changes_text();

                if let Some(text) = update.source_text {
                    pair.source_text = text;
                }
                if let Some(text) = update.target_text {
                    pair.target_text = text;
                }
                if let Some(flag) = update.reviewed {
                    pair.reviewed = flag;
                }
                if let Some(notes) = update.reviewer_notes {
                    pair.reviewer_notes = if notes.trim().is_empty() {
                        None
                    } else {
                        Some(notes)
                    };
                }

                if changes_text {
                    // Stored fingerprint no longer matches the new text, so a
                    // stale manual bucket is dropped here
                    let score_update = scorer::rescore_record(&pair);
                    pair.apply_score(&score_update);
                    debug!("Re-scored pair {} after text edit: {}", pair_id, pair.quality_bucket);
                }

                if let Some(bucket) = update.quality_bucket {
                    pair.quality_bucket = bucket;
                    pair.bucket_manual = true;
                    pair.scored_text_hash = Some(scorer::pair_text_hash(
                        &pair.source_text,
                        &pair.target_text,
                    ));
                }

                pair.updated_at = chrono::Utc::now().to_rfc3339();
                Self::write_pair_sync(tx, &pair)?;

                Ok(pair)
            })
            .await
    }

    /// Write every mutable column of a pair back to its row
    fn write_pair_sync(conn: &Connection, pair: &SentencePairRecord) -> Result<()> {
        conn.execute(
            r#"
            UPDATE sentence_pairs SET
                source_text = ?1, target_text = ?2,
                source_word_count = ?3, target_word_count = ?4, length_ratio = ?5,
                source_punct_count = ?6, target_punct_count = ?7, punctuation_ratio = ?8,
                quality_tags = ?9, quality_bucket = ?10, bucket_manual = ?11,
                scored_text_hash = ?12, reviewed = ?13, reviewer_notes = ?14,
                updated_at = ?15
            WHERE id = ?16
            "#,
            params![
                pair.source_text,
                pair.target_text,
                pair.source_word_count,
                pair.target_word_count,
                pair.length_ratio,
                pair.source_punct_count,
                pair.target_punct_count,
                pair.punctuation_ratio,
                serde_json::to_string(&pair.quality_tags)?,
                pair.quality_bucket.to_string(),
                pair.bucket_manual as i32,
                pair.scored_text_hash,
                pair.reviewed as i32,
                pair.reviewer_notes,
                pair.updated_at,
                pair.id,
            ],
        )?;
        Ok(())
    }

    /// Write a scoring result to a pair's derived columns
    pub async fn apply_score(&self, pair_id: i64, update: &ScoreUpdate) -> Result<()> {
        let update = update.clone();
        let now = chrono::Utc::now().to_rfc3339();

        self.db
            .execute_async(move |conn| {
                let changed = conn.execute(
                    r#"
                    UPDATE sentence_pairs SET
                        source_word_count = ?1, target_word_count = ?2, length_ratio = ?3,
                        source_punct_count = ?4, target_punct_count = ?5, punctuation_ratio = ?6,
                        quality_tags = ?7, quality_bucket = ?8, bucket_manual = ?9,
                        scored_text_hash = ?10, updated_at = ?11
                    WHERE id = ?12
                    "#,
                    params![
                        update.source_word_count,
                        update.target_word_count,
                        update.length_ratio,
                        update.source_punct_count,
                        update.target_punct_count,
                        update.punctuation_ratio,
                        serde_json::to_string(&update.quality_tags)?,
                        update.quality_bucket.to_string(),
                        update.bucket_manual as i32,
                        update.scored_text_hash,
                        now,
                        pair_id,
                    ],
                )?;

                if changed == 0 {
                    return Err(StoreError::NotFound {
                        entity: "sentence_pair",
                        id: pair_id.to_string(),
                    }
                    .into());
                }

                Ok(())
            })
            .await
    }

    /// Delete a sentence pair
    pub async fn delete_pair(&self, pair_id: i64) -> Result<()> {
        self.db
            .execute_async(move |conn| {
                conn.execute("DELETE FROM sentence_pairs WHERE id = ?1", [pair_id])?;
                Ok(())
            })
            .await
    }

    /// Count pairs per quality bucket
    pub async fn bucket_counts(&self) -> Result<Vec<(QualityBucket, i64)>> {
        self.db
            .execute_async(|conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT quality_bucket, COUNT(*)
                    FROM sentence_pairs
                    GROUP BY quality_bucket
                    ORDER BY COUNT(*) DESC
                    "#,
                )?;

                let rows = stmt.query_map([], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
                })?;

                let counts: Vec<(QualityBucket, i64)> = rows
                    .filter_map(|r| r.ok())
                    .filter_map(|(bucket, count)| {
                        bucket.parse::<QualityBucket>().ok().map(|b| (b, count))
                    })
                    .collect();

                Ok(counts)
            })
            .await
    }

    // =========================================================================
    // Dictionary Operations
    // =========================================================================

    /// Insert a new dictionary entry
    pub async fn insert_dictionary_entry(
        &self,
        entry: &NewDictionaryEntry,
    ) -> Result<DictionaryEntryRecord> {
        entry.validate()?;
        let entry = entry.clone();
        let now = chrono::Utc::now().to_rfc3339();

        let row = entry.clone();
        let row_timestamp = now.clone();
        let id = self
            .db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO dictionary_entries (
                        headword, translation, part_of_speech, notes, document_id,
                        created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                    "#,
                    params![
                        row.headword,
                        row.translation,
                        row.part_of_speech,
                        row.notes,
                        row.document_id,
                        row_timestamp,
                        row_timestamp,
                    ],
                )?;

                Ok(conn.last_insert_rowid())
            })
            .await?;

        Ok(DictionaryEntryRecord {
            id,
            headword: entry.headword,
            translation: entry.translation,
            part_of_speech: entry.part_of_speech,
            notes: entry.notes,
            document_id: entry.document_id,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Parse a dictionary entry row in SELECT column order
    fn parse_dictionary_row(row: &rusqlite::Row) -> rusqlite::Result<DictionaryEntryRecord> {
        Ok(DictionaryEntryRecord {
            id: row.get(0)?,
            headword: row.get(1)?,
            translation: row.get(2)?,
            part_of_speech: row.get(3)?,
            notes: row.get(4)?,
            document_id: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    /// Search dictionary entries whose headword contains the query
    pub async fn search_dictionary(&self, query: &str) -> Result<Vec<DictionaryEntryRecord>> {
        let query = query.to_string();

        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, headword, translation, part_of_speech, notes, document_id,
                           created_at, updated_at
                    FROM dictionary_entries
                    WHERE headword LIKE '%' || ?1 || '%'
                    ORDER BY headword
                    "#,
                )?;

                let rows = stmt.query_map([&query], Self::parse_dictionary_row)?;
                let entries: Vec<DictionaryEntryRecord> = rows.filter_map(|r| r.ok()).collect();
                Ok(entries)
            })
            .await
    }

    /// List dictionary entries alphabetically, paginated
    pub async fn list_dictionary(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<DictionaryEntryRecord>> {
        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, headword, translation, part_of_speech, notes, document_id,
                           created_at, updated_at
                    FROM dictionary_entries
                    ORDER BY headword
                    LIMIT ?1 OFFSET ?2
                    "#,
                )?;

                let rows = stmt.query_map(
                    params![limit as i64, offset as i64],
                    Self::parse_dictionary_row,
                )?;
                let entries: Vec<DictionaryEntryRecord> = rows.filter_map(|r| r.ok()).collect();
                Ok(entries)
            })
            .await
    }

    /// Delete a dictionary entry
    pub async fn delete_dictionary_entry(&self, entry_id: i64) -> Result<()> {
        self.db
            .execute_async(move |conn| {
                conn.execute("DELETE FROM dictionary_entries WHERE id = ?1", [entry_id])?;
                Ok(())
            })
            .await
    }

    // =========================================================================
    // Word Frequency Operations
    // =========================================================================

    /// Replace the whole word frequency table with a freshly computed set
    pub async fn replace_frequencies(&self, records: Vec<WordFrequencyRecord>) -> Result<()> {
        let count = records.len();

        self.db
            .transaction_async(move |tx| {
                tx.execute("DELETE FROM word_frequencies", [])?;

                for record in records {
                    tx.execute(
                        r#"
                        INSERT INTO word_frequencies (word, language, occurrences, updated_at)
                        VALUES (?1, ?2, ?3, ?4)
                        "#,
                        params![
                            record.word,
                            record.language,
                            record.occurrences,
                            record.updated_at,
                        ],
                    )?;
                }

                Ok(())
            })
            .await?;

        info!("Replaced word frequencies with {} entries", count);
        Ok(())
    }

    /// Merge frequency counts into the table, adding to existing rows
    pub async fn merge_frequencies(&self, records: Vec<WordFrequencyRecord>) -> Result<()> {
        self.db
            .transaction_async(move |tx| {
                for record in records {
                    tx.execute(
                        r#"
                        INSERT INTO word_frequencies (word, language, occurrences, updated_at)
                        VALUES (?1, ?2, ?3, ?4)
                        ON CONFLICT(word, language) DO UPDATE SET
                            occurrences = occurrences + excluded.occurrences,
                            updated_at = excluded.updated_at
                        "#,
                        params![
                            record.word,
                            record.language,
                            record.occurrences,
                            record.updated_at,
                        ],
                    )?;
                }

                Ok(())
            })
            .await
    }

    /// Most frequent words for a language
    pub async fn top_words(
        &self,
        language: &str,
        limit: usize,
    ) -> Result<Vec<WordFrequencyRecord>> {
        let language = language.to_string();

        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, word, language, occurrences, updated_at
                    FROM word_frequencies
                    WHERE language = ?1
                    ORDER BY occurrences DESC, word
                    LIMIT ?2
                    "#,
                )?;

                let rows = stmt.query_map(params![language, limit as i64], |row| {
                    Ok(WordFrequencyRecord {
                        id: row.get(0)?,
                        word: row.get(1)?,
                        language: row.get(2)?,
                        occurrences: row.get(3)?,
                        updated_at: row.get(4)?,
                    })
                })?;

                let records: Vec<WordFrequencyRecord> = rows.filter_map(|r| r.ok()).collect();
                Ok(records)
            })
            .await
    }
}
