/*!
 * Corpus entity models and DTOs.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data.
 */

use serde::{Deserialize, Serialize};

use crate::errors::StoreError;
use crate::scoring::policy::{QualityBucket, QualityTag};
use crate::scoring::scorer::ScoreUpdate;

/// Longest reviewer note accepted by an update
const MAX_REVIEWER_NOTES_LEN: usize = 4000;

/// Source document record (a scanned book, newspaper issue, letter, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Unique document identifier (UUID)
    pub id: String,
    /// Document title
    pub title: String,
    /// Where the document came from (archive, collection, donor)
    pub provenance: Option<String>,
    /// Publication or writing year, if known
    pub year: Option<i64>,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
    /// Last update timestamp (ISO 8601)
    pub updated_at: String,
}

impl DocumentRecord {
    /// Create a new document record
    pub fn new(id: String, title: String, provenance: Option<String>, year: Option<i64>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id,
            title,
            provenance,
            year,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Prose text belonging to a document, tagged with its language
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRecord {
    /// Database ID
    pub id: i64,
    /// Document this text belongs to
    pub document_id: String,
    /// Section or chapter title, if any
    pub title: Option<String>,
    /// The text body
    pub body: String,
    /// ISO 639-3 language code of the body
    pub language: String,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
}

impl TextRecord {
    /// Create a new text record (without database ID)
    pub fn new(document_id: String, title: Option<String>, body: String, language: String) -> Self {
        Self {
            id: 0, // Will be assigned by database
            document_id,
            title,
            body,
            language,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Parallel sentence pair with its quality scoring columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentencePairRecord {
    /// Database ID
    pub id: i64,
    /// Document the pair was extracted from, if known
    pub document_id: Option<String>,
    /// Source-language sentence
    pub source_text: String,
    /// Target-language sentence
    pub target_text: String,
    /// Number of words in the source sentence
    pub source_word_count: i64,
    /// Number of words in the target sentence
    pub target_word_count: i64,
    /// Word-count similarity ratio (0.0 to 1.0)
    pub length_ratio: f64,
    /// Number of punctuation marks in the source sentence
    pub source_punct_count: i64,
    /// Number of punctuation marks in the target sentence
    pub target_punct_count: i64,
    /// Punctuation-count similarity ratio (0.0 to 1.0)
    pub punctuation_ratio: f64,
    /// Quality tags derived at last scoring
    pub quality_tags: Vec<QualityTag>,
    /// Current quality bucket
    pub quality_bucket: QualityBucket,
    /// Whether the bucket was pinned by a reviewer
    pub bucket_manual: bool,
    /// Fingerprint of the text at last scoring/override, None if never scored
    pub scored_text_hash: Option<String>,
    /// Whether a human has reviewed the pair
    pub reviewed: bool,
    /// Free-form reviewer notes
    pub reviewer_notes: Option<String>,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
    /// Last update timestamp (ISO 8601)
    pub updated_at: String,
}

impl SentencePairRecord {
    /// Create an unscored pair, the state a freshly ingested pair starts in
    pub fn unscored(source_text: String, target_text: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: 0, // Will be assigned by database
            document_id: None,
            source_text,
            target_text,
            source_word_count: 0,
            target_word_count: 0,
            length_ratio: 0.0,
            source_punct_count: 0,
            target_punct_count: 0,
            punctuation_ratio: 0.0,
            quality_tags: vec![],
            quality_bucket: QualityBucket::Unreviewed,
            bucket_manual: false,
            scored_text_hash: None,
            reviewed: false,
            reviewer_notes: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Whether the pair has ever been scored
    pub fn is_scored(&self) -> bool {
        self.scored_text_hash.is_some()
    }

    /// Apply a scoring result to the in-memory record
    pub fn apply_score(&mut self, update: &ScoreUpdate) {
        self.source_word_count = update.source_word_count;
        self.target_word_count = update.target_word_count;
        self.source_punct_count = update.source_punct_count;
        self.target_punct_count = update.target_punct_count;
        self.length_ratio = update.length_ratio;
        self.punctuation_ratio = update.punctuation_ratio;
        self.quality_tags = update.quality_tags.clone();
        self.quality_bucket = update.quality_bucket;
        self.bucket_manual = update.bucket_manual;
        self.scored_text_hash = Some(update.scored_text_hash.clone());
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

/// Insert shape for a new sentence pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSentencePair {
    /// Document the pair was extracted from, if known
    pub document_id: Option<String>,
    /// Source-language sentence
    pub source_text: String,
    /// Target-language sentence
    pub target_text: String,
}

impl NewSentencePair {
    /// Create a new pair insert shape without a document
    pub fn new(source_text: String, target_text: String) -> Self {
        Self {
            document_id: None,
            source_text,
            target_text,
        }
    }

    /// Create a new pair insert shape attached to a document
    pub fn for_document(document_id: String, source_text: String, target_text: String) -> Self {
        Self {
            document_id: Some(document_id),
            source_text,
            target_text,
        }
    }
}

/// Update request for a sentence pair.
///
/// Every field is optional and independently validated; absent fields are
/// left untouched. Setting `quality_bucket` is the manual-override entry
/// point. An empty `reviewer_notes` string clears the stored notes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PairUpdate {
    /// Replacement source sentence
    pub source_text: Option<String>,
    /// Replacement target sentence
    pub target_text: Option<String>,
    /// Manually pinned bucket
    pub quality_bucket: Option<QualityBucket>,
    /// Review status
    pub reviewed: Option<bool>,
    /// Reviewer notes; empty string clears them
    pub reviewer_notes: Option<String>,
}

impl PairUpdate {
    /// Whether the update carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.source_text.is_none()
            && self.target_text.is_none()
            && self.quality_bucket.is_none()
            && self.reviewed.is_none()
            && self.reviewer_notes.is_none()
    }

    /// Whether the update modifies the pair text
    pub fn changes_text(&self) -> bool {
        self.source_text.is_some() || self.target_text.is_some()
    }

    /// Validate each present field
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.is_empty() {
            return Err(StoreError::InvalidField {
                field: "update",
                reason: "no fields to update".to_string(),
            });
        }

        if let Some(text) = &self.source_text {
            if text.trim().is_empty() {
                return Err(StoreError::InvalidField {
                    field: "source_text",
                    reason: "must not be blank".to_string(),
                });
            }
        }

        if let Some(text) = &self.target_text {
            if text.trim().is_empty() {
                return Err(StoreError::InvalidField {
                    field: "target_text",
                    reason: "must not be blank".to_string(),
                });
            }
        }

        if let Some(notes) = &self.reviewer_notes {
            if notes.chars().count() > MAX_REVIEWER_NOTES_LEN {
                return Err(StoreError::InvalidField {
                    field: "reviewer_notes",
                    reason: format!("longer than {} characters", MAX_REVIEWER_NOTES_LEN),
                });
            }
        }

        Ok(())
    }
}

/// Dictionary entry record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryEntryRecord {
    /// Database ID
    pub id: i64,
    /// Headword in the source language
    pub headword: String,
    /// Translation in the target language
    pub translation: String,
    /// Part of speech, if recorded
    pub part_of_speech: Option<String>,
    /// Editorial notes
    pub notes: Option<String>,
    /// Document the entry was attested in, if any
    pub document_id: Option<String>,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
    /// Last update timestamp (ISO 8601)
    pub updated_at: String,
}

/// Insert shape for a new dictionary entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDictionaryEntry {
    /// Headword in the source language
    pub headword: String,
    /// Translation in the target language
    pub translation: String,
    /// Part of speech, if recorded
    pub part_of_speech: Option<String>,
    /// Editorial notes
    pub notes: Option<String>,
    /// Document the entry was attested in, if any
    pub document_id: Option<String>,
}

impl NewDictionaryEntry {
    /// Create a minimal headword/translation entry
    pub fn new(headword: String, translation: String) -> Self {
        Self {
            headword,
            translation,
            part_of_speech: None,
            notes: None,
            document_id: None,
        }
    }

    /// Validate the entry before insertion
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.headword.trim().is_empty() {
            return Err(StoreError::InvalidField {
                field: "headword",
                reason: "must not be blank".to_string(),
            });
        }
        if self.translation.trim().is_empty() {
            return Err(StoreError::InvalidField {
                field: "translation",
                reason: "must not be blank".to_string(),
            });
        }
        Ok(())
    }
}

/// Word frequency record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordFrequencyRecord {
    /// Database ID
    pub id: i64,
    /// The word, lowercased
    pub word: String,
    /// ISO 639-3 language code the word was counted under
    pub language: String,
    /// Number of occurrences across the corpus
    pub occurrences: i64,
    /// Last update timestamp (ISO 8601)
    pub updated_at: String,
}

impl WordFrequencyRecord {
    /// Create a new frequency record (ID will be assigned by the database)
    pub fn new(word: String, language: String, occurrences: i64) -> Self {
        Self {
            id: 0,
            word,
            language,
            occurrences,
            updated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
