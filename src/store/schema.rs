/*!
 * Database schema definitions and migrations.
 *
 * This module contains the SQL schema for all corpus tables
 * and handles schema migrations for version upgrades.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    // WAL for better concurrency and crash recovery; foreign key
    // enforcement is per-connection, so both run on every open
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;

    // Check current schema version
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        // Fresh database - create all tables
        info!("Initializing database schema v{}", SCHEMA_VERSION);
        create_all_tables(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version < SCHEMA_VERSION {
        // Need to migrate
        info!(
            "Migrating database schema from v{} to v{}",
            current_version, SCHEMA_VERSION
        );
        migrate_schema(conn, current_version)?;
    } else {
        debug!("Database schema is up to date (v{})", current_version);
    }

    Ok(())
}

/// Get the current schema version from the database
fn get_schema_version(conn: &Connection) -> Result<i32> {
    // Check if the schema_version table exists
    let table_exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )
        .context("Failed to check schema_version table existence")?;

    if !table_exists {
        return Ok(0);
    }

    let version: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);

    Ok(version)
}

/// Set the schema version in the database
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

/// Create all database tables
fn create_all_tables(conn: &Connection) -> Result<()> {
    // Create schema version table
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;

    // Create documents table
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            provenance TEXT,
            year INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_documents_year ON documents(year);
        "#,
    )?;

    // Create texts table
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS texts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            document_id TEXT NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
            title TEXT,
            body TEXT NOT NULL,
            language TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_texts_document ON texts(document_id);
        CREATE INDEX IF NOT EXISTS idx_texts_language ON texts(language);
        "#,
    )?;

    // Create sentence_pairs table
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS sentence_pairs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            document_id TEXT REFERENCES documents(id) ON DELETE SET NULL,
            source_text TEXT NOT NULL,
            target_text TEXT NOT NULL,
            source_word_count INTEGER NOT NULL DEFAULT 0,
            target_word_count INTEGER NOT NULL DEFAULT 0,
            length_ratio REAL NOT NULL DEFAULT 0.0,
            source_punct_count INTEGER NOT NULL DEFAULT 0,
            target_punct_count INTEGER NOT NULL DEFAULT 0,
            punctuation_ratio REAL NOT NULL DEFAULT 0.0,
            quality_tags TEXT NOT NULL DEFAULT '[]',
            quality_bucket TEXT NOT NULL DEFAULT 'unreviewed',
            bucket_manual INTEGER NOT NULL DEFAULT 0,
            scored_text_hash TEXT,
            reviewed INTEGER NOT NULL DEFAULT 0,
            reviewer_notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_pairs_document ON sentence_pairs(document_id);
        CREATE INDEX IF NOT EXISTS idx_pairs_bucket ON sentence_pairs(quality_bucket);
        CREATE INDEX IF NOT EXISTS idx_pairs_unscored ON sentence_pairs(scored_text_hash)
            WHERE scored_text_hash IS NULL;
        "#,
    )?;

    // Create dictionary_entries table
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS dictionary_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            headword TEXT NOT NULL,
            translation TEXT NOT NULL,
            part_of_speech TEXT,
            notes TEXT,
            document_id TEXT REFERENCES documents(id) ON DELETE SET NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_dictionary_headword ON dictionary_entries(headword);
        "#,
    )?;

    // Create word_frequencies table
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS word_frequencies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            word TEXT NOT NULL,
            language TEXT NOT NULL,
            occurrences INTEGER NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL,
            UNIQUE(word, language)
        );

        CREATE INDEX IF NOT EXISTS idx_frequencies_language ON word_frequencies(language, occurrences);
        "#,
    )?;

    info!("Database schema created successfully");
    Ok(())
}

/// Migrate the schema from one version to another
fn migrate_schema(conn: &Connection, from_version: i32) -> Result<()> {
    let mut current = from_version;

    while current < SCHEMA_VERSION {
        match current {
            // Add migration steps here as schema evolves
            // Example:
            // 1 => {
            //     migrate_v1_to_v2(conn)?;
            //     current = 2;
            // }
            _ => {
                return Err(anyhow::anyhow!(
                    "Unknown schema version: {}. Cannot migrate.",
                    current
                ));
            }
        }
    }

    set_schema_version(conn, SCHEMA_VERSION)?;
    info!("Schema migration completed to v{}", SCHEMA_VERSION);
    Ok(())
}
