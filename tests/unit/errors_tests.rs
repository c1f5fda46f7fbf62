/*!
 * Tests for error types and conversions
 */

use halcor::{AppError, RecalcError, StoreError};

#[test]
fn test_storeError_database_shouldDisplayCorrectly() {
    let error = StoreError::Database("disk I/O error".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Database error"));
    assert!(display.contains("disk I/O error"));
}

#[test]
fn test_storeError_notFound_shouldDisplayEntityAndId() {
    let error = StoreError::NotFound {
        entity: "sentence_pair",
        id: "42".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("not found"));
    assert!(display.contains("sentence_pair"));
    assert!(display.contains("42"));
}

#[test]
fn test_storeError_invalidField_shouldDisplayFieldAndReason() {
    let error = StoreError::InvalidField {
        field: "source_text",
        reason: "must not be blank".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("source_text"));
    assert!(display.contains("must not be blank"));
}

#[test]
fn test_storeError_fromRusqliteNoRows_shouldBecomeNotFound() {
    let error: StoreError = rusqlite::Error::QueryReturnedNoRows.into();
    assert!(matches!(error, StoreError::NotFound { .. }));
}

#[test]
fn test_recalcError_fromStoreError_shouldWrapAsFetch() {
    let store_error = StoreError::Connection("database is locked".to_string());
    let error: RecalcError = store_error.into();

    let display = format!("{}", error);
    assert!(display.contains("Fetch failed"));
    assert!(display.contains("database is locked"));
}

#[test]
fn test_appError_fromStoreError_shouldWrapCorrectly() {
    let store_error = StoreError::Database("malformed schema".to_string());
    let error: AppError = store_error.into();

    assert!(matches!(error, AppError::Store(_)));
    assert!(format!("{}", error).contains("malformed schema"));
}

#[test]
fn test_appError_fromIoError_shouldBecomeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
    let error: AppError = io_error.into();

    assert!(matches!(error, AppError::File(_)));
    assert!(format!("{}", error).contains("no such file"));
}

#[test]
fn test_appError_fromAnyhow_shouldBecomeUnknown() {
    let error: AppError = anyhow::anyhow!("something odd").into();

    assert!(matches!(error, AppError::Unknown(_)));
    assert!(format!("{}", error).contains("something odd"));
}
