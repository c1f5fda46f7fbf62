/*!
 * Tests for configuration loading, validation and defaults
 */

use halcor::app_config::{Config, LogLevel};

use crate::common::create_temp_dir;

#[test]
fn test_defaultConfig_shouldUseCorpusLanguages() {
    let config = Config::default();

    assert_eq!(config.source_language, "frr");
    assert_eq!(config.target_language, "deu");
    assert!(config.database_path.is_none());
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

#[test]
fn test_fromFile_withFullJson_shouldLoadEveryField() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("halcor.json");

    std::fs::write(
        &path,
        r#"{
            "source_language": "frr",
            "target_language": "de",
            "database_path": "/tmp/corpus.db",
            "scoring": { "chunk_size": 80, "concurrent_writes": 8, "sample_size": 10 },
            "log_level": "debug"
        }"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();

    assert_eq!(config.target_language, "de");
    assert_eq!(
        config.database_path.as_deref(),
        Some(std::path::Path::new("/tmp/corpus.db"))
    );
    assert_eq!(config.scoring.chunk_size, 80);
    assert_eq!(config.scoring.concurrent_writes, 8);
    assert_eq!(config.scoring.sample_size, 10);
    assert_eq!(config.log_level, LogLevel::Debug);
}

#[test]
fn test_fromFile_withPartialScoringSection_shouldFillRemainingDefaults() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("halcor.json");

    std::fs::write(&path, r#"{ "scoring": { "chunk_size": 10 } }"#).unwrap();

    let config = Config::from_file(&path).unwrap();

    assert_eq!(config.scoring.chunk_size, 10);
    assert_eq!(config.scoring.concurrent_writes, 4);
    assert_eq!(config.scoring.sample_size, 5);
}

#[test]
fn test_fromFile_withMalformedJson_shouldFail() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("halcor.json");

    std::fs::write(&path, "{ not json").unwrap();

    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_fromFile_withMissingFile_shouldFail() {
    assert!(Config::from_file("/nonexistent/halcor.json").is_err());
}

#[test]
fn test_fromFile_withInvalidLanguage_shouldFailValidation() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("halcor.json");

    std::fs::write(&path, r#"{ "source_language": "zz" }"#).unwrap();

    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_saveToFile_thenReload_shouldRoundTrip() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("halcor.json");

    let mut config = Config::default();
    config.scoring.chunk_size = 64;
    config.log_level = LogLevel::Trace;
    config.save_to_file(&path).unwrap();

    let reloaded = Config::from_file(&path).unwrap();

    assert_eq!(reloaded.scoring.chunk_size, 64);
    assert_eq!(reloaded.log_level, LogLevel::Trace);
    assert_eq!(reloaded.source_language, config.source_language);
}

#[test]
fn test_validate_withZeroConcurrentWrites_shouldFail() {
    let mut config = Config::default();
    config.scoring.concurrent_writes = 0;

    assert!(config.validate().is_err());
}
