/*!
 * End-to-end tests for the SQLite corpus store.
 *
 * Covers on-disk database lifecycle, schema idempotence across reopens,
 * the document/pair/dictionary flows and word frequency tracking.
 */

use std::sync::Arc;

use tokio_test;

use halcor::frequency::FrequencyTracker;
use halcor::store::models::{NewDictionaryEntry, NewSentencePair, TextRecord};
use halcor::store::DatabaseConnection;
use halcor::{CorpusRepository, QualityBucket, RecalcFilter, Recalculator};

use crate::common::{create_temp_dir, init_test_logging, seeded_repository, ALIGNED_PAIR};

#[test]
fn test_onDiskDatabase_shouldPersistAcrossReopen() {
    init_test_logging();

    let dir = create_temp_dir().unwrap();
    let db_path = dir.path().join("corpus.db");

    let document_id = tokio_test::block_on(async {
        let repo = CorpusRepository::new(DatabaseConnection::new(&db_path).unwrap());
        let document = repo
            .create_document("Helgoländer Lesebuch", Some("Nordseemuseum".to_string()), Some(1937))
            .await
            .unwrap();

        repo.insert_pairs(vec![NewSentencePair::for_document(
            document.id.clone(),
            ALIGNED_PAIR.0.to_string(),
            ALIGNED_PAIR.1.to_string(),
        )])
        .await
        .unwrap();

        document.id
    });

    // Opening the same file again runs schema initialization a second time
    // and must find the stored rows untouched
    tokio_test::block_on(async {
        let reopened = CorpusRepository::new(DatabaseConnection::new(&db_path).unwrap());

        let document = reopened.get_document(&document_id).await.unwrap().unwrap();
        assert_eq!(document.title, "Helgoländer Lesebuch");

        let pairs = reopened
            .fetch_pairs(&RecalcFilter::Document(document_id))
            .await
            .unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].source_text, ALIGNED_PAIR.0);
    });
}

#[tokio::test]
async fn test_onDiskDatabase_shouldPersistScoresAcrossReopen() {
    let dir = create_temp_dir().unwrap();
    let db_path = dir.path().join("corpus.db");

    {
        let repo = CorpusRepository::new(DatabaseConnection::new(&db_path).unwrap());
        repo.insert_pairs(vec![NewSentencePair::new(
            ALIGNED_PAIR.0.to_string(),
            ALIGNED_PAIR.1.to_string(),
        )])
        .await
        .unwrap();

        let recalculator = Recalculator::new(Arc::new(repo));
        recalculator.run(&RecalcFilter::All, |_, _| {}).await.unwrap();
    }

    let reopened = CorpusRepository::new(DatabaseConnection::new(&db_path).unwrap());
    let pairs = reopened.fetch_pairs(&RecalcFilter::All).await.unwrap();

    assert_eq!(pairs.len(), 1);
    assert!(pairs[0].is_scored());
    assert_eq!(pairs[0].quality_bucket, QualityBucket::HighQuality);
    assert_eq!(pairs[0].source_word_count, 4);
}

#[tokio::test]
async fn test_databaseStats_shouldCountStoredEntities() {
    let (repo, ids) = seeded_repository(&[ALIGNED_PAIR, ("Moin", "Hallo")]).await.unwrap();

    repo.create_document("Brief 1902", None, Some(1902)).await.unwrap();
    repo.insert_dictionary_entry(&NewDictionaryEntry::new(
        "Hingst".to_string(),
        "Pferd".to_string(),
    ))
    .await
    .unwrap();

    let stats = repo.database().stats().unwrap();
    assert_eq!(stats.document_count, 1);
    assert_eq!(stats.pair_count, 2);
    assert_eq!(stats.scored_pairs, 0);
    assert_eq!(stats.dictionary_entries, 1);

    // Score one pair and watch the scored counter move
    let recalculator = Recalculator::new(Arc::new(repo.clone()));
    recalculator
        .run(&RecalcFilter::Ids(vec![ids[0]]), |_, _| {})
        .await
        .unwrap();

    let stats = repo.database().stats().unwrap();
    assert_eq!(stats.scored_pairs, 1);
}

#[tokio::test]
async fn test_deleteDocument_shouldCascadeTextsAndDetachPairs() {
    let repo = CorpusRepository::new_in_memory().unwrap();

    let document = repo.create_document("Uasen-Düne", None, None).await.unwrap();
    repo.insert_text(&TextRecord::new(
        document.id.clone(),
        None,
        "Deät Lun es letj.".to_string(),
        "frr".to_string(),
    ))
    .await
    .unwrap();
    repo.insert_pairs(vec![NewSentencePair::for_document(
        document.id.clone(),
        "Moin".to_string(),
        "Hallo".to_string(),
    )])
    .await
    .unwrap();

    repo.delete_document(&document.id).await.unwrap();

    assert!(repo.get_document(&document.id).await.unwrap().is_none());
    assert!(repo.list_texts().await.unwrap().is_empty());

    // The pair survives without its document
    let pairs = repo.fetch_pairs(&RecalcFilter::All).await.unwrap();
    assert_eq!(pairs.len(), 1);
    assert!(pairs[0].document_id.is_none());
}

#[tokio::test]
async fn test_frequencyTracker_overFullCorpus_shouldSplitByLanguage() {
    let (repo, _) = seeded_repository(&[("Deät Lun es gud.", "Das Land ist gut.")])
        .await
        .unwrap();

    let document = repo.create_document("Lesebuch", None, None).await.unwrap();
    repo.insert_text(&TextRecord::new(
        document.id.clone(),
        None,
        "Deät Lun, deät Lun!".to_string(),
        "frr".to_string(),
    ))
    .await
    .unwrap();

    let tracker = FrequencyTracker::new(repo.clone());
    tracker.rebuild().await.unwrap();

    let halunder = tracker.top("frr", 10).await.unwrap();
    let german = tracker.top("deu", 10).await.unwrap();

    // "deät" appears once in the pair and twice in the prose text
    let deat = halunder.iter().find(|w| w.word == "deät").unwrap();
    assert_eq!(deat.occurrences, 3);

    assert!(german.iter().any(|w| w.word == "das"));
    assert!(german.iter().all(|w| w.word != "deät"));
}

#[tokio::test]
async fn test_frequencyTracker_rebuildAfterEdit_shouldReflectCurrentCorpus() {
    let (repo, ids) = seeded_repository(&[("Moin Moin", "Hallo")]).await.unwrap();
    let tracker = FrequencyTracker::new(repo.clone());

    tracker.rebuild().await.unwrap();
    let before = tracker.top("frr", 10).await.unwrap();
    assert_eq!(before[0].word, "moin");
    assert_eq!(before[0].occurrences, 2);

    repo.update_pair(
        ids[0],
        &halcor::store::models::PairUpdate {
            source_text: Some("Moin".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    tracker.rebuild().await.unwrap();
    let after = tracker.top("frr", 10).await.unwrap();
    assert_eq!(after[0].occurrences, 1);
}

#[tokio::test]
async fn test_dictionaryFlow_addSearchListDelete_shouldWorkEndToEnd() {
    let repo = CorpusRepository::new_in_memory().unwrap();

    for (headword, translation, part_of_speech) in [
        ("Hingst", "Pferd", Some("noun")),
        ("Hüs", "Haus", Some("noun")),
        ("letj", "klein", Some("adjective")),
    ] {
        repo.insert_dictionary_entry(&NewDictionaryEntry {
            headword: headword.to_string(),
            translation: translation.to_string(),
            part_of_speech: part_of_speech.map(str::to_string),
            notes: None,
            document_id: None,
        })
        .await
        .unwrap();
    }

    let found = repo.search_dictionary("H").await.unwrap();
    assert_eq!(found.len(), 2);

    let page = repo.list_dictionary(2, 1).await.unwrap();
    assert_eq!(page.len(), 2);

    let entry = &repo.search_dictionary("letj").await.unwrap()[0];
    repo.delete_dictionary_entry(entry.id).await.unwrap();

    assert!(repo.search_dictionary("letj").await.unwrap().is_empty());
    assert_eq!(repo.database().stats().unwrap().dictionary_entries, 2);
}
