/*!
 * Common test utilities for the halcor test suite
 */

use anyhow::Result;
use tempfile::TempDir;

use halcor::store::models::NewSentencePair;
use halcor::CorpusRepository;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Initializes test logging, honoring RUST_LOG; safe to call repeatedly
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A well-aligned Halunder/German pair (4 words and 1 period on each side)
pub const ALIGNED_PAIR: (&str, &str) = ("Ik hoa iaan Oapel.", "Ich habe einen Apfel.");

/// A badly aligned pair: 3 short words vs a long, heavily punctuated sentence
pub const MISALIGNED_PAIR: (&str, &str) = (
    "Deät es gud",
    "Das, was er damals sagte, war, alles in allem, wirklich ganz gut!",
);

/// Creates an in-memory repository seeded with a handful of unscored pairs.
///
/// Returns the repository together with the IDs of the inserted pairs,
/// in insertion order.
pub async fn seeded_repository(pairs: &[(&str, &str)]) -> Result<(CorpusRepository, Vec<i64>)> {
    let repo = CorpusRepository::new_in_memory()?;

    repo.insert_pairs(
        pairs
            .iter()
            .map(|(source, target)| {
                NewSentencePair::new(source.to_string(), target.to_string())
            })
            .collect(),
    )
    .await?;

    let ids = repo
        .fetch_pairs(&halcor::RecalcFilter::All)
        .await?
        .into_iter()
        .map(|pair| pair.id)
        .collect();

    Ok((repo, ids))
}
