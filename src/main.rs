// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
// Add other lints specific to this module that you want to allow but not auto-fix

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::frequency::FrequencyTracker;
use crate::scoring::scorer;
use crate::scoring::{QualityBucket, RecalcFilter, RecalcOptions, RecalcReport, Recalculator};
use crate::store::models::{DictionaryEntryRecord, NewDictionaryEntry};
use crate::store::{CorpusRepository, DatabaseConnection};

mod app_config;
mod scoring;
mod store;
mod frequency;
mod language_utils;
mod errors;

/// CLI Wrapper for QualityBucket to implement ValueEnum
///
/// `Unreviewed` is deliberately absent: it marks a pair that was never
/// scored and is not a bucket a reviewer can assign.
#[derive(Debug, Clone, ValueEnum)]
enum CliQualityBucket {
    HighQuality,
    GoodQuality,
    NeedsReview,
    PoorQuality,
}

impl From<CliQualityBucket> for QualityBucket {
    fn from(cli_bucket: CliQualityBucket) -> Self {
        match cli_bucket {
            CliQualityBucket::HighQuality => QualityBucket::HighQuality,
            CliQualityBucket::GoodQuality => QualityBucket::GoodQuality,
            CliQualityBucket::NeedsReview => QualityBucket::NeedsReview,
            CliQualityBucket::PoorQuality => QualityBucket::PoorQuality,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Recalculate quality scores for stored sentence pairs
    Score(ScoreArgs),

    /// Score an ad-hoc sentence pair without storing anything
    Pair(PairArgs),

    /// Show corpus statistics
    Stats,

    /// Rebuild or inspect the word frequency table
    Frequencies(FrequenciesArgs),

    /// Manage dictionary entries
    Dict {
        #[command(subcommand)]
        command: DictCommands,
    },

    /// Generate shell completions for halcor
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ScoreArgs {
    /// Rescore every stored pair, not only the unscored ones
    #[arg(long, conflicts_with_all = ["document", "ids"])]
    all: bool,

    /// Rescore only pairs extracted from this document
    #[arg(long, value_name = "DOCUMENT_ID", conflicts_with = "ids")]
    document: Option<String>,

    /// Rescore only these pair IDs (comma separated)
    #[arg(long, value_delimiter = ',', value_name = "ID")]
    ids: Option<Vec<i64>>,
}

#[derive(Parser, Debug)]
struct PairArgs {
    /// Halunder sentence
    #[arg(value_name = "SOURCE_TEXT")]
    source_text: String,

    /// German sentence
    #[arg(value_name = "TARGET_TEXT")]
    target_text: String,

    /// Pin the bucket instead of using the computed one
    #[arg(long, value_enum, value_name = "BUCKET")]
    force_bucket: Option<CliQualityBucket>,

    /// Print the full score as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct FrequenciesArgs {
    /// Recount word frequencies from every stored text and sentence pair
    #[arg(long)]
    rebuild: bool,

    /// Print the N most frequent words
    #[arg(long, value_name = "N")]
    top: Option<usize>,

    /// Language to list, e.g. 'frr' or 'de' (defaults to the source language)
    #[arg(long)]
    language: Option<String>,
}

#[derive(Subcommand, Debug)]
enum DictCommands {
    /// Add a new dictionary entry
    Add {
        /// Halunder headword
        headword: String,

        /// German translation
        translation: String,

        /// Part of speech tag, e.g. 'noun'
        #[arg(short, long)]
        part_of_speech: Option<String>,

        /// Editorial notes
        #[arg(short, long)]
        notes: Option<String>,

        /// Document the entry was attested in
        #[arg(short, long, value_name = "DOCUMENT_ID")]
        document: Option<String>,
    },

    /// Search entries whose headword contains a substring
    Search {
        /// Substring to look for
        query: String,
    },

    /// List entries alphabetically
    List {
        /// Maximum number of entries to print
        #[arg(long, default_value_t = 50)]
        limit: usize,

        /// Number of entries to skip
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
}

/// Halcor - Halunder Corpus Tools
///
/// Curation tool for the Halunder-German parallel corpus: quality scoring
/// of sentence pairs, dictionary entries and word frequency tables on top
/// of a local SQLite database.
#[derive(Parser, Debug)]
#[command(name = "halcor")]
#[command(author = "Halcor Team")]
#[command(version = "0.9.0")]
#[command(about = "Corpus curation tool for the Halunder-German parallel corpus")]
#[command(long_about = "Halcor manages the Halunder-German parallel corpus: sentence pair quality
scoring, dictionary entries and word frequency tables on top of a local
SQLite database.

EXAMPLES:
    halcor score                                # Score pairs never scored before
    halcor score --all                          # Rescore the whole corpus
    halcor score --document 3f2a91c0            # Rescore one document's pairs
    halcor score --ids 12,13,14                 # Rescore specific pairs
    halcor pair \"Moin!\" \"Hallo!\"                # Score a pair without storing it
    halcor pair --json \"Moin!\" \"Hallo!\"         # Same, as JSON
    halcor stats                                # Corpus statistics
    halcor frequencies --rebuild                # Recount word frequencies
    halcor frequencies --top 20 --language frr  # Most frequent Halunder words
    halcor dict add \"Hingst\" \"Pferd\"            # Add a dictionary entry
    halcor dict search Hin                      # Search by headword substring
    halcor completions bash > halcor.bash       # Generate bash completions

CONFIGURATION:
    Configuration is stored in halcor.json by default. You can specify a
    different config file with --config-path. If the config file doesn't
    exist, a default one will be created automatically.

DATABASE:
    The corpus lives in a single SQLite file, by default under the system
    data directory. Use --database or the database_path config entry to
    point at a different file.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "halcor.json", global = true)]
    config_path: String,

    /// SQLite database file (overrides the configured path)
    #[arg(long, value_name = "FILE", global = true)]
    database: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color prefix for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                color,
                now,
                emoji,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "halcor", &mut std::io::stdout());
            Ok(())
        }
        Commands::Pair(args) => {
            // Ad-hoc scoring is pure; no config or database involved
            run_pair(args)
        }
        Commands::Score(args) => {
            let config = load_or_create_config(&cli.config_path, cli.database, cli.log_level)?;
            run_score(args, &config).await
        }
        Commands::Stats => {
            let config = load_or_create_config(&cli.config_path, cli.database, cli.log_level)?;
            run_stats(&config).await
        }
        Commands::Frequencies(args) => {
            let config = load_or_create_config(&cli.config_path, cli.database, cli.log_level)?;
            run_frequencies(args, &config).await
        }
        Commands::Dict { command } => {
            let config = load_or_create_config(&cli.config_path, cli.database, cli.log_level)?;
            run_dict(command, &config).await
        }
    }
}

/// Load the configuration, creating a default file when missing, and apply
/// command line overrides on top
fn load_or_create_config(
    config_path: &str,
    database: Option<PathBuf>,
    log_level: Option<CliLogLevel>,
) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &log_level {
        log::set_max_level(level_filter_for(&cmd_log_level.clone().into()));
    }

    // Load or create configuration
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)
            .context(format!("Failed to load config file: {}", config_path))?
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );

        let config = Config::default();
        config
            .save_to_file(config_path)
            .context(format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    // Override config with CLI options if provided
    if let Some(database_path) = database {
        config.database_path = Some(database_path);
    }

    if let Some(cmd_log_level) = log_level {
        config.log_level = cmd_log_level.into();
    }

    // Keep the logger in sync with whatever level ended up in the config
    log::set_max_level(level_filter_for(&config.log_level));

    Ok(config)
}

// @returns: LevelFilter matching a configured log level
fn level_filter_for(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

/// Open the corpus repository, honoring a configured database path
fn open_repository(config: &Config) -> Result<CorpusRepository> {
    match &config.database_path {
        Some(path) => {
            let db = DatabaseConnection::new(path)?;
            Ok(CorpusRepository::new(db))
        }
        None => CorpusRepository::new_default(),
    }
}

/// Buckets in report display order, best first
const BUCKET_ORDER: [QualityBucket; 5] = [
    QualityBucket::HighQuality,
    QualityBucket::GoodQuality,
    QualityBucket::NeedsReview,
    QualityBucket::PoorQuality,
    QualityBucket::Unreviewed,
];

async fn run_score(args: ScoreArgs, config: &Config) -> Result<()> {
    let repository = open_repository(config)?;

    let filter = if args.all {
        RecalcFilter::All
    } else if let Some(document_id) = args.document {
        RecalcFilter::Document(document_id)
    } else if let Some(ids) = args.ids {
        RecalcFilter::Ids(ids)
    } else {
        RecalcFilter::Unscored
    };

    info!("Recalculating quality scores ({})", filter);

    // The pair count is only known after the fetch, so the bar starts at
    // zero and the callback fills the length in
    let progress_bar = ProgressBar::new(0);
    let template_result = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pairs ({percent}%) {msg} {eta}")
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(template_result.progress_chars("█▓▒░"));
    progress_bar.set_message("Scoring");

    let options = RecalcOptions::from(&config.scoring);
    let recalculator = Recalculator::with_options(Arc::new(repository), options);

    // Clone the progress_bar for use in the callback
    let pb = progress_bar.clone();
    let report = recalculator
        .run(&filter, move |completed, total| {
            pb.set_length(total as u64);
            pb.set_position(completed as u64);
        })
        .await?;

    progress_bar.finish_and_clear();
    print_report(&report);

    Ok(())
}

/// Print a recalculation report through the logger
fn print_report(report: &RecalcReport) {
    info!(
        "Scored {} pairs, wrote {} updates",
        report.processed, report.updated
    );

    if report.preserved_overrides > 0 {
        info!(
            "Preserved {} manual bucket overrides",
            report.preserved_overrides
        );
    }

    for bucket in BUCKET_ORDER {
        if let Some(count) = report.bucket_counts.get(&bucket) {
            info!("  {}: {}", bucket, count);
        }
    }

    if !report.sample.is_empty() {
        info!("Sample of bucket changes:");
        for change in &report.sample {
            info!(
                "  pair {}: {} -> {}",
                change.pair_id, change.previous, change.current
            );
        }
    }

    for error in &report.errors {
        warn!("{}", error);
    }
    if !report.errors.is_empty() {
        warn!("{} pairs could not be written", report.errors.len());
    }
}

fn run_pair(args: PairArgs) -> Result<()> {
    let force_bucket = args.force_bucket.map(QualityBucket::from);
    let score =
        scorer::score_pair_with_override(&args.source_text, &args.target_text, force_bucket);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&score)?);
        return Ok(());
    }

    let mut tags = score
        .tags
        .iter()
        .map(|tag| tag.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    if tags.is_empty() {
        tags = "(none)".to_string();
    }

    println!(
        "words:       {} vs {} (ratio {:.2})",
        score.metrics.source_word_count, score.metrics.target_word_count, score.metrics.length_ratio
    );
    println!(
        "punctuation: {} vs {} (ratio {:.2})",
        score.metrics.source_punct_count,
        score.metrics.target_punct_count,
        score.metrics.punctuation_ratio
    );
    println!("tags:        {}", tags);
    if score.is_manual {
        println!("bucket:      {} (manual)", score.bucket);
    } else {
        println!("bucket:      {}", score.bucket);
    }

    Ok(())
}

async fn run_stats(config: &Config) -> Result<()> {
    let repository = open_repository(config)?;

    let stats = repository.database().stats()?;
    let counts = repository.bucket_counts().await?;

    println!("database:        {:?}", repository.database().path());
    println!("documents:       {}", stats.document_count);
    println!(
        "sentence pairs:  {} ({} scored)",
        stats.pair_count, stats.scored_pairs
    );
    for (bucket, count) in &counts {
        println!("  {}: {}", bucket, count);
    }
    println!("dictionary:      {} entries", stats.dictionary_entries);
    println!("tracked words:   {}", stats.tracked_words);
    println!("file size:       {} KB", stats.file_size_bytes / 1024);

    Ok(())
}

async fn run_frequencies(args: FrequenciesArgs, config: &Config) -> Result<()> {
    let repository = open_repository(config)?;
    let tracker = FrequencyTracker::new(repository);

    if args.rebuild {
        tracker.rebuild().await?;
    }

    if let Some(limit) = args.top {
        let language = match &args.language {
            Some(code) => language_utils::normalize_language_code(code)?,
            None => language_utils::normalize_language_code(&config.source_language)?,
        };

        if !language_utils::language_codes_match(&language, &config.source_language)
            && !language_utils::language_codes_match(&language, &config.target_language)
        {
            warn!("Language '{}' is not one of the corpus languages", language);
        }

        let words = tracker.top(&language, limit).await?;
        if words.is_empty() {
            warn!(
                "No frequency entries for language '{}'. Run with --rebuild first.",
                language
            );
        }
        for record in words {
            println!("{:6}  {}", record.occurrences, record.word);
        }
    } else if !args.rebuild {
        warn!("Nothing to do. Pass --rebuild and/or --top N.");
    }

    Ok(())
}

async fn run_dict(command: DictCommands, config: &Config) -> Result<()> {
    let repository = open_repository(config)?;

    match command {
        DictCommands::Add {
            headword,
            translation,
            part_of_speech,
            notes,
            document,
        } => {
            let entry = NewDictionaryEntry {
                headword,
                translation,
                part_of_speech,
                notes,
                document_id: document,
            };
            let record = repository.insert_dictionary_entry(&entry).await?;
            info!(
                "Added entry {}: {} = {}",
                record.id, record.headword, record.translation
            );
        }
        DictCommands::Search { query } => {
            let entries = repository.search_dictionary(&query).await?;
            if entries.is_empty() {
                info!("No entries matching '{}'", query);
            }
            for entry in entries {
                print_dictionary_entry(&entry);
            }
        }
        DictCommands::List { limit, offset } => {
            let entries = repository.list_dictionary(limit, offset).await?;
            for entry in entries {
                print_dictionary_entry(&entry);
            }
        }
    }

    Ok(())
}

/// Print one dictionary entry as a single line, notes on a second
fn print_dictionary_entry(entry: &DictionaryEntryRecord) {
    let part_of_speech = entry.part_of_speech.as_deref().unwrap_or("-");
    println!(
        "{:5}  {}  [{}]  {}",
        entry.id, entry.headword, part_of_speech, entry.translation
    );
    if let Some(notes) = &entry.notes {
        println!("       {}", notes);
    }
}
