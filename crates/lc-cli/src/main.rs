use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lc_core::{Grade, VocabItem, format_interval, preview_intervals};
use lc_store::{CardStore, data_dir_from_env, load_config};

#[derive(Parser)]
#[command(name = "lc", about = "Language Companion review deck")]
struct Cli {
    /// Use this deck file instead of $LC_DATA_DIR/srs_db.json
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show deck statistics
    Stats,

    /// List cards due for review today
    Due {
        /// Maximum cards to list, overriding the configured batch size
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Add or update vocabulary from a JSON array of items
    Add {
        /// Input file, or `-` for stdin
        path: PathBuf,
    },

    /// Record a review grade for one card
    Grade {
        /// Term to grade (case-insensitive)
        term: String,

        /// again, hard, good or easy
        grade: String,

        /// Language of the card (defaults to "auto")
        #[arg(long)]
        lang: Option<String>,
    },

    /// Export the deck to a JSON file
    Export {
        /// Output file path
        path: PathBuf,
    },

    /// Merge a deck or item list from a JSON file
    Import {
        /// Input file path
        path: PathBuf,
    },
}

fn open_store(cli: &Cli) -> Result<CardStore> {
    let data_dir = data_dir_from_env();
    let store = match &cli.db {
        Some(db) => CardStore::open_with_config(db, load_config(&data_dir)),
        None => CardStore::open_data_dir(&data_dir),
    };
    store.context("failed to open review deck")
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Stats => cmd_stats(&cli),
        Commands::Due { limit } => cmd_due(&cli, *limit),
        Commands::Add { path } => cmd_add(&cli, path),
        Commands::Grade { term, grade, lang } => cmd_grade(&cli, term, grade, lang.as_deref()),
        Commands::Export { path } => cmd_export(&cli, path),
        Commands::Import { path } => cmd_import(&cli, path),
    }
}

fn cmd_stats(cli: &Cli) -> Result<()> {
    let store = open_store(cli)?;
    let stats = store.stats().context("failed to read deck")?;

    println!("deck:       {}", store.path().display());
    println!("cards:      {}", stats.total);
    println!("due:        {}", stats.due);
    println!("new:        {}", stats.new);
    println!("lessons:    {}", stats.lessons);
    for (lang, count) in &stats.by_lang {
        println!("  {lang}: {count}");
    }
    Ok(())
}

fn cmd_due(cli: &Cli, limit: Option<usize>) -> Result<()> {
    let store = open_store(cli)?;
    let due = store.due_cards(limit).context("failed to read deck")?;

    if due.is_empty() {
        println!("no cards are due today");
        return Ok(());
    }

    for card in &due {
        println!("{} [{}] {}", card.term, card.lang, card.translation);
        if cli.verbose {
            let [again, hard, good, easy] = preview_intervals(card, store.config());
            eprintln!(
                "  again {} | hard {} | good {} | easy {}",
                format_interval(again),
                format_interval(hard),
                format_interval(good),
                format_interval(easy)
            );
        }
    }
    println!("{} due", due.len());
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

fn cmd_add(cli: &Cli, path: &Path) -> Result<()> {
    let store = open_store(cli)?;
    let json = read_input(path)?;
    let items: Vec<VocabItem> =
        serde_json::from_str(&json).context("expected a JSON array of vocabulary items")?;

    let n = store.upsert(items).context("failed to save vocabulary")?;
    println!("saved {n} vocab item(s) to the review deck");
    Ok(())
}

fn cmd_grade(cli: &Cli, term: &str, grade: &str, lang: Option<&str>) -> Result<()> {
    let store = open_store(cli)?;
    let grade = Grade::parse(grade);
    if grade == Grade::Unrecognized {
        tracing::warn!("unrecognized grade, advancing as 'good'");
    }

    let card = store
        .grade(term, lang, grade)
        .with_context(|| format!("failed to grade '{term}'"))?;

    println!(
        "{} [{}] {grade}: step {}, ease {:.2}, due {}",
        card.term,
        card.lang,
        card.step.unwrap_or_default(),
        card.ease.unwrap_or_default(),
        card.due.as_deref().unwrap_or("-"),
    );
    Ok(())
}

fn cmd_export(cli: &Cli, path: &Path) -> Result<()> {
    let store = open_store(cli)?;
    store
        .export_to(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("exported to {}", path.display());
    Ok(())
}

fn cmd_import(cli: &Cli, path: &Path) -> Result<()> {
    let store = open_store(cli)?;
    let summary = store.import_from(path).context("failed to import JSON")?;
    println!(
        "imported from {}. cards={}, lessons={}",
        path.display(),
        summary.cards,
        summary.lessons
    );
    Ok(())
}
