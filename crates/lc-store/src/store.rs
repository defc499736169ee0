//! The card store: one JSON document holding every lesson and card.
//!
//! Every mutation is a full load → mutate → save cycle. There is no locking;
//! two writers racing on the same file resolve as last-write-wins, which is
//! acceptable for a single learner on a single machine.

use std::fs;
use std::path::{Path, PathBuf};

use lc_core::{Card, Deck, DeckStats, Grade, SchedulerConfig, VocabItem, today_utc};
use serde_json::Value;

use crate::config::load_config;
use crate::error::{Result, StoreError};
use crate::paths::{db_path, staging_path, unreadable_copy_path};

/// What reading the document produced.
enum LoadOutcome {
    Loaded(Deck),
    /// The file was unreadable or not a valid document; callers get an empty
    /// deck in its place.
    Recovered(String),
}

pub struct CardStore {
    path: PathBuf,
    config: SchedulerConfig,
}

impl CardStore {
    /// Open the document at `path` with default scheduler settings,
    /// creating parent directories and an empty document if needed.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_config(path, SchedulerConfig::default())
    }

    pub fn open_with_config(path: &Path, config: SchedulerConfig) -> Result<Self> {
        let store = Self {
            path: path.to_path_buf(),
            config,
        };
        store.ensure_file()?;
        Ok(store)
    }

    /// Open `{data_dir}/srs_db.json` using `{data_dir}/config.toml`.
    pub fn open_data_dir(data_dir: &Path) -> Result<Self> {
        Self::open_with_config(&db_path(data_dir), load_config(data_dir))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    fn ensure_file(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(StoreError::io(parent))?;
        }
        if !self.path.exists() {
            self.write_document(&Deck::new())?;
            tracing::info!("created empty review deck at {}", self.path.display());
        }
        Ok(())
    }

    fn read_document(&self) -> LoadOutcome {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) => return LoadOutcome::Recovered(format!("read failed: {err}")),
        };
        match serde_json::from_str::<Deck>(&content) {
            Ok(deck) => LoadOutcome::Loaded(deck),
            Err(err) => {
                self.keep_unreadable(&content);
                LoadOutcome::Recovered(format!("parse failed: {err}"))
            }
        }
    }

    /// Copy an unparseable document aside so the next save can't destroy it.
    fn keep_unreadable(&self, content: &str) {
        let copy = unreadable_copy_path(&self.path);
        match fs::write(&copy, content) {
            Ok(()) => tracing::warn!("kept unreadable review deck as {}", copy.display()),
            Err(err) => {
                tracing::warn!("could not keep unreadable deck at {}: {err}", copy.display())
            }
        }
    }

    /// Write to a staging file, then rename it over the document so readers
    /// never observe a half-written file.
    fn write_document(&self, deck: &Deck) -> Result<()> {
        let json = serde_json::to_string_pretty(deck)?;
        let staged = staging_path(&self.path);
        fs::write(&staged, json).map_err(StoreError::io(&staged))?;
        fs::rename(&staged, &self.path).map_err(StoreError::io(&self.path))?;
        Ok(())
    }

    /// Load the whole document.
    ///
    /// A corrupt or unreadable document yields an empty deck (and a warning)
    /// rather than an error, so review keeps working. An unparseable file is
    /// copied to `<path>.corrupt` first; the next save overwrites the
    /// original. Individual malformed card fields don't count as corrupt,
    /// see [`Card`].
    pub fn load(&self) -> Result<Deck> {
        self.ensure_file()?;
        match self.read_document() {
            LoadOutcome::Loaded(deck) => Ok(deck),
            LoadOutcome::Recovered(reason) => {
                tracing::warn!(
                    "review deck at {} is unusable ({reason}), starting from an empty deck",
                    self.path.display()
                );
                Ok(Deck::new())
            }
        }
    }

    /// Overwrite the whole document. I/O failures propagate.
    pub fn save(&self, deck: &Deck) -> Result<()> {
        self.ensure_file()?;
        self.write_document(deck)?;
        tracing::debug!(
            "saved {} cards, {} lessons to {}",
            deck.cards.len(),
            deck.lessons.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Load, apply `f`, and save if `f` succeeds. Nothing is written when `f`
    /// returns an error.
    ///
    /// Not isolated: a concurrent transaction on the same file that saves
    /// later overwrites this one.
    pub fn transaction<T>(&self, f: impl FnOnce(&mut Deck) -> Result<T>) -> Result<T> {
        let mut deck = self.load()?;
        let out = f(&mut deck)?;
        self.save(&deck)?;
        Ok(out)
    }

    /// Merge extracted vocabulary into the deck. Returns items processed.
    pub fn upsert(&self, items: Vec<VocabItem>) -> Result<usize> {
        let count = self.transaction(|deck| {
            let before = deck.cards.len();
            let count = deck.upsert(items)?;
            tracing::debug!("upsert added {} new cards", deck.cards.len() - before);
            Ok(count)
        })?;
        tracing::info!("upserted {count} vocabulary items");
        Ok(count)
    }

    /// Grade one card as of today (UTC) and persist the new schedule.
    pub fn grade(&self, term: &str, lang: Option<&str>, grade: Grade) -> Result<Card> {
        let config = &self.config;
        self.transaction(|deck| {
            deck.grade(term, lang, grade, config, today_utc())
                .cloned()
                .ok_or_else(|| StoreError::CardNotFound {
                    term: term.to_string(),
                    lang: lang.unwrap_or(lc_core::DEFAULT_LANG).to_string(),
                })
        })
    }

    /// Today's review batch (owned copies, store order), at most `limit`
    /// cards or the configured batch size when `limit` is `None`.
    pub fn due_cards(&self, limit: Option<usize>) -> Result<Vec<Card>> {
        let deck = self.load()?;
        let limit = limit.unwrap_or(self.config.review_batch_size());
        Ok(lc_core::due_cards(&deck.cards, today_utc(), limit)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn stats(&self) -> Result<DeckStats> {
        Ok(self.load()?.stats(today_utc()))
    }

    /// Append an opaque lesson record to the lesson log.
    pub fn record_lesson(&self, lesson: Value) -> Result<()> {
        self.transaction(|deck| {
            deck.record_lesson(lesson);
            Ok(())
        })
    }
}
