//! Moving decks in and out of the store as JSON files.
//!
//! Import accepts either a full deck document (`{"lessons": [...], "cards":
//! [...]}`) or a bare array of vocabulary items, the shape the extraction
//! step emits. Either way cards go through the upsert merge, so identity
//! stays unique and existing schedules survive unless the file supplies them.
//! Lessons already in the log (equal JSON) are not appended a second time.

use std::fs;
use std::path::Path;

use lc_core::{Deck, VocabItem};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, StoreError};
use crate::store::CardStore;

#[derive(Deserialize)]
#[serde(untagged)]
enum ImportPayload {
    Items(Vec<VocabItem>),
    Document {
        #[serde(default)]
        lessons: Vec<Value>,
        #[serde(default)]
        cards: Vec<VocabItem>,
    },
}

/// Counts from one import: items merged and lessons newly appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub cards: usize,
    pub lessons: usize,
}

/// Parse vocabulary items from JSON text (array or deck document).
pub fn parse_items(json: &str) -> Result<(Vec<VocabItem>, Vec<Value>)> {
    let payload: ImportPayload = serde_json::from_str(json)
        .map_err(|e| StoreError::InvalidData(format!("not a deck or item list: {e}")))?;
    Ok(match payload {
        ImportPayload::Items(items) => (items, Vec::new()),
        ImportPayload::Document { lessons, cards } => (cards, lessons),
    })
}

impl CardStore {
    /// Write the current document to `path`, in the same format as the store.
    pub fn export_to(&self, path: &Path) -> Result<()> {
        let json = self.export_json_string()?;
        fs::write(path, json).map_err(StoreError::io(path))
    }

    pub fn export_json_string(&self) -> Result<String> {
        let deck: Deck = self.load()?;
        Ok(serde_json::to_string_pretty(&deck)?)
    }

    /// Merge a JSON file into the store. Unlike `load`, a malformed file is
    /// an error: nothing is written.
    pub fn import_from(&self, path: &Path) -> Result<ImportSummary> {
        let json = fs::read_to_string(path).map_err(StoreError::io(path))?;
        self.import_json_str(&json)
    }

    pub fn import_json_str(&self, json: &str) -> Result<ImportSummary> {
        let (items, lessons) = parse_items(json)?;
        let summary = self.transaction(|deck| {
            let cards = deck.upsert(items)?;
            let before = deck.lessons.len();
            for lesson in lessons {
                if !deck.lessons.contains(&lesson) {
                    deck.lessons.push(lesson);
                }
            }
            let lessons_added = deck.lessons.len() - before;
            Ok(ImportSummary {
                cards,
                lessons: lessons_added,
            })
        })?;
        tracing::info!(
            "imported {} cards, {} lessons",
            summary.cards,
            summary.lessons
        );
        Ok(summary)
    }
}
