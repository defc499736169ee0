//! The review deck document: an opaque lesson log plus the card collection.
//!
//! Cards are a set keyed by [`IdentityKey`] but kept as an ordered sequence
//! so saved documents diff cleanly: existing cards keep their position and
//! new ones are appended.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::card::{Card, IdentityKey, VocabItem};
use crate::config::SchedulerConfig;
use crate::due::{due_cards, is_due_on};
use crate::scheduler::{Grade, schedule_next};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UpsertError {
    /// Identity can't be computed without a term, so the batch is rejected.
    #[error("vocabulary item {index} has no term")]
    MissingTerm { index: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    #[serde(default)]
    pub lessons: Vec<Value>,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Counts over a deck as of a given day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckStats {
    pub total: usize,
    pub due: usize,
    pub new: usize,
    pub lessons: usize,
    pub by_lang: BTreeMap<String, usize>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    fn index(&self) -> HashMap<IdentityKey, usize> {
        self.cards
            .iter()
            .enumerate()
            .map(|(i, card)| (card.identity(), i))
            .collect()
    }

    /// Merge extracted items into the deck.
    ///
    /// Items matching an existing card (case-insensitive term, same language)
    /// overwrite that card's non-null fields; others are appended unscheduled.
    /// The whole batch is validated first, so a missing term leaves the deck
    /// untouched. Returns the number of items processed, duplicates included.
    pub fn upsert(&mut self, items: Vec<VocabItem>) -> Result<usize, UpsertError> {
        let mut keyed = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let term = item
                .valid_term()
                .ok_or(UpsertError::MissingTerm { index })?
                .to_string();
            let key = IdentityKey::new(&term, item.lang.as_deref());
            keyed.push((key, term, item));
        }

        let mut index = self.index();
        let count = keyed.len();
        for (key, term, item) in keyed {
            match index.get(&key).copied() {
                Some(pos) => self.cards[pos].merge(item),
                None => {
                    index.insert(key, self.cards.len());
                    self.cards.push(Card::from_item(term, item));
                }
            }
        }
        Ok(count)
    }

    pub fn find(&self, term: &str, lang: Option<&str>) -> Option<&Card> {
        let key = IdentityKey::new(term, lang);
        self.cards.iter().find(|card| card.identity() == key)
    }

    pub fn find_mut(&mut self, term: &str, lang: Option<&str>) -> Option<&mut Card> {
        let key = IdentityKey::new(term, lang);
        self.cards.iter_mut().find(|card| card.identity() == key)
    }

    /// Grade the card with the given identity in place. Returns the updated
    /// card, or `None` if no such card exists.
    pub fn grade(
        &mut self,
        term: &str,
        lang: Option<&str>,
        grade: Grade,
        config: &SchedulerConfig,
        today: NaiveDate,
    ) -> Option<&Card> {
        let card = self.find_mut(term, lang)?;
        *card = schedule_next(card, grade, config, today);
        Some(&*card)
    }

    /// Today's review batch, capped at the configured batch size.
    pub fn due_batch(&self, config: &SchedulerConfig, today: NaiveDate) -> Vec<&Card> {
        due_cards(&self.cards, today, config.review_batch_size())
    }

    pub fn record_lesson(&mut self, lesson: Value) {
        self.lessons.push(lesson);
    }

    pub fn stats(&self, today: NaiveDate) -> DeckStats {
        let mut stats = DeckStats {
            total: self.cards.len(),
            lessons: self.lessons.len(),
            ..DeckStats::default()
        };
        for card in &self.cards {
            if is_due_on(card, today) {
                stats.due += 1;
            }
            if card.is_new() {
                stats.new += 1;
            }
            *stats.by_lang.entry(card.lang.clone()).or_default() += 1;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    fn haus(translation: &str) -> VocabItem {
        VocabItem::new("Haus", translation, "German")
    }

    #[test]
    fn test_upsert_into_empty() {
        let mut deck = Deck::new();
        let n = deck.upsert(vec![haus("house")]).unwrap();
        assert_eq!(n, 1);
        assert_eq!(deck.cards.len(), 1);
        let card = &deck.cards[0];
        assert_eq!(card.term, "Haus");
        assert!(card.ease.is_none());
        assert!(card.step.is_none());
        assert!(card.due.is_none());
    }

    #[test]
    fn test_upsert_merges_and_keeps_schedule() {
        let mut deck = Deck::new();
        deck.upsert(vec![haus("house")]).unwrap();
        deck.grade("haus", Some("German"), Grade::Good, &SchedulerConfig::default(), today())
            .unwrap();
        let before = deck.cards[0].clone();

        deck.upsert(vec![haus("home")]).unwrap();

        assert_eq!(deck.cards.len(), 1);
        let card = &deck.cards[0];
        assert_eq!(card.translation, "home");
        assert_eq!(card.ease, before.ease);
        assert_eq!(card.step, before.step);
        assert_eq!(card.due, before.due);
    }

    #[test]
    fn test_upsert_counts_duplicates_in_one_call() {
        let mut deck = Deck::new();
        let n = deck
            .upsert(vec![haus("house"), VocabItem::new("HAUS", "home", "German")])
            .unwrap();
        assert_eq!(n, 2);
        assert_eq!(deck.cards.len(), 1);
        assert_eq!(deck.cards[0].translation, "home");
    }

    #[test]
    fn test_upsert_same_term_other_lang_is_new() {
        let mut deck = Deck::new();
        deck.upsert(vec![
            VocabItem::new("gift", "present", "English"),
            VocabItem::new("gift", "poison", "German"),
        ])
        .unwrap();
        assert_eq!(deck.cards.len(), 2);
    }

    #[test]
    fn test_upsert_missing_lang_matches_auto() {
        let mut deck = Deck::new();
        let item = VocabItem {
            term: Some("chat".into()),
            translation: Some("cat".into()),
            ..VocabItem::default()
        };
        deck.upsert(vec![item.clone()]).unwrap();
        deck.upsert(vec![item]).unwrap();
        assert_eq!(deck.cards.len(), 1);
        assert_eq!(deck.cards[0].lang, "auto");
    }

    #[test]
    fn test_upsert_missing_term_fails_without_writes() {
        let mut deck = Deck::new();
        let bad = VocabItem {
            translation: Some("orphan".into()),
            ..VocabItem::default()
        };
        let err = deck.upsert(vec![haus("house"), bad]).unwrap_err();
        assert_eq!(err, UpsertError::MissingTerm { index: 1 });
        assert!(deck.cards.is_empty());
    }

    #[test]
    fn test_upsert_blank_term_fails() {
        let mut deck = Deck::new();
        let err = deck.upsert(vec![VocabItem::new("  ", "x", "German")]).unwrap_err();
        assert_eq!(err, UpsertError::MissingTerm { index: 0 });
    }

    #[test]
    fn test_upsert_new_items_keep_all_fields() {
        let mut deck = Deck::new();
        let items: Vec<VocabItem> = serde_json::from_value(json!([
            {"term": "Haus", "translation": "house", "lang": "German", "level": "A1"},
            {"term": "perro", "translation": null, "lang": null, "pos": "noun"},
        ]))
        .unwrap();
        let n = deck.upsert(items).unwrap();

        assert_eq!(n, 2);
        assert_eq!(deck.cards.len(), 2);
        assert_eq!(deck.cards[0].term, "Haus");
        assert_eq!(deck.cards[0].extra["level"], json!("A1"));
        assert_eq!(deck.cards[1].term, "perro");
        assert_eq!(deck.cards[1].translation, "");
        assert_eq!(deck.cards[1].lang, "auto");
        assert_eq!(deck.cards[1].pos.as_deref(), Some("noun"));
    }

    #[test]
    fn test_upsert_preserves_order() {
        let mut deck = Deck::new();
        deck.upsert(vec![
            VocabItem::new("eins", "one", "German"),
            VocabItem::new("zwei", "two", "German"),
            VocabItem::new("drei", "three", "German"),
        ])
        .unwrap();
        deck.upsert(vec![
            VocabItem::new("vier", "four", "German"),
            VocabItem::new("Zwei", "2", "German"),
        ])
        .unwrap();
        let terms: Vec<&str> = deck.cards.iter().map(|c| c.term.as_str()).collect();
        assert_eq!(terms, vec!["eins", "Zwei", "drei", "vier"]);
    }

    #[test]
    fn test_identity_unique_after_upserts() {
        let mut deck = Deck::new();
        for term in ["a", "A", "b", "B", "a"] {
            deck.upsert(vec![VocabItem::new(term, "t", "X")]).unwrap();
        }
        let keys: HashSet<IdentityKey> = deck.cards.iter().map(Card::identity).collect();
        assert_eq!(keys.len(), deck.cards.len());
        assert_eq!(deck.cards.len(), 2);
    }

    #[test]
    fn test_grade_unknown_card() {
        let mut deck = Deck::new();
        let result = deck.grade("nope", None, Grade::Good, &SchedulerConfig::default(), today());
        assert!(result.is_none());
    }

    #[test]
    fn test_due_batch_and_stats() {
        let config = SchedulerConfig::new(vec![1, 3], 2.5, 2).unwrap();
        let mut deck = Deck::new();
        deck.upsert(vec![
            VocabItem::new("eins", "one", "German"),
            VocabItem::new("zwei", "two", "German"),
            VocabItem::new("uno", "one", "Spanish"),
        ])
        .unwrap();
        deck.grade("eins", Some("German"), Grade::Good, &config, today());
        deck.record_lesson(json!({"title": "Numbers"}));

        let batch = deck.due_batch(&config, today());
        let terms: Vec<&str> = batch.iter().map(|c| c.term.as_str()).collect();
        assert_eq!(terms, vec!["zwei", "uno"]);

        let stats = deck.stats(today());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.due, 2);
        assert_eq!(stats.new, 2);
        assert_eq!(stats.lessons, 1);
        assert_eq!(stats.by_lang["German"], 2);
        assert_eq!(stats.by_lang["Spanish"], 1);
    }

    #[test]
    fn test_document_shape() {
        let mut deck = Deck::new();
        deck.upsert(vec![haus("house")]).unwrap();
        let value = serde_json::to_value(&deck).unwrap();
        assert_eq!(value["lessons"], json!([]));
        assert_eq!(value["cards"][0]["term"], json!("Haus"));
    }

    #[test]
    fn test_empty_object_loads_as_empty_deck() {
        let deck: Deck = serde_json::from_str("{}").unwrap();
        assert_eq!(deck, Deck::new());
    }

    #[test]
    fn test_malformed_card_fields_do_not_fail_the_deck() {
        let deck: Deck = serde_json::from_value(json!({
            "lessons": [],
            "cards": [
                {"term": "Haus", "translation": "house", "lang": "German",
                 "ease": 2.5, "step": 3, "due": "2026-04-01"},
                {"term": "Hund", "translation": null, "lang": null, "due": 20260101},
                {"term": "Katze", "translation": "cat", "lang": "German", "step": 1.0},
                {"term": "Maus", "translation": "mouse", "lang": "German",
                 "step": -2, "ease": "fast"},
            ]
        }))
        .unwrap();

        assert_eq!(deck.cards.len(), 4);
        assert_eq!(deck.cards[0].step, Some(3));
        assert_eq!(deck.cards[1].translation, "");
        assert_eq!(deck.cards[1].lang, "auto");
        assert_eq!(deck.cards[1].due.as_deref(), Some("20260101"));
        assert_eq!(deck.cards[2].step, Some(1));
        assert_eq!(deck.cards[3].step, None);
        assert_eq!(deck.cards[3].ease, None);

        let due: Vec<&str> = deck
            .due_batch(&SchedulerConfig::default(), today())
            .iter()
            .map(|c| c.term.as_str())
            .collect();
        assert_eq!(due, vec!["Hund", "Katze", "Maus"]);
    }
}
