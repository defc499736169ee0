//! Vocabulary card records.
//!
//! Field order here is the field order on disk. Keys the model doesn't know
//! about are kept in `extra` and written back after the known ones.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::DEFAULT_LANG;

fn default_lang() -> String {
    DEFAULT_LANG.to_string()
}

/// Normalize a language name for identity: blank means "auto".
fn lang_or_auto(lang: Option<&str>) -> &str {
    match lang {
        Some(l) if !l.trim().is_empty() => l,
        _ => DEFAULT_LANG,
    }
}

/// Deduplication key: `(lowercase(term), lang or "auto")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey {
    pub term: String,
    pub lang: String,
}

impl IdentityKey {
    pub fn new(term: &str, lang: Option<&str>) -> Self {
        Self {
            term: term.to_lowercase(),
            lang: lang_or_auto(lang).to_string(),
        }
    }
}

/// A vocabulary entry under review.
///
/// `ease`, `step` and `due` stay `None` until the card's first grading.
/// `due` holds the raw stored string; interpret it with
/// [`DueDate::parse`](crate::due::DueDate::parse).
///
/// Stored fields are read leniently: a field of the wrong JSON type falls
/// back to its default instead of failing the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    #[serde(default, deserialize_with = "lenient::text")]
    pub term: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub pos: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub translation: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub example_source: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub example_en: Option<String>,
    #[serde(default = "default_lang", deserialize_with = "lenient::lang")]
    pub lang: String,
    #[serde(
        default,
        deserialize_with = "lenient::ease",
        skip_serializing_if = "Option::is_none"
    )]
    pub ease: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::step",
        skip_serializing_if = "Option::is_none"
    )]
    pub step: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub due: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Card {
    pub fn new(term: &str, translation: &str, lang: &str) -> Self {
        Self {
            term: term.to_string(),
            pos: None,
            translation: translation.to_string(),
            example_source: None,
            example_en: None,
            lang: lang_or_auto(Some(lang)).to_string(),
            ease: None,
            step: None,
            due: None,
            extra: Map::new(),
        }
    }

    pub fn identity(&self) -> IdentityKey {
        IdentityKey::new(&self.term, Some(&self.lang))
    }

    /// Never graded: no schedule state at all.
    pub fn is_new(&self) -> bool {
        self.ease.is_none() && self.step.is_none() && self.due.is_none()
    }

    /// Build a fresh card from an extracted item whose term has already been
    /// validated. `item.term` is ignored in favour of `term`.
    pub fn from_item(term: String, item: VocabItem) -> Self {
        Self {
            term,
            pos: item.pos,
            translation: item.translation.unwrap_or_default(),
            example_source: item.example_source,
            example_en: item.example_en,
            lang: lang_or_auto(item.lang.as_deref()).to_string(),
            ease: item.ease,
            step: item.step,
            due: item.due,
            extra: item.extra,
        }
    }

    /// Overwrite every field the item supplies with a non-null value.
    /// Everything else, schedule state included, is left as it was.
    pub fn merge(&mut self, item: VocabItem) {
        if let Some(term) = item.term.filter(|t| !t.trim().is_empty()) {
            self.term = term;
        }
        if item.pos.is_some() {
            self.pos = item.pos;
        }
        if let Some(translation) = item.translation {
            self.translation = translation;
        }
        if item.example_source.is_some() {
            self.example_source = item.example_source;
        }
        if item.example_en.is_some() {
            self.example_en = item.example_en;
        }
        if let Some(lang) = item.lang.filter(|l| !l.trim().is_empty()) {
            self.lang = lang;
        }
        if item.ease.is_some() {
            self.ease = item.ease;
        }
        if item.step.is_some() {
            self.step = item.step;
        }
        if item.due.is_some() {
            self.due = item.due;
        }
        for (key, value) in item.extra {
            if !value.is_null() {
                self.extra.insert(key, value);
            }
        }
    }
}

/// A partially populated card as produced by vocabulary extraction.
///
/// Every field is optional so a missing `term` can be reported instead of
/// failing deserialization of the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VocabItem {
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub term: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub pos: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub translation: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub example_source: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub example_en: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub lang: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::ease",
        skip_serializing_if = "Option::is_none"
    )]
    pub ease: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::step",
        skip_serializing_if = "Option::is_none"
    )]
    pub step: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub due: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VocabItem {
    pub fn new(term: &str, translation: &str, lang: &str) -> Self {
        Self {
            term: Some(term.to_string()),
            translation: Some(translation.to_string()),
            lang: Some(lang.to_string()),
            ..Self::default()
        }
    }

    /// Identity key, or `None` when the item has no usable term.
    pub fn identity(&self) -> Option<IdentityKey> {
        self.valid_term().map(|t| IdentityKey::new(t, self.lang.as_deref()))
    }

    /// The term when it is present and not blank.
    pub fn valid_term(&self) -> Option<&str> {
        self.term.as_deref().filter(|t| !t.trim().is_empty())
    }
}

impl From<Card> for VocabItem {
    fn from(card: Card) -> Self {
        Self {
            term: Some(card.term),
            pos: card.pos,
            translation: Some(card.translation),
            example_source: card.example_source,
            example_en: card.example_en,
            lang: Some(card.lang),
            ease: card.ease,
            step: card.step,
            due: card.due,
            extra: card.extra,
        }
    }
}

/// Field readers for stored cards that tolerate hand-edited or older data.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use crate::constants::DEFAULT_LANG;

    fn into_text(value: Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }

    /// Strings as-is, null as absent, any other value as its JSON text.
    pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(into_text(Value::deserialize(deserializer)?))
    }

    pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(opt_text(deserializer)?.unwrap_or_default())
    }

    /// Null or blank means "auto".
    pub fn lang<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(opt_text(deserializer)?
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LANG.to_string()))
    }

    /// Any number, or a numeric string. Anything else reads as unset.
    pub fn ease<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// Non-negative integers, integral floats such as `1.0`, or numeric
    /// strings. Anything else reads as unset.
    pub fn step<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let whole = match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u32::MAX as f64)
                    .map(|f| f as u64)
            }),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        Ok(whole.and_then(|w| u32::try_from(w).ok()))
    }
}
