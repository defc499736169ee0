//! Language Companion review scheduler.
//!
//! Vocabulary cards move along a fixed interval ladder (a simplified Leitner
//! box system). Each self-graded review shifts the card's step and ease and
//! pushes its due date out by the ladder interval for the new step.
//!
//! Zero I/O: everything here operates on in-memory values. Persistence lives
//! in `lc-store`.

pub mod card;
pub mod config;
pub mod constants;
pub mod deck;
pub mod due;
pub mod scheduler;
pub mod time;

pub use card::{Card, IdentityKey, VocabItem};
pub use config::{ConfigError, SchedulerConfig};
pub use constants::{
    DEFAULT_EASE, DEFAULT_INTERVALS, DEFAULT_LANG, DEFAULT_REVIEW_BATCH_SIZE, MAX_EASE, MIN_EASE,
};
pub use deck::{Deck, DeckStats, UpsertError};
pub use due::{DueDate, due_cards, is_due, is_due_on};
pub use scheduler::{Grade, format_interval, preview_intervals, schedule_next, schedule_next_today};
pub use time::{format_date, today_utc};
