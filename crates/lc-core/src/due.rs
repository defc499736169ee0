//! Due-date evaluation.
//!
//! Fail-open: a card whose `due` is missing or unreadable is always due, so a
//! malformed record can never silently drop out of review.

use chrono::{NaiveDate, NaiveDateTime};

use crate::card::Card;
use crate::time::{DATE_FORMAT, today_utc};

/// A card's stored `due` value, interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueDate {
    /// No value, or an empty string.
    Missing,
    /// A value that is neither a date nor a date-time.
    Invalid,
    /// `YYYY-MM-DD`, the format the scheduler writes.
    Date(NaiveDate),
    /// `YYYY-MM-DDTHH:MM:SS[.fff]`, as written by older versions of the app.
    DateTime(NaiveDateTime),
}

impl DueDate {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|s| !s.is_empty()) else {
            return DueDate::Missing;
        };
        if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            return DueDate::Date(date);
        }
        if let Ok(dt) = raw.parse::<NaiveDateTime>() {
            return DueDate::DateTime(dt);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
            return DueDate::DateTime(dt);
        }
        DueDate::Invalid
    }

    /// Due iff today's UTC midnight has reached the stored instant.
    pub fn is_due_on(&self, today: NaiveDate) -> bool {
        match self {
            DueDate::Missing | DueDate::Invalid => true,
            DueDate::Date(date) => today >= *date,
            DueDate::DateTime(dt) => today
                .and_hms_opt(0, 0, 0)
                .is_none_or(|midnight| midnight >= *dt),
        }
    }

    /// The calendar date, if the value parsed.
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            DueDate::Date(date) => Some(*date),
            DueDate::DateTime(dt) => Some(dt.date()),
            DueDate::Missing | DueDate::Invalid => None,
        }
    }
}

/// Should `card` appear in today's (UTC) review batch?
pub fn is_due(card: &Card) -> bool {
    is_due_on(card, today_utc())
}

pub fn is_due_on(card: &Card, today: NaiveDate) -> bool {
    DueDate::parse(card.due.as_deref()).is_due_on(today)
}

/// Today's review batch: due cards in store order, at most `limit` of them.
pub fn due_cards(cards: &[Card], today: NaiveDate, limit: usize) -> Vec<&Card> {
    cards
        .iter()
        .filter(|card| is_due_on(card, today))
        .take(limit)
        .collect()
}
