//! Leitner-style review scheduling.
//!
//! | grade        | step               | ease                  |
//! |--------------|--------------------|-----------------------|
//! | again        | 0                  | max(1.3, ease - 0.2)  |
//! | hard         | unchanged          | max(1.3, ease - 0.05) |
//! | good         | min(step + 1, K-1) | unchanged             |
//! | easy         | min(step + 2, K-1) | min(3.0, ease + 0.05) |
//! | unrecognized | min(step + 1, K-1) | unchanged             |
//!
//! The new due date is `today + ladder[step]`.

use std::fmt;

use chrono::NaiveDate;

use crate::card::Card;
use crate::config::SchedulerConfig;
use crate::constants::{
    AGAIN_EASE_PENALTY, EASY_EASE_BONUS, HARD_EASE_PENALTY, MAX_EASE, MIN_EASE,
};
use crate::time::{add_days, format_date, today_utc};

/// Self-assessed recall quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Again,
    Hard,
    Good,
    Easy,
    /// Anything else. Advances like `Good`; never an error.
    Unrecognized,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::Again, Grade::Hard, Grade::Good, Grade::Easy];

    /// Exact, lowercase match; other strings are `Unrecognized`.
    pub fn parse(s: &str) -> Self {
        match s {
            "again" => Grade::Again,
            "hard" => Grade::Hard,
            "good" => Grade::Good,
            "easy" => Grade::Easy,
            _ => Grade::Unrecognized,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Again => "again",
            Grade::Hard => "hard",
            Grade::Good => "good",
            Grade::Easy => "easy",
            Grade::Unrecognized => "unrecognized",
        }
    }
}

impl From<&str> for Grade {
    fn from(s: &str) -> Self {
        Grade::parse(s)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Starting `(ease, step)` for a card, with defaults filled in and
/// out-of-range stored values pulled back inside the invariants.
fn current_state(card: &Card, config: &SchedulerConfig) -> (f64, u32) {
    let ease = card
        .ease
        .filter(|e| e.is_finite())
        .unwrap_or(config.default_ease())
        .clamp(MIN_EASE, MAX_EASE);
    let step = card.step.unwrap_or(0).min(config.max_step());
    (ease, step)
}

fn transition(ease: f64, step: u32, grade: Grade, max_step: u32) -> (f64, u32) {
    match grade {
        Grade::Again => ((ease - AGAIN_EASE_PENALTY).max(MIN_EASE), 0),
        Grade::Hard => ((ease - HARD_EASE_PENALTY).max(MIN_EASE), step),
        Grade::Good | Grade::Unrecognized => (ease, (step + 1).min(max_step)),
        Grade::Easy => ((ease + EASY_EASE_BONUS).min(MAX_EASE), (step + 2).min(max_step)),
    }
}

/// Apply `grade` to `card` as of `today`.
///
/// Returns a copy with `ease`, `step` and `due` overwritten; every other field
/// is untouched. Missing ease/step start from `config.default_ease()` and 0.
pub fn schedule_next(
    card: &Card,
    grade: Grade,
    config: &SchedulerConfig,
    today: NaiveDate,
) -> Card {
    let (ease, step) = current_state(card, config);
    let (ease, step) = transition(ease, step, grade, config.max_step());
    let due = add_days(today, config.interval_for(step));

    Card {
        ease: Some(ease),
        step: Some(step),
        due: Some(format_date(due)),
        ..card.clone()
    }
}

/// [`schedule_next`] against the current UTC date.
pub fn schedule_next_today(card: &Card, grade: Grade, config: &SchedulerConfig) -> Card {
    schedule_next(card, grade, config, today_utc())
}

/// Interval in days each grade would give, ordered again, hard, good, easy.
pub fn preview_intervals(card: &Card, config: &SchedulerConfig) -> [u32; 4] {
    let (ease, step) = current_state(card, config);
    Grade::ALL.map(|grade| {
        let (_, next) = transition(ease, step, grade, config.max_step());
        config.interval_for(next)
    })
}

/// Compact label for an interval: `now`, `3d`, `2w`, `1mo`, `1y`.
pub fn format_interval(days: u32) -> String {
    match days {
        0 => "now".to_string(),
        1..=6 => format!("{days}d"),
        7..=29 => format!("{}w", days / 7),
        30..=364 => format!("{}mo", days / 30),
        _ => format!("{}y", days / 365),
    }
}
