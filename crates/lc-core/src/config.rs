//! Immutable scheduler configuration.
//!
//! The interval ladder and default ease are plain values handed to the
//! scheduler, so callers (and tests) can run alternate ladders side by side.

use serde::Deserialize;
use thiserror::Error;

use crate::constants::{
    DEFAULT_EASE, DEFAULT_INTERVALS, DEFAULT_REVIEW_BATCH_SIZE, MAX_EASE, MIN_EASE,
};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("interval ladder must contain at least one step")]
    EmptyLadder,

    #[error("interval at step {step} must be at least one day")]
    ZeroInterval { step: usize },

    #[error("default ease {0} is outside [{}, {}]", MIN_EASE, MAX_EASE)]
    EaseOutOfRange(f64),

    #[error("review batch size must be at least 1")]
    ZeroBatchSize,
}

/// Validated scheduler settings. Construct with [`SchedulerConfig::new`] or
/// deserialize (deserialization runs the same validation).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawConfig")]
pub struct SchedulerConfig {
    intervals: Vec<u32>,
    default_ease: f64,
    review_batch_size: usize,
}

/// Unvalidated on-disk shape. Every key is optional.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    intervals: Vec<u32>,
    default_ease: f64,
    review_batch_size: usize,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            intervals: DEFAULT_INTERVALS.to_vec(),
            default_ease: DEFAULT_EASE,
            review_batch_size: DEFAULT_REVIEW_BATCH_SIZE,
        }
    }
}

impl TryFrom<RawConfig> for SchedulerConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        SchedulerConfig::new(raw.intervals, raw.default_ease, raw.review_batch_size)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            intervals: DEFAULT_INTERVALS.to_vec(),
            default_ease: DEFAULT_EASE,
            review_batch_size: DEFAULT_REVIEW_BATCH_SIZE,
        }
    }
}

impl SchedulerConfig {
    pub fn new(
        intervals: Vec<u32>,
        default_ease: f64,
        review_batch_size: usize,
    ) -> Result<Self, ConfigError> {
        if intervals.is_empty() {
            return Err(ConfigError::EmptyLadder);
        }
        if let Some(step) = intervals.iter().position(|&days| days == 0) {
            return Err(ConfigError::ZeroInterval { step });
        }
        if !(MIN_EASE..=MAX_EASE).contains(&default_ease) {
            return Err(ConfigError::EaseOutOfRange(default_ease));
        }
        if review_batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        Ok(Self {
            intervals,
            default_ease,
            review_batch_size,
        })
    }

    /// Default settings with a different interval ladder.
    pub fn with_intervals(intervals: Vec<u32>) -> Result<Self, ConfigError> {
        Self::new(intervals, DEFAULT_EASE, DEFAULT_REVIEW_BATCH_SIZE)
    }

    pub fn intervals(&self) -> &[u32] {
        &self.intervals
    }

    pub fn default_ease(&self) -> f64 {
        self.default_ease
    }

    pub fn review_batch_size(&self) -> usize {
        self.review_batch_size
    }

    /// Highest valid step index (K - 1).
    pub fn max_step(&self) -> u32 {
        (self.intervals.len() - 1) as u32
    }

    /// Days until the next review for a card sitting at `step`.
    /// Steps past the top of the ladder use the last interval.
    pub fn interval_for(&self, step: u32) -> u32 {
        let idx = (step as usize).min(self.intervals.len() - 1);
        self.intervals[idx]
    }
}
