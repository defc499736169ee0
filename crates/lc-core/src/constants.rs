/// Interval ladder in days, indexed by a card's `step`.
pub const DEFAULT_INTERVALS: [u32; 5] = [1, 3, 7, 14, 30];

/// Ease assigned to a card the first time it is graded.
pub const DEFAULT_EASE: f64 = 2.5;

/// Ease floor. "again" and "hard" never push a card below this.
pub const MIN_EASE: f64 = 1.3;

/// Ease ceiling. "easy" never lifts a card above this.
pub const MAX_EASE: f64 = 3.0;

/// Ease penalty for "again".
pub const AGAIN_EASE_PENALTY: f64 = 0.2;

/// Ease penalty for "hard".
pub const HARD_EASE_PENALTY: f64 = 0.05;

/// Ease bonus for "easy".
pub const EASY_EASE_BONUS: f64 = 0.05;

/// Language recorded when the detector supplied none.
pub const DEFAULT_LANG: &str = "auto";

/// Maximum number of cards presented in one review session.
pub const DEFAULT_REVIEW_BATCH_SIZE: usize = 15;
