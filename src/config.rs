//! Application configuration constants
//!
//! Central location for storage keys, validation boundaries, and the
//! time windows used by roll bookkeeping.

// ===== Storage Keys =====
//
// Each persisted entity lives under its own key in the key/value store.
// These names are part of the on-disk contract: renaming one orphans
// previously saved data.

/// Title collection, serialized as a JSON array
pub const TITLES_KEY: &str = "cinedice_titles";
/// Achievement catalog state, serialized as a JSON array
pub const ACHIEVEMENTS_KEY: &str = "cinedice_achievements";
/// User profile, serialized as a JSON object
pub const PROFILE_KEY: &str = "cinedice_profile";
/// Theme name ("Dark" / "Light")
pub const THEME_KEY: &str = "cinedice_theme";
/// Language code ("en" / "ru")
pub const LANGUAGE_KEY: &str = "cinedice_language";
/// Text size name ("Small" / "Medium" / "Large")
pub const TEXT_SIZE_KEY: &str = "cinedice_text_size";
/// Rolls performed in the current calendar month
pub const ROLLS_MONTH_KEY: &str = "cinedice_rolls_month";
/// Month number (1-12) the monthly counter was last reset in
pub const LAST_MONTH_KEY: &str = "cinedice_last_month";
/// Lifetime count of rolls made in the night window
pub const NIGHT_ROLLS_KEY: &str = "cinedice_night_rolls";
/// Lifetime count of rolls made in the morning window
pub const MORNING_ROLLS_KEY: &str = "cinedice_morning_rolls";
/// Consecutive watched-without-unwatching counter
pub const WATCHED_IN_ROW_KEY: &str = "cinedice_watched_in_row";
/// Content type filters tried at least once, JSON string array
pub const CONTENT_TYPES_KEY: &str = "cinedice_content_types";

// ===== Title Validation =====

/// Minimum length for a title name. Shorter names are treated as
/// corrupted and removed by the startup scrub pass.
pub const MIN_TITLE_NAME_LEN: usize = 2;

/// Maximum note length in characters; longer notes are truncated at
/// construction time.
pub const MAX_NOTE_LEN: usize = 150;

/// Known corrupted values from historical bad imports. Titles with one
/// of these as a name are dropped; notes matching one are blanked.
pub const CORRUPTED_FIELD_VALUES: &[&str] = &["ВФВФВ", "ФВФВФВ"];

// ===== Roll Limits =====

/// Fewest titles a single roll may request
pub const MIN_ROLL_RESULTS: usize = 1;

/// Most titles a single roll may request
pub const MAX_ROLL_RESULTS: usize = 3;

// ===== Time Windows =====
//
// Closed-interval hour buckets for the night-owl and early-bird
// counters. Hours 3-4 and 9-21 fall in neither bucket; that gap is part
// of the observed behavior, not an accident to smooth over.

/// First hour of the night window (22:00)
pub const NIGHT_START_HOUR: u32 = 22;
/// Last hour of the night window (02:00, wrapping past midnight)
pub const NIGHT_END_HOUR: u32 = 2;
/// First hour of the morning window (05:00)
pub const MORNING_START_HOUR: u32 = 5;
/// Last hour of the morning window (08:00)
pub const MORNING_END_HOUR: u32 = 8;
