//! Settings store
//!
//! Preferences and roll counters, persisted as discrete key/value
//! entries rather than one blob so individual values stay readable and
//! forward-compatible. Also owns the calendar-month rollover for the
//! monthly roll counter.

use std::collections::BTreeSet;

use crate::config::{
    CONTENT_TYPES_KEY, LANGUAGE_KEY, LAST_MONTH_KEY, MORNING_END_HOUR, MORNING_ROLLS_KEY,
    MORNING_START_HOUR, NIGHT_END_HOUR, NIGHT_ROLLS_KEY, NIGHT_START_HOUR, ROLLS_MONTH_KEY,
    TEXT_SIZE_KEY, THEME_KEY, WATCHED_IN_ROW_KEY,
};
use crate::database::{Language, Repository, TextSize, Theme};

/// In-memory view of every discrete setting
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub theme: Theme,
    pub language: Language,
    pub text_size: TextSize,
    /// Rolls made in the current calendar month
    pub rolls_this_month: u32,
    /// Month number (1-12) the counter was last reset in; 0 = never
    pub last_seen_month: u32,
    /// Rolls made between 22:00 and 02:00 inclusive
    pub night_rolls: u32,
    /// Rolls made between 05:00 and 08:00 inclusive
    pub morning_rolls: u32,
    /// Titles marked watched in a row without any unwatch in between
    pub watched_in_row: u32,
    /// Content type filter labels used at least once
    pub kinds_tried: BTreeSet<String>,
}

/// Hours 22-23 and 0-2, wrapping past midnight
fn is_night_hour(hour: u32) -> bool {
    hour >= NIGHT_START_HOUR || hour <= NIGHT_END_HOUR
}

/// Hours 5-8
fn is_morning_hour(hour: u32) -> bool {
    (MORNING_START_HOUR..=MORNING_END_HOUR).contains(&hour)
}

pub struct SettingsStore {
    settings: Settings,
    repo: Repository,
}

impl SettingsStore {
    /// Load each entry, substituting the default for anything missing
    /// or unparseable.
    pub async fn load(repo: Repository) -> Self {
        let settings = Settings {
            theme: Self::read(&repo, THEME_KEY)
                .await
                .and_then(|v| Theme::parse(&v))
                .unwrap_or_default(),
            language: Self::read(&repo, LANGUAGE_KEY)
                .await
                .and_then(|v| Language::parse(&v))
                .unwrap_or_default(),
            text_size: Self::read(&repo, TEXT_SIZE_KEY)
                .await
                .and_then(|v| TextSize::parse(&v))
                .unwrap_or_default(),
            rolls_this_month: Self::read_u32(&repo, ROLLS_MONTH_KEY).await,
            last_seen_month: Self::read_u32(&repo, LAST_MONTH_KEY).await,
            night_rolls: Self::read_u32(&repo, NIGHT_ROLLS_KEY).await,
            morning_rolls: Self::read_u32(&repo, MORNING_ROLLS_KEY).await,
            watched_in_row: Self::read_u32(&repo, WATCHED_IN_ROW_KEY).await,
            kinds_tried: match repo.get_json::<BTreeSet<String>>(CONTENT_TYPES_KEY).await {
                Ok(Some(kinds)) => kinds,
                _ => BTreeSet::new(),
            },
        };

        Self { settings, repo }
    }

    async fn read(repo: &Repository, key: &str) -> Option<String> {
        match repo.get(key).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("Failed to read setting {}: {}", key, err);
                None
            }
        }
    }

    async fn read_u32(repo: &Repository, key: &str) -> u32 {
        Self::read(repo, key)
            .await
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    async fn persist(&self) {
        let s = &self.settings;
        let entries = [
            (THEME_KEY, s.theme.as_str().to_string()),
            (LANGUAGE_KEY, s.language.as_str().to_string()),
            (TEXT_SIZE_KEY, s.text_size.as_str().to_string()),
            (ROLLS_MONTH_KEY, s.rolls_this_month.to_string()),
            (LAST_MONTH_KEY, s.last_seen_month.to_string()),
            (NIGHT_ROLLS_KEY, s.night_rolls.to_string()),
            (MORNING_ROLLS_KEY, s.morning_rolls.to_string()),
            (WATCHED_IN_ROW_KEY, s.watched_in_row.to_string()),
        ];

        for (key, value) in entries {
            if let Err(err) = self.repo.put(key, &value).await {
                tracing::warn!("Failed to save setting {}: {}", key, err);
            }
        }

        if let Err(err) = self.repo.put_json(CONTENT_TYPES_KEY, &s.kinds_tried).await {
            tracing::warn!("Failed to save setting {}: {}", CONTENT_TYPES_KEY, err);
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub async fn set_theme(&mut self, theme: Theme) {
        self.settings.theme = theme;
        self.persist().await;
    }

    pub async fn set_language(&mut self, language: Language) {
        self.settings.language = language;
        self.persist().await;
    }

    pub async fn set_text_size(&mut self, text_size: TextSize) {
        self.settings.text_size = text_size;
        self.persist().await;
    }

    /// Zero the monthly counter when the stored month number differs
    /// from the current one. Runs once at startup. The comparison has
    /// no year component, so a gap of exactly twelve months skips the
    /// reset; accepted for a single-device personal app.
    pub async fn apply_month_rollover(&mut self, current_month: u32) -> bool {
        if self.settings.last_seen_month == current_month {
            return false;
        }

        tracing::info!(
            "Month rollover {} -> {}, resetting monthly rolls",
            self.settings.last_seen_month,
            current_month
        );
        self.settings.rolls_this_month = 0;
        self.settings.last_seen_month = current_month;
        self.persist().await;
        true
    }

    /// Count one roll made at the given local hour with the given
    /// content-type filter label.
    pub async fn record_roll(&mut self, hour: u32, kind_label: &str) {
        self.settings.rolls_this_month += 1;

        if is_night_hour(hour) {
            self.settings.night_rolls += 1;
        } else if is_morning_hour(hour) {
            self.settings.morning_rolls += 1;
        }

        self.settings.kinds_tried.insert(kind_label.to_string());
        self.persist().await;
    }

    /// Track a watched-flag transition: marking watched extends the
    /// consecutive counter, unwatching anything resets it.
    pub async fn track_watched(&mut self, now_watched: bool) {
        if now_watched {
            self.settings.watched_in_row += 1;
        } else {
            self.settings.watched_in_row = 0;
        }
        self.persist().await;
    }

    /// Zero the monthly counter without touching the stored month.
    /// Used by the factory reset.
    pub async fn reset_monthly_counter(&mut self) {
        self.settings.rolls_this_month = 0;
        self.persist().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::initialize_database;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_repo() -> Repository {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();

        Repository::new(pool)
    }

    #[tokio::test]
    async fn test_defaults_on_empty_store() {
        let store = SettingsStore::load(create_test_repo().await).await;

        let s = store.settings();
        assert_eq!(s.theme, Theme::Dark);
        assert_eq!(s.language, Language::English);
        assert_eq!(s.text_size, TextSize::Medium);
        assert_eq!(s.rolls_this_month, 0);
        assert_eq!(s.last_seen_month, 0);
        assert!(s.kinds_tried.is_empty());
    }

    #[tokio::test]
    async fn test_garbage_values_fall_back_to_defaults() {
        let repo = create_test_repo().await;
        repo.put(THEME_KEY, "Sepia").await.unwrap();
        repo.put(ROLLS_MONTH_KEY, "many").await.unwrap();

        let store = SettingsStore::load(repo).await;

        assert_eq!(store.settings().theme, Theme::Dark);
        assert_eq!(store.settings().rolls_this_month, 0);
    }

    #[tokio::test]
    async fn test_month_rollover_resets_counter() {
        let repo = create_test_repo().await;
        let mut store = SettingsStore::load(repo).await;

        store.apply_month_rollover(3).await;
        store.record_roll(12, "Mix").await;
        store.record_roll(12, "Mix").await;
        assert_eq!(store.settings().rolls_this_month, 2);

        // Same month again: nothing happens
        assert!(!store.apply_month_rollover(3).await);
        assert_eq!(store.settings().rolls_this_month, 2);

        // New month: counter resets exactly once
        assert!(store.apply_month_rollover(4).await);
        assert_eq!(store.settings().rolls_this_month, 0);
        assert_eq!(store.settings().last_seen_month, 4);
    }

    #[tokio::test]
    async fn test_hour_buckets() {
        let mut store = SettingsStore::load(create_test_repo().await).await;

        for hour in [22, 23, 0, 1, 2] {
            store.record_roll(hour, "Mix").await;
        }
        for hour in [5, 6, 7, 8] {
            store.record_roll(hour, "Mix").await;
        }
        // The gaps: neither bucket counts these
        for hour in [3, 4, 9, 12, 21] {
            store.record_roll(hour, "Mix").await;
        }

        let s = store.settings();
        assert_eq!(s.night_rolls, 5);
        assert_eq!(s.morning_rolls, 4);
        assert_eq!(s.rolls_this_month, 14);
    }

    #[tokio::test]
    async fn test_kinds_tried_accumulate_without_duplicates() {
        let mut store = SettingsStore::load(create_test_repo().await).await;

        store.record_roll(12, "Films").await;
        store.record_roll(13, "Films").await;
        store.record_roll(14, "Series").await;
        store.record_roll(15, "Mix").await;

        assert_eq!(store.settings().kinds_tried.len(), 3);
    }

    #[tokio::test]
    async fn test_watched_in_row_tracking() {
        let mut store = SettingsStore::load(create_test_repo().await).await;

        store.track_watched(true).await;
        store.track_watched(true).await;
        assert_eq!(store.settings().watched_in_row, 2);

        store.track_watched(false).await;
        assert_eq!(store.settings().watched_in_row, 0);
    }

    #[tokio::test]
    async fn test_persistence_roundtrip() {
        let repo = create_test_repo().await;

        {
            let mut store = SettingsStore::load(repo.clone()).await;
            store.set_theme(Theme::Light).await;
            store.set_language(Language::Russian).await;
            store.record_roll(23, "Series").await;
        }

        let store = SettingsStore::load(repo).await;
        let s = store.settings();
        assert_eq!(s.theme, Theme::Light);
        assert_eq!(s.language, Language::Russian);
        assert_eq!(s.rolls_this_month, 1);
        assert_eq!(s.night_rolls, 1);
        assert!(s.kinds_tried.contains("Series"));
    }
}
