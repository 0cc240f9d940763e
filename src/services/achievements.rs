//! Achievement engine
//!
//! Holds the fixed catalog and derives each entry's progress from a
//! snapshot of the rest of the application state. Unlocking is
//! one-directional: once an entry unlocks, recomputation may move its
//! progress number but never its unlocked flag or timestamp.

use chrono::{DateTime, Utc};

use crate::config::ACHIEVEMENTS_KEY;
use crate::database::{Achievement, AchievementId, Repository};

/// Everything recomputation needs, gathered by the `App` context so the
/// derivation stays a pure function of current state.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsSnapshot {
    pub total_titles: u32,
    pub favorite_count: u32,
    pub watched_count: u32,
    pub noted_count: u32,
    pub distinct_genres: u32,
    pub roll_streak: u32,
    pub night_rolls: u32,
    pub morning_rolls: u32,
    pub watched_in_row: u32,
    pub kinds_tried: u32,
}

/// The build-time catalog. Thresholds are part of the product contract.
pub fn catalog() -> Vec<Achievement> {
    vec![
        Achievement::new(AchievementId::FirstRoll, "First Roll", "Made your first dice roll", "🎲", 1),
        Achievement::new(AchievementId::MovieBuff, "Movie Buff", "Added 20 titles to your library", "🎬", 20),
        Achievement::new(AchievementId::Tastemaker, "Tastemaker", "Added 5 titles to favorites", "⭐", 5),
        Achievement::new(AchievementId::NoteWriter, "Note Writer", "Written your first note", "✍️", 1),
        Achievement::new(AchievementId::FirstWatched, "Watched!", "Marked first title as watched", "✅", 1),
        Achievement::new(AchievementId::BingeWatcher, "Binge Watcher", "Watched 50 titles", "📺", 50),
        Achievement::new(AchievementId::LuckySeven, "Lucky 7", "Roll the dice 7 days in a row", "🍀", 7),
        Achievement::new(AchievementId::GenreMaster, "Genre Master", "Watch titles from 10 different genres", "🎭", 10),
        Achievement::new(AchievementId::Curator, "Curator", "Have 100 titles in your library", "🏛️", 100),
        Achievement::new(AchievementId::NightOwl, "Night Owl", "Roll the dice 10 times after 10 PM", "🦉", 10),
        Achievement::new(AchievementId::EarlyBird, "Early Bird", "Roll the dice 10 times before 8 AM", "🐦", 10),
        Achievement::new(AchievementId::Perfectionist, "Perfectionist", "Watch 25 titles in a row without skipping", "🎯", 25),
        Achievement::new(AchievementId::Explorer, "Explorer", "Try all content types (Films, Series, Mix)", "🗺️", 3),
        Achievement::new(AchievementId::SocialButterfly, "Social Butterfly", "Add 15 titles with notes", "🦋", 15),
    ]
}

/// Reconcile persisted per-entry state onto a fresh catalog. Entries
/// the catalog no longer defines are dropped; entries the persisted
/// data never saw keep their defaults.
pub fn merge_persisted(mut fresh: Vec<Achievement>, saved: Vec<Achievement>) -> Vec<Achievement> {
    for entry in saved {
        if let Some(slot) = fresh.iter_mut().find(|a| a.id == entry.id) {
            *slot = entry;
        }
    }
    fresh
}

/// Catalog state plus write-through persistence
pub struct AchievementEngine {
    entries: Vec<Achievement>,
    repo: Repository,
}

impl AchievementEngine {
    /// Build the catalog and merge any persisted state onto it
    pub async fn load(repo: Repository) -> Self {
        let entries = match repo.get_json::<Vec<Achievement>>(ACHIEVEMENTS_KEY).await {
            Ok(Some(saved)) => merge_persisted(catalog(), saved),
            Ok(None) => catalog(),
            Err(err) => {
                tracing::warn!("Failed to load achievements, using defaults: {}", err);
                catalog()
            }
        };

        Self { entries, repo }
    }

    async fn persist(&self) {
        if let Err(err) = self.repo.put_json(ACHIEVEMENTS_KEY, &self.entries).await {
            tracing::warn!("Failed to save achievements: {}", err);
        }
    }

    pub fn entries(&self) -> &[Achievement] {
        &self.entries
    }

    pub fn get(&self, id: AchievementId) -> Option<&Achievement> {
        self.entries.iter().find(|a| a.id == id)
    }

    pub fn unlocked_count(&self) -> usize {
        self.entries.iter().filter(|a| a.unlocked).count()
    }

    /// Clamp progress into `[0, max_progress]` and unlock on first
    /// arrival at the maximum. Does not persist; recompute batches the
    /// save.
    fn apply(&mut self, id: AchievementId, progress: u32, now: DateTime<Utc>) {
        let Some(entry) = self.entries.iter_mut().find(|a| a.id == id) else {
            return;
        };

        entry.progress = progress.min(entry.max_progress);
        if entry.progress >= entry.max_progress && !entry.unlocked {
            entry.unlocked = true;
            entry.unlocked_at = Some(now);
            tracing::info!("Achievement unlocked: {}", entry.title);
        }
    }

    /// Set one entry's progress and persist the catalog
    pub async fn set_progress(&mut self, id: AchievementId, progress: u32, now: DateTime<Utc>) {
        self.apply(id, progress, now);
        self.persist().await;
    }

    /// Unlock unconditionally. Already-unlocked entries are untouched,
    /// keeping the original unlock timestamp.
    pub async fn force_unlock(&mut self, id: AchievementId, now: DateTime<Utc>) {
        let Some(entry) = self.entries.iter_mut().find(|a| a.id == id) else {
            return;
        };

        if entry.unlocked {
            return;
        }

        entry.unlocked = true;
        entry.unlocked_at = Some(now);
        entry.progress = entry.max_progress;
        tracing::info!("Achievement unlocked: {}", entry.title);

        self.persist().await;
    }

    /// Re-derive every stat-driven entry from the snapshot and persist
    /// the catalog once. `first_roll` is event-driven and left alone.
    pub async fn recompute(&mut self, stats: &StatsSnapshot, now: DateTime<Utc>) {
        self.apply(AchievementId::MovieBuff, stats.total_titles, now);
        self.apply(AchievementId::Tastemaker, stats.favorite_count, now);
        self.apply(AchievementId::FirstWatched, u32::from(stats.watched_count > 0), now);
        self.apply(AchievementId::BingeWatcher, stats.watched_count, now);
        self.apply(AchievementId::Curator, stats.total_titles, now);
        self.apply(AchievementId::LuckySeven, stats.roll_streak, now);
        self.apply(AchievementId::NoteWriter, u32::from(stats.noted_count > 0), now);
        self.apply(AchievementId::GenreMaster, stats.distinct_genres, now);
        self.apply(AchievementId::NightOwl, stats.night_rolls, now);
        self.apply(AchievementId::EarlyBird, stats.morning_rolls, now);
        self.apply(AchievementId::Perfectionist, stats.watched_in_row, now);
        self.apply(AchievementId::Explorer, stats.kinds_tried, now);
        self.apply(AchievementId::SocialButterfly, stats.noted_count, now);

        self.persist().await;
    }

    /// Fresh catalog, persisted. Used by the factory reset.
    pub async fn reset(&mut self) {
        self.entries = catalog();
        self.persist().await;
    }
}
