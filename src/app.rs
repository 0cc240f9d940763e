//! Application context
//!
//! `App` replaces the original design's process-wide singleton with an
//! explicit context object the UI shell owns. It wires the stores
//! together and coordinates every cross-store operation: mutate, write
//! through, recompute achievements, notify subscribers. Single writer
//! by construction (`&mut self`); no locking.

use chrono::{DateTime, Datelike, Local, Timelike, Utc};
use rand::Rng;
use sqlx::SqlitePool;
use std::path::Path;
use uuid::Uuid;

use crate::database::{
    create_pool, Achievement, AchievementId, Language, Repository, TextSize, Theme, Title,
    TitleKind, UserProfile,
};
use crate::error::Result;
use crate::services::roll;
use crate::services::{
    AchievementEngine, Library, ProfileStore, RollFilter, Settings, SettingsStore, StatsSnapshot,
};

/// Which slice of state a mutation touched. Subscribers re-render from
/// these instead of reactive properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Titles,
    Achievements,
    Profile,
    Settings,
}

type Listener = Box<dyn Fn(Change) + Send>;

pub struct App {
    library: Library,
    achievements: AchievementEngine,
    profile: ProfileStore,
    settings: SettingsStore,
    listeners: Vec<Listener>,
}

impl App {
    /// Open (or create) the database at `db_path` and load all state.
    pub async fn open(db_path: &Path) -> Result<Self> {
        let pool = create_pool(db_path).await?;
        Self::from_pool(pool).await
    }

    /// Build the context from an already-initialized pool. Runs the
    /// startup passes: corrupted-data scrub and monthly-counter
    /// rollover.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        let repo = Repository::new(pool);

        let mut library = Library::load(repo.clone()).await;
        let achievements = AchievementEngine::load(repo.clone()).await;
        let profile = ProfileStore::load(repo.clone()).await;
        let mut settings = SettingsStore::load(repo).await;

        library.scrub().await;
        settings.apply_month_rollover(Local::now().month()).await;

        Ok(Self {
            library,
            achievements,
            profile,
            settings,
            listeners: Vec::new(),
        })
    }

    /// Register a change listener. Listeners run synchronously after
    /// each mutation, on the caller's task.
    pub fn subscribe(&mut self, listener: impl Fn(Change) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&self, change: Change) {
        for listener in &self.listeners {
            listener(change);
        }
    }

    // ===== Read access =====

    pub fn titles(&self) -> &[Title] {
        self.library.titles()
    }

    pub fn title(&self, id: Uuid) -> Option<&Title> {
        self.library.get(id)
    }

    pub fn total_titles(&self) -> usize {
        self.library.total()
    }

    pub fn watched_count(&self) -> usize {
        self.library.watched_count()
    }

    pub fn favorites_count(&self) -> usize {
        self.library.favorite_count()
    }

    pub fn most_rolled(&self) -> Option<&Title> {
        self.library.most_rolled()
    }

    pub fn achievements(&self) -> &[Achievement] {
        self.achievements.entries()
    }

    pub fn unlocked_achievements_count(&self) -> usize {
        self.achievements.unlocked_count()
    }

    pub fn profile(&self) -> &UserProfile {
        self.profile.profile()
    }

    pub fn settings(&self) -> &Settings {
        self.settings.settings()
    }

    // ===== Title operations =====

    pub async fn add_title(&mut self, title: Title) {
        self.library.add(title).await;
        self.recompute(Utc::now()).await;
        self.emit(Change::Titles);
    }

    pub async fn update_title(&mut self, title: Title) {
        if self.library.update(title).await {
            self.recompute(Utc::now()).await;
            self.emit(Change::Titles);
        }
    }

    /// Remove a title. Does not recompute achievements: unlocks are
    /// one-way, so recomputing here could only lower progress numbers
    /// retroactively; the next constructive mutation refreshes them.
    pub async fn delete_title(&mut self, id: Uuid) {
        if self.library.remove(id).await {
            self.emit(Change::Titles);
        }
    }

    pub async fn toggle_favorite(&mut self, id: Uuid) {
        if self.library.toggle_favorite(id).await {
            self.recompute(Utc::now()).await;
            self.emit(Change::Titles);
        }
    }

    pub async fn toggle_watched(&mut self, id: Uuid) {
        if let Some(watched) = self.library.toggle_watched(id).await {
            self.settings.track_watched(watched).await;
            self.recompute(Utc::now()).await;
            self.emit(Change::Titles);
            self.emit(Change::Settings);
        }
    }

    // ===== Rolls =====

    /// Roll the dice: draw up to `requested` random titles matching
    /// the filter and record all roll bookkeeping. An empty candidate
    /// set returns an empty result with no side effects.
    pub async fn roll(&mut self, filter: &RollFilter, requested: usize) -> Vec<Title> {
        self.roll_at(filter, requested, Local::now(), &mut rand::thread_rng())
            .await
    }

    /// Deterministic roll used by tests and by shells that drive their
    /// own clock or randomness.
    pub async fn roll_at<R: Rng + ?Sized>(
        &mut self,
        filter: &RollFilter,
        requested: usize,
        now: DateTime<Local>,
        rng: &mut R,
    ) -> Vec<Title> {
        let picked_ids: Vec<Uuid> = roll::draw(self.library.titles(), filter, requested, rng)
            .into_iter()
            .map(|t| t.id)
            .collect();

        if picked_ids.is_empty() {
            tracing::info!("Roll produced no candidates");
            return Vec::new();
        }

        let now_utc = now.with_timezone(&Utc);

        for id in &picked_ids {
            self.library.increment_roll(*id, now_utc).await;
        }

        self.profile.record_roll(now_utc).await;
        self.settings
            .record_roll(now.hour(), filter.kind.label())
            .await;
        self.achievements
            .force_unlock(AchievementId::FirstRoll, now_utc)
            .await;
        self.recompute(now_utc).await;

        self.emit(Change::Titles);
        self.emit(Change::Profile);
        self.emit(Change::Settings);

        picked_ids
            .iter()
            .filter_map(|id| self.library.get(*id).cloned())
            .collect()
    }

    // ===== Achievements =====

    /// UI-triggered badge unlock (idempotent)
    pub async fn unlock_achievement(&mut self, id: AchievementId) {
        self.achievements.force_unlock(id, Utc::now()).await;
        self.emit(Change::Achievements);
    }

    fn stats(&self) -> StatsSnapshot {
        let settings = self.settings.settings();
        StatsSnapshot {
            total_titles: self.library.total() as u32,
            favorite_count: self.library.favorite_count() as u32,
            watched_count: self.library.watched_count() as u32,
            noted_count: self.library.noted_count() as u32,
            distinct_genres: self.library.distinct_genre_count() as u32,
            roll_streak: self.profile.profile().roll_streak,
            night_rolls: settings.night_rolls,
            morning_rolls: settings.morning_rolls,
            watched_in_row: settings.watched_in_row,
            kinds_tried: settings.kinds_tried.len() as u32,
        }
    }

    async fn recompute(&mut self, now: DateTime<Utc>) {
        let stats = self.stats();
        self.achievements.recompute(&stats, now).await;
        self.emit(Change::Achievements);
    }

    // ===== Profile & preferences =====

    pub async fn set_profile_name(&mut self, name: String) {
        self.profile.set_name(name).await;
        self.emit(Change::Profile);
    }

    pub async fn set_avatar(&mut self, avatar: String) {
        self.profile.set_avatar(avatar).await;
        self.emit(Change::Profile);
    }

    pub async fn set_theme(&mut self, theme: Theme) {
        self.settings.set_theme(theme).await;
        self.emit(Change::Settings);
    }

    pub async fn set_language(&mut self, language: Language) {
        self.settings.set_language(language).await;
        self.emit(Change::Settings);
    }

    pub async fn set_text_size(&mut self, text_size: TextSize) {
        self.settings.set_text_size(text_size).await;
        self.emit(Change::Settings);
    }

    // ===== Maintenance =====

    /// Factory reset: empty library, fresh catalog, default profile,
    /// zeroed monthly counter. Preferences are kept.
    pub async fn reset_all(&mut self) {
        tracing::info!("Resetting all user data");

        self.library.clear().await;
        self.achievements.reset().await;
        self.profile.reset().await;
        self.settings.reset_monthly_counter().await;

        self.emit(Change::Titles);
        self.emit(Change::Achievements);
        self.emit(Change::Profile);
        self.emit(Change::Settings);
    }

    /// Seed a handful of demo titles for onboarding. No-op if the
    /// library already has content.
    pub async fn seed_sample_library(&mut self) {
        if self.library.total() > 0 {
            return;
        }

        let samples = [
            ("Inception", TitleKind::Film, vec!["Sci-Fi", "Thriller", "Mind-Bending"], true, true),
            ("The Shawshank Redemption", TitleKind::Film, vec!["Drama"], true, true),
            ("The Office", TitleKind::Series, vec!["Comedy"], true, false),
            ("Breaking Bad", TitleKind::Series, vec!["Drama", "Crime"], false, true),
            ("Dark", TitleKind::Series, vec!["Sci-Fi", "Mystery"], false, false),
            ("Parasite", TitleKind::Film, vec!["Thriller", "Drama"], false, true),
            ("Interstellar", TitleKind::Film, vec!["Sci-Fi", "Drama"], true, true),
            ("Stranger Things", TitleKind::Series, vec!["Sci-Fi", "Horror"], true, false),
        ];

        for (name, kind, genres, favorite, watched) in samples {
            let mut title = Title::new(name, kind)
                .with_genres(genres.into_iter().map(String::from).collect());
            title.favorite = favorite;
            title.watched = watched;
            self.library.add(title).await;
        }

        self.recompute(Utc::now()).await;
        self.emit(Change::Titles);
    }
}
