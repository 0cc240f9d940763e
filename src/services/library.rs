//! Title library
//!
//! In-memory ordered collection of title records with write-through
//! persistence. Lookup misses are silent no-ops and save failures are
//! logged rather than surfaced, so every operation here is infallible
//! from the caller's point of view.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use uuid::Uuid;

use crate::config::{CORRUPTED_FIELD_VALUES, MIN_TITLE_NAME_LEN, TITLES_KEY};
use crate::database::{Repository, Title};

/// The user's title collection
pub struct Library {
    titles: Vec<Title>,
    repo: Repository,
}

impl Library {
    /// Load the collection, falling back to empty on missing or
    /// malformed data.
    pub async fn load(repo: Repository) -> Self {
        let titles = match repo.get_json::<Vec<Title>>(TITLES_KEY).await {
            Ok(Some(titles)) => titles,
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!("Failed to load titles, starting empty: {}", err);
                Vec::new()
            }
        };

        tracing::info!("Loaded {} titles", titles.len());
        Self { titles, repo }
    }

    async fn persist(&self) {
        if let Err(err) = self.repo.put_json(TITLES_KEY, &self.titles).await {
            tracing::warn!("Failed to save titles: {}", err);
        }
    }

    pub fn titles(&self) -> &[Title] {
        &self.titles
    }

    pub fn get(&self, id: Uuid) -> Option<&Title> {
        self.titles.iter().find(|t| t.id == id)
    }

    /// Append a title and persist
    pub async fn add(&mut self, title: Title) {
        tracing::info!("Adding title: {}", title.name);
        self.titles.push(title);
        self.persist().await;
    }

    /// Replace the record with the same id. Unknown ids are ignored.
    /// Returns whether anything changed.
    pub async fn update(&mut self, title: Title) -> bool {
        match self.titles.iter_mut().find(|t| t.id == title.id) {
            Some(slot) => {
                *slot = title;
                self.persist().await;
                true
            }
            None => false,
        }
    }

    /// Remove every record matching the id. Returns whether anything
    /// was removed.
    pub async fn remove(&mut self, id: Uuid) -> bool {
        let before = self.titles.len();
        self.titles.retain(|t| t.id != id);

        if self.titles.len() == before {
            return false;
        }

        tracing::info!("Removed title: {}", id);
        self.persist().await;
        true
    }

    /// Flip the favorite flag. Returns whether a record matched.
    pub async fn toggle_favorite(&mut self, id: Uuid) -> bool {
        match self.titles.iter_mut().find(|t| t.id == id) {
            Some(title) => {
                title.favorite = !title.favorite;
                self.persist().await;
                true
            }
            None => false,
        }
    }

    /// Flip the watched flag. Returns the new watched state, or `None`
    /// if no record matched, so the caller can track watch streaks.
    pub async fn toggle_watched(&mut self, id: Uuid) -> Option<bool> {
        let watched = {
            let title = self.titles.iter_mut().find(|t| t.id == id)?;
            title.watched = !title.watched;
            title.watched
        };

        self.persist().await;
        Some(watched)
    }

    /// Bump the roll counter and stamp the last-rolled time
    pub async fn increment_roll(&mut self, id: Uuid, now: DateTime<Utc>) {
        if let Some(title) = self.titles.iter_mut().find(|t| t.id == id) {
            title.roll_count += 1;
            title.last_rolled = Some(now);
            self.persist().await;
        }
    }

    /// Drop everything and persist the empty collection
    pub async fn clear(&mut self) {
        self.titles.clear();
        self.persist().await;
    }

    // ===== Derived views =====

    pub fn total(&self) -> usize {
        self.titles.len()
    }

    pub fn watched_count(&self) -> usize {
        self.titles.iter().filter(|t| t.watched).count()
    }

    pub fn favorite_count(&self) -> usize {
        self.titles.iter().filter(|t| t.favorite).count()
    }

    pub fn noted_count(&self) -> usize {
        self.titles.iter().filter(|t| !t.note.is_empty()).count()
    }

    pub fn distinct_genre_count(&self) -> usize {
        self.titles
            .iter()
            .flat_map(|t| t.genres.iter())
            .collect::<HashSet<_>>()
            .len()
    }

    /// The title rolled most often; ties go to the earliest entry.
    pub fn most_rolled(&self) -> Option<&Title> {
        self.titles
            .iter()
            .reduce(|best, t| if t.roll_count > best.roll_count { t } else { best })
    }

    // ===== Startup scrub =====

    /// Remove records with unusable names and blank known-corrupted
    /// notes left behind by historical bad data.
    pub async fn scrub(&mut self) {
        let before = self.titles.len();

        self.titles.retain(|t| {
            t.name.chars().count() >= MIN_TITLE_NAME_LEN
                && !CORRUPTED_FIELD_VALUES.contains(&t.name.as_str())
        });
        let removed = before - self.titles.len();

        let mut blanked = 0;
        for title in &mut self.titles {
            if CORRUPTED_FIELD_VALUES.contains(&title.note.as_str()) {
                title.note.clear();
                blanked += 1;
            }
        }

        if removed > 0 || blanked > 0 {
            tracing::info!("Scrubbed {} titles, blanked {} notes", removed, blanked);
            self.persist().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{initialize_database, TitleKind};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_library() -> Library {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();

        Library::load(Repository::new(pool)).await
    }

    #[tokio::test]
    async fn test_add_and_get() {
        let mut library = create_test_library().await;

        let title = Title::new("Inception", TitleKind::Film);
        let id = title.id;
        library.add(title).await;

        assert_eq!(library.total(), 1);
        assert_eq!(library.get(id).unwrap().name, "Inception");
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_noop() {
        let mut library = create_test_library().await;
        library.add(Title::new("Dark", TitleKind::Series)).await;

        let stranger = Title::new("Nope", TitleKind::Film);
        assert!(!library.update(stranger).await);
        assert_eq!(library.total(), 1);
        assert_eq!(library.titles()[0].name, "Dark");
    }

    #[tokio::test]
    async fn test_toggle_favorite_twice_restores() {
        let mut library = create_test_library().await;

        let title = Title::new("Parasite", TitleKind::Film);
        let id = title.id;
        library.add(title).await;

        assert!(library.toggle_favorite(id).await);
        assert!(library.get(id).unwrap().favorite);

        assert!(library.toggle_favorite(id).await);
        assert!(!library.get(id).unwrap().favorite);
    }

    #[tokio::test]
    async fn test_toggle_watched_reports_transition() {
        let mut library = create_test_library().await;

        let title = Title::new("The Office", TitleKind::Series);
        let id = title.id;
        library.add(title).await;

        assert_eq!(library.toggle_watched(id).await, Some(true));
        assert_eq!(library.watched_count(), 1);

        assert_eq!(library.toggle_watched(id).await, Some(false));
        assert_eq!(library.watched_count(), 0);

        assert_eq!(library.toggle_watched(Uuid::new_v4()).await, None);
    }

    #[tokio::test]
    async fn test_increment_roll_stamps_time() {
        let mut library = create_test_library().await;

        let title = Title::new("Interstellar", TitleKind::Film);
        let id = title.id;
        library.add(title).await;

        let now = Utc::now();
        library.increment_roll(id, now).await;
        library.increment_roll(id, now).await;

        let rolled = library.get(id).unwrap();
        assert_eq!(rolled.roll_count, 2);
        assert_eq!(rolled.last_rolled, Some(now));
    }

    #[tokio::test]
    async fn test_most_rolled_first_wins_ties() {
        let mut library = create_test_library().await;

        let mut a = Title::new("First", TitleKind::Film);
        a.roll_count = 3;
        let mut b = Title::new("Second", TitleKind::Film);
        b.roll_count = 3;
        let a_id = a.id;

        library.add(a).await;
        library.add(b).await;

        assert_eq!(library.most_rolled().unwrap().id, a_id);
    }

    #[tokio::test]
    async fn test_distinct_genres_dedup_across_titles() {
        let mut library = create_test_library().await;

        library
            .add(
                Title::new("Dark", TitleKind::Series)
                    .with_genres(vec!["Sci-Fi".into(), "Mystery".into()]),
            )
            .await;
        library
            .add(
                Title::new("Interstellar", TitleKind::Film)
                    .with_genres(vec!["Sci-Fi".into(), "Drama".into()]),
            )
            .await;

        assert_eq!(library.distinct_genre_count(), 3);
    }

    #[tokio::test]
    async fn test_scrub_drops_bad_names_and_blanks_bad_notes() {
        let mut library = create_test_library().await;

        library.add(Title::new("Inception", TitleKind::Film)).await;
        library.add(Title::new("x", TitleKind::Film)).await;
        library.add(Title::new("ВФВФВ", TitleKind::Film)).await;
        library
            .add(Title::new("Dark", TitleKind::Series).with_note("ФВФВФВ"))
            .await;

        library.scrub().await;

        assert_eq!(library.total(), 2);
        assert!(library.titles().iter().all(|t| t.note.is_empty()));
        assert!(library.titles().iter().any(|t| t.name == "Inception"));
    }

    #[tokio::test]
    async fn test_persistence_roundtrip() {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();
        initialize_database(&pool).await.unwrap();
        let repo = Repository::new(pool);

        {
            let mut library = Library::load(repo.clone()).await;
            library.add(Title::new("Breaking Bad", TitleKind::Series)).await;
        }

        let library = Library::load(repo).await;
        assert_eq!(library.total(), 1);
        assert_eq!(library.titles()[0].name, "Breaking Bad");
    }
}
