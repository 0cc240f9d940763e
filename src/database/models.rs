//! Persisted models
//!
//! Rust structs for every entity held in the key/value store. Serde
//! field names are part of the on-disk contract and must stay stable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::MAX_NOTE_LEN;

/// Kind of tracked content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleKind {
    Film,
    Series,
}

/// A user-entered film or series record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub id: Uuid,
    pub name: String,
    pub kind: TitleKind,
    /// Free-form genre tags, order-preserving, not deduplicated
    pub genres: Vec<String>,
    pub note: String,
    pub favorite: bool,
    pub watched: bool,
    pub added_at: DateTime<Utc>,
    pub roll_count: u32,
    pub last_rolled: Option<DateTime<Utc>>,
}

impl Title {
    pub fn new(name: impl Into<String>, kind: TitleKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            genres: Vec::new(),
            note: String::new(),
            favorite: false,
            watched: false,
            added_at: Utc::now(),
            roll_count: 0,
            last_rolled: None,
        }
    }

    pub fn with_genres(mut self, genres: Vec<String>) -> Self {
        self.genres = genres;
        self
    }

    /// Attach a note, truncated to [`MAX_NOTE_LEN`] characters.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let note: String = note.into();
        self.note = note.chars().take(MAX_NOTE_LEN).collect();
        self
    }
}

/// Closed set of achievement identifiers. The wire name is the
/// snake_case variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstRoll,
    MovieBuff,
    Tastemaker,
    NoteWriter,
    FirstWatched,
    BingeWatcher,
    LuckySeven,
    GenreMaster,
    Curator,
    NightOwl,
    EarlyBird,
    Perfectionist,
    Explorer,
    SocialButterfly,
}

/// A gamified milestone with integer progress toward a fixed threshold.
///
/// State machine: `Locked(progress)` -> `Unlocked(unlocked_at)`,
/// one-directional, entered exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub unlocked: bool,
    pub unlocked_at: Option<DateTime<Utc>>,
    pub progress: u32,
    pub max_progress: u32,
}

impl Achievement {
    pub fn new(
        id: AchievementId,
        title: &str,
        description: &str,
        icon: &str,
        max_progress: u32,
    ) -> Self {
        Self {
            id,
            title: title.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            unlocked: false,
            unlocked_at: None,
            progress: 0,
            max_progress,
        }
    }

    /// Display string like "3/20" for progress badges.
    pub fn progress_label(&self) -> String {
        format!("{}/{}", self.progress, self.max_progress)
    }
}

/// User identity and roll history summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub avatar: String,
    pub member_since: DateTime<Utc>,
    /// Count of consecutive calendar days with at least one roll
    pub roll_streak: u32,
    pub last_roll_at: Option<DateTime<Utc>>,
    pub total_rolls: u32,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "Movie Lover".to_string(),
            avatar: "default".to_string(),
            member_since: Utc::now(),
            roll_streak: 0,
            last_roll_at: None,
            total_rolls: 0,
        }
    }
}

/// Color theme preference, stored as its display name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Dark" => Some(Theme::Dark),
            "Light" => Some(Theme::Light),
            _ => None,
        }
    }
}

/// Interface language, stored as its ISO code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Russian,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Russian => "ru",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "en" => Some(Language::English),
            "ru" => Some(Language::Russian),
            _ => None,
        }
    }
}

/// Text size preference, stored as its display name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl TextSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextSize::Small => "Small",
            TextSize::Medium => "Medium",
            TextSize::Large => "Large",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Small" => Some(TextSize::Small),
            "Medium" => Some(TextSize::Medium),
            "Large" => Some(TextSize::Large),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_title_defaults() {
        let title = Title::new("The Matrix", TitleKind::Film);
        assert_eq!(title.name, "The Matrix");
        assert_eq!(title.kind, TitleKind::Film);
        assert!(!title.favorite);
        assert!(!title.watched);
        assert_eq!(title.roll_count, 0);
        assert!(title.last_rolled.is_none());
    }

    #[test]
    fn test_note_truncated_at_construction() {
        let long_note = "x".repeat(400);
        let title = Title::new("Dark", TitleKind::Series).with_note(long_note);
        assert_eq!(title.note.chars().count(), MAX_NOTE_LEN);
    }

    #[test]
    fn test_achievement_id_wire_names() {
        let json = serde_json::to_string(&AchievementId::MovieBuff).unwrap();
        assert_eq!(json, r#""movie_buff""#);

        let parsed: AchievementId = serde_json::from_str(r#""lucky_seven""#).unwrap();
        assert_eq!(parsed, AchievementId::LuckySeven);
    }

    #[test]
    fn test_title_roundtrip_keeps_field_names() {
        let title = Title::new("Parasite", TitleKind::Film)
            .with_genres(vec!["Thriller".to_string(), "Drama".to_string()]);

        let json = serde_json::to_value(&title).unwrap();
        assert!(json.get("roll_count").is_some());
        assert!(json.get("added_at").is_some());

        let back: Title = serde_json::from_value(json).unwrap();
        assert_eq!(back, title);
    }

    #[test]
    fn test_preference_enums_parse_their_own_labels() {
        for theme in [Theme::Dark, Theme::Light] {
            assert_eq!(Theme::parse(theme.as_str()), Some(theme));
        }
        for lang in [Language::English, Language::Russian] {
            assert_eq!(Language::parse(lang.as_str()), Some(lang));
        }
        for size in [TextSize::Small, TextSize::Medium, TextSize::Large] {
            assert_eq!(TextSize::parse(size.as_str()), Some(size));
        }
        assert_eq!(Theme::parse("Sepia"), None);
    }

    #[test]
    fn test_progress_label() {
        let mut badge = Achievement::new(AchievementId::Curator, "Curator", "", "🏛️", 100);
        badge.progress = 42;
        assert_eq!(badge.progress_label(), "42/100");
    }
}
