//! Service layer
//!
//! Each store owns one slice of application state and its write-through
//! persistence. The `App` context composes them and coordinates the
//! cross-store operations (rolls, watched tracking, recomputation).

pub mod achievements;
pub mod library;
pub mod profile;
pub mod roll;
pub mod settings;

pub use achievements::{AchievementEngine, StatsSnapshot};
pub use library::Library;
pub use profile::ProfileStore;
pub use roll::{KindFilter, RollFilter};
pub use settings::{Settings, SettingsStore};
