//! User profile store
//!
//! Display identity plus the roll streak and lifetime counter. The
//! streak counts consecutive calendar days with at least one roll.

use chrono::{DateTime, Utc};

use crate::config::PROFILE_KEY;
use crate::database::{Repository, UserProfile};

pub struct ProfileStore {
    profile: UserProfile,
    repo: Repository,
}

impl ProfileStore {
    /// Load the profile, falling back to defaults on missing or
    /// malformed data.
    pub async fn load(repo: Repository) -> Self {
        let profile = match repo.get_json::<UserProfile>(PROFILE_KEY).await {
            Ok(Some(profile)) => profile,
            Ok(None) => UserProfile::default(),
            Err(err) => {
                tracing::warn!("Failed to load profile, using defaults: {}", err);
                UserProfile::default()
            }
        };

        Self { profile, repo }
    }

    async fn persist(&self) {
        if let Err(err) = self.repo.put_json(PROFILE_KEY, &self.profile).await {
            tracing::warn!("Failed to save profile: {}", err);
        }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub async fn set_name(&mut self, name: String) {
        self.profile.name = name;
        self.persist().await;
    }

    pub async fn set_avatar(&mut self, avatar: String) {
        self.profile.avatar = avatar;
        self.persist().await;
    }

    /// Record one roll event: bump the lifetime counter and update the
    /// streak from the calendar-day gap since the previous roll.
    ///
    /// Gap of 1 day extends the streak, more than 1 restarts it at 1,
    /// 0 (another roll the same day) leaves it alone, and the very
    /// first roll initializes it to 1.
    pub async fn record_roll(&mut self, now: DateTime<Utc>) {
        match self.profile.last_roll_at {
            Some(last) => {
                let gap = (now.date_naive() - last.date_naive()).num_days();
                if gap == 1 {
                    self.profile.roll_streak += 1;
                } else if gap > 1 {
                    self.profile.roll_streak = 1;
                }
            }
            None => self.profile.roll_streak = 1,
        }

        self.profile.total_rolls += 1;
        self.profile.last_roll_at = Some(now);
        self.persist().await;
    }

    /// Back to factory defaults (new member-since stamp included)
    pub async fn reset(&mut self) {
        self.profile = UserProfile::default();
        self.persist().await;
    }
}
