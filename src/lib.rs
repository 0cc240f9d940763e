//! cinedice core library
//!
//! Non-presentation core of a personal movie/series tracker: the title
//! library, achievement engine, profile/settings stores, and dice-roll
//! selector, behind a single [`App`] context object. A UI shell owns
//! presentation and calls into [`App`].

pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod services;

pub use app::{App, Change};
pub use error::{AppError, Result};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging for the embedding shell. Call once at startup.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinedice=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
