// Photo Diary - Core Library
// Exposes the store, selection and feed pipeline for the TUI, API server, and tests

pub mod config;
pub mod date;
pub mod pipeline;
pub mod selection;
pub mod store;
pub mod telemetry;

// Re-export commonly used types
pub use config::AppConfig;
pub use date::{parse_display_date, PostDate};
pub use pipeline::{
    available_dates, build_feed, category_counts, filter_posts, group_by_date,
    sort_by_date_desc, DateGroup, Feed,
};
pub use selection::{Filter, SelectionState, ALL_DIARIES, DEFAULT_HEADER};
pub use store::{Category, CategoryId, Post, PostStore, Profile, SocialLink, StoreError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
