// 🗂️ Post Store - Immutable posts and timeline entries
//
// The store is built once (compiled-in sample data or a JSON data file) and
// never mutated afterwards. Everything else borrows from it.
//
// Load-time validation:
// - Category ids must be unique
// - Post ids must be unique
// - Every post carries at least one image
// Posts pointing at an unknown category are kept (they still show under
// "all" and under date filters) and reported as orphans.

use crate::date::PostDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// IDENTIFIERS
// ============================================================================

/// Timeline category identifier (e.g., "greece-2024")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        CategoryId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CategoryId {
    fn from(id: &str) -> Self {
        CategoryId::new(id)
    }
}

impl From<String> for CategoryId {
    fn from(id: String) -> Self {
        CategoryId(id)
    }
}

impl PartialEq<str> for CategoryId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// RECORDS
// ============================================================================

/// One feed entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: u32,
    pub category: CategoryId,
    pub date: PostDate,
    /// Caption shown under the images
    #[serde(alias = "content")]
    pub caption: String,
    /// Image paths, resolved by whatever serves static assets
    pub images: Vec<String>,
}

/// Timeline entry shown as a sidebar selector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub label: String,
    /// Display date under the label ("Summer 2024")
    #[serde(alias = "date")]
    pub subtitle: String,
    #[serde(default = "default_image")]
    pub image: String,
}

fn default_image() -> String {
    "/placeholder.svg".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub network: String,
    pub url: String,
}

/// Photographer shown at the top of the sidebar
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub tagline: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read data file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid data file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate category id: {0}")]
    DuplicateCategory(CategoryId),

    #[error("duplicate post id: {0}")]
    DuplicatePost(u32),

    #[error("post {0} has no images")]
    EmptyImages(u32),
}

// ============================================================================
// POST STORE
// ============================================================================

/// On-disk shape of a data file
#[derive(Debug, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    profile: Profile,
    timeline: Vec<Category>,
    posts: Vec<Post>,
}

#[derive(Debug, Clone)]
pub struct PostStore {
    profile: Profile,
    categories: Vec<Category>,
    posts: Vec<Post>,
}

impl PostStore {
    /// Build a store, validating the invariants listed at the top of this file
    pub fn new(
        profile: Profile,
        categories: Vec<Category>,
        posts: Vec<Post>,
    ) -> Result<Self, StoreError> {
        let mut category_ids = HashSet::new();
        for category in &categories {
            if !category_ids.insert(category.id.clone()) {
                return Err(StoreError::DuplicateCategory(category.id.clone()));
            }
        }

        let mut post_ids = HashSet::new();
        for post in &posts {
            if !post_ids.insert(post.id) {
                return Err(StoreError::DuplicatePost(post.id));
            }
            if post.images.is_empty() {
                return Err(StoreError::EmptyImages(post.id));
            }
        }

        let store = PostStore {
            profile,
            categories,
            posts,
        };

        for post in store.orphaned_posts() {
            tracing::warn!(
                post_id = post.id,
                category = %post.category,
                "post references unknown category; it will not appear under any timeline entry"
            );
        }

        for post in store.posts.iter().filter(|p| !p.date.is_parseable()) {
            tracing::warn!(
                post_id = post.id,
                date = %post.date,
                "post date is not parseable; it will sort after all dated posts"
            );
        }

        tracing::debug!(
            posts = store.posts.len(),
            categories = store.categories.len(),
            "post store loaded"
        );

        Ok(store)
    }

    /// Parse a JSON data file body
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let data: StoreData = serde_json::from_str(json)?;
        PostStore::new(data.profile, data.timeline, data.posts)
    }

    /// Read and parse a JSON data file
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let json = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        PostStore::from_json(&json)
    }

    /// Serialize back to the data file shape
    pub fn to_json(&self) -> Result<String, StoreError> {
        let data = StoreData {
            profile: self.profile.clone(),
            timeline: self.categories.clone(),
            posts: self.posts.clone(),
        };

        Ok(serde_json::to_string_pretty(&data)?)
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Posts in their original (authoring) order
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Timeline entries in sidebar order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn post(&self, id: u32) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == *id)
    }

    pub fn is_known_category(&self, id: &str) -> bool {
        self.category(id).is_some()
    }

    /// Posts whose category matches no timeline entry
    pub fn orphaned_posts(&self) -> Vec<&Post> {
        self.posts
            .iter()
            .filter(|p| !self.is_known_category(p.category.as_str()))
            .collect()
    }

    /// Built-in portfolio data
    pub fn sample() -> Self {
        let profile = Profile {
            name: "Mariam Abalo-Toga".to_string(),
            tagline: "Travel Photographer".to_string(),
            avatar: Some("/IMG_2355.jpg".to_string()),
            social_links: vec![
                social("Instagram", "https://instagram.com"),
                social("Twitter", "https://twitter.com"),
                social("Email", "mailto:hello@example.com"),
            ],
        };

        let categories = vec![
            category("japan-2024", "Japan", "December 2024", "/placeholder.svg"),
            category("greece-2024", "Greece", "Summer 2024", "/IMG_2355.jpg"),
            category("nyc-2024", "New York City", "Spring 2024", "/placeholder.svg"),
            category("paris-2023", "Paris", "Fall 2023", "/placeholder.svg"),
        ];

        let posts = vec![
            post(1, "japan-2024", "December 15, 2024", "Exploring the vibrant streets of Tokyo", 4, None),
            post(2, "japan-2024", "December 18, 2024", "Peaceful moments at a traditional Japanese garden", 2, None),
            post(3, "greece-2024", "July 5, 2024", "Sunset in Santorini", 1, Some("/IMG_2355.jpg")),
            post(4, "greece-2024", "July 10, 2024", "Ancient ruins of Athens", 3, None),
            post(5, "nyc-2024", "April 3, 2024", "New York City skyline from Top of the Rock", 1, None),
            post(6, "paris-2023", "October 12, 2023", "Autumn in Paris", 2, None),
        ];

        // Compiled-in data satisfies every invariant
        PostStore {
            profile,
            categories,
            posts,
        }
    }
}

impl Default for PostStore {
    fn default() -> Self {
        Self::sample()
    }
}

fn social(network: &str, url: &str) -> SocialLink {
    SocialLink {
        network: network.to_string(),
        url: url.to_string(),
    }
}

fn category(id: &str, label: &str, subtitle: &str, image: &str) -> Category {
    Category {
        id: CategoryId::new(id),
        label: label.to_string(),
        subtitle: subtitle.to_string(),
        image: image.to_string(),
    }
}

fn post(id: u32, category: &str, date: &str, caption: &str, image_count: usize, image: Option<&str>) -> Post {
    let image = image.unwrap_or("/placeholder.svg");

    Post {
        id,
        category: CategoryId::new(category),
        date: PostDate::new(date),
        caption: caption.to_string(),
        images: vec![image.to_string(); image_count],
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn data_file(timeline: &str, posts: &str) -> String {
        format!(
            r#"{{
                "profile": {{ "name": "Test", "tagline": "Tester" }},
                "timeline": [{}],
                "posts": [{}]
            }}"#,
            timeline, posts
        )
    }

    #[test]
    fn test_sample_store_shape() {
        let store = PostStore::sample();

        assert_eq!(store.posts().len(), 6);
        assert_eq!(store.categories().len(), 4);
        assert_eq!(store.profile().name, "Mariam Abalo-Toga");
        assert!(store.posts().iter().all(|p| !p.images.is_empty()));
        assert!(store.posts().iter().all(|p| p.date.is_parseable()));
        assert!(store.orphaned_posts().is_empty());
    }

    #[test]
    fn test_sample_passes_validation() {
        let sample = PostStore::sample();
        let validated = PostStore::new(
            sample.profile().clone(),
            sample.categories().to_vec(),
            sample.posts().to_vec(),
        );

        assert!(validated.is_ok());
    }

    #[test]
    fn test_lookups() {
        let store = PostStore::sample();

        assert_eq!(store.category("greece-2024").map(|c| c.label.as_str()), Some("Greece"));
        assert!(store.category("mars-2099").is_none());
        assert_eq!(store.post(3).map(|p| p.caption.as_str()), Some("Sunset in Santorini"));
        assert!(store.post(42).is_none());
        assert!(store.is_known_category("paris-2023"));
    }

    #[test]
    fn test_from_json_accepts_legacy_field_names() {
        let json = data_file(
            r#"{ "id": "rome", "label": "Rome", "date": "Spring 2025" }"#,
            r#"{ "id": 1, "category": "rome", "date": "May 1, 2025", "content": "Colosseum", "images": ["/a.jpg"] }"#,
        );

        let store = PostStore::from_json(&json).unwrap();
        let category = &store.categories()[0];
        assert_eq!(category.subtitle, "Spring 2025");
        assert_eq!(category.image, "/placeholder.svg");
        assert_eq!(store.posts()[0].caption, "Colosseum");
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let json = data_file(
            r#"{ "id": "rome", "label": "Rome", "subtitle": "A" },
               { "id": "rome", "label": "Rome again", "subtitle": "B" }"#,
            "",
        );

        match PostStore::from_json(&json) {
            Err(StoreError::DuplicateCategory(id)) => assert_eq!(id.as_str(), "rome"),
            other => panic!("expected duplicate category error, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_post_rejected() {
        let json = data_file(
            "",
            r#"{ "id": 7, "category": "x", "date": "May 1, 2025", "caption": "a", "images": ["/a.jpg"] },
               { "id": 7, "category": "x", "date": "May 2, 2025", "caption": "b", "images": ["/b.jpg"] }"#,
        );

        assert!(matches!(PostStore::from_json(&json), Err(StoreError::DuplicatePost(7))));
    }

    #[test]
    fn test_empty_images_rejected() {
        let json = data_file(
            "",
            r#"{ "id": 9, "category": "x", "date": "May 1, 2025", "caption": "a", "images": [] }"#,
        );

        assert!(matches!(PostStore::from_json(&json), Err(StoreError::EmptyImages(9))));
    }

    #[test]
    fn test_orphaned_posts_are_kept() {
        let json = data_file(
            r#"{ "id": "rome", "label": "Rome", "subtitle": "2025" }"#,
            r#"{ "id": 1, "category": "rome", "date": "May 1, 2025", "caption": "a", "images": ["/a.jpg"] },
               { "id": 2, "category": "atlantis", "date": "May 2, 2025", "caption": "b", "images": ["/b.jpg"] }"#,
        );

        let store = PostStore::from_json(&json).unwrap();
        assert_eq!(store.posts().len(), 2);

        let orphans = store.orphaned_posts();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].id, 2);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(PostStore::from_json("{ not json"), Err(StoreError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = PostStore::load(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(StoreError::Io { .. })));
    }

    #[test]
    fn test_json_round_trip_preserves_store() {
        let store = PostStore::sample();
        let json = store.to_json().unwrap();
        let back = PostStore::from_json(&json).unwrap();

        assert_eq!(back.posts(), store.posts());
        assert_eq!(back.categories(), store.categories());
        assert_eq!(back.profile(), store.profile());
    }
}
