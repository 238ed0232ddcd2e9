// 🔀 Feed Pipeline - sort → filter → group
//
// Pure functions over the store and the current selection. Nothing here
// allocates posts; every output borrows from the PostStore.
//
// 1. Sort posts newest first (stable: equal dates keep authoring order)
// 2. Filter by the active selection
// 3. Group by exact date string, groups newest first

use crate::date::PostDate;
use crate::selection::{Filter, SelectionState};
use crate::store::{Category, CategoryId, Post, PostStore};
use serde::Serialize;
use std::collections::HashMap;

// ============================================================================
// OUTPUT TYPES
// ============================================================================

/// Posts sharing one exact date string
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateGroup<'a> {
    pub date: &'a PostDate,
    pub posts: Vec<&'a Post>,
}

/// Everything the presentation layer needs for one render
#[derive(Debug, Clone, Serialize)]
pub struct Feed<'a> {
    pub header_label: String,
    pub button_label: String,
    pub active_category: Option<CategoryId>,
    pub groups: Vec<DateGroup<'a>>,
}

impl<'a> Feed<'a> {
    pub fn post_count(&self) -> usize {
        self.groups.iter().map(|g| g.posts.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Posts in display order, groups flattened
    pub fn posts(&self) -> impl Iterator<Item = &'a Post> + '_ {
        self.groups.iter().flat_map(|g| g.posts.iter().copied())
    }
}

// ============================================================================
// PIPELINE STEPS
// ============================================================================

/// Step 1: newest first, stable for equal (or equally unparseable) dates
pub fn sort_by_date_desc(posts: &[Post]) -> Vec<&Post> {
    let mut sorted: Vec<&Post> = posts.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp_chrono(&a.date));
    sorted
}

/// Step 2: keep the posts the filter selects
pub fn filter_posts<'a>(posts: Vec<&'a Post>, filter: &Filter) -> Vec<&'a Post> {
    match filter {
        Filter::AllPosts => posts,
        Filter::ByCategory(id) => posts.into_iter().filter(|p| &p.category == id).collect(),
        Filter::ByDate(date) => posts
            .into_iter()
            .filter(|p| p.date == date.as_str())
            .collect(),
    }
}

/// Step 3: partition by exact date string in first-seen order, then order the
/// groups newest first
pub fn group_by_date<'a>(posts: Vec<&'a Post>) -> Vec<DateGroup<'a>> {
    let mut groups: Vec<DateGroup<'a>> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for post in posts {
        match index.get(post.date.as_str()) {
            Some(&i) => groups[i].posts.push(post),
            None => {
                index.insert(post.date.as_str(), groups.len());
                groups.push(DateGroup {
                    date: &post.date,
                    posts: vec![post],
                });
            }
        }
    }

    groups.sort_by(|a, b| b.date.cmp_chrono(a.date));
    groups
}

/// Full pipeline for one (store, selection) pair
pub fn build_feed<'a>(store: &'a PostStore, selection: &SelectionState) -> Feed<'a> {
    let sorted = sort_by_date_desc(store.posts());
    let filtered = filter_posts(sorted, selection.filter());
    let groups = group_by_date(filtered);

    tracing::debug!(
        filter = ?selection.filter(),
        groups = groups.len(),
        "feed built"
    );

    Feed {
        header_label: selection.header_label().to_string(),
        button_label: selection.button_label().to_string(),
        active_category: selection.active_category().cloned(),
        groups,
    }
}

// ============================================================================
// SIDEBAR HELPERS
// ============================================================================

/// Distinct post dates, newest first, for the date popover
pub fn available_dates(store: &PostStore) -> Vec<&str> {
    let mut dates: Vec<&str> = Vec::new();

    for post in sort_by_date_desc(store.posts()) {
        if !dates.contains(&post.date.as_str()) {
            dates.push(post.date.as_str());
        }
    }

    dates
}

/// Timeline entries with how many posts each one selects
pub fn category_counts(store: &PostStore) -> Vec<(&Category, usize)> {
    store
        .categories()
        .iter()
        .map(|c| {
            let count = store.posts().iter().filter(|p| p.category == c.id).count();
            (c, count)
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Profile;

    fn make_post(id: u32, category: &str, date: &str) -> Post {
        Post {
            id,
            category: CategoryId::new(category),
            date: PostDate::new(date),
            caption: format!("post {}", id),
            images: vec!["/placeholder.svg".to_string()],
        }
    }

    fn make_store(posts: Vec<Post>) -> PostStore {
        PostStore::new(Profile::default(), Vec::new(), posts).unwrap()
    }

    fn dates(feed: &Feed) -> Vec<String> {
        feed.groups.iter().map(|g| g.date.to_string()).collect()
    }

    fn ids(feed: &Feed) -> Vec<u32> {
        feed.posts().map(|p| p.id).collect()
    }

    #[test]
    fn test_sort_descending_by_parsed_date() {
        let posts = vec![
            make_post(1, "a", "December 15, 2024"),
            make_post(2, "a", "December 18, 2024"),
            make_post(3, "a", "July 5, 2024"),
        ];

        let sorted: Vec<&str> = sort_by_date_desc(&posts).iter().map(|p| p.date.as_str()).collect();
        assert_eq!(sorted, vec!["December 18, 2024", "December 15, 2024", "July 5, 2024"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_dates() {
        let posts = vec![
            make_post(1, "a", "May 1, 2024"),
            make_post(2, "a", "June 1, 2024"),
            make_post(3, "a", "May 1, 2024"),
            make_post(4, "a", "2024-05-01"), // same day, different string
        ];

        let sorted: Vec<u32> = sort_by_date_desc(&posts).iter().map(|p| p.id).collect();
        assert_eq!(sorted, vec![2, 1, 3, 4]);
    }

    #[test]
    fn test_unparseable_dates_sink_to_the_end() {
        let posts = vec![
            make_post(1, "a", "someday"),
            make_post(2, "a", "March 1, 2020"),
            make_post(3, "a", "never"),
            make_post(4, "a", "March 1, 2024"),
        ];

        let sorted: Vec<u32> = sort_by_date_desc(&posts).iter().map(|p| p.id).collect();
        assert_eq!(sorted, vec![4, 2, 1, 3]);
    }

    #[test]
    fn test_all_posts_feed() {
        let store = PostStore::sample();
        let feed = build_feed(&store, &SelectionState::new());

        assert_eq!(feed.post_count(), store.posts().len());
        assert_eq!(feed.header_label, "Photo Diary");
        assert_eq!(feed.button_label, "All Diaries");
        assert!(feed.active_category.is_none());
        assert_eq!(
            dates(&feed),
            vec![
                "December 18, 2024",
                "December 15, 2024",
                "July 10, 2024",
                "July 5, 2024",
                "April 3, 2024",
                "October 12, 2023",
            ]
        );
        assert_eq!(ids(&feed), vec![2, 1, 4, 3, 5, 6]);
    }

    #[test]
    fn test_feed_never_duplicates_or_fabricates() {
        let store = PostStore::sample();
        let mut selections = vec![SelectionState::new()];

        for category in store.categories() {
            let mut s = SelectionState::new();
            s.select_timeline(category);
            selections.push(s);
        }
        for date in available_dates(&store) {
            let mut s = SelectionState::new();
            s.select_date(Some(date));
            selections.push(s);
        }

        for selection in &selections {
            let feed = build_feed(&store, selection);
            let mut seen = ids(&feed);
            let total = seen.len();
            seen.sort();
            seen.dedup();

            assert_eq!(seen.len(), total, "duplicate posts for {:?}", selection.filter());
            assert!(seen.iter().all(|id| store.post(*id).is_some()));
        }
    }

    #[test]
    fn test_category_filter_greece() {
        let store = PostStore::sample();
        let mut selection = SelectionState::new();
        selection.select_category("greece-2024", "Greece");

        let feed = build_feed(&store, &selection);

        assert_eq!(feed.post_count(), 2);
        assert_eq!(dates(&feed), vec!["July 10, 2024", "July 5, 2024"]);
        assert!(feed.posts().all(|p| p.category.as_str() == "greece-2024"));
        assert_eq!(feed.header_label, "Greece");
        assert_eq!(feed.active_category, Some(CategoryId::new("greece-2024")));
    }

    #[test]
    fn test_unknown_category_yields_no_groups() {
        let store = PostStore::sample();
        let mut selection = SelectionState::new();
        selection.select_category("atlantis", "Atlantis");

        let feed = build_feed(&store, &selection);
        assert!(feed.is_empty());
        assert_eq!(feed.post_count(), 0);
    }

    #[test]
    fn test_date_filter_is_exact_string_match() {
        let store = make_store(vec![
            make_post(1, "a", "July 5, 2024"),
            make_post(2, "b", "2024-07-05"),
            make_post(3, "a", "July 5, 2024"),
        ]);

        let mut selection = SelectionState::new();
        selection.select_date(Some("July 5, 2024"));
        let feed = build_feed(&store, &selection);

        assert_eq!(feed.groups.len(), 1);
        assert_eq!(ids(&feed), vec![1, 3]);
        assert_eq!(feed.header_label, "Posts from July 5, 2024");
    }

    #[test]
    fn test_absent_date_yields_no_groups() {
        let store = PostStore::sample();
        let mut selection = SelectionState::new();
        selection.select_date(Some("February 30, 2024"));

        assert!(build_feed(&store, &selection).is_empty());
    }

    #[test]
    fn test_orphaned_post_only_visible_without_category_filter() {
        let store = make_store(vec![make_post(1, "atlantis", "May 1, 2024")]);

        assert_eq!(build_feed(&store, &SelectionState::new()).post_count(), 1);

        let mut by_date = SelectionState::new();
        by_date.select_date(Some("May 1, 2024"));
        assert_eq!(build_feed(&store, &by_date).post_count(), 1);
    }

    #[test]
    fn test_groups_keep_first_seen_order_within_date() {
        let store = make_store(vec![
            make_post(10, "a", "May 1, 2024"),
            make_post(11, "b", "May 2, 2024"),
            make_post(12, "b", "May 1, 2024"),
        ]);

        let feed = build_feed(&store, &SelectionState::new());
        assert_eq!(dates(&feed), vec!["May 2, 2024", "May 1, 2024"]);
        assert_eq!(ids(&feed), vec![11, 10, 12]);
    }

    #[test]
    fn test_repeated_selection_is_idempotent() {
        let store = PostStore::sample();

        let mut once = SelectionState::new();
        once.select_date(Some("April 3, 2024"));

        let mut twice = once.clone();
        twice.select_date(Some("April 3, 2024"));

        assert_eq!(build_feed(&store, &once).groups, build_feed(&store, &twice).groups);
    }

    #[test]
    fn test_available_dates_descending_and_distinct() {
        let store = make_store(vec![
            make_post(1, "a", "May 1, 2024"),
            make_post(2, "a", "June 1, 2024"),
            make_post(3, "a", "May 1, 2024"),
        ]);

        assert_eq!(available_dates(&store), vec!["June 1, 2024", "May 1, 2024"]);
    }

    #[test]
    fn test_category_counts() {
        let store = PostStore::sample();
        let counts: Vec<(&str, usize)> = category_counts(&store)
            .into_iter()
            .map(|(c, n)| (c.id.as_str(), n))
            .collect();

        assert_eq!(
            counts,
            vec![("japan-2024", 2), ("greece-2024", 2), ("nyc-2024", 1), ("paris-2023", 1)]
        );
    }

    #[test]
    fn test_feed_serializes_for_api() {
        let store = PostStore::sample();
        let mut selection = SelectionState::new();
        selection.select_category("nyc-2024", "New York City");

        let json = serde_json::to_value(build_feed(&store, &selection)).unwrap();

        assert_eq!(json["header_label"], "New York City");
        assert_eq!(json["active_category"], "nyc-2024");
        assert_eq!(json["groups"][0]["date"], "April 3, 2024");
        assert_eq!(json["groups"][0]["posts"][0]["id"], 5);
    }
}
