// 🎚️ Selection State - Which slice of the diary the viewer is looking at
//
// Three states, one active at a time:
//   AllPosts            (initial)
//   ByCategory(id)      sidebar timeline entry clicked
//   ByDate(date)        date picked from the popover
//
// Every mutation goes through select_category / select_date / reset, which
// also keep the header and button labels in step.

use crate::store::{Category, CategoryId};
use serde::{Deserialize, Serialize};

/// Header shown when no filter is active
pub const DEFAULT_HEADER: &str = "Photo Diary";

/// Date popover button label when no date is picked
pub const ALL_DIARIES: &str = "All Diaries";

/// Label used for a date filter in both the header and the button
pub fn date_label(date: &str) -> String {
    format!("Posts from {}", date)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Filter {
    AllPosts,
    ByCategory(CategoryId),
    /// Exact date string, compared by string equality
    ByDate(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    filter: Filter,
    header_label: String,
    button_label: String,
}

impl SelectionState {
    pub fn new() -> Self {
        SelectionState {
            filter: Filter::AllPosts,
            header_label: DEFAULT_HEADER.to_string(),
            button_label: ALL_DIARIES.to_string(),
        }
    }

    /// Filter by timeline category.
    ///
    /// The header takes the category label; the date button label is left as
    /// it was, so a previous "Posts from ..." label stays visible.
    pub fn select_category(&mut self, id: impl Into<CategoryId>, label: impl Into<String>) {
        let id = id.into();
        tracing::debug!(category = %id, "selection: category");

        self.filter = Filter::ByCategory(id);
        self.header_label = label.into();
    }

    /// Select a sidebar timeline entry using its own id and label
    pub fn select_timeline(&mut self, category: &Category) {
        self.select_category(category.id.clone(), category.label.clone());
    }

    /// Filter by exact date, or clear the filter with `None` ("All Diaries")
    pub fn select_date(&mut self, date: Option<&str>) {
        match date {
            Some(date) => {
                tracing::debug!(date, "selection: date");

                let label = date_label(date);
                self.filter = Filter::ByDate(date.to_string());
                self.header_label = label.clone();
                self.button_label = label;
            }
            None => self.reset(),
        }
    }

    /// Back to every post (title click)
    pub fn reset(&mut self) {
        tracing::debug!("selection: reset");

        self.filter = Filter::AllPosts;
        self.header_label = DEFAULT_HEADER.to_string();
        self.button_label = ALL_DIARIES.to_string();
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn header_label(&self) -> &str {
        &self.header_label
    }

    pub fn button_label(&self) -> &str {
        &self.button_label
    }

    /// Category to highlight in the sidebar
    pub fn active_category(&self) -> Option<&CategoryId> {
        match &self.filter {
            Filter::ByCategory(id) => Some(id),
            _ => None,
        }
    }

    pub fn active_date(&self) -> Option<&str> {
        match &self.filter {
            Filter::ByDate(date) => Some(date.as_str()),
            _ => None,
        }
    }

    pub fn is_all(&self) -> bool {
        self.filter == Filter::AllPosts
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
