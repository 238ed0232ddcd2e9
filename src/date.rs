// 📅 Post Dates - Display string + chronological key
//
// A post date is shown exactly as written ("December 15, 2024") and matched
// by exact string equality, but ordered by the calendar date it names.
// Parsing happens once, when the value is built.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Formats tried in order when parsing a display date
const DATE_FORMATS: [&str; 4] = [
    "%B %d, %Y", // December 15, 2024
    "%b %d, %Y", // Dec 15, 2024
    "%Y-%m-%d",  // 2024-12-15
    "%m/%d/%Y",  // 12/15/2024
];

/// Parse a display date into a calendar date
pub fn parse_display_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

// ============================================================================
// POST DATE
// ============================================================================

/// Human-readable post date with its parsed calendar date.
///
/// Equality and hashing use the raw string only: two posts share a date group
/// when their strings match, never because they name the same day.
///
/// Ordering uses [`PostDate::chrono_key`]: every parseable date is later than
/// every unparseable one, so unparseable dates sink to the end of a
/// newest-first feed instead of landing in an arbitrary position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PostDate {
    raw: String,
    parsed: Option<NaiveDate>,
}

impl PostDate {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = parse_display_date(&raw);

        PostDate { raw, parsed }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn parsed(&self) -> Option<NaiveDate> {
        self.parsed
    }

    pub fn is_parseable(&self) -> bool {
        self.parsed.is_some()
    }

    /// Comparable chronological key (`None` sorts first)
    pub fn chrono_key(&self) -> Option<NaiveDate> {
        self.parsed
    }

    /// Compare two dates chronologically, ignoring the display string
    pub fn cmp_chrono(&self, other: &PostDate) -> Ordering {
        self.chrono_key().cmp(&other.chrono_key())
    }
}

impl PartialEq for PostDate {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for PostDate {}

impl std::hash::Hash for PostDate {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl PartialEq<str> for PostDate {
    fn eq(&self, other: &str) -> bool {
        self.raw == other
    }
}

impl PartialEq<&str> for PostDate {
    fn eq(&self, other: &&str) -> bool {
        self.raw == *other
    }
}

impl From<String> for PostDate {
    fn from(raw: String) -> Self {
        PostDate::new(raw)
    }
}

impl From<&str> for PostDate {
    fn from(raw: &str) -> Self {
        PostDate::new(raw)
    }
}

impl From<PostDate> for String {
    fn from(date: PostDate) -> Self {
        date.raw
    }
}

impl fmt::Display for PostDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// ============================================================================
// TESTS
// ============================================================================
