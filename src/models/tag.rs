//! Tag model
//!
//! Tags are matched by their exact, unique title. Popularity is the number
//! of posts carrying the tag, annotated by the store on every tag query.

use serde::{Deserialize, Serialize};

/// Tag entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    /// Unique identifier
    pub id: i64,
    /// Unique tag title
    pub title: String,
}

impl Tag {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// Tag annotated with the number of posts that reference it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagWithCount {
    /// The tag itself
    #[serde(flatten)]
    pub tag: Tag,
    /// Number of posts with this tag
    pub posts_count: i64,
}

impl TagWithCount {
    /// Create a new TagWithCount
    pub fn new(tag: Tag, posts_count: i64) -> Self {
        Self { tag, posts_count }
    }
}
