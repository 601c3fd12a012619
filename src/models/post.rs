//! Post model
//!
//! This module provides:
//! - `Post` entity as stored in the content store
//! - `PostRecord`, a post plus whatever relations and annotations the
//!   executing `PostQuery` asked for

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Author, TagWithCount};

/// Post entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    /// Unique identifier
    pub id: i64,
    /// Post title
    pub title: String,
    /// Full post text
    pub text: String,
    /// Unique, stable URL slug
    pub slug: String,
    /// Author user ID
    pub author_id: i64,
    /// Stored image name, relative to the media directory
    pub image: Option<String>,
    /// Publication timestamp
    pub published_at: DateTime<Utc>,
}

/// A post as returned by the content store.
///
/// `None` means the relation or annotation was not requested by the query,
/// which is different from an empty tag list or a zero count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    #[serde(flatten)]
    pub post: Post,
    pub author: Option<Author>,
    pub tags: Option<Vec<TagWithCount>>,
    pub comments_count: Option<i64>,
    pub likes_count: Option<i64>,
}

