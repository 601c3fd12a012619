//! View documents
//!
//! Fully materialized, serializable documents produced per request by the
//! read model. Field names are the template variable names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tag as shown on pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSummary {
    pub title: String,
    pub posts_with_tag: i64,
}

/// Post card with a teaser of the text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub title: String,
    /// First 200 characters of the text
    pub teaser_text: String,
    pub author: String,
    pub comments_amount: i64,
    /// Always present; `null` when the post has no image
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub slug: String,
    pub tags: Vec<TagSummary>,
    pub first_tag_title: String,
}

/// Comment as shown under a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    pub text: String,
    pub published_at: DateTime<Utc>,
    pub author: String,
}

/// Full post with its comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetail {
    pub title: String,
    pub text: String,
    pub author: String,
    pub comments: Vec<CommentView>,
    pub likes_amount: i64,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub slug: String,
    pub tags: Vec<TagSummary>,
}

/// Document for `/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomePage {
    pub most_popular_posts: Vec<PostSummary>,
    pub page_posts: Vec<PostSummary>,
    pub popular_tags: Vec<TagSummary>,
}

/// Document for `/posts/{slug}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetailPage {
    pub post: PostDetail,
    pub popular_tags: Vec<TagSummary>,
    pub most_popular_posts: Vec<PostSummary>,
}

/// Document for `/tags/{title}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFilterPage {
    pub tag: String,
    pub popular_tags: Vec<TagSummary>,
    pub posts: Vec<PostSummary>,
    pub most_popular_posts: Vec<PostSummary>,
}

/// Document for `/contacts`; intentionally empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactsPage {}

/// Outcome of a view that looks something up by an untrusted key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewOutcome<T> {
    /// The document to render
    Document(T),
    /// Nothing matched; send the reader to the home page
    RedirectHome,
}

impl<T> ViewOutcome<T> {
    /// The document, if one was produced
    pub fn document(self) -> Option<T> {
        match self {
            Self::Document(doc) => Some(doc),
            Self::RedirectHome => None,
        }
    }
}
