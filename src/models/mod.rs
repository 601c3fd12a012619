//! Data models
//!
//! This module contains the data structures used by the blog read model:
//! - Content store entities (Post, Tag, Comment, Author)
//! - Query specifications executed by the repositories
//! - View documents handed to templates and JSON responses

mod comment;
mod document;
mod post;
mod query;
mod tag;
mod user;

pub use comment::{Comment, CommentWithAuthor};
pub use document::{
    CommentView, ContactsPage, HomePage, PostDetail, PostDetailPage, PostSummary, TagFilterPage,
    TagSummary, ViewOutcome,
};
pub use post::{Post, PostRecord};
pub use query::{PostFilter, PostQuery, PostRanking, Relations, TagQuery, Window};
pub use tag::{Tag, TagWithCount};
pub use user::Author;
