//! Read model service
//!
//! Builds the documents for the blog's pages:
//! - Home: most popular posts, freshest posts, popular tags
//! - Post detail: one post with comments, plus sidebar lists
//! - Tag filter: posts carrying a tag, plus sidebar lists
//! - Contacts: empty document
//!
//! Lookups by slug or tag title that match nothing yield
//! `ViewOutcome::RedirectHome`. Everything else that goes wrong is a
//! `ReadModelError` and is not recovered here.

use crate::config::MediaConfig;
use crate::db::repositories::{CommentRepository, PostRepository, TagRepository};
use crate::models::{
    ContactsPage, HomePage, PostDetailPage, PostQuery, PostSummary, Relations, TagFilterPage,
    TagQuery, TagSummary, ViewOutcome, Window,
};
use std::sync::Arc;

use super::serialize::{serialize_post, serialize_post_detail, serialize_tag};

/// Length of every "top N" sidebar list
pub const TOP_N: usize = 5;

/// Maximum number of posts listed on a tag page
pub const TAG_PAGE_POSTS: usize = 20;

/// Popular tags shown next to a post: everything after the top five.
///
/// Every other page shows the first five instead.
pub const DETAIL_POPULAR_TAGS: Window = Window::skip(TOP_N);

/// Error types for read model operations
#[derive(Debug, thiserror::Error)]
pub enum ReadModelError {
    /// A relation the serializer reads was not attached, or is empty where
    /// one entry is required
    #[error("Missing related entity: {0}")]
    MissingRelation(&'static str),

    /// An aggregate the store should have annotated is absent
    #[error("Missing annotated field: {0}")]
    MissingAnnotation(&'static str),

    /// Content store failure
    #[error("Content store error: {0}")]
    Store(#[from] anyhow::Error),
}

/// Read model over the content store
pub struct ReadModelService {
    posts: Arc<dyn PostRepository>,
    tags: Arc<dyn TagRepository>,
    comments: Arc<dyn CommentRepository>,
    media: MediaConfig,
}

impl ReadModelService {
    /// Create a new read model service
    ///
    /// # Arguments
    /// * `posts` - Post repository
    /// * `tags` - Tag repository
    /// * `comments` - Comment repository
    /// * `media` - Where post images are published
    pub fn new(
        posts: Arc<dyn PostRepository>,
        tags: Arc<dyn TagRepository>,
        comments: Arc<dyn CommentRepository>,
        media: MediaConfig,
    ) -> Self {
        Self {
            posts,
            tags,
            comments,
            media,
        }
    }

    /// Relations every post card needs
    fn card_relations() -> Relations {
        Relations::none()
            .with_author()
            .with_tags()
            .with_comment_count()
    }

    async fn post_cards(&self, query: &PostQuery) -> Result<Vec<PostSummary>, ReadModelError> {
        let records = self.posts.find(query).await?;
        records
            .iter()
            .map(|record| serialize_post(record, &self.media))
            .collect()
    }

    async fn tag_list(&self, query: &TagQuery) -> Result<Vec<TagSummary>, ReadModelError> {
        let tags = self.tags.find(query).await?;
        Ok(tags.iter().map(serialize_tag).collect())
    }

    /// Top posts by popularity, ready for cards
    fn popular_cards_query() -> PostQuery {
        PostQuery::popular()
            .relations(Self::card_relations())
            .window(Window::first(TOP_N))
    }

    /// Document for the home page
    pub async fn home(&self) -> Result<HomePage, ReadModelError> {
        let most_popular_posts = self.post_cards(&Self::popular_cards_query()).await?;

        let fresh = PostQuery::fresh()
            .relations(Self::card_relations())
            .window(Window::first(TOP_N));
        let page_posts = self.post_cards(&fresh).await?;

        let popular_tags = self
            .tag_list(&TagQuery::popular().window(Window::first(TOP_N)))
            .await?;

        Ok(HomePage {
            most_popular_posts,
            page_posts,
            popular_tags,
        })
    }

    /// Document for a post page, or a redirect if the slug is unknown.
    ///
    /// The lookup goes through the popularity-ranked query, the same one
    /// that feeds the sidebar's popular posts.
    pub async fn post_detail(
        &self,
        slug: &str,
    ) -> Result<ViewOutcome<PostDetailPage>, ReadModelError> {
        let scope = PostQuery::popular().relations(Relations::none().with_author().with_tags());

        let Some(record) = self.posts.get_by_slug(&scope, slug).await? else {
            tracing::debug!(slug, "Unknown post slug, redirecting home");
            return Ok(ViewOutcome::RedirectHome);
        };

        let comments = self.comments.list_for_post(record.post.id).await?;
        let post = serialize_post_detail(&record, &comments, &self.media)?;

        let popular_tags = self
            .tag_list(&TagQuery::popular().window(DETAIL_POPULAR_TAGS))
            .await?;

        let sidebar = scope
            .relations(Relations::none().with_comment_count())
            .window(Window::first(TOP_N));
        let most_popular_posts = self.post_cards(&sidebar).await?;

        Ok(ViewOutcome::Document(PostDetailPage {
            post,
            popular_tags,
            most_popular_posts,
        }))
    }

    /// Document for a tag page, or a redirect if no tag has this exact title
    pub async fn tag_filter(
        &self,
        title: &str,
    ) -> Result<ViewOutcome<TagFilterPage>, ReadModelError> {
        let Some(tag) = self.tags.get_by_title(title).await? else {
            tracing::debug!(title, "Unknown tag title, redirecting home");
            return Ok(ViewOutcome::RedirectHome);
        };

        let popular_tags = self
            .tag_list(&TagQuery::popular().window(Window::first(TOP_N)))
            .await?;
        let most_popular_posts = self.post_cards(&Self::popular_cards_query()).await?;

        let tagged = PostQuery::tagged(tag.id)
            .relations(Self::card_relations())
            .window(Window::first(TAG_PAGE_POSTS));
        let posts = self.post_cards(&tagged).await?;

        Ok(ViewOutcome::Document(TagFilterPage {
            tag: tag.title,
            popular_tags,
            posts,
            most_popular_posts,
        }))
    }

    /// Document for the contacts page
    pub fn contacts(&self) -> ContactsPage {
        ContactsPage::default()
    }
}
