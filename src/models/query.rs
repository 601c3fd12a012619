//! Query specifications
//!
//! A query is a plain value describing ranking, filtering, eager loading and
//! slicing. Repositories execute it in a single pass; nothing is built up
//! through a mutable chain on a global manager.

/// How posts are ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostRanking {
    /// Most liked first; ties keep the oldest id first
    Popular,
    /// Newest `published_at` first, which is also the store's natural order
    #[default]
    Fresh,
}

/// Related data to attach in the same query pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Relations {
    pub author: bool,
    /// Tags, each annotated with its post count
    pub tags: bool,
    pub comment_count: bool,
    pub like_count: bool,
}

impl Relations {
    /// Attach nothing
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_author(mut self) -> Self {
        self.author = true;
        self
    }

    pub fn with_tags(mut self) -> Self {
        self.tags = true;
        self
    }

    pub fn with_comment_count(mut self) -> Self {
        self.comment_count = true;
        self
    }

    pub fn with_like_count(mut self) -> Self {
        self.like_count = true;
        self
    }
}

/// Row restriction for post queries
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostFilter {
    /// Only posts carrying this tag
    pub tag_id: Option<i64>,
    /// Only the post with this slug
    pub slug: Option<String>,
}

/// Result-set slice, applied by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window {
    pub offset: usize,
    pub limit: Option<usize>,
}

impl Window {
    /// Everything
    pub const fn all() -> Self {
        Self {
            offset: 0,
            limit: None,
        }
    }

    /// First `n` rows, `[:n]`
    pub const fn first(n: usize) -> Self {
        Self {
            offset: 0,
            limit: Some(n),
        }
    }

    /// All rows after the first `n`, `[n:]`
    pub const fn skip(n: usize) -> Self {
        Self {
            offset: n,
            limit: None,
        }
    }
}

/// A complete post query
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostQuery {
    pub ranking: PostRanking,
    pub filter: PostFilter,
    pub relations: Relations,
    pub window: Window,
}

impl PostQuery {
    /// Posts ranked by like count; the like count is always attached
    pub fn popular() -> Self {
        Self {
            ranking: PostRanking::Popular,
            relations: Relations::none().with_like_count(),
            ..Self::default()
        }
    }

    /// Posts ranked by recency
    pub fn fresh() -> Self {
        Self {
            ranking: PostRanking::Fresh,
            ..Self::default()
        }
    }

    /// Posts carrying a tag, newest first
    pub fn tagged(tag_id: i64) -> Self {
        Self {
            filter: PostFilter {
                tag_id: Some(tag_id),
                slug: None,
            },
            ..Self::default()
        }
    }

    /// Extend the eager-load set
    pub fn relations(mut self, relations: Relations) -> Self {
        self.relations.author |= relations.author;
        self.relations.tags |= relations.tags;
        self.relations.comment_count |= relations.comment_count;
        self.relations.like_count |= relations.like_count;
        self
    }

    pub fn window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    /// Narrow the query to a single slug, keeping ranking and relations
    pub fn with_slug(mut self, slug: &str) -> Self {
        self.filter.slug = Some(slug.to_string());
        self.window = Window::first(1);
        self
    }

    /// Whether the like count must be computed, either for ranking or output
    pub fn needs_like_count(&self) -> bool {
        self.relations.like_count || self.ranking == PostRanking::Popular
    }
}

/// A complete tag query.
///
/// Tags are always ranked by the number of posts carrying them, ties by
/// title, and every row carries its post count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TagQuery {
    pub window: Window,
}

impl TagQuery {
    /// All tags, most referenced first
    pub fn popular() -> Self {
        Self {
            window: Window::all(),
        }
    }

    pub fn window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }
}
