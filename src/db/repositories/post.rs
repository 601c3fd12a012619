//! Post repository
//!
//! Executes `PostQuery` specifications. Author, comment count and like count
//! are joined or annotated in the main statement; tags for the whole page
//! are fetched with one batched query. No per-row follow-up queries.

use crate::config::DatabaseDriver;
use crate::db::pool::{mysql, sqlite};
use crate::db::DynDatabasePool;
use crate::models::{Author, Post, PostQuery, PostRanking, PostRecord};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

use super::tag::{SqlxTagRepository, TagRepository};
use super::{bind_mysql, bind_sqlite, push_window, SqlValue};

/// Post repository trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Execute a post query
    async fn find(&self, query: &PostQuery) -> Result<Vec<PostRecord>>;

    /// Look up exactly one post by slug within the scope of `query`.
    ///
    /// Ranking and relations of `query` are kept; its window is replaced.
    async fn get_by_slug(&self, query: &PostQuery, slug: &str) -> Result<Option<PostRecord>> {
        let scoped = query.clone().with_slug(slug);
        Ok(self.find(&scoped).await?.into_iter().next())
    }
}

/// SQLx-based post repository implementation
pub struct SqlxPostRepository {
    pool: DynDatabasePool,
    tags: SqlxTagRepository,
}

impl SqlxPostRepository {
    /// Create a new SQLx post repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self {
            tags: SqlxTagRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn PostRepository> {
        Arc::new(Self::new(pool))
    }

    async fn attach_tags(&self, records: &mut [PostRecord]) -> Result<()> {
        let ids: Vec<i64> = records.iter().map(|r| r.post.id).collect();
        let mut by_post = self.tags.list_for_posts(&ids).await?;
        for record in records.iter_mut() {
            record.tags = Some(by_post.remove(&record.post.id).unwrap_or_default());
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn find(&self, query: &PostQuery) -> Result<Vec<PostRecord>> {
        let (sql, params) = build_find_sql(query);
        let mut records = match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                find_posts_sqlite(sqlite(&self.pool)?, query, &sql, &params).await?
            }
            DatabaseDriver::Mysql => {
                find_posts_mysql(mysql(&self.pool)?, query, &sql, &params).await?
            }
        };

        if query.relations.tags && !records.is_empty() {
            self.attach_tags(&mut records).await?;
        }

        Ok(records)
    }
}

fn build_find_sql(query: &PostQuery) -> (String, Vec<SqlValue>) {
    let mut params = Vec::new();
    let mut sql = String::from(
        "SELECT p.id, p.title, p.text, p.slug, p.author_id, p.image, p.published_at",
    );

    if query.relations.author {
        sql.push_str(", u.username AS author_username");
    }
    if query.relations.comment_count {
        sql.push_str(
            ", (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comments_count",
        );
    }
    if query.needs_like_count() {
        sql.push_str(
            ", (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.id) AS likes_count",
        );
    }

    sql.push_str(" FROM posts p");
    if query.relations.author {
        sql.push_str(" JOIN users u ON u.id = p.author_id");
    }
    if let Some(tag_id) = query.filter.tag_id {
        sql.push_str(" JOIN post_tags pt ON pt.post_id = p.id AND pt.tag_id = ?");
        params.push(SqlValue::Int(tag_id));
    }
    if let Some(slug) = &query.filter.slug {
        sql.push_str(" WHERE p.slug = ?");
        params.push(SqlValue::Text(slug.clone()));
    }

    sql.push_str(match query.ranking {
        PostRanking::Popular => " ORDER BY likes_count DESC, p.id ASC",
        PostRanking::Fresh => " ORDER BY p.published_at DESC, p.id DESC",
    });

    push_window(&mut sql, &mut params, &query.window);
    (sql, params)
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn find_posts_sqlite(
    pool: &SqlitePool,
    query: &PostQuery,
    sql: &str,
    params: &[SqlValue],
) -> Result<Vec<PostRecord>> {
    let rows = bind_sqlite(sqlx::query(sql), params)
        .fetch_all(pool)
        .await
        .context("Failed to query posts")?;

    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        records.push(row_to_record_sqlite(row, query)?);
    }
    Ok(records)
}

fn row_to_record_sqlite(row: &sqlx::sqlite::SqliteRow, query: &PostQuery) -> Result<PostRecord> {
    let post = Post {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        text: row.try_get("text")?,
        slug: row.try_get("slug")?,
        author_id: row.try_get("author_id")?,
        image: row.try_get("image")?,
        published_at: row.try_get("published_at")?,
    };

    let author = if query.relations.author {
        Some(Author::new(post.author_id, row.try_get::<String, _>("author_username")?))
    } else {
        None
    };
    let comments_count = if query.relations.comment_count {
        Some(row.try_get("comments_count")?)
    } else {
        None
    };
    let likes_count = if query.needs_like_count() {
        Some(row.try_get("likes_count")?)
    } else {
        None
    };

    Ok(PostRecord {
        post,
        author,
        tags: None,
        comments_count,
        likes_count,
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn find_posts_mysql(
    pool: &MySqlPool,
    query: &PostQuery,
    sql: &str,
    params: &[SqlValue],
) -> Result<Vec<PostRecord>> {
    let rows = bind_mysql(sqlx::query(sql), params)
        .fetch_all(pool)
        .await
        .context("Failed to query posts")?;

    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        records.push(row_to_record_mysql(row, query)?);
    }
    Ok(records)
}

fn row_to_record_mysql(row: &sqlx::mysql::MySqlRow, query: &PostQuery) -> Result<PostRecord> {
    let post = Post {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        text: row.try_get("text")?,
        slug: row.try_get("slug")?,
        author_id: row.try_get("author_id")?,
        image: row.try_get("image")?,
        published_at: row.try_get("published_at")?,
    };

    let author = if query.relations.author {
        Some(Author::new(post.author_id, row.try_get::<String, _>("author_username")?))
    } else {
        None
    };
    let comments_count = if query.relations.comment_count {
        Some(row.try_get("comments_count")?)
    } else {
        None
    };
    let likes_count = if query.needs_like_count() {
        Some(row.try_get("likes_count")?)
    } else {
        None
    };

    Ok(PostRecord {
        post,
        author,
        tags: None,
        comments_count,
        likes_count,
    })
}
