//! Comment repository
//!
//! Comments are read per post, oldest first, with their author joined.

use crate::config::DatabaseDriver;
use crate::db::pool::{mysql, sqlite};
use crate::db::DynDatabasePool;
use crate::models::{Author, Comment, CommentWithAuthor};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;

/// Comment repository trait
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Comments of a post in store order, authors attached
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentWithAuthor>>;
}

/// SQLx-based comment repository implementation
pub struct SqlxCommentRepository {
    pool: DynDatabasePool,
}

impl SqlxCommentRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CommentRepository> {
        Arc::new(Self::new(pool))
    }
}

const LIST_FOR_POST_SQL: &str = r#"
    SELECT c.id, c.post_id, c.author_id, c.text, c.published_at, u.username
    FROM comments c
    JOIN users u ON u.id = c.author_id
    WHERE c.post_id = ?
    ORDER BY c.published_at ASC, c.id ASC
"#;

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentWithAuthor>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(LIST_FOR_POST_SQL)
                    .bind(post_id)
                    .fetch_all(sqlite(&self.pool)?)
                    .await
                    .context("Failed to list comments")?;
                rows.iter().map(row_to_comment_sqlite).collect()
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(LIST_FOR_POST_SQL)
                    .bind(post_id)
                    .fetch_all(mysql(&self.pool)?)
                    .await
                    .context("Failed to list comments")?;
                rows.iter().map(row_to_comment_mysql).collect()
            }
        }
    }
}

fn row_to_comment_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<CommentWithAuthor> {
    let comment = Comment {
        id: row.try_get("id")?,
        post_id: row.try_get("post_id")?,
        author_id: row.try_get("author_id")?,
        text: row.try_get("text")?,
        published_at: row.try_get("published_at")?,
    };
    let author = Author::new(comment.author_id, row.try_get::<String, _>("username")?);
    Ok(CommentWithAuthor { comment, author })
}

fn row_to_comment_mysql(row: &sqlx::mysql::MySqlRow) -> Result<CommentWithAuthor> {
    let comment = Comment {
        id: row.try_get("id")?,
        post_id: row.try_get("post_id")?,
        author_id: row.try_get("author_id")?,
        text: row.try_get("text")?,
        published_at: row.try_get("published_at")?,
    };
    let author = Author::new(comment.author_id, row.try_get::<String, _>("username")?);
    Ok(CommentWithAuthor { comment, author })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::*;

    #[tokio::test]
    async fn test_list_for_post_in_order_with_authors() {
        let pool = setup_pool().await;
        let repo = SqlxCommentRepository::new(pool.clone());
        let db = pool.as_sqlite().unwrap();

        let alice = create_user(db, "alice").await;
        let bob = create_user(db, "bob").await;
        let post = create_post(db, alice, "hello", "text", None, at(0)).await;
        let other = create_post(db, alice, "other", "text", None, at(0)).await;

        add_comment(db, post, bob, "second", at(20)).await;
        add_comment(db, post, alice, "first", at(10)).await;
        add_comment(db, other, bob, "elsewhere", at(5)).await;

        let comments = repo.list_for_post(post).await.unwrap();
        let seen: Vec<(&str, &str)> = comments
            .iter()
            .map(|c| (c.comment.text.as_str(), c.author.username.as_str()))
            .collect();
        assert_eq!(seen, vec![("first", "alice"), ("second", "bob")]);
    }

    #[tokio::test]
    async fn test_list_for_post_without_comments() {
        let pool = setup_pool().await;
        let repo = SqlxCommentRepository::new(pool);
        assert!(repo.list_for_post(42).await.unwrap().is_empty());
    }
}
