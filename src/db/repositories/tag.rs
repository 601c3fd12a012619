//! Tag repository
//!
//! This module provides:
//! - `TagRepository` trait defining the interface for tag data access
//! - `SqlxTagRepository` implementing the trait for SQLite and MySQL
//!
//! Every tag row that leaves this module carries its post count.

use crate::config::DatabaseDriver;
use crate::db::pool::{mysql, sqlite};
use crate::db::DynDatabasePool;
use crate::models::{Tag, TagQuery, TagWithCount};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::collections::HashMap;
use std::sync::Arc;

use super::{bind_mysql, bind_sqlite, placeholders, push_window, SqlValue};

/// Tag repository trait
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Execute a tag query
    async fn find(&self, query: &TagQuery) -> Result<Vec<TagWithCount>>;

    /// Exact-match lookup by title
    async fn get_by_title(&self, title: &str) -> Result<Option<Tag>>;

    /// Tags of each given post, keyed by post id, in one query.
    ///
    /// Posts without tags are absent from the map.
    async fn list_for_posts(&self, post_ids: &[i64]) -> Result<HashMap<i64, Vec<TagWithCount>>>;
}

/// SQLx-based tag repository implementation
pub struct SqlxTagRepository {
    pool: DynDatabasePool,
}

impl SqlxTagRepository {
    /// Create a new SQLx tag repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn TagRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl TagRepository for SqlxTagRepository {
    async fn find(&self, query: &TagQuery) -> Result<Vec<TagWithCount>> {
        let (sql, params) = build_find_sql(query);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => find_tags_sqlite(sqlite(&self.pool)?, &sql, &params).await,
            DatabaseDriver::Mysql => find_tags_mysql(mysql(&self.pool)?, &sql, &params).await,
        }
    }

    async fn get_by_title(&self, title: &str) -> Result<Option<Tag>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_tag_by_title_sqlite(sqlite(&self.pool)?, title).await,
            DatabaseDriver::Mysql => get_tag_by_title_mysql(mysql(&self.pool)?, title).await,
        }
    }

    async fn list_for_posts(&self, post_ids: &[i64]) -> Result<HashMap<i64, Vec<TagWithCount>>> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let sql = build_for_posts_sql(post_ids.len());
        let params: Vec<SqlValue> = post_ids.iter().map(|id| SqlValue::Int(*id)).collect();
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                tags_for_posts_sqlite(sqlite(&self.pool)?, &sql, &params).await
            }
            DatabaseDriver::Mysql => tags_for_posts_mysql(mysql(&self.pool)?, &sql, &params).await,
        }
    }
}

fn build_find_sql(query: &TagQuery) -> (String, Vec<SqlValue>) {
    let mut sql = String::from(
        r#"
        SELECT t.id, t.title, COUNT(pt.post_id) AS posts_count
        FROM tags t
        LEFT JOIN post_tags pt ON pt.tag_id = t.id
        GROUP BY t.id, t.title
        ORDER BY posts_count DESC, t.title ASC
        "#,
    );

    let mut params = Vec::new();
    push_window(&mut sql, &mut params, &query.window);
    (sql, params)
}

fn build_for_posts_sql(n: usize) -> String {
    format!(
        r#"
        SELECT pt.post_id, t.id, t.title,
               (SELECT COUNT(*) FROM post_tags x WHERE x.tag_id = t.id) AS posts_count
        FROM post_tags pt
        JOIN tags t ON t.id = pt.tag_id
        WHERE pt.post_id IN ({})
        ORDER BY t.title ASC, t.id ASC
        "#,
        placeholders(n)
    )
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn find_tags_sqlite(
    pool: &SqlitePool,
    sql: &str,
    params: &[SqlValue],
) -> Result<Vec<TagWithCount>> {
    let rows = bind_sqlite(sqlx::query(sql), params)
        .fetch_all(pool)
        .await
        .context("Failed to query tags")?;

    Ok(rows.iter().map(row_to_tag_with_count_sqlite).collect())
}

async fn get_tag_by_title_sqlite(pool: &SqlitePool, title: &str) -> Result<Option<Tag>> {
    let row = sqlx::query("SELECT id, title FROM tags WHERE title = ?")
        .bind(title)
        .fetch_optional(pool)
        .await
        .context("Failed to get tag by title")?;

    Ok(row.map(|row| Tag::new(row.get("id"), row.get::<String, _>("title"))))
}

async fn tags_for_posts_sqlite(
    pool: &SqlitePool,
    sql: &str,
    params: &[SqlValue],
) -> Result<HashMap<i64, Vec<TagWithCount>>> {
    let rows = bind_sqlite(sqlx::query(sql), params)
        .fetch_all(pool)
        .await
        .context("Failed to get tags for posts")?;

    let mut by_post: HashMap<i64, Vec<TagWithCount>> = HashMap::new();
    for row in &rows {
        let post_id: i64 = row.get("post_id");
        by_post
            .entry(post_id)
            .or_default()
            .push(row_to_tag_with_count_sqlite(row));
    }
    Ok(by_post)
}

fn row_to_tag_with_count_sqlite(row: &sqlx::sqlite::SqliteRow) -> TagWithCount {
    TagWithCount::new(
        Tag::new(row.get("id"), row.get::<String, _>("title")),
        row.get("posts_count"),
    )
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn find_tags_mysql(
    pool: &MySqlPool,
    sql: &str,
    params: &[SqlValue],
) -> Result<Vec<TagWithCount>> {
    let rows = bind_mysql(sqlx::query(sql), params)
        .fetch_all(pool)
        .await
        .context("Failed to query tags")?;

    Ok(rows.iter().map(row_to_tag_with_count_mysql).collect())
}

async fn get_tag_by_title_mysql(pool: &MySqlPool, title: &str) -> Result<Option<Tag>> {
    let row = sqlx::query("SELECT id, title FROM tags WHERE title = ?")
        .bind(title)
        .fetch_optional(pool)
        .await
        .context("Failed to get tag by title")?;

    Ok(row.map(|row| Tag::new(row.get("id"), row.get::<String, _>("title"))))
}

async fn tags_for_posts_mysql(
    pool: &MySqlPool,
    sql: &str,
    params: &[SqlValue],
) -> Result<HashMap<i64, Vec<TagWithCount>>> {
    let rows = bind_mysql(sqlx::query(sql), params)
        .fetch_all(pool)
        .await
        .context("Failed to get tags for posts")?;

    let mut by_post: HashMap<i64, Vec<TagWithCount>> = HashMap::new();
    for row in &rows {
        let post_id: i64 = row.get("post_id");
        by_post
            .entry(post_id)
            .or_default()
            .push(row_to_tag_with_count_mysql(row));
    }
    Ok(by_post)
}

fn row_to_tag_with_count_mysql(row: &sqlx::mysql::MySqlRow) -> TagWithCount {
    TagWithCount::new(
        Tag::new(row.get("id"), row.get::<String, _>("title")),
        row.get("posts_count"),
    )
}
