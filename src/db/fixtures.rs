//! Seed helpers for repository and service tests

use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::SqlitePool;

use super::{create_test_pool, migrations, DynDatabasePool};

/// In-memory SQLite with the schema applied
pub async fn setup_pool() -> DynDatabasePool {
    let pool = create_test_pool().await.expect("Failed to create test pool");
    migrations::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// A fixed timestamp `minutes` after a base instant
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes)
}

pub async fn create_user(pool: &SqlitePool, username: &str) -> i64 {
    sqlx::query("INSERT INTO users (username) VALUES (?)")
        .bind(username)
        .execute(pool)
        .await
        .expect("Failed to create user")
        .last_insert_rowid()
}

pub async fn create_post(
    pool: &SqlitePool,
    author_id: i64,
    slug: &str,
    text: &str,
    image: Option<&str>,
    published_at: DateTime<Utc>,
) -> i64 {
    sqlx::query(
        "INSERT INTO posts (title, text, slug, author_id, image, published_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(format!("Title of {}", slug))
    .bind(text)
    .bind(slug)
    .bind(author_id)
    .bind(image)
    .bind(published_at)
    .execute(pool)
    .await
    .expect("Failed to create post")
    .last_insert_rowid()
}

pub async fn create_tag(pool: &SqlitePool, title: &str) -> i64 {
    sqlx::query("INSERT INTO tags (title) VALUES (?)")
        .bind(title)
        .execute(pool)
        .await
        .expect("Failed to create tag")
        .last_insert_rowid()
}

pub async fn tag_post(pool: &SqlitePool, post_id: i64, tag_id: i64) {
    sqlx::query("INSERT INTO post_tags (post_id, tag_id) VALUES (?, ?)")
        .bind(post_id)
        .bind(tag_id)
        .execute(pool)
        .await
        .expect("Failed to tag post");
}

pub async fn add_comment(
    pool: &SqlitePool,
    post_id: i64,
    author_id: i64,
    text: &str,
    published_at: DateTime<Utc>,
) -> i64 {
    sqlx::query(
        "INSERT INTO comments (post_id, author_id, text, published_at) VALUES (?, ?, ?, ?)",
    )
    .bind(post_id)
    .bind(author_id)
    .bind(text)
    .bind(published_at)
    .execute(pool)
    .await
    .expect("Failed to add comment")
    .last_insert_rowid()
}

pub async fn like_post(pool: &SqlitePool, post_id: i64, user_id: i64) {
    sqlx::query("INSERT INTO post_likes (post_id, user_id) VALUES (?, ?)")
        .bind(post_id)
        .bind(user_id)
        .execute(pool)
        .await
        .expect("Failed to like post");
}

/// Create `n` users named `{prefix}-{i}` and have each like the post
pub async fn like_post_times(pool: &SqlitePool, post_id: i64, prefix: &str, n: usize) {
    for i in 0..n {
        let user_id = create_user(pool, &format!("{}-{}", prefix, i)).await;
        like_post(pool, post_id, user_id).await;
    }
}
