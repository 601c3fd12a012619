//! Content store repositories
//!
//! Each repository executes query specifications for one entity and returns
//! rows with the requested relations attached. Absence is `Ok(None)`, never
//! an error.

pub mod comment;
pub mod post;
pub mod tag;

pub use comment::{CommentRepository, SqlxCommentRepository};
pub use post::{PostRepository, SqlxPostRepository};
pub use tag::{SqlxTagRepository, TagRepository};

use sqlx::mysql::{MySql, MySqlArguments};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};

use crate::models::Window;

/// A positional parameter for dynamically built SQL
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SqlValue {
    Int(i64),
    Text(String),
}

/// Append `LIMIT ? OFFSET ?` for a window.
///
/// Both drivers require a LIMIT before OFFSET, so an open window binds the
/// largest signed value.
pub(crate) fn push_window(sql: &mut String, params: &mut Vec<SqlValue>, window: &Window) {
    let limit = window
        .limit
        .map(|n| i64::try_from(n).unwrap_or(i64::MAX))
        .unwrap_or(i64::MAX);
    let offset = i64::try_from(window.offset).unwrap_or(i64::MAX);

    sql.push_str(" LIMIT ? OFFSET ?");
    params.push(SqlValue::Int(limit));
    params.push(SqlValue::Int(offset));
}

/// `?, ?, ?` for an IN list of `n` items
pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

pub(crate) fn bind_sqlite<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &'q [SqlValue],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.as_str()),
        };
    }
    query
}

pub(crate) fn bind_mysql<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    params: &'q [SqlValue],
) -> Query<'q, MySql, MySqlArguments> {
    for param in params {
        query = match param {
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.as_str()),
        };
    }
    query
}
