//! Author model

use serde::{Deserialize, Serialize};

/// Author of a post or comment.
///
/// Only the username is shown on pages; the rest of the account lives
/// outside this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub username: String,
}

impl Author {
    pub fn new(id: i64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}
