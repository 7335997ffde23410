//! Directed follow edges between users.

mod repository;

pub use repository::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A follow relation as saved on database: `follower` follows `followed`.
///
/// Both endpoints are `NOT NULL` once persisted; they are optional here
/// only while the edge is being wired in memory.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Follow {
    pub id: Uuid,
    #[sqlx(rename = "follower_id")]
    pub follower: Option<Uuid>,
    #[sqlx(rename = "followed_id")]
    pub followed: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Follow {
    /// Create a dangling edge; endpoints are set by
    /// [`crate::user::User::add_followed`] and
    /// [`crate::user::User::add_follower`].
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            follower: None,
            followed: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_edge_is_dangling() {
        let edge = Follow::new();

        assert!(!edge.id.is_nil());
        assert_eq!(edge.follower, None);
        assert_eq!(edge.followed, None);
        assert_eq!(edge.created_at, edge.updated_at);
    }
}
