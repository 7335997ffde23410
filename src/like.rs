//! Likes given by users to recipes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Like as saved on database.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Like {
    pub id: Uuid,
    #[sqlx(rename = "author_id")]
    pub author: Option<Uuid>,
    #[sqlx(rename = "recipe_id")]
    pub recipe: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Like {
    /// Create a new unowned like; ownership is set by
    /// [`crate::user::User::add_like`].
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author: None,
            recipe: None,
            created_at: now,
            updated_at: now,
        }
    }
}
