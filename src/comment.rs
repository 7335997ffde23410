//! Comments written by users on recipes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error::Result;

/// Comment as saved on database.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    #[sqlx(rename = "author_id")]
    pub author: Option<Uuid>,
    #[sqlx(rename = "recipe_id")]
    pub recipe: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Create a new unowned comment; ownership is set by
    /// [`crate::user::User::add_comment`].
    pub fn new(content: impl ToString) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author: None,
            recipe: None,
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Comments authored by a user, newest first.
    pub async fn authored_by(
        pool: &Pool<Postgres>,
        author_id: Uuid,
    ) -> Result<Vec<Self>> {
        let comments = sqlx::query_as::<_, Self>(
            r#"SELECT id, author_id, recipe_id, content, created_at, updated_at
                FROM comments
                WHERE author_id = $1
                ORDER BY created_at DESC"#,
        )
        .bind(author_id)
        .fetch_all(pool)
        .await?;

        Ok(comments)
    }
}
