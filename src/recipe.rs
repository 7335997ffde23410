//! Recipes authored by users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error::Result;

/// Recipe as saved on database.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Recipe {
    pub id: Uuid,
    #[sqlx(rename = "author_id")]
    pub author: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Create a new unowned recipe; ownership is set by
    /// [`crate::user::User::add_recipe`].
    pub fn new(title: impl ToString) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author: None,
            title: title.to_string(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Recipes authored by a user, newest first.
    pub async fn authored_by(
        pool: &Pool<Postgres>,
        author_id: Uuid,
    ) -> Result<Vec<Self>> {
        let recipes = sqlx::query_as::<_, Self>(
            r#"SELECT id, author_id, title, description, created_at, updated_at
                FROM recipes
                WHERE author_id = $1
                ORDER BY created_at DESC"#,
        )
        .bind(author_id)
        .fetch_all(pool)
        .await?;

        Ok(recipes)
    }
}
