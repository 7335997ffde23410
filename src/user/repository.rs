//! Handle database requests.

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error::Result;
use crate::user::User;

#[derive(Clone)]
pub struct UserRepository {
    pool: Pool<Postgres>,
}

impl UserRepository {
    /// Create a new [`UserRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert [`User`] into database.
    pub async fn insert(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO users
                (id, username, email, password, first_name, last_name,
                 birth_country, living_country, phone, roles, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)"#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.birth_country)
        .bind(&user.living_country)
        .bind(&user.phone)
        .bind(sqlx::types::Json(&user.roles))
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Find current user using `id` field.
    pub async fn find_by_id(&self, user_id: Uuid) -> Result<User> {
        let query = get_by_field_query(Field::Id);

        let user = sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }

    /// Find current user using `username` field.
    pub async fn find_by_username(&self, username: &str) -> Result<User> {
        let query = get_by_field_query(Field::Username);

        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }

    /// Find current user using `email` field.
    pub async fn find_by_email(&self, email: &str) -> Result<User> {
        let query = get_by_field_query(Field::Email);

        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }

    /// Update current user.
    pub async fn update(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"UPDATE users
                SET username = $1, email = $2, password = $3, first_name = $4,
                    last_name = $5, birth_country = $6, living_country = $7,
                    phone = $8, updated_at = NOW()
                WHERE id = $9"#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.birth_country)
        .bind(&user.living_country)
        .bind(&user.phone)
        .bind(user.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete current user.
    ///
    /// Recipes, likes, comments and both sides of the follow graph are
    /// orphan-removed by the database (`ON DELETE CASCADE`).
    pub async fn delete(&self, user_id: Uuid) -> Result<()> {
        sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Load the identifiers of the five owned collections into the
    /// in-memory projections on [`User`].
    pub async fn load_collections(&self, user: &mut User) -> Result<()> {
        user.recipes =
            self.owned_ids("SELECT id FROM recipes WHERE author_id = $1", user.id).await?;
        user.likes =
            self.owned_ids("SELECT id FROM likes WHERE author_id = $1", user.id).await?;
        user.comments =
            self.owned_ids("SELECT id FROM comments WHERE author_id = $1", user.id).await?;
        user.followeds =
            self.owned_ids("SELECT id FROM follows WHERE follower_id = $1", user.id).await?;
        user.followers =
            self.owned_ids("SELECT id FROM follows WHERE followed_id = $1", user.id).await?;

        Ok(())
    }

    async fn owned_ids(&self, query: &str, owner: Uuid) -> Result<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(query)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;

        Ok(ids)
    }
}

#[derive(Debug, Clone)]
enum Field {
    Id,
    Username,
    Email,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Field::Id => write!(f, "id"),
            Field::Username => write!(f, "username"),
            Field::Email => write!(f, "email"),
        }
    }
}

fn get_by_field_query(field: Field) -> String {
    format!(
        r#"SELECT
                id,
                username,
                email,
                password,
                first_name,
                last_name,
                birth_country,
                living_country,
                phone,
                roles,
                created_at,
                updated_at
            FROM users
            WHERE {field} = $1"#
    )
}
