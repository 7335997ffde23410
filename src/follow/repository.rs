//! Handle database requests for follow edges.

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error::{Result, ServerError};
use crate::follow::Follow;
use crate::user::Profile;

#[derive(Clone)]
pub struct FollowRepository {
    pool: Pool<Postgres>,
}

impl FollowRepository {
    /// Create a new [`FollowRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a fully wired [`Follow`] into database.
    ///
    /// An edge is meaningless without both endpoints resolved; a dangling
    /// edge is a programming error, not a user one.
    pub async fn insert(&self, edge: &Follow) -> Result<()> {
        let follower = edge.follower.ok_or(ServerError::Internal {
            details: "follow edge has no follower endpoint".into(),
        })?;
        let followed = edge.followed.ok_or(ServerError::Internal {
            details: "follow edge has no followed endpoint".into(),
        })?;

        sqlx::query(
            r#"INSERT INTO follows (id, follower_id, followed_id, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(edge.id)
        .bind(follower)
        .bind(followed)
        .bind(edge.created_at)
        .bind(edge.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Find the edge between two users, if any.
    pub async fn find_by_pair(
        &self,
        follower: Uuid,
        followed: Uuid,
    ) -> Result<Follow> {
        let edge = sqlx::query_as::<_, Follow>(
            r#"SELECT id, follower_id, followed_id, created_at, updated_at
                FROM follows
                WHERE follower_id = $1 AND followed_id = $2"#,
        )
        .bind(follower)
        .bind(followed)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServerError::NotFound)?;

        Ok(edge)
    }

    /// Delete an edge by its identifier.
    pub async fn delete(&self, edge_id: Uuid) -> Result<()> {
        let result = sqlx::query(r#"DELETE FROM follows WHERE id = $1"#)
            .bind(edge_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServerError::NotFound);
        }

        Ok(())
    }

    /// Users following `user_id` (incoming edges).
    pub async fn followers_of(&self, user_id: Uuid) -> Result<Vec<Profile>> {
        let profiles = sqlx::query_as::<_, Profile>(
            r#"SELECT u.id, u.username, u.first_name, u.last_name
                FROM follows f
                JOIN users u ON u.id = f.follower_id
                WHERE f.followed_id = $1
                ORDER BY f.created_at DESC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles)
    }

    /// Users that `user_id` follows (outgoing edges).
    pub async fn following_of(&self, user_id: Uuid) -> Result<Vec<Profile>> {
        let profiles = sqlx::query_as::<_, Profile>(
            r#"SELECT u.id, u.username, u.first_name, u.last_name
                FROM follows f
                JOIN users u ON u.id = f.followed_id
                WHERE f.follower_id = $1
                ORDER BY f.created_at DESC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use sqlx::error::ErrorKind;
    use sqlx::{Pool, Postgres};

    use super::*;

    const ALICE: &str = "8d8ac610-566d-4ef0-9c22-186b2a5ed793";
    const BOB: &str = "3c6ae2d1-9f4b-4660-8fd2-54f3a2c1e9b7";

    fn edge(follower: Uuid, followed: Uuid) -> Follow {
        let mut edge = Follow::new();
        edge.follower = Some(follower);
        edge.followed = Some(followed);
        edge
    }

    fn database_error_kind(err: ServerError) -> ErrorKind {
        let ServerError::Sql(err) = err else {
            panic!("expected a sql error, got {err:?}");
        };
        err.as_database_error().expect("not a database error").kind()
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql"))]
    async fn test_duplicate_edge_rejected(pool: Pool<Postgres>) {
        let alice = Uuid::parse_str(ALICE).unwrap();
        let bob = Uuid::parse_str(BOB).unwrap();
        let repo = FollowRepository::new(pool);

        // alice already follows bob on the fixture.
        let err = repo.insert(&edge(alice, bob)).await.unwrap_err();
        assert_eq!(database_error_kind(err), ErrorKind::UniqueViolation);
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql"))]
    async fn test_self_follow_rejected_by_schema(pool: Pool<Postgres>) {
        let bob = Uuid::parse_str(BOB).unwrap();
        let repo = FollowRepository::new(pool);

        let err = repo.insert(&edge(bob, bob)).await.unwrap_err();
        assert_eq!(database_error_kind(err), ErrorKind::CheckViolation);
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql"))]
    async fn test_unfollow_removes_pair(pool: Pool<Postgres>) {
        let alice = Uuid::parse_str(ALICE).unwrap();
        let bob = Uuid::parse_str(BOB).unwrap();
        let repo = FollowRepository::new(pool);

        let edge = repo.find_by_pair(alice, bob).await.unwrap();
        repo.delete(edge.id).await.unwrap();

        assert!(matches!(
            repo.find_by_pair(alice, bob).await,
            Err(ServerError::NotFound)
        ));
        assert!(repo.followers_of(bob).await.unwrap().is_empty());
    }
}
