use std::sync::Arc;

use sqlx::{Pool, Postgres};
use validator::ValidationErrors;

use crate::crypto::Crypto;
use crate::error::Result;
use crate::user::{User, UserRepository};

/// User manager.
#[derive(Clone)]
pub struct UserService {
    pub repo: UserRepository,
    pub crypto: Arc<Crypto>,
    pub data: User,
}

impl UserService {
    /// Create a new [`UserService`].
    pub fn new(user: User, pool: Pool<Postgres>, crypto: Arc<Crypto>) -> Self {
        Self {
            data: user,
            repo: UserRepository::new(pool),
            crypto,
        }
    }

    /// Create builded user.
    ///
    /// Hashes the password before insertion; the stored role list stays
    /// empty, the base role being implicit.
    pub async fn create_user(mut self) -> Result<Self> {
        self.data.password = self.crypto.pwd.hash_password(&self.data.password)?;

        self.repo.insert(&self.data).await?;
        Ok(self)
    }

    /// Find current user using `id` field.
    pub async fn find_by_id(mut self) -> Result<Self> {
        self.data = self.repo.find_by_id(self.data.id).await?;
        Ok(self)
    }

    /// Load the owned-collection projections.
    pub async fn load_collections(mut self) -> Result<Self> {
        self.repo.load_collections(&mut self.data).await?;
        Ok(self)
    }

    /// Check a clear-text password against the stored PHC hash.
    pub fn verify_password(
        &self,
        password: &str,
    ) -> std::result::Result<(), ValidationErrors> {
        self.crypto.pwd.verify_password(password, &self.data.password)
    }

    /// Update current user.
    pub async fn update(&self) -> Result<()> {
        self.repo.update(&self.data).await
    }

    /// Delete current user and, by cascade, everything it owns.
    pub async fn delete(&self) -> Result<()> {
        self.repo.delete(self.data.id).await
    }
}
