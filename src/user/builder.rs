//! Typed builder for User.

use std::sync::Arc;

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::crypto::Crypto;
use crate::user::{User, UserService};

/// [`User`] builder.
///
/// A user can be built either around an existing `id` (lookups) or
/// around an `email` (registration, which generates a fresh id).
#[derive(Debug, Clone)]
pub struct UserBuilder<Id, Email> {
    id: Id,
    username: String,
    email: Email,
    password: String,
    first_name: String,
    last_name: String,
    birth_country: String,
    living_country: String,
    phone: Option<String>,
}

/// Value is missing on [`UserBuilder`].
#[derive(Debug, Clone)]
pub struct Missing;

/// Value is present on [`UserBuilder`].
#[derive(Debug, Clone)]
pub struct Present<T>(pub T);

impl UserBuilder<Missing, Missing> {
    /// Create a new [`UserBuilder`].
    pub fn new() -> Self {
        Self {
            id: Missing,
            username: String::default(),
            email: Missing,
            password: String::default(),
            first_name: String::default(),
            last_name: String::default(),
            birth_country: String::default(),
            living_country: String::default(),
            phone: None,
        }
    }
}

impl Default for UserBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Email> UserBuilder<Missing, Email> {
    /// Update `id` field on [`UserBuilder`].
    pub fn id(self, id: Uuid) -> UserBuilder<Present<Uuid>, Email> {
        UserBuilder {
            id: Present(id),
            username: self.username,
            email: self.email,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            birth_country: self.birth_country,
            living_country: self.living_country,
            phone: self.phone,
        }
    }
}

impl<Id> UserBuilder<Id, Missing> {
    /// Update `email` field on [`UserBuilder`].
    pub fn email(
        self,
        email: impl Into<String>,
    ) -> UserBuilder<Id, Present<String>> {
        UserBuilder {
            id: self.id,
            username: self.username,
            email: Present(email.into()),
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            birth_country: self.birth_country,
            living_country: self.living_country,
            phone: self.phone,
        }
    }
}

impl<Id, Email> UserBuilder<Id, Email> {
    /// Update `username` field on [`UserBuilder`].
    pub fn username(mut self, username: impl ToString) -> Self {
        self.username = username.to_string();
        self
    }

    /// Update `password` field on [`UserBuilder`].
    pub fn password(mut self, password: impl ToString) -> Self {
        self.password = password.to_string();
        self
    }

    /// Update `first_name` field on [`UserBuilder`].
    pub fn first_name(mut self, first_name: impl ToString) -> Self {
        self.first_name = first_name.to_string();
        self
    }

    /// Update `last_name` field on [`UserBuilder`].
    pub fn last_name(mut self, last_name: impl ToString) -> Self {
        self.last_name = last_name.to_string();
        self
    }

    /// Update `birth_country` field on [`UserBuilder`].
    pub fn birth_country(mut self, birth_country: impl ToString) -> Self {
        self.birth_country = birth_country.to_string();
        self
    }

    /// Update `living_country` field on [`UserBuilder`].
    pub fn living_country(mut self, living_country: impl ToString) -> Self {
        self.living_country = living_country.to_string();
        self
    }

    /// Update `phone` field on [`UserBuilder`].
    pub fn phone(mut self, phone: Option<String>) -> Self {
        self.phone = phone;
        self
    }

    fn data(self) -> User {
        User {
            username: self.username,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            birth_country: self.birth_country,
            living_country: self.living_country,
            phone: self.phone,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
            ..Default::default()
        }
    }
}

impl UserBuilder<Missing, Present<String>> {
    /// Build a [`User`] with `email`; a fresh id is generated.
    pub fn build(
        self,
        pool: Pool<Postgres>,
        crypto: Arc<Crypto>,
    ) -> UserService {
        let email = self.email.0.clone();
        let mut user = self.data();
        user.id = Uuid::new_v4();
        user.email = email;

        UserService::new(user, pool, crypto)
    }
}

impl UserBuilder<Present<Uuid>, Missing> {
    /// Build a [`User`] with `id`.
    pub fn build(
        self,
        pool: Pool<Postgres>,
        crypto: Arc<Crypto>,
    ) -> UserService {
        let id = self.id.0;
        let mut user = self.data();
        user.id = id;

        UserService::new(user, pool, crypto)
    }
}

impl UserBuilder<Present<Uuid>, Present<String>> {
    /// Build a [`User`] with `id` and `email`.
    pub fn build(
        self,
        pool: Pool<Postgres>,
        crypto: Arc<Crypto>,
    ) -> UserService {
        let id = self.id.0;
        let email = self.email.0.clone();
        let mut user = self.data();
        user.id = id;
        user.email = email;

        UserService::new(user, pool, crypto)
    }
}
