//! Users and their owned collections.

mod builder;
mod graph;
mod repository;
mod service;

pub use builder::*;
pub use repository::*;
pub use service::*;

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role granted to every user, stored or not.
pub const BASE_ROLE: &str = "ROLE_USER";

/// User as saved on database.
///
/// The five collections at the bottom are in-memory projections of the
/// owned one-to-many relations; repositories load and persist them.
#[derive(
    Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow,
)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip)]
    pub email: String,
    #[serde(skip)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_country: String,
    pub living_country: String,
    pub phone: Option<String>,
    #[sqlx(json)]
    #[serde(skip)]
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(skip)]
    pub recipes: Vec<Uuid>,
    #[sqlx(skip)]
    #[serde(skip)]
    pub likes: Vec<Uuid>,
    #[sqlx(skip)]
    #[serde(skip)]
    pub comments: Vec<Uuid>,
    #[sqlx(skip)]
    #[serde(skip)]
    pub followeds: Vec<Uuid>,
    #[sqlx(skip)]
    #[serde(skip)]
    pub followers: Vec<Uuid>,
}

impl User {
    /// Start building a new [`User`].
    pub fn builder() -> UserBuilder<Missing, Missing> {
        UserBuilder::new()
    }

    /// Role set used for authorization decisions: stored roles plus
    /// [`BASE_ROLE`], deduplicated.
    pub fn effective_roles(&self) -> BTreeSet<String> {
        let mut roles: BTreeSet<String> = self.roles.iter().cloned().collect();
        roles.insert(BASE_ROLE.to_owned());
        roles
    }
}

/// Public projection of a [`User`], used by edge traversal routes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_roles_always_hold_base_role() {
        let user = User::default();

        assert!(user.effective_roles().contains(BASE_ROLE));
    }

    #[test]
    fn test_effective_roles_deduplicate() {
        let user = User {
            roles: vec![
                "ROLE_ADMIN".to_owned(),
                BASE_ROLE.to_owned(),
                "ROLE_ADMIN".to_owned(),
            ],
            ..Default::default()
        };

        let roles = user.effective_roles();
        assert_eq!(roles.len(), 2);
        assert!(roles.contains("ROLE_ADMIN"));
        assert!(roles.contains(BASE_ROLE));
    }

    #[test]
    fn test_effective_roles_do_not_mutate_stored_roles() {
        let user = User {
            roles: vec!["ROLE_MODERATOR".to_owned()],
            ..Default::default()
        };

        user.effective_roles();
        assert_eq!(user.roles, vec!["ROLE_MODERATOR".to_owned()]);
    }
}
