//! In-memory synchronization of the owned one-to-many collections.
//!
//! The persistence layer does not auto-synchronize inverse sides, so
//! every owned relation exposes an add/remove pair keeping the owning
//! collection and the related entity's back-reference consistent.

use uuid::Uuid;

use crate::comment::Comment;
use crate::follow::Follow;
use crate::like::Like;
use crate::recipe::Recipe;
use crate::user::User;

/// Insert `id` into `owned` and point `back_ref` at `owner`.
///
/// Inserting an already-present member leaves both sides untouched.
fn attach(
    owned: &mut Vec<Uuid>,
    id: Uuid,
    back_ref: &mut Option<Uuid>,
    owner: Uuid,
) {
    if !owned.contains(&id) {
        owned.push(id);
        *back_ref = Some(owner);
    }
}

/// Remove `id` from `owned`; clear `back_ref` only while it still
/// points at `owner`, since the entity may have been reassigned.
fn detach(
    owned: &mut Vec<Uuid>,
    id: Uuid,
    back_ref: &mut Option<Uuid>,
    owner: Uuid,
) {
    if let Some(position) = owned.iter().position(|member| *member == id) {
        owned.remove(position);
        if *back_ref == Some(owner) {
            *back_ref = None;
        }
    }
}

impl User {
    pub fn add_recipe(&mut self, recipe: &mut Recipe) {
        attach(&mut self.recipes, recipe.id, &mut recipe.author, self.id);
    }

    pub fn remove_recipe(&mut self, recipe: &mut Recipe) {
        detach(&mut self.recipes, recipe.id, &mut recipe.author, self.id);
    }

    pub fn add_like(&mut self, like: &mut Like) {
        attach(&mut self.likes, like.id, &mut like.author, self.id);
    }

    pub fn remove_like(&mut self, like: &mut Like) {
        detach(&mut self.likes, like.id, &mut like.author, self.id);
    }

    pub fn add_comment(&mut self, comment: &mut Comment) {
        attach(&mut self.comments, comment.id, &mut comment.author, self.id);
    }

    pub fn remove_comment(&mut self, comment: &mut Comment) {
        detach(&mut self.comments, comment.id, &mut comment.author, self.id);
    }

    /// Register an outgoing edge: this user is the follower.
    pub fn add_followed(&mut self, edge: &mut Follow) {
        attach(&mut self.followeds, edge.id, &mut edge.follower, self.id);
    }

    pub fn remove_followed(&mut self, edge: &mut Follow) {
        detach(&mut self.followeds, edge.id, &mut edge.follower, self.id);
    }

    /// Register an incoming edge: this user is the followed one.
    pub fn add_follower(&mut self, edge: &mut Follow) {
        attach(&mut self.followers, edge.id, &mut edge.followed, self.id);
    }

    pub fn remove_follower(&mut self, edge: &mut Follow) {
        detach(&mut self.followers, edge.id, &mut edge.followed, self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: username.to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_followed_sets_back_reference_once() {
        let mut alice = user("alice");
        let mut edge = Follow::new();

        alice.add_followed(&mut edge);
        assert_eq!(edge.follower, Some(alice.id));
        assert_eq!(alice.followeds, vec![edge.id]);

        // redundant call leaves state unchanged.
        alice.add_followed(&mut edge);
        assert_eq!(alice.followeds, vec![edge.id]);
        assert_eq!(edge.follower, Some(alice.id));
    }

    #[test]
    fn test_remove_followed_clears_back_reference() {
        let mut alice = user("alice");
        let mut edge = Follow::new();

        alice.add_followed(&mut edge);
        alice.remove_followed(&mut edge);

        assert!(alice.followeds.is_empty());
        assert_eq!(edge.follower, None);
    }

    #[test]
    fn test_remove_missing_edge_is_noop() {
        let mut alice = user("alice");
        let mut bob = user("bob");
        let mut edge = Follow::new();

        bob.add_followed(&mut edge);
        alice.remove_followed(&mut edge);

        assert_eq!(edge.follower, Some(bob.id));
        assert_eq!(bob.followeds, vec![edge.id]);
    }

    #[test]
    fn test_remove_keeps_reassigned_back_reference() {
        let mut alice = user("alice");
        let mut carol = user("carol");
        let mut edge = Follow::new();

        alice.add_followed(&mut edge);
        // edge moved to carol; alice's collection is now stale.
        edge.follower = Some(carol.id);
        carol.followeds.push(edge.id);

        alice.remove_followed(&mut edge);

        assert!(alice.followeds.is_empty());
        assert_eq!(edge.follower, Some(carol.id));
    }

    #[test]
    fn test_follower_side_only_touches_followed_field() {
        let mut bob = user("bob");
        let mut edge = Follow::new();

        bob.add_follower(&mut edge);

        assert_eq!(edge.followed, Some(bob.id));
        assert_eq!(edge.follower, None);
        assert_eq!(bob.followers, vec![edge.id]);
        assert!(bob.followeds.is_empty());

        bob.remove_follower(&mut edge);
        assert_eq!(edge.followed, None);
        assert!(bob.followers.is_empty());
    }

    #[test]
    fn test_two_sided_wiring() {
        let mut alice = user("alice");
        let mut bob = user("bob");
        let mut edge = Follow::new();

        alice.add_followed(&mut edge);
        bob.add_follower(&mut edge);

        assert_eq!(edge.follower, Some(alice.id));
        assert_eq!(edge.followed, Some(bob.id));
        assert_eq!(alice.followeds, vec![edge.id]);
        assert_eq!(bob.followers, vec![edge.id]);
        assert!(alice.followers.is_empty());
        assert!(bob.followeds.is_empty());
    }

    #[test]
    fn test_recipe_collection_follows_same_protocol() {
        let mut alice = user("alice");
        let mut tartiflette = crate::recipe::Recipe::new("tartiflette");

        alice.add_recipe(&mut tartiflette);
        assert_eq!(tartiflette.author, Some(alice.id));
        assert_eq!(alice.recipes, vec![tartiflette.id]);

        alice.add_recipe(&mut tartiflette);
        assert_eq!(alice.recipes.len(), 1);

        alice.remove_recipe(&mut tartiflette);
        assert_eq!(tartiflette.author, None);
        assert!(alice.recipes.is_empty());
    }

    #[test]
    fn test_likes_and_comments_sync() {
        let mut alice = user("alice");
        let mut like = Like::new();
        let mut comment = Comment::new("needs more reblochon");

        alice.add_like(&mut like);
        alice.add_comment(&mut comment);

        assert_eq!(like.author, Some(alice.id));
        assert_eq!(comment.author, Some(alice.id));

        alice.remove_like(&mut like);
        assert_eq!(like.author, None);
        // comment collection untouched by like removal.
        assert_eq!(alice.comments, vec![comment.id]);
    }
}
