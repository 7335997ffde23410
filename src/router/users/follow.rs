//! Follow-graph routes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use validator::{ValidationError, ValidationErrors};

use crate::follow::{Follow, FollowRepository};
use crate::router::users::Identity;
use crate::user::{Profile, UserBuilder, UserService};
use crate::{AppState, ServerError};

fn self_follow() -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(
        "user_id",
        ValidationError::new("follow")
            .with_message("Users cannot follow themselves.".into()),
    );
    errors
}

/// Handler to follow the targeted user.
pub async fn create(
    State(state): State<AppState>,
    Identity(actor_id): Identity,
    Extension(target): Extension<UserService>,
) -> Result<StatusCode, ServerError> {
    if actor_id == target.data.id {
        return Err(self_follow().into());
    }

    let actor = UserBuilder::new()
        .id(actor_id)
        .build(state.db.postgres.clone(), Arc::clone(&state.crypto))
        .find_by_id()
        .await?
        .load_collections()
        .await?;
    let target = target.load_collections().await?;

    let mut actor = actor.data;
    let mut target = target.data;

    let mut edge = Follow::new();
    actor.add_followed(&mut edge);
    target.add_follower(&mut edge);

    // the unique pair constraint turns a duplicate into a 409.
    FollowRepository::new(state.db.postgres.clone())
        .insert(&edge)
        .await?;

    tracing::info!(follower = %actor.id, followed = %target.id, "follow created");
    Ok(StatusCode::CREATED)
}

/// Handler to unfollow the targeted user.
pub async fn remove(
    State(state): State<AppState>,
    Identity(actor_id): Identity,
    Extension(target): Extension<UserService>,
) -> Result<StatusCode, ServerError> {
    let repo = FollowRepository::new(state.db.postgres.clone());
    let mut edge = repo.find_by_pair(actor_id, target.data.id).await?;

    let actor = UserBuilder::new()
        .id(actor_id)
        .build(state.db.postgres.clone(), Arc::clone(&state.crypto))
        .find_by_id()
        .await?
        .load_collections()
        .await?;
    let target = target.load_collections().await?;

    let mut actor = actor.data;
    let mut target = target.data;

    actor.remove_followed(&mut edge);
    target.remove_follower(&mut edge);

    repo.delete(edge.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handler listing users following the targeted one.
pub async fn followers(
    State(state): State<AppState>,
    Extension(target): Extension<UserService>,
) -> Result<Json<Vec<Profile>>, ServerError> {
    let profiles = FollowRepository::new(state.db.postgres.clone())
        .followers_of(target.data.id)
        .await?;

    Ok(Json(profiles))
}

/// Handler listing users the targeted one follows.
pub async fn following(
    State(state): State<AppState>,
    Extension(target): Extension<UserService>,
) -> Result<Json<Vec<Profile>>, ServerError> {
    let profiles = FollowRepository::new(state.db.postgres.clone())
        .following_of(target.data.id)
        .await?;

    Ok(Json(profiles))
}
