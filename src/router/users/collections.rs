//! Owned sub-collection routes.

use axum::extract::State;
use axum::{Extension, Json};

use crate::comment::Comment;
use crate::recipe::Recipe;
use crate::user::UserService;
use crate::{AppState, ServerError};

/// Handler listing recipes authored by the targeted user.
pub async fn recipes(
    State(state): State<AppState>,
    Extension(target): Extension<UserService>,
) -> Result<Json<Vec<Recipe>>, ServerError> {
    let recipes =
        Recipe::authored_by(&state.db.postgres, target.data.id).await?;

    Ok(Json(recipes))
}

/// Handler listing comments authored by the targeted user.
pub async fn comments(
    State(state): State<AppState>,
    Extension(target): Extension<UserService>,
) -> Result<Json<Vec<Comment>>, ServerError> {
    let comments =
        Comment::authored_by(&state.db.postgres, target.data.id).await?;

    Ok(Json(comments))
}
