//! Delete user from database.

use axum::Extension;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::ServerError;
use crate::router::Valid;
use crate::user::UserService;

#[derive(Debug, Validate, Serialize, Deserialize)]
pub struct Body {
    #[validate(length(
        min = 8,
        message = "Password must contain at least 8 characters."
    ))]
    password: String,
}

/// Handler to delete the calling user.
///
/// Owned recipes, likes, comments and follow edges go with it.
pub async fn handler(
    Extension(user): Extension<UserService>,
    Valid(body): Valid<Body>,
) -> Result<(), ServerError> {
    user.verify_password(&body.password)?;

    user.delete().await?;

    tracing::info!(user_id = %user.data.id, "user deleted");
    Ok(())
}
