//! Users-related HTTP API.
mod collections;
mod delete;
mod follow;
mod get;
mod update;

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts, Path, Request, State};
use axum::http::header;
use axum::http::request::Parts;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Router, middleware};
use uuid::Uuid;

use crate::user::UserBuilder;
use crate::{AppState, ServerError, user::UserService};

const BEARER: &str = "Bearer ";
const ME_ROUTE: &str = "@me";

/// Authenticated caller, resolved from the `Authorization` header.
pub struct Identity(pub Uuid);

impl<S> FromRequestParts<S> for Identity
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .ok_or(ServerError::Unauthorized)?
            .trim_start_matches(BEARER);

        let claims = state
            .token
            .decode(token)
            .map_err(|_| ServerError::Unauthorized)?;

        Uuid::parse_str(&claims.sub)
            .map(Identity)
            .map_err(|_| ServerError::Unauthorized)
    }
}

/// Custom middleware for authentification.
///
/// Resolves the targeted user (path id, or the caller itself on `@me`
/// routes) and stores it as a request extension. Write operations are
/// only routed through `@me`, so a caller can never mutate anyone else.
async fn auth(
    State(state): State<AppState>,
    user_id: Option<Path<String>>,
    mut req: Request,
    next: middleware::Next,
) -> Result<Response, ServerError> {
    let user_id = match user_id {
        Some(user_id) => user_id.to_string(),
        None => ME_ROUTE.to_string(),
    };
    let user_id = if user_id == ME_ROUTE {
        match req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
        {
            Some(token) => {
                let token = token.trim_start_matches(BEARER);
                match state.token.decode(token) {
                    Ok(claims) => claims.sub,
                    Err(_) => return Err(ServerError::Unauthorized),
                }
            },
            None => return Err(ServerError::Unauthorized),
        }
    } else {
        user_id
    };

    let user_id =
        Uuid::parse_str(&user_id).map_err(|_| ServerError::NotFound)?;

    let user = UserBuilder::new()
        .id(user_id)
        .build(state.db.postgres.clone(), Arc::clone(&state.crypto))
        .find_by_id()
        .await?;

    req.extensions_mut().insert::<UserService>(user);
    Ok(next.run(req).await)
}

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        // `GET /users/:ID` goes to `get`.
        .route("/{user_id}", get(get::handler))
        // `GET|PATCH|DELETE /users/@me`. Authorization required on writes.
        .route(
            "/@me",
            get(get::handler)
                .patch(update::handler)
                .delete(delete::handler),
        )
        // Follow graph. `POST` follows, `DELETE` unfollows.
        .route(
            "/{user_id}/follow",
            post(follow::create).delete(follow::remove),
        )
        .route("/{user_id}/followers", get(follow::followers))
        .route("/{user_id}/following", get(follow::following))
        // Nested sub-collections.
        .route("/{user_id}/recipes", get(collections::recipes))
        .route("/{user_id}/comments", get(collections::comments))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
}
