//! Account registration, reserved to anonymous callers.

use std::sync::Arc;

use axum::http::{StatusCode, header};
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::error::Result;
use crate::router::Valid;
use crate::user::User;

pub const TOKEN_TYPE: &str = "Bearer";

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[validate(
        length(min = 2, max = 30),
        custom(
            function = "crate::router::validate_username",
            message = "Username must be lowercase alphanumeric."
        )
    )]
    pub username: String,
    #[validate(email(message = "Email must be formatted."))]
    email: String,
    #[validate(
        length(
            min = 8,
            max = 255,
            message = "Password must contain at least 8 characters."
        ),
        custom(
            function = "crate::router::validate_password",
            message = "Password must not be letters only."
        )
    )]
    password: String,
    #[validate(length(min = 1, max = 255))]
    first_name: String,
    #[validate(length(min = 1, max = 255))]
    last_name: String,
    #[validate(length(min = 2, max = 255))]
    birth_country: String,
    #[validate(length(min = 2, max = 255))]
    living_country: String,
    #[validate(length(min = 3, max = 255))]
    phone: Option<String>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub token_type: String,
    pub token: String,
    pub expires_in: u64,
}

/// Middleware rejecting callers already carrying a valid token:
/// registration is an anonymous-only operation.
pub async fn require_anonymous(
    State(state): State<AppState>,
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> Result<axum::response::Response> {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .map(|header| header.trim_start_matches("Bearer "));

    if let Some(token) = bearer {
        if state.token.decode(token).is_ok() {
            return Err(crate::error::ServerError::Forbidden);
        }
    }

    Ok(next.run(req).await)
}

/// Handler to create user.
pub async fn handler(
    State(state): State<AppState>,
    Valid(body): Valid<Body>,
) -> Result<(StatusCode, Json<Response>)> {
    let user = User::builder()
        .email(&body.email)
        .username(body.username.to_lowercase())
        .password(&body.password)
        .first_name(&body.first_name)
        .last_name(&body.last_name)
        .birth_country(&body.birth_country)
        .living_country(&body.living_country)
        .phone(body.phone)
        .build(state.db.postgres.clone(), Arc::clone(&state.crypto))
        .create_user()
        .await?;

    tracing::info!(user_id = %user.data.id, "user registered");

    let token = state.token.create(&user.data.id.to_string())?;

    Ok((
        StatusCode::CREATED,
        Json(Response {
            token_type: TOKEN_TYPE.to_owned(),
            token,
            expires_in: crate::token::EXPIRATION_TIME,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> Body {
        Body {
            username: "alice".into(),
            email: "alice@tambouille.example".into(),
            password: "P$soW%920$n&".into(),
            first_name: "Alice".into(),
            last_name: "Doe".into(),
            birth_country: "France".into(),
            living_country: "Belgium".into(),
            phone: None,
        }
    }

    #[test]
    fn test_valid_body() {
        assert!(body().validate().is_ok());
    }

    #[test]
    fn test_uppercase_username_rejected() {
        let body = Body {
            username: "Alice".into(),
            ..body()
        };
        let errors = body.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
    }

    #[test]
    fn test_malformed_email_rejected() {
        let body = Body {
            email: "not-an-email".into(),
            ..body()
        };
        let errors = body.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_weak_password_rejected() {
        let body = Body {
            password: "onlyletters".into(),
            ..body()
        };
        let errors = body.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_short_password_rejected() {
        let body = Body {
            password: "a1".into(),
            ..body()
        };
        let errors = body.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }
}
