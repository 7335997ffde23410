//! Password login.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::AppState;
use crate::error::{Result, ServerError};
use crate::router::Valid;
use crate::router::create::{Response, TOKEN_TYPE};
use crate::user::{UserRepository, UserService};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Body {
    /// Username, or email when it contains a `@`.
    #[validate(length(min = 2, max = 255))]
    identifier: String,
    #[validate(length(min = 8, max = 255))]
    password: String,
}

fn invalid_credentials() -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(
        "identifier",
        ValidationError::new("credentials")
            .with_message("Invalid username or password.".into()),
    );
    errors
}

/// Handler to log a user in.
pub async fn handler(
    State(state): State<AppState>,
    Valid(body): Valid<Body>,
) -> Result<Json<Response>> {
    let repo = UserRepository::new(state.db.postgres.clone());
    let lookup = if body.identifier.contains('@') {
        repo.find_by_email(&body.identifier).await
    } else {
        repo.find_by_username(&body.identifier.to_lowercase()).await
    };

    // never leak whether the account exists.
    let user = match lookup {
        Ok(data) => UserService::new(
            data,
            state.db.postgres.clone(),
            Arc::clone(&state.crypto),
        ),
        Err(ServerError::Sql(sqlx::Error::RowNotFound)) => {
            return Err(invalid_credentials().into());
        },
        Err(err) => return Err(err),
    };

    user.verify_password(&body.password)
        .map_err(|_| invalid_credentials())?;

    let token = state.token.create(&user.data.id.to_string())?;

    Ok(Json(Response {
        token_type: TOKEN_TYPE.to_owned(),
        token,
        expires_in: crate::token::EXPIRATION_TIME,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_bounds() {
        let body = Body {
            identifier: "alice".into(),
            password: "P$soW%920$n&".into(),
        };
        assert!(body.validate().is_ok());

        let body = Body {
            identifier: "a".into(),
            password: "P$soW%920$n&".into(),
        };
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_invalid_credentials_error_shape() {
        let errors = invalid_credentials();
        assert!(errors.field_errors().contains_key("identifier"));
    }
}
