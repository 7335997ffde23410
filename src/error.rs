//! Error handler for tambouille.

use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use sqlx::{Error as SQLxError, error::ErrorKind, postgres::PgDatabaseError};
use thiserror::Error;
use validator::ValidationErrors;

pub type Result<T> = std::result::Result<T, ServerError>;

/// Enum representing server-side errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("validation error occurred")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Axum(#[from] JsonRejection),

    #[error("SQL request failed: {0}")]
    Sql(#[from] SQLxError),

    #[error("token error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Time(#[from] std::time::SystemTimeError),

    #[error(transparent)]
    Crypto(#[from] crate::crypto::CryptoError),

    #[error("internal server error, {details}")]
    Internal { details: String },

    #[error("invalid 'Authorization' header")]
    Unauthorized,

    #[error("already authenticated")]
    Forbidden,

    #[error("resource not found")]
    NotFound,
}

/// Structure for detailed error responses.
#[derive(Debug, Serialize)]
pub struct ResponseError {
    r#type: Option<String>,
    title: String,
    status: u16,
    detail: String,
    instance: Option<String>,
    errors: Option<Vec<FieldError>>,
}

impl ResponseError {
    /// Update error status code.
    pub fn status(mut self, code: StatusCode) -> Self {
        self.status = code.as_u16();
        self
    }

    /// Update `title` field.
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.into();
        self
    }

    /// Add detailed error.
    pub fn details(mut self, description: &str) -> Self {
        self.detail = description.into();
        self
    }

    /// Automatically add errors field.
    pub fn errors(mut self, errors: &ValidationErrors) -> Self {
        self.errors = Some(parse_validation_errors(errors));
        self
    }

    /// Transform [`ResponseError`] into axum [`Response`].
    pub fn into_response(self) -> std::result::Result<Response, axum::http::Error> {
        if let Ok(body) = serde_json::to_string(&self) {
            Response::builder()
                .status(self.status)
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.into())
        } else {
            Ok(internal_server_error())
        }
    }
}

impl Default for ResponseError {
    fn default() -> Self {
        Self {
            r#type: None,
            title: "Internal server error.".to_owned(),
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            detail: String::default(),
            instance: None,
            errors: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct FieldError {
    field: String,
    message: String,
}

fn parse_validation_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, issues)| {
            issues.iter().map(move |issue| FieldError {
                field: field.to_string(),
                message: issue.to_string(),
            })
        })
        .collect()
}

/// Human-readable message for a named uniqueness constraint.
fn constraint_message(constraint: &str) -> Option<&'static str> {
    match constraint {
        "users_username_key" => Some("Username already taken."),
        "users_email_key" => Some("Email already registered."),
        "follows_follower_id_followed_id_key" => {
            Some("Already following this user.")
        },
        "likes_author_id_recipe_id_key" => Some("Recipe already liked."),
        _ => None,
    }
}

/// Translate persistence-layer constraint failures into user-facing
/// responses. Uniqueness violations become 409, missing rows 404.
fn sql_response(err: &SQLxError) -> ResponseError {
    if matches!(err, SQLxError::RowNotFound) {
        return ResponseError::default()
            .title("Resource not found.")
            .details("No resource matches this identifier.")
            .status(StatusCode::NOT_FOUND);
    }

    let response = ResponseError::default()
        .title("There were validation errors with your request.")
        .status(StatusCode::BAD_REQUEST);

    match err.as_database_error() {
        Some(db_err) if db_err.kind() == ErrorKind::UniqueViolation => {
            let detail = db_err
                .constraint()
                .and_then(constraint_message)
                .unwrap_or("Resource already exists.");
            response
                .title("Conflict with an existing resource.")
                .details(detail)
                .status(StatusCode::CONFLICT)
        },
        Some(db_err) if db_err.kind() == ErrorKind::CheckViolation => {
            response.details("Users cannot follow themselves.")
        },
        Some(db_err) => response.details(
            db_err
                .downcast_ref::<PgDatabaseError>()
                .detail()
                .unwrap_or(&err.to_string()),
        ),
        None => response.details(&err.to_string()),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let response = ResponseError::default()
            .title("There were validation errors with your request.")
            .details(&self.to_string())
            .status(StatusCode::BAD_REQUEST);

        let response = match &self {
            ServerError::Validation(validation_errors) => {
                response.errors(validation_errors)
            },

            ServerError::Sql(err) => sql_response(err),

            ServerError::Unauthorized => response
                .title("Missing or invalid 'Authorization' header.")
                .status(StatusCode::UNAUTHORIZED),

            ServerError::Forbidden => response
                .title("Authenticated users cannot perform this operation.")
                .status(StatusCode::FORBIDDEN),

            ServerError::NotFound => response
                .title("Resource not found.")
                .status(StatusCode::NOT_FOUND),

            ServerError::Internal { details } => {
                tracing::error!(%details, "server returned 500 status");

                ResponseError::default()
            },

            ServerError::Jwt(_) | ServerError::Time(_) | ServerError::Crypto(_) => {
                tracing::error!(error = %self, "server returned 500 status");

                ResponseError::default()
            },

            _ => response,
        };

        response
            .into_response()
            .unwrap_or_else(|_| internal_server_error())
    }
}

fn internal_server_error() -> Response {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/json")
        .body(
            serde_json::json!({
                "type": null,
                "title": "Internal server error.",
                "status": StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                "detail": null,
                "instance": null,
                "errors": null,
            })
            .to_string()
            .into(),
        )
        .unwrap_or_else(|_| Response::new("Internal server error".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn test_unauthorized_maps_to_401() {
        let response = ServerError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_forbidden_maps_to_403() {
        let response = ServerError::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "username",
            ValidationError::new("username")
                .with_message("Username must be alphanumeric.".into()),
        );

        let response = ServerError::Validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_row_maps_to_404() {
        let response = ServerError::Sql(SQLxError::RowNotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_hides_details() {
        let response = ServerError::Internal {
            details: "edge without endpoints".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
