//! Update user data.

use axum::Extension;
use axum::extract::State;
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::router::Valid;
use crate::user::UserService;
use crate::{AppState, ServerError};

/// Distinguish an absent field from an explicit `null`: absent leaves
/// the stored value alone, `null` clears it.
fn nullable<'de, T, D>(
    deserializer: D,
) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Debug, Validate, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[validate(
        length(min = 2, max = 30),
        custom(
            function = "crate::router::validate_username",
            message = "Username must be lowercase alphanumeric."
        )
    )]
    username: Option<String>,
    #[validate(email(message = "Email must be formatted."))]
    email: Option<String>,
    #[validate(length(min = 1, max = 255))]
    first_name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    last_name: Option<String>,
    #[validate(length(min = 2, max = 255))]
    birth_country: Option<String>,
    #[validate(length(min = 2, max = 255))]
    living_country: Option<String>,
    #[validate(length(min = 3, max = 255))]
    #[serde(default, deserialize_with = "nullable")]
    phone: Option<Option<String>>,
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
    new_password: Option<String>,
    /// Required when `email` or `new_password` is set.
    current_password: Option<String>,
}

fn missing_password() -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(
        "current_password",
        ValidationError::new("pwd")
            .with_message("Missing 'currentPassword' field.".into()),
    );
    errors
}

/// Handler to update the calling user.
///
/// Sensitive fields (email, password) require the current password.
pub async fn handler(
    State(state): State<AppState>,
    Extension(mut user): Extension<UserService>,
    Valid(body): Valid<Body>,
) -> Result<(), ServerError> {
    if let Some(username) = body.username {
        user.data.username = username.to_lowercase();
    }

    if let Some(first_name) = body.first_name {
        user.data.first_name = first_name;
    }

    if let Some(last_name) = body.last_name {
        user.data.last_name = last_name;
    }

    if let Some(birth_country) = body.birth_country {
        user.data.birth_country = birth_country;
    }

    if let Some(living_country) = body.living_country {
        user.data.living_country = living_country;
    }

    if let Some(phone) = body.phone {
        user.data.phone = phone;
    }

    if let Some(email) = body.email {
        match &body.current_password {
            Some(password) => user.verify_password(password)?,
            None => return Err(missing_password().into()),
        }
        user.data.email = email;
    }

    if let Some(new_password) = body.new_password {
        match &body.current_password {
            Some(password) => user.verify_password(password)?,
            None => return Err(missing_password().into()),
        }
        user.data.password = state.crypto.pwd.hash_password(&new_password)?;
    }

    user.update().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use sqlx::{Pool, Postgres};
    use uuid::Uuid;

    use super::*;
    use crate::user::UserRepository;
    use crate::{app, make_request, router};

    const ALICE: &str = "8d8ac610-566d-4ef0-9c22-186b2a5ed793";

    fn empty_body() -> Body {
        Body {
            username: None,
            email: None,
            first_name: None,
            last_name: None,
            birth_country: None,
            living_country: None,
            phone: None,
            new_password: None,
            current_password: None,
        }
    }

    #[test]
    fn test_empty_body_is_valid() {
        assert!(empty_body().validate().is_ok());
    }

    #[test]
    fn test_weak_new_password_rejected() {
        let body = Body {
            new_password: Some("onlyletters".into()),
            current_password: Some("P$soW%920$n&".into()),
            ..empty_body()
        };
        let errors = body.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("new_password"));
    }

    #[test]
    fn test_short_phone_rejected() {
        let body = Body {
            phone: Some(Some("12".into())),
            ..empty_body()
        };
        let errors = body.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("phone"));
    }

    #[test]
    fn test_phone_null_is_distinct_from_absent() {
        let absent: Body = serde_json::from_value(json!({})).unwrap();
        assert_eq!(absent.phone, None);

        let cleared: Body =
            serde_json::from_value(json!({ "phone": null })).unwrap();
        assert_eq!(cleared.phone, Some(None));
    }

    #[test]
    fn test_missing_password_error_shape() {
        let errors = missing_password();
        assert!(errors.field_errors().contains_key("current_password"));
    }

    #[sqlx::test(fixtures("../../../fixtures/users.sql"))]
    async fn test_update_handler(pool: Pool<Postgres>) {
        let state = router::state(pool.clone());
        let app = app(state.clone());

        let response = make_request(
            Some(&state),
            app,
            Method::PATCH,
            "/users/@me",
            json!({
                "firstName": "Alicia",
                "birthCountry": "Spain",
                "phone": null,
            })
            .to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let alice = Uuid::parse_str(ALICE).unwrap();
        let user = UserRepository::new(pool).find_by_id(alice).await.unwrap();
        assert_eq!(user.first_name, "Alicia");
        assert_eq!(user.birth_country, "Spain");
        // explicit null clears the optional field.
        assert_eq!(user.phone, None);
        // untouched fields keep their stored values.
        assert_eq!(user.last_name, "Doe");
        assert_eq!(user.living_country, "Belgium");
    }
}
