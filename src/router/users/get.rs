//! Public user profile.

use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ServerError;
use crate::user::UserService;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_country: String,
    pub living_country: String,
    pub phone: Option<String>,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

pub async fn handler(
    Extension(user): Extension<UserService>,
) -> Result<Json<Response>, ServerError> {
    let user = user.data;

    Ok(Json(Response {
        id: user.id,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        birth_country: user.birth_country.clone(),
        living_country: user.living_country.clone(),
        phone: user.phone.clone(),
        roles: user.effective_roles().into_iter().collect(),
        created_at: user.created_at,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use sqlx::{Pool, Postgres};

    use super::*;
    use crate::user::BASE_ROLE;
    use crate::{app, make_request, router};

    const ALICE: &str = "8d8ac610-566d-4ef0-9c22-186b2a5ed793";

    #[sqlx::test(fixtures("../../../fixtures/users.sql"))]
    async fn test_get_user_handler(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let path = format!("/users/{ALICE}");
        let response =
            make_request(None, app, Method::GET, &path, String::default())
                .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Response = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.id, Uuid::parse_str(ALICE).unwrap());
        assert_eq!(body.username, "alice");
        assert_eq!(body.roles, vec![BASE_ROLE.to_owned()]);
    }

    #[sqlx::test(fixtures("../../../fixtures/users.sql"))]
    async fn test_get_me_resolves_token_subject(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state.clone());

        let response = make_request(
            Some(&state),
            app,
            Method::GET,
            "/users/@me",
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Response = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.id, Uuid::parse_str(ALICE).unwrap());
    }

    #[sqlx::test(fixtures("../../../fixtures/users.sql"))]
    async fn test_get_me_without_token_unauthorized(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let response = make_request(
            None,
            app,
            Method::GET,
            "/users/@me",
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_response_hides_credentials() {
        let response = Response {
            id: Uuid::new_v4(),
            username: "alice".into(),
            first_name: "Alice".into(),
            last_name: "Doe".into(),
            birth_country: "France".into(),
            living_country: "Belgium".into(),
            phone: None,
            roles: vec![BASE_ROLE.to_owned()],
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("email").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(json["roles"][0], BASE_ROLE);
    }
}
