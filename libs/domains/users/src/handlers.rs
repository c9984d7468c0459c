use axum::{Json, Router, extract::State, routing::post};
use axum_helpers::{
    ValidatedJson,
    errors::responses::{BadRequestValidationResponse, InternalServerErrorResponse},
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{RegisterUser, RegistrationOutcome};
use crate::repository::UserRepository;
use crate::service::UserService;

#[derive(OpenApi)]
#[openapi(
    paths(register_user),
    components(
        schemas(RegistrationOutcome),
        responses(BadRequestValidationResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "Users", description = "User registration")
    )
)]
pub struct ApiDoc;

pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", post(register_user))
        .with_state(shared_service)
}

/// Register a user, idempotent by email
///
/// Both outcomes return 200; a duplicate email yields `insertedId: null`.
#[utoipa::path(
    post,
    path = "",
    tag = "Users",
    request_body(
        content = Object,
        description = "`email` (required, non-empty) plus any profile fields"
    ),
    responses(
        (status = 200, description = "Registered, or already registered", body = RegistrationOutcome),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<RegisterUser>,
) -> UserResult<Json<RegistrationOutcome>> {
    let outcome = service.register(input).await?;
    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn post_json(app: Router, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_created() {
        let mut mock = MockUserRepository::new();
        mock.expect_insert_if_absent()
            .withf(|u| u.email == "ada@example.com" && u.profile.contains_key("name"))
            .returning(|_| Ok(Some("65f1c0ffee0000000000abcd".to_string())));

        let (status, body) = post_json(
            router(UserService::new(mock)),
            json!({ "email": "ada@example.com", "name": "Ada" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["acknowledged"], true);
        assert_eq!(body["insertedId"], "65f1c0ffee0000000000abcd");
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let mut mock = MockUserRepository::new();
        mock.expect_insert_if_absent().returning(|_| Ok(None));

        let (status, body) = post_json(
            router(UserService::new(mock)),
            json!({ "email": "ada@example.com" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "User already exists", "insertedId": null }));
    }

    #[tokio::test]
    async fn test_empty_email_is_400() {
        let (status, body) = post_json(
            router(UserService::new(MockUserRepository::new())),
            json!({ "email": "" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert!(body["details"]["email"].is_array());
    }

    #[tokio::test]
    async fn test_dotted_field_name_is_400() {
        let (status, body) = post_json(
            router(UserService::new(MockUserRepository::new())),
            json!({ "email": "ada@example.com", "address.city": "London" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert!(body["details"]["profile"].is_array());
    }

    #[tokio::test]
    async fn test_missing_email_is_rejected() {
        let (status, body) = post_json(
            router(UserService::new(MockUserRepository::new())),
            json!({ "name": "Ada" }),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "JSON_EXTRACTION");
    }
}
