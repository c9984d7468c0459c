//! API routes
//!
//! Routes are mounted at the root by `axum_helpers::create_router`.

pub mod health;
pub mod products;
pub mod users;

use axum::{Router, routing::get};
use axum_helpers::health_router;

use crate::state::AppState;

pub const WELCOME_MESSAGE: &str = "Welcome to the Evershop server";

pub fn routes(state: &AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .nest("/products", products::router(state))
        .nest("/users", users::router(state))
        .merge(health::router(state.clone()))
        .merge(health_router(state.config.app))
}

/// Create the indexes every domain relies on.
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    products::repository(state).init_indexes().await?;
    users::repository(state).init_indexes().await?;
    Ok(())
}

/// Plain-text greeting
#[utoipa::path(
    get,
    path = "/",
    tag = "root",
    responses((status = 200, description = "Welcome message", body = String, content_type = "text/plain"))
)]
pub async fn welcome() -> &'static str {
    WELCOME_MESSAGE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::unreachable_state;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn send(request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let app = routes(&unreachable_state().await);
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_welcome() {
        let (status, body) = send(Request::builder().uri("/").body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, WELCOME_MESSAGE.as_bytes());
    }

    #[tokio::test]
    async fn test_health_passes_through_common_middleware() {
        let state = unreachable_state().await;
        let app = axum_helpers::create_router::<crate::openapi::ApiDoc>(
            routes(&state),
            &state.config.cors,
        )
        .unwrap();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    }

    #[tokio::test]
    async fn test_products_route_validates_before_querying() {
        let (status, _) = send(
            Request::builder()
                .uri("/products?limit=0")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_users_route_validates_before_writing() {
        let (status, _) = send(
            Request::builder()
                .method("POST")
                .uri("/users")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"email":""}"#))
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_database_outage_is_generic_500() {
        let (status, body) = send(
            Request::builder()
                .uri("/products")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"], "An internal server error occurred");
    }
}
