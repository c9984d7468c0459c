//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Product catalog browsing and user registration backed by MongoDB",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        crate::api::welcome,
        crate::api::health::readiness_check,
        axum_helpers::server::health::health_handler,
    ),
    components(schemas(axum_helpers::ErrorResponse, axum_helpers::HealthResponse)),
    nest(
        (path = "/products", api = domain_products::ApiDoc),
        (path = "/users", api = domain_users::ApiDoc)
    ),
    tags(
        (name = "root", description = "Service greeting"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
