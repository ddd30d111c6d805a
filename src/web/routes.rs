use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, put},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use super::{
    handlers::{create_item, delete_item, healthcheck, list_items, update_item},
    state::AppState,
};

pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/api/health", get(healthcheck))
        .route("/api/items", get(list_items).post(create_item))
        .route("/api/items/:id", put(update_item).delete(delete_item))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS restricted to an explicit origin allow-list. Requests without an
/// `Origin` header pass through untouched.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            // tower-http refuses a wildcard inside an explicit list
            Ok(value) if value != "*" => Some(value),
            _ => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_headers([header::CONTENT_TYPE])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
}
