use crate::handlers::{self, AppState};
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

/// Largest accepted request body (CSV uploads included).
pub const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// The `/api` routes, without state. Callers may add layers (e.g. rate
/// limiting) before handing them to [`app`].
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/leads/upload", post(handlers::upload_leads))
        .route(
            "/api/leads",
            get(handlers::list_leads).delete(handlers::delete_all_leads),
        )
        .route("/api/leads/:id", get(handlers::get_lead))
        .route("/api/dashboard", get(handlers::dashboard))
        // Request size limit: 5MB max payload (replaces axum's 2MB multipart default)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
}

/// Assemble the full application: health check, API routes, tracing, CORS.
pub fn app(state: Arc<AppState>, api: Router<Arc<AppState>>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .merge(api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// The application with default API routes; what tests and tools use.
pub fn router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    app(state, api_routes(), cors)
}

/// Build the CORS layer for the configured origins.
///
/// `*` allows any origin without credentials. An explicit list allows
/// credentials and mirrors the requested methods and headers.
pub fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    if origins.iter().any(|o| o == "*") {
        return Ok(CorsLayer::permissive());
    }

    let origins = origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}
