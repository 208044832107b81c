use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use search_core::{SearchError, SearchOutcome, SearchRequest, SearchService};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any as CorsAny, CorsLayer};
use tower_http::trace::TraceLayer;

/// Converts a [`SearchError`] into a JSON response with the matching status.
pub struct ApiError(pub SearchError);

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(code = self.0.code(), error = %self.0, "server error");
        } else {
            tracing::warn!(code = self.0.code(), error = %self.0, "client error");
        }
        (status, Json(self.0.to_body())).into_response()
    }
}

pub fn build_app(service: SearchService) -> Router {
    let routes = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/search", get(search_handler))
        .route("/search", get(search_handler))
        .with_state(service);
    with_service_layers(routes)
}

/// Panic recovery, request tracing and CORS shared by every route.
pub fn with_service_layers(router: Router) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(CorsAny).allow_methods(CorsAny).allow_headers(CorsAny)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(CorsAny).allow_headers(CorsAny)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(CorsAny).allow_methods(CorsAny).allow_headers(CorsAny),
    };

    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// `?doc_id=` for a detail lookup, otherwise `?q=&top_k=` for a ranked search.
/// Repeated keys resolve to their first value.
pub async fn search_handler(
    State(service): State<SearchService>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<SearchOutcome>, ApiError> {
    let req = SearchRequest::from_pairs(pairs);
    Ok(Json(service.handle(&req)?))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "request handler panicked".to_string()
    };
    ApiError(SearchError::Runtime { message }).into_response()
}
