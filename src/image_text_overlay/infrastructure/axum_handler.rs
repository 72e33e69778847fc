use crate::application::overlay_service::OverlayService;
use crate::domain::response::OverlayResponse;
use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::header::HeaderName,
    routing::{get, post},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub overlay_service: Arc<OverlayService>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(vec![HeaderName::from_static("content-type")]);

    Router::new()
        .route("/invoke", post(invoke_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

// Always 200: the payload itself says whether the request succeeded.
pub async fn invoke_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Json<Option<OverlayResponse>> {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return Json(Some(OverlayResponse::failure(format!("invalid request body: {}", rejection))));
        }
    };

    // The pipeline blocks on network and disk, keep it off the async workers.
    let service = state.overlay_service.clone();
    match tokio::task::spawn_blocking(move || service.handle(payload)).await {
        Ok(response) => Json(response),
        Err(e) => {
            tracing::error!(error = %e, "overlay task did not complete");
            Json(Some(OverlayResponse::failure(format!("overlay task did not complete: {}", e))))
        }
    }
}

pub async fn health_handler() -> &'static str {
    "ok"
}
