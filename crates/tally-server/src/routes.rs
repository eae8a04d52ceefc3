//! HTTP surface for the sequence allocator.
//!
//! One route does the work: `POST /v1/sequences/{name}` allocates the next
//! identifier for that sequence and returns it as JSON. The allocator is
//! injected through shared state; handlers hold no counter state of their
//! own.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tally::{FileStore, MemoryStore, Result, SequenceAllocator, SequenceStore};
use tower_http::cors::{Any, CorsLayer};

/// The store backend selected at startup.
pub enum Backend {
    Memory(MemoryStore),
    File(FileStore),
}

impl SequenceStore for Backend {
    async fn fetch_and_increment(&self, name: &str) -> Result<u64> {
        match self {
            Self::Memory(store) => store.fetch_and_increment(name).await,
            Self::File(store) => store.fetch_and_increment(name).await,
        }
    }
}

/// Shared state: the injected allocator.
#[derive(Clone)]
pub struct AppState {
    allocator: Arc<SequenceAllocator<Backend>>,
}

impl AppState {
    pub fn new(backend: Backend) -> Self {
        Self {
            allocator: Arc::new(SequenceAllocator::new(backend)),
        }
    }
}

/// Builds the service router. CORS is wide open, matching the browsers-
/// first clients this service fronts.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/sequences/{name}", post(allocate))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct AllocatedId {
    name: String,
    value: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps allocator errors onto HTTP statuses: rejected names are the
/// client's fault, everything else means the store let us down.
struct ApiError(tally::Error);

impl From<tally::Error> for ApiError {
    fn from(err: tally::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            tally::Error::InvalidSequenceName { .. } | tally::Error::InvalidInput { .. } => {
                StatusCode::BAD_REQUEST
            }
            tally::Error::StorageUnavailable { .. } | tally::Error::SequenceExhausted { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        };
        if status.is_server_error() {
            tracing::error!("allocation failed: {}", self.0);
        }
        (
            status,
            Json(ErrorBody {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

async fn healthz() -> &'static str {
    "ok"
}

#[tracing::instrument(skip(state))]
async fn allocate(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> core::result::Result<Response, ApiError> {
    let value = state.allocator.allocate(&name).await?;
    Ok((StatusCode::CREATED, Json(AllocatedId { name, value })).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> Router {
        router(AppState::new(Backend::Memory(MemoryStore::new())))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn healthz_responds() {
        let response = app()
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn allocation_counts_up_per_sequence() {
        let app = app();

        for expected in ["1", "2"] {
            let response = app
                .clone()
                .oneshot(
                    Request::post("/v1/sequences/pantryIdCounter")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);

            let json = body_json(response).await;
            assert_eq!(json["name"], "pantryIdCounter");
            assert_eq!(json["value"], expected);
        }

        // A different sequence is untouched by the two above.
        let response = app
            .oneshot(
                Request::post("/v1/sequences/badgeIdCounter")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["value"], "1");
    }

    #[tokio::test]
    async fn unknown_routes_are_not_found() {
        let response = app()
            .oneshot(
                Request::post("/v1/sequences")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
