//! HTTP shell: routes, CORS, body limits, and the blocking hand-off.
//!
//! | Route | Request | Success body |
//! |-------|---------|--------------|
//! | `POST /api/extract-text` | multipart, field `file` | `{"extractedText": ...}` |
//! | `POST /api/convert` | JSON `{text, format, filename}` | `{"fileData", "filename", "mimeType"}` |
//! | `GET /health` | | `{"status": "healthy", "version": ...}` |
//!
//! Failures are `{"error": ...}` with 400 for rejected input and 500 for
//! everything else. Each request's pipeline work runs on its own blocking
//! task; the shared [`PipelineConfig`] is read-only.

use crate::config::PipelineConfig;
use crate::error::TextportError;
use crate::output::TransportPayload;
use crate::service::{self, ConvertRequest, ExtractTextBody, ServiceError, Upload};
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Default cap on a request body: 50 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Clone)]
struct AppState {
    config: Arc<PipelineConfig>,
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
    version: &'static str,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Build the router with the default body limit.
pub fn create_router(config: PipelineConfig) -> Router {
    create_router_with_limit(config, DEFAULT_MAX_UPLOAD_BYTES)
}

/// Build the router with an explicit body limit in bytes.
pub fn create_router_with_limit(config: PipelineConfig, max_upload_bytes: usize) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };

    Router::new()
        .route("/api/extract-text", post(extract_handler))
        .route("/api/convert", post(convert_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Permissive unless `TEXTPORT_CORS_ORIGINS` lists allowed origins (comma-separated).
fn cors_layer() -> CorsLayer {
    let permissive = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let Ok(raw) = std::env::var("TEXTPORT_CORS_ORIGINS") else {
        return permissive;
    };
    let origins: Vec<HeaderValue> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect();

    if origins.is_empty() {
        warn!("TEXTPORT_CORS_ORIGINS is set but holds no valid origin; allowing all origins");
        return permissive;
    }
    info!("CORS restricted to {} origin(s)", origins.len());
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// `POST /api/extract-text`
async fn extract_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractTextBody>, ServiceError> {
    let mut multipart = multipart.map_err(|e| {
        debug!("Rejected non-multipart upload: {}", e.body_text());
        ServiceError::input("No file uploaded")
    })?;
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::input(format!("Invalid upload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ServiceError::input(format!("Invalid upload: {e}")))?;
        upload = Some(Upload {
            filename,
            bytes: bytes.to_vec(),
        });
        break;
    }

    let config = Arc::clone(&state.config);
    let body = tokio::task::spawn_blocking(move || service::handle_extract(upload.as_ref(), &config))
        .await
        .map_err(|e| {
            ServiceError::extraction(&TextportError::Internal(format!(
                "Extraction task panicked: {e}"
            )))
        })??;
    Ok(Json(body))
}

/// `POST /api/convert`
async fn convert_handler(
    State(state): State<AppState>,
    request: Result<Json<ConvertRequest>, JsonRejection>,
) -> Result<Json<TransportPayload>, ServiceError> {
    let Json(request) =
        request.map_err(|e| ServiceError::input(format!("Invalid JSON body: {}", e.body_text())))?;

    let config = Arc::clone(&state.config);
    let payload = tokio::task::spawn_blocking(move || service::handle_convert(&request, &config))
        .await
        .map_err(|e| {
            ServiceError::conversion(&TextportError::Internal(format!(
                "Conversion task panicked: {e}"
            )))
        })??;
    Ok(Json(payload))
}

/// `GET /health`
async fn health_handler() -> Json<HealthBody> {
    Json(HealthBody {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Bind `host:port` and serve until the process is stopped.
pub async fn serve(
    host: impl AsRef<str>,
    port: u16,
    config: PipelineConfig,
    max_upload_bytes: usize,
) -> Result<(), TextportError> {
    let ip: IpAddr = host
        .as_ref()
        .parse()
        .map_err(|e| TextportError::InvalidConfig(format!("Invalid host address: {e}")))?;
    let addr = SocketAddr::new(ip, port);
    let app = create_router_with_limit(config, max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| TextportError::Internal(format!("Cannot bind {addr}: {e}")))?;
    info!(
        "Listening on http://{} (upload limit {} bytes)",
        addr, max_upload_bytes
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| TextportError::Internal(e.to_string()))
}
