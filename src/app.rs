use anyhow::Context;
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use thiserror::Error;
use tower_http::cors::CorsLayer;

use crate::data::model::AnalysisReport;
use crate::error::ProfileError;
use crate::pipeline::analyze_bytes;
use crate::state::ServerConfig;

/// Multipart field carrying the profile table.
pub const FILE_FIELD: &str = "file";

// ---------------------------------------------------------------------------
// HTTP error mapping
// ---------------------------------------------------------------------------

/// Failures of the upload endpoint, each rendered as `{"error": message}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No file part")]
    NoFilePart,

    #[error("No selected file")]
    NoSelectedFile,

    #[error("{}", .0.body_text())]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    Analysis(#[from] ProfileError),

    #[error("analysis worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NoFilePart | ApiError::NoSelectedFile => StatusCode::BAD_REQUEST,
            ApiError::Multipart(err) => err.status(),
            ApiError::Analysis(_) | ApiError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            log::error!("POST /process failed: {message}");
        } else {
            log::warn!("POST /process rejected ({status}): {message}");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

/// The service: `POST /process`, CORS open to every origin.
pub fn router(config: &ServerConfig) -> Router {
    Router::new()
        .route("/process", post(process_file))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(CorsLayer::permissive())
}

/// Accept a multipart upload, analyse the `file` part on the blocking pool.
async fn process_file(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisReport>, ApiError> {
    // A body that is not multipart/form-data carries no file part at all.
    let mut multipart = multipart.map_err(|rejection| {
        log::debug!("not a multipart upload: {}", rejection.body_text());
        ApiError::NoFilePart
    })?;
    let mut upload = None;
    let mut field_names = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        // Parts without a filename are plain form values, not files.
        let file_name = field.file_name().map(str::to_string);
        field_names.push(name.clone());

        if name == FILE_FIELD && upload.is_none() {
            if let Some(file_name) = file_name {
                let bytes = field.bytes().await?;
                upload = Some((file_name, bytes));
            }
        }
    }
    log::debug!("multipart fields: {field_names:?}");

    let (file_name, bytes) = upload.ok_or(ApiError::NoFilePart)?;
    if file_name.is_empty() {
        return Err(ApiError::NoSelectedFile);
    }
    log::info!("Processing upload '{file_name}' ({} bytes)", bytes.len());

    let report = tokio::task::spawn_blocking(move || analyze_bytes(&bytes)).await??;
    Ok(Json(report))
}

// ---------------------------------------------------------------------------
// Server loop
// ---------------------------------------------------------------------------

/// Bind and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    log::info!(
        "Listening on http://{} (max upload {} bytes)",
        listener.local_addr()?,
        config.max_upload_bytes
    );

    axum::serve(listener, router(&config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {err}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
}
