//! HTTP intake server.
//!
//! Exposes the import pipeline to spreadsheet frontends as a small JSON
//! API. A batch arrives as one multipart request: a `data` text part
//! (the record list, possibly double-encoded) plus any number of
//! `shop_photos` file parts. The transport concerns live here — saving
//! parts into the photo storage area, content negotiation, status codes —
//! while the pipeline itself is the same code the CLI drives.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/retailers` | Import one batch (multipart: `data` + `shop_photos`) |
//! | `GET`  | `/api/retailers` | List persisted retailer rows, newest first |
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `<public_prefix>/*` | Static service over the photo storage area |
//!
//! A malformed `data` payload is the only batch-fatal condition and maps
//! to `400`; row-scoped problems are returned inside the outcome counters
//! of a `200` response, so callers always see truthful tallies.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use sqlx::Row;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::db;
use crate::import;
use crate::migrate;
use crate::models::{ImportOutcome, UploadedFile};
use crate::payload;
use crate::storage::PhotoStorage;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    pool: sqlx::SqlitePool,
    storage: Arc<PhotoStorage>,
}

/// Start the intake server.
///
/// Runs schema migrations first (idempotent), binds to `[server].bind`,
/// and serves until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    migrate::run_migrations(config).await?;

    let bind_addr = config.server.bind.clone();
    let storage = Arc::new(PhotoStorage::open(&config.storage)?);
    let pool = db::connect(&config.db.path).await?;

    let state = AppState {
        config: Arc::new(config.clone()),
        pool,
        storage: storage.clone(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/retailers", post(handle_import).get(handle_list))
        .route("/health", get(handle_health))
        .nest_service(storage.public_prefix(), ServeDir::new(storage.root()))
        .layer(cors)
        .with_state(state);

    tracing::info!(bind = %bind_addr, "intake server listening");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// 400 — malformed request (including a batch-fatal `data` payload).
fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

/// 500 — storage or database failure outside any single row.
fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /api/retailers ============

#[derive(Serialize)]
struct ImportResponse {
    msg: String,
    imported: u64,
    skipped: u64,
    errors: Vec<crate::models::RowError>,
}

/// Import one batch. The multipart stream is drained first — every
/// `shop_photos` part is persisted before any row runs, matching the
/// contract that uploads exist before the pipeline consults them.
async fn handle_import(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, AppError> {
    let mut data: Option<String> = None;
    let mut uploads: Vec<UploadedFile> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("malformed multipart request: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("data") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| bad_request(format!("unreadable data field: {}", e)))?;
                data = Some(text);
            }
            Some("shop_photos") => {
                let original_name = match field.file_name().map(str::to_string) {
                    Some(n) if !n.is_empty() => n,
                    _ => continue,
                };
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(format!("unreadable file part: {}", e)))?;
                let saved = state
                    .storage
                    .save_upload(&original_name, &bytes)
                    .map_err(|e| internal(e.to_string()))?;
                uploads.push(saved);
            }
            _ => {}
        }
    }

    let data = data.ok_or_else(|| bad_request("missing data field"))?;
    let records =
        payload::parse_batch_str(&data).map_err(|e| bad_request(e.to_string()))?;

    tracing::info!(rows = records.len(), uploads = uploads.len(), "import batch received");

    let outcome: ImportOutcome = import::run_import(
        &state.pool,
        &state.storage,
        &state.config.drive,
        records,
        &uploads,
    )
    .await;

    Ok(Json(ImportResponse {
        msg: "Retailers imported".to_string(),
        imported: outcome.imported,
        skipped: outcome.skipped,
        errors: outcome.errors,
    }))
}

// ============ GET /api/retailers ============

#[derive(Debug, Clone, Serialize)]
struct RetailerRow {
    id: i64,
    timestamp: String,
    distributor_name: String,
    location: String,
    salesman_name: String,
    shop_name: String,
    shop_address: String,
    contact_person: String,
    contact_mobile: String,
    shop_age: String,
    shop_photo: Option<String>,
    google_map_link: String,
}

async fn handle_list(State(state): State<AppState>) -> Result<Json<Vec<RetailerRow>>, AppError> {
    let rows = sqlx::query("SELECT * FROM retailers ORDER BY id DESC")
        .fetch_all(&state.pool)
        .await
        .map_err(|e| internal(e.to_string()))?;

    let retailers = rows
        .iter()
        .map(|row| RetailerRow {
            id: row.get("id"),
            timestamp: row.get("timestamp"),
            distributor_name: row.get("distributor_name"),
            location: row.get("location"),
            salesman_name: row.get("salesman_name"),
            shop_name: row.get("shop_name"),
            shop_address: row.get("shop_address"),
            contact_person: row.get("contact_person"),
            contact_mobile: row.get("contact_mobile"),
            shop_age: row.get("shop_age"),
            shop_photo: row.get("shop_photo"),
            google_map_link: row.get("google_map_link"),
        })
        .collect();

    Ok(Json(retailers))
}
