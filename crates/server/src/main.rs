// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};
use workload_api::{
    ApiError, HeatmapParams, HeatmapRequest, HeatmapResponse, InlineHeatmapRequest,
    SnapshotSource, WorkloadSnapshot, compute_heatmap,
};
use workload_domain::{DEFAULT_HORIZON_WEEKS, Horizon};

/// Workload Server - HTTP server for the resource workload heatmap
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON workload snapshot. If not provided, starts with an empty snapshot.
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Number of weekly buckets for requests that do not specify one
    #[arg(long, default_value_t = DEFAULT_HORIZON_WEEKS)]
    horizon_weeks: u32,
}

/// Application state shared across handlers.
///
/// The current snapshot sits behind a `RwLock` so it can be replaced while
/// requests are in flight. Handlers clone the inner `Arc` and release the
/// lock before computing.
#[derive(Clone)]
struct AppState {
    /// The snapshot heatmap requests are computed against.
    source: Arc<RwLock<Arc<SnapshotSource>>>,
    /// Horizon used when a request omits `horizon_weeks`.
    default_horizon: Horizon,
}

impl AppState {
    fn new(snapshot: WorkloadSnapshot, default_horizon: Horizon) -> Self {
        Self {
            source: Arc::new(RwLock::new(Arc::new(SnapshotSource::new(snapshot)))),
            default_horizon,
        }
    }
}

/// API response for a snapshot replacement.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotSummary {
    /// Number of assignments in the new snapshot.
    assignments: usize,
    /// Number of allocation entries in the new snapshot.
    allocations: usize,
    /// Number of roster resources in the new snapshot.
    resources: usize,
}

impl SnapshotSummary {
    fn of(snapshot: &WorkloadSnapshot) -> Self {
        Self {
            assignments: snapshot.assignments.len(),
            allocations: snapshot.allocations.len(),
            resources: snapshot.resources.len(),
        }
    }
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidInput { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
            ApiError::SourceUnavailable { .. } => {
                error!(error = %err, "Workload source error");
                Self {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                    message: err.to_string(),
                }
            }
        }
    }
}

/// Handler for GET `/heatmap` endpoint.
///
/// Computes the heatmap against the server's current snapshot.
async fn handle_get_heatmap(
    AxumState(app_state): AxumState<AppState>,
    Query(params): Query<HeatmapParams>,
) -> Result<Json<HeatmapResponse>, HttpError> {
    info!(
        reference_date = ?params.reference_date,
        horizon_weeks = ?params.horizon_weeks,
        "Handling get_heatmap request"
    );

    let request: HeatmapRequest =
        HeatmapRequest::from_params(&params)?.with_default_horizon(app_state.default_horizon);

    let source: Arc<SnapshotSource> = Arc::clone(&*app_state.source.read().await);
    let response: HeatmapResponse = compute_heatmap(source.as_ref(), &request).await?;

    Ok(Json(response))
}

/// Handler for POST `/heatmap` endpoint.
///
/// Computes the heatmap against a snapshot carried in the request body.
/// The server's own snapshot is not read or changed.
async fn handle_post_heatmap(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<InlineHeatmapRequest>,
) -> Result<Json<HeatmapResponse>, HttpError> {
    info!(
        assignments = req.snapshot.assignments.len(),
        resources = req.snapshot.resources.len(),
        "Handling post_heatmap request"
    );

    let request: HeatmapRequest =
        HeatmapRequest::from_params(&req.params)?.with_default_horizon(app_state.default_horizon);

    let source: SnapshotSource = SnapshotSource::new(req.snapshot);
    let response: HeatmapResponse = compute_heatmap(&source, &request).await?;

    Ok(Json(response))
}

/// Handler for PUT `/snapshot` endpoint.
///
/// Replaces the snapshot used by GET `/heatmap`. Requests already computing
/// keep the snapshot they started with.
async fn handle_put_snapshot(
    AxumState(app_state): AxumState<AppState>,
    Json(snapshot): Json<WorkloadSnapshot>,
) -> Json<SnapshotSummary> {
    let summary: SnapshotSummary = SnapshotSummary::of(&snapshot);
    info!(
        assignments = summary.assignments,
        allocations = summary.allocations,
        resources = summary.resources,
        "Replacing workload snapshot"
    );

    let source: Arc<SnapshotSource> = Arc::new(SnapshotSource::new(snapshot));
    *app_state.source.write().await = source;

    Json(summary)
}

/// Builds the application router with all routes.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/heatmap", get(handle_get_heatmap).post(handle_post_heatmap))
        .route("/snapshot", put(handle_put_snapshot))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Workload Server");

    let default_horizon: Horizon = Horizon::new(args.horizon_weeks)?;

    let snapshot: WorkloadSnapshot = if let Some(path) = &args.snapshot {
        info!("Loading snapshot from: {}", path.display());
        WorkloadSnapshot::from_json_file(path)?
    } else {
        info!("Starting with an empty snapshot");
        WorkloadSnapshot::default()
    };

    let app_state: AppState = AppState::new(snapshot, default_horizon);

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!(
        "Server listening on {} (default horizon {} weeks)",
        addr,
        default_horizon.weeks()
    );

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
