use crate::config::Config;
use crate::services::file_service::FileService;
use crate::services::health_service::HealthService;
use crate::services::room_service::RoomService;
use crate::services::sweep_service::SweepService;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::Request;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_governor::GovernorLayer;
use tower_governor::governor::GovernorConfigBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub mod cleanup;
pub mod files;
pub mod health;
pub mod rooms;
pub mod schemas;

// Slack on top of the upload limit for multipart framing overhead; the
// per-file limit itself is enforced in the file service.
const MULTIPART_OVERHEAD_BYTES: usize = 1_048_576;

#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Config,
    pub room_service: RoomService,
    pub file_service: FileService,
    pub sweep_service: SweepService,
}

#[derive(Clone, Debug)]
pub struct MgmtState {
    pub health_service: HealthService,
}

#[derive(Debug)]
pub struct ServiceContainer {
    pub room_service: RoomService,
    pub file_service: FileService,
    pub sweep_service: SweepService,
}

/// Configures and returns the primary application router.
///
/// # Panics
/// Panics if the rate limiter configuration cannot be constructed.
pub fn app_router(config: Config, services: ServiceContainer) -> Router {
    let interval_ns = 1_000_000_000 / config.rate_limit.per_second.max(1);
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_nanosecond(u64::from(interval_ns))
            .burst_size(config.rate_limit.burst)
            .finish()
            .expect("Failed to build rate limiter config"),
    );

    let body_limit = config.uploads.max_size_bytes + MULTIPART_OVERHEAD_BYTES;

    let state = AppState {
        config,
        room_service: services.room_service,
        file_service: services.file_service,
        sweep_service: services.sweep_service,
    };

    let api_routes = Router::new()
        .route("/rooms", post(rooms::create_room))
        .route("/rooms/{code}", get(rooms::get_room).delete(rooms::delete_room))
        .route("/rooms/{code}/files", get(files::list_files).post(files::upload_file))
        .route("/cleanup", post(cleanup::run_cleanup))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(GovernorLayer::new(governor_conf));

    Router::new()
        .merge(api_routes)
        .layer(PropagateRequestIdLayer::new(axum::http::HeaderName::from_static("x-request-id")))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(move |request: &Request<Body>| {
                    let request_id = request
                        .extensions()
                        .get::<tower_http::request_id::RequestId>()
                        .map(|id| id.header_value().to_str().unwrap_or_default())
                        .unwrap_or_default()
                        .to_string();

                    tracing::info_span!(
                        "request",
                        "request_id" = %request_id,
                        "http.request.method" = %request.method(),
                        "url.path" = %request.uri().path(),
                        "http.response.status_code" = tracing::field::Empty,
                        "otel.kind" = "server",
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: std::time::Duration, _span: &tracing::Span| {
                        let status = response.status();
                        tracing::Span::current().record("http.response.status_code", status.as_u16());

                        tracing::info!(
                            latency_ms = %latency.as_millis(),
                            status = %status.as_u16(),
                            "request completed"
                        );
                    },
                )
                .on_failure(|error, _latency, _span: &tracing::Span| {
                    tracing::error!(error = %error, "request failed");
                }),
        )
        .layer(SetRequestIdLayer::new(axum::http::HeaderName::from_static("x-request-id"), MakeRequestUuid))
        .with_state(state)
}

pub fn mgmt_router(state: MgmtState) -> Router {
    Router::new().route("/livez", get(health::livez)).route("/readyz", get(health::readyz)).with_state(state)
}
