#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

use droproom_server::adapters::database::file_repo::FileRepository;
use droproom_server::adapters::database::room_repo::RoomRepository;
use droproom_server::adapters::storage::{self, ObjectStorage, S3Storage};
use droproom_server::api::{MgmtState, ServiceContainer};
use droproom_server::config::Config;
use droproom_server::services::{FileService, HealthService, RoomService, SweepService};
use droproom_server::workers::RoomSweeperWorker;
use droproom_server::{adapters, api, telemetry};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::Instrument;

fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            return;
        }
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();
    telemetry::init_telemetry(&config.telemetry)?;

    let boot_span = tracing::info_span!("boot_server");
    let (api_listener, mgmt_listener, app_router, mgmt_app, shutdown_tx, shutdown_rx, sweeper) = async {
        // Phase 1: Infrastructure Setup (Resources)
        let pool = adapters::database::init_pool(&config.database).await?;
        sqlx::migrate!().run(&pool).await?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        spawn_signal_handler(shutdown_tx.clone());

        let s3_client = storage::init_s3_client(&config.storage).await;
        let store: Arc<dyn ObjectStorage> =
            Arc::new(S3Storage::new(s3_client.clone(), config.storage.bucket.clone()));

        // Phase 2: Component Wiring (Pure logic, no side effects)
        let file_service =
            FileService::new(pool.clone(), FileRepository::new(), Arc::clone(&store), config.uploads.clone());
        let room_service =
            RoomService::new(pool.clone(), RoomRepository::new(), file_service.clone(), config.rooms.clone());
        let sweep_service = SweepService::new(pool.clone(), RoomRepository::new(), room_service.clone());
        let health_service =
            HealthService::new(pool, s3_client, config.storage.bucket.clone(), config.health.clone());

        let sweeper = (config.rooms.sweep_interval_secs > 0)
            .then(|| RoomSweeperWorker::new(sweep_service.clone(), config.rooms.sweep_interval_secs));

        // Phase 3: Runtime Setup (Listeners and Routers)
        let app_router = api::app_router(
            config.clone(),
            ServiceContainer { room_service, file_service, sweep_service },
        );
        let mgmt_app = api::mgmt_router(MgmtState { health_service });

        let api_addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
        let mgmt_addr: SocketAddr = format!("{}:{}", config.server.host, config.server.mgmt_port).parse()?;

        tracing::info!(address = %api_addr, "listening");
        tracing::info!(address = %mgmt_addr, "management server listening");

        let api_listener = tokio::net::TcpListener::bind(api_addr).await?;
        let mgmt_listener = tokio::net::TcpListener::bind(mgmt_addr).await?;

        Ok::<
            (
                tokio::net::TcpListener,
                tokio::net::TcpListener,
                axum::Router,
                axum::Router,
                watch::Sender<bool>,
                watch::Receiver<bool>,
                Option<RoomSweeperWorker>,
            ),
            anyhow::Error,
        >((api_listener, mgmt_listener, app_router, mgmt_app, shutdown_tx, shutdown_rx, sweeper))
    }
    .instrument(boot_span)
    .await?;

    // Phase 4: Start Runtime (Explicit Spawning and Listening)
    let mut worker_tasks = Vec::new();
    if let Some(sweeper) = sweeper {
        worker_tasks.push(tokio::spawn(sweeper.run(shutdown_rx.clone())));
    }

    let mut api_rx = shutdown_rx.clone();
    let api_server = axum::serve(api_listener, app_router.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(async move {
            let _ = api_rx.wait_for(|&s| s).await;
        });

    let mut mgmt_rx = shutdown_rx.clone();
    let mgmt_server = axum::serve(mgmt_listener, mgmt_app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(async move {
            let _ = mgmt_rx.wait_for(|&s| s).await;
        });

    if let Err(e) = tokio::try_join!(api_server, mgmt_server) {
        tracing::error!(error = %e, "Server error");
    }

    // Phase 5: Graceful Shutdown Orchestration
    let _ = shutdown_tx.send(true);
    tokio::select! {
        () = async {
            futures::future::join_all(worker_tasks).await;
        } => {
            tracing::info!("Background tasks finished.");
        }
        () = tokio::time::sleep(std::time::Duration::from_secs(config.server.shutdown_timeout_secs)) => {
            tracing::warn!("Timeout waiting for background tasks to finish.");
        }
    }

    Ok(())
}
