use crate::services::sweep_service::SweepService;
use opentelemetry::{global, metrics::Counter};
use std::time::Duration as StdDuration;
use time::OffsetDateTime;
use tracing::Instrument;

#[derive(Clone, Debug)]
struct Metrics {
    swept: Counter<u64>,
    errors: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("droproom-server");
        Self {
            swept: meter
                .u64_counter("rooms_swept_total")
                .with_description("Total number of expired rooms reaped by the sweeper")
                .build(),
            errors: meter
                .u64_counter("room_sweep_errors_total")
                .with_description("Total number of errors encountered during room sweeps")
                .build(),
        }
    }
}

/// Periodic in-process driver for the expiry sweep. The sweep itself lives
/// in `SweepService` so the `POST /cleanup` endpoint and this worker share
/// one code path; the worker only supplies the timer and shutdown handling.
#[derive(Debug)]
pub struct RoomSweeperWorker {
    sweeper: SweepService,
    interval_secs: u64,
    metrics: Metrics,
}

impl RoomSweeperWorker {
    #[must_use]
    pub fn new(sweeper: SweepService, interval_secs: u64) -> Self {
        Self { sweeper, interval_secs, metrics: Metrics::new() }
    }

    pub async fn run(self, mut shutdown: tokio::sync::watch::Receiver<bool>) {
        let interval = StdDuration::from_secs(self.interval_secs);
        let mut next_tick = tokio::time::Instant::now() + interval;

        while !*shutdown.borrow() {
            tokio::select! {
                () = tokio::time::sleep_until(next_tick) => {
                    async {
                        tracing::debug!("Running room sweep...");

                        match self.sweeper.sweep(OffsetDateTime::now_utc()).await {
                            Ok(count) => {
                                if count > 0 {
                                    self.metrics.swept.add(count, &[]);
                                }
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "Room sweep cycle failed");
                                self.metrics.errors.add(1, &[]);
                            }
                        }
                    }
                    .instrument(tracing::info_span!("room_sweep_iteration"))
                    .await;
                    next_tick = tokio::time::Instant::now() + interval;
                }
                _ = shutdown.changed() => {}
            }
        }
        tracing::info!("Room sweeper loop shutting down...");
    }
}
