use chrono::Utc;
use log::{debug, error, info, warn};
use serde::Deserialize;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use super::types::{PollStatus, Publication, TelemetrySet};
use crate::backend::ClientError;

const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Anything that can produce the latest telemetry set.
pub trait TelemetrySource: Send + Sync + 'static {
    fn fetch_latest(&self) -> impl Future<Output = Result<TelemetrySet, ClientError>> + Send;
}

/// What to do when a tick fires while an earlier fetch is still outstanding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Issue the fetch anyway. Completions may arrive out of order.
    #[default]
    Allow,
    /// Skip the tick.
    Skip,
}

#[derive(Debug)]
struct Shared {
    cancelled: bool,
    sequence: u64,
    status: PollStatus,
    tx: watch::Sender<Option<Publication>>,
}

fn lock(shared: &StdMutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Read side of the poll loop: the latest published set and loop health.
#[derive(Debug, Clone)]
pub struct TelemetryView {
    shared: Arc<StdMutex<Shared>>,
    rx: watch::Receiver<Option<Publication>>,
}

impl TelemetryView {
    pub fn latest(&self) -> Option<Publication> {
        self.rx.borrow().clone()
    }

    pub fn status(&self) -> PollStatus {
        lock(&self.shared).status.clone()
    }

    /// A receiver that reports the current publication as unseen, if any.
    pub fn subscribe(&self) -> watch::Receiver<Option<Publication>> {
        self.rx.clone()
    }
}

#[derive(Debug)]
struct WorkerHandle {
    stop_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

/// Fixed-period telemetry fetcher publishing into a single latest-value slot.
pub struct PollLoop {
    view: TelemetryView,
    worker: Option<WorkerHandle>,
}

impl PollLoop {
    /// Starts polling. The first fetch fires immediately.
    pub fn start<S: TelemetrySource>(
        source: Arc<S>,
        period: Duration,
        overlap: OverlapPolicy,
    ) -> Self {
        let (tx, rx) = watch::channel(None);
        let shared = Arc::new(StdMutex::new(Shared {
            cancelled: false,
            sequence: 0,
            status: PollStatus {
                running: true,
                ..PollStatus::default()
            },
            tx,
        }));
        let (stop_tx, stop_rx) = oneshot::channel();
        let period = period.max(MIN_INTERVAL);

        info!(
            "Starting telemetry poll loop (period {:?}, overlap {:?})",
            period, overlap
        );
        let join = tokio::spawn(run_poll_loop(
            source,
            shared.clone(),
            period,
            overlap,
            stop_rx,
        ));

        Self {
            view: TelemetryView { shared, rx },
            worker: Some(WorkerHandle { stop_tx, join }),
        }
    }

    pub fn view(&self) -> TelemetryView {
        self.view.clone()
    }

    /// Halts future ticks. Fetches already in flight complete but are never published.
    pub async fn stop(&mut self) {
        cancel(&self.view.shared);
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop_tx.send(());
            let _ = worker.join.await;
            info!("Telemetry poll loop stopped");
        }
    }
}

impl Drop for PollLoop {
    fn drop(&mut self) {
        cancel(&self.view.shared);
        if let Some(worker) = self.worker.take() {
            worker.join.abort();
        }
    }
}

fn cancel(shared: &StdMutex<Shared>) {
    let mut locked = lock(shared);
    locked.cancelled = true;
    locked.status.running = false;
}

async fn run_poll_loop<S: TelemetrySource>(
    source: Arc<S>,
    shared: Arc<StdMutex<Shared>>,
    period: Duration,
    overlap: OverlapPolicy,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let outstanding = Arc::new(AtomicBool::new(false));

    loop {
        let should_stop = tokio::select! {
            _ = ticker.tick() => false,
            _ = &mut stop_rx => true,
        };
        if should_stop {
            return;
        }

        if overlap == OverlapPolicy::Skip && outstanding.swap(true, Ordering::AcqRel) {
            debug!("Previous telemetry fetch still outstanding, skipping tick");
            continue;
        }

        let source = source.clone();
        let shared = shared.clone();
        let outstanding = outstanding.clone();
        tokio::spawn(async move {
            let result = source.fetch_latest().await;
            outstanding.store(false, Ordering::Release);
            match result {
                Ok(telemetry) => publish(&shared, telemetry),
                Err(e) => record_failure(&shared, &e),
            }
        });
    }
}

fn publish(shared: &StdMutex<Shared>, telemetry: TelemetrySet) {
    let mut locked = lock(shared);
    if locked.cancelled {
        debug!("Discarding telemetry fetched after the poll loop stopped");
        return;
    }

    locked.sequence += 1;
    let publication = Publication {
        sequence: locked.sequence,
        received_at: Utc::now(),
        telemetry: Arc::new(telemetry),
    };
    locked.status.last_success = Some(publication.received_at);
    locked.status.last_error = None;
    locked.status.consecutive_failures = 0;
    locked.status.publications = publication.sequence;
    debug!(
        "Published telemetry #{} ({} snapshots)",
        publication.sequence,
        publication.telemetry.len()
    );
    locked.tx.send_replace(Some(publication));
}

fn record_failure(shared: &StdMutex<Shared>, err: &ClientError) {
    let mut locked = lock(shared);
    if locked.cancelled {
        return;
    }
    // The last published set stays in place.
    locked.status.consecutive_failures += 1;
    locked.status.last_error = Some(err.to_string());
    if err.is_transport() {
        warn!(
            "Telemetry poll failed ({} in a row): {}",
            locked.status.consecutive_failures, err
        );
    } else {
        error!(
            "Telemetry poll returned unusable data ({} in a row): {}",
            locked.status.consecutive_failures, err
        );
    }
}
