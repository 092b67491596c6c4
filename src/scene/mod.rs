mod engine;
mod geodesy;
mod memory;
mod reconciler;

pub use engine::{Entity, MarkerStyle, Rgba, SceneEngine};
pub use geodesy::Cartesian3;
pub use memory::MemoryEngine;
pub use reconciler::SceneReconciler;

use log::debug;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::telemetry::Publication;

pub type SharedScene = Arc<StdMutex<SceneReconciler<MemoryEngine>>>;

pub fn lock_scene<E: SceneEngine>(
    scene: &StdMutex<SceneReconciler<E>>,
) -> MutexGuard<'_, SceneReconciler<E>> {
    scene.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Reconciles every publication seen on `rx` into `scene`. This task is the
/// only writer of the scene.
pub fn spawn_scene_task<E>(
    scene: Arc<StdMutex<SceneReconciler<E>>>,
    mut rx: watch::Receiver<Option<Publication>>,
) -> JoinHandle<()>
where
    E: SceneEngine + Send + 'static,
{
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let Some(publication) = rx.borrow_and_update().clone() else {
                continue;
            };
            let report = lock_scene(&scene).reconcile(&publication.telemetry);
            debug!(
                "Reconciled telemetry #{}: {} created, {} updated, {} swept",
                publication.sequence, report.created, report.updated, report.swept
            );
        }
    })
}
