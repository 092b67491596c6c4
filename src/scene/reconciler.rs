use log::{debug, info};
use serde::Serialize;
use std::collections::HashSet;
use utoipa::ToSchema;

use super::engine::{Entity, MarkerStyle, SceneEngine};
use super::geodesy::snapshot_position;
use crate::telemetry::TelemetrySnapshot;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReconcileReport {
    pub created: usize,
    pub updated: usize,
    pub swept: usize,
}

/// Converges the engine's entity set onto the latest telemetry.
///
/// One entity exists per satellite id ever observed. Entities are created on
/// first sight and afterwards only moved. With `sweep_missing` enabled,
/// entities whose id is absent from a non-empty set are removed as well.
pub struct SceneReconciler<E: SceneEngine> {
    engine: Option<E>,
    style: MarkerStyle,
    sweep_missing: bool,
}

impl<E: SceneEngine> SceneReconciler<E> {
    pub fn new(engine: E, style: MarkerStyle) -> Self {
        Self {
            engine: Some(engine),
            style,
            sweep_missing: false,
        }
    }

    pub fn with_sweep(mut self, sweep_missing: bool) -> Self {
        self.sweep_missing = sweep_missing;
        self
    }

    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    pub fn is_torn_down(&self) -> bool {
        self.engine.is_none()
    }

    pub fn entities(&self) -> Vec<Entity> {
        self.engine
            .as_ref()
            .map(|engine| engine.entities())
            .unwrap_or_default()
    }

    pub fn reconcile(&mut self, telemetry: &[TelemetrySnapshot]) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        let Some(engine) = self.engine.as_mut() else {
            debug!("Scene torn down, ignoring {} snapshots", telemetry.len());
            return report;
        };
        if engine.is_destroyed() {
            return report;
        }

        // Duplicate ids in one set: the later snapshot wins.
        for snapshot in telemetry {
            let id = snapshot.satellite_id.as_str();
            let position = snapshot_position(snapshot);
            if engine.contains(id) {
                engine.set_position(id, position);
                report.updated += 1;
            } else {
                engine.add_entity(id, position, self.style);
                report.created += 1;
            }
        }

        // An empty set means "no telemetry yet", never "everything vanished".
        if self.sweep_missing && !telemetry.is_empty() {
            let present: HashSet<&str> = telemetry
                .iter()
                .map(|snapshot| snapshot.satellite_id.as_str())
                .collect();
            for id in engine.entity_ids() {
                if !present.contains(id.as_str()) && engine.remove_entity(&id) {
                    report.swept += 1;
                }
            }
        }

        report
    }

    /// Destroys the engine exactly once. Later calls do nothing.
    pub fn teardown(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            if !engine.is_destroyed() {
                engine.destroy();
            }
            info!("Scene torn down");
        }
    }
}

impl<E: SceneEngine> Drop for SceneReconciler<E> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::geodesy::Cartesian3;
    use crate::scene::{MemoryEngine, Rgba};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn snapshot(id: &str, latitude_deg: f64, altitude_km: Option<f64>) -> TelemetrySnapshot {
        TelemetrySnapshot {
            satellite_id: id.to_string(),
            timestamp_utc: "2026-01-27T12:00:00Z".parse().unwrap(),
            latitude_deg,
            longitude_deg: 20.0,
            altitude_km,
            extra: None,
        }
    }

    fn reconciler() -> SceneReconciler<MemoryEngine> {
        SceneReconciler::new(MemoryEngine::new(), MarkerStyle::default())
    }

    fn ids(reconciler: &SceneReconciler<MemoryEngine>) -> Vec<String> {
        reconciler.entities().into_iter().map(|e| e.id).collect()
    }

    #[test]
    fn creates_then_moves_the_same_entity() {
        let mut scene = reconciler();

        let report = scene.reconcile(&[snapshot("SAT-1", 10.0, Some(500.0))]);
        assert_eq!(report.created, 1);
        let entities = scene.entities();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].id, "SAT-1");
        assert_eq!(
            entities[0].position,
            Cartesian3::from_degrees(20.0, 10.0, 500_000.0)
        );

        let report = scene.reconcile(&[snapshot("SAT-1", 11.0, Some(500.0))]);
        assert_eq!(report.created, 0);
        assert_eq!(report.updated, 1);
        let entities = scene.entities();
        assert_eq!(entities.len(), 1);
        assert_eq!(
            entities[0].position,
            Cartesian3::from_degrees(20.0, 11.0, 500_000.0)
        );

        let stats = scene.engine().unwrap().stats();
        assert_eq!(stats.adds, 1);
        assert_eq!(stats.position_writes, 1);
    }

    #[test]
    fn reconciling_twice_is_idempotent() {
        let set = vec![
            snapshot("SAT-1", 10.0, Some(500.0)),
            snapshot("SAT-2", -45.0, None),
        ];
        let mut once = reconciler();
        once.reconcile(&set);

        let mut twice = reconciler();
        twice.reconcile(&set);
        twice.reconcile(&set);

        assert_eq!(once.entities(), twice.entities());
    }

    #[test]
    fn ids_accumulate_when_satellites_disappear() {
        let mut scene = reconciler();
        scene.reconcile(&[snapshot("SAT-1", 1.0, None), snapshot("SAT-2", 2.0, None)]);
        scene.reconcile(&[snapshot("SAT-2", 3.0, None)]);
        scene.reconcile(&[]);

        assert_eq!(ids(&scene), vec!["SAT-1", "SAT-2"]);
        assert_eq!(scene.engine().unwrap().stats().removals, 0);
    }

    #[test]
    fn stale_set_only_resets_positions() {
        let older = vec![snapshot("SAT-1", 10.0, Some(400.0))];
        let newer = vec![
            snapshot("SAT-1", 12.0, Some(400.0)),
            snapshot("SAT-2", 0.0, Some(400.0)),
        ];
        let mut scene = reconciler();
        scene.reconcile(&newer);
        scene.reconcile(&older);

        let entities = scene.entities();
        assert_eq!(entities.len(), 2);
        assert_eq!(
            entities[0].position,
            Cartesian3::from_degrees(20.0, 10.0, 400_000.0)
        );
        assert_eq!(
            entities[1].position,
            Cartesian3::from_degrees(20.0, 0.0, 400_000.0)
        );
    }

    #[test]
    fn duplicate_ids_in_one_set_take_the_last_value() {
        let mut scene = reconciler();
        let report = scene.reconcile(&[
            snapshot("SAT-1", 10.0, None),
            snapshot("SAT-1", 30.0, None),
        ]);

        assert_eq!(report.created, 1);
        assert_eq!(report.updated, 1);
        let entities = scene.entities();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].position, Cartesian3::from_degrees(20.0, 30.0, 0.0));
    }

    #[test]
    fn style_is_applied_once_at_creation() {
        let style = MarkerStyle {
            pixel_size: 6,
            color: Rgba::new(255, 0, 0, 255),
        };
        let mut scene = SceneReconciler::new(MemoryEngine::new(), style);
        for latitude in [1.0, 2.0, 3.0] {
            scene.reconcile(&[snapshot("SAT-1", latitude, None)]);
        }

        assert_eq!(scene.entities()[0].style, style);
        assert_eq!(scene.engine().unwrap().stats().adds, 1);
    }

    #[test]
    fn sweep_removes_vanished_ids_but_not_on_empty_sets() {
        let mut scene = reconciler().with_sweep(true);
        scene.reconcile(&[snapshot("SAT-1", 1.0, None), snapshot("SAT-2", 2.0, None)]);

        let report = scene.reconcile(&[]);
        assert_eq!(report.swept, 0);
        assert_eq!(ids(&scene).len(), 2);

        let report = scene.reconcile(&[snapshot("SAT-2", 2.5, None)]);
        assert_eq!(report.swept, 1);
        assert_eq!(ids(&scene), vec!["SAT-2"]);
    }

    /// Memory engine that counts destroy calls across its own lifetime.
    struct CountingEngine {
        inner: MemoryEngine,
        destroy_calls: Arc<AtomicUsize>,
        destroyed_externally: bool,
    }

    impl SceneEngine for CountingEngine {
        fn contains(&self, id: &str) -> bool {
            self.inner.contains(id)
        }
        fn add_entity(&mut self, id: &str, position: Cartesian3, style: MarkerStyle) {
            self.inner.add_entity(id, position, style)
        }
        fn set_position(&mut self, id: &str, position: Cartesian3) -> bool {
            self.inner.set_position(id, position)
        }
        fn remove_entity(&mut self, id: &str) -> bool {
            self.inner.remove_entity(id)
        }
        fn entity_ids(&self) -> Vec<String> {
            self.inner.entity_ids()
        }
        fn entities(&self) -> Vec<Entity> {
            self.inner.entities()
        }
        fn is_destroyed(&self) -> bool {
            self.destroyed_externally || self.inner.is_destroyed()
        }
        fn destroy(&mut self) {
            self.destroy_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.destroy();
        }
    }

    #[test]
    fn teardown_destroys_engine_exactly_once() {
        let destroy_calls = Arc::new(AtomicUsize::new(0));
        let engine = CountingEngine {
            inner: MemoryEngine::new(),
            destroy_calls: destroy_calls.clone(),
            destroyed_externally: false,
        };
        let mut scene = SceneReconciler::new(engine, MarkerStyle::default());
        scene.reconcile(&[snapshot("SAT-1", 1.0, None)]);

        scene.teardown();
        scene.teardown();
        drop(scene);

        assert_eq!(destroy_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn teardown_skips_engine_already_destroyed() {
        let destroy_calls = Arc::new(AtomicUsize::new(0));
        let engine = CountingEngine {
            inner: MemoryEngine::new(),
            destroy_calls: destroy_calls.clone(),
            destroyed_externally: true,
        };
        let mut scene = SceneReconciler::new(engine, MarkerStyle::default());

        let report = scene.reconcile(&[snapshot("SAT-1", 1.0, None)]);
        assert_eq!(report, ReconcileReport::default());

        scene.teardown();
        assert_eq!(destroy_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn reconcile_after_teardown_is_a_no_op() {
        let mut scene = reconciler();
        scene.reconcile(&[snapshot("SAT-1", 1.0, None)]);
        scene.teardown();

        assert!(scene.is_torn_down());
        assert_eq!(
            scene.reconcile(&[snapshot("SAT-2", 1.0, None)]),
            ReconcileReport::default()
        );
        assert!(scene.entities().is_empty());
    }
}
