use log::{debug, warn};
use std::collections::BTreeMap;

use super::engine::{Entity, MarkerStyle, SceneEngine};
use super::geodesy::Cartesian3;

/// Counts of engine-side operations, for observing churn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub adds: u64,
    pub position_writes: u64,
    pub removals: u64,
    pub destroys: u64,
}

/// In-process scene graph keyed by entity id.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    entities: BTreeMap<String, Entity>,
    destroyed: bool,
    stats: EngineStats,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }
}

impl SceneEngine for MemoryEngine {
    fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    fn add_entity(&mut self, id: &str, position: Cartesian3, style: MarkerStyle) {
        if self.destroyed {
            warn!("Ignoring add of {} on a destroyed scene", id);
            return;
        }
        self.stats.adds += 1;
        self.entities.insert(
            id.to_string(),
            Entity {
                id: id.to_string(),
                position,
                style,
            },
        );
    }

    fn set_position(&mut self, id: &str, position: Cartesian3) -> bool {
        match self.entities.get_mut(id) {
            Some(entity) => {
                entity.position = position;
                self.stats.position_writes += 1;
                true
            }
            None => false,
        }
    }

    fn remove_entity(&mut self, id: &str) -> bool {
        let removed = self.entities.remove(id).is_some();
        if removed {
            self.stats.removals += 1;
        }
        removed
    }

    fn entity_ids(&self) -> Vec<String> {
        self.entities.keys().cloned().collect()
    }

    fn entities(&self) -> Vec<Entity> {
        self.entities.values().cloned().collect()
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        debug!("Destroying scene with {} entities", self.entities.len());
        self.entities.clear();
        self.destroyed = true;
        self.stats.destroys += 1;
    }
}
