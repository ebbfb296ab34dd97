use bevy::prelude::*;

use super::hit_test::Hit;
use crate::engine::scene::{NodeId, SceneGraph, ZoneId, ZoneRegistry};

/// Zone under the pointer. The selection is either empty or exactly one
/// zone root, recomputed on every pointer event.
#[derive(Resource, Debug, Default)]
pub struct HoverHighlight {
    selection: Option<NodeId>,
    zone: Option<ZoneId>,
    pointed: Option<NodeId>,
}

impl HoverHighlight {
    /// Root node of the highlighted zone, fed to the outline pass.
    pub fn selection(&self) -> Option<NodeId> {
        self.selection
    }

    pub fn zone(&self) -> Option<ZoneId> {
        self.zone
    }

    /// Node the pointer ray hit, zone member or not.
    pub fn pointed(&self) -> Option<NodeId> {
        self.pointed
    }

    pub fn update(
        &mut self,
        hit: Option<Hit>,
        scene: &SceneGraph,
        zones: &ZoneRegistry,
    ) -> Option<ZoneId> {
        self.pointed = hit.map(|hit| hit.node);
        let zone = self.pointed.and_then(|node| zones.zone_containing(scene, node));

        if zone != self.zone {
            debug!("Hover zone changed: {:?} -> {:?}", self.zone, zone);
        }
        self.zone = zone;
        self.selection = zone.and_then(|id| zones.get(id)).map(|zone| zone.root);
        zone
    }
}
