use std::collections::HashSet;

use bevy::prelude::*;
use constants::navigation::PARKED_PANEL_TRANSLATION;

use super::error::SceneError;
use super::graph::{NodeId, SceneGraph};

/// Interned zone handle, the index of the zone in registry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZoneId(u16);

impl ZoneId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[cfg(test)]
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u16)
    }
}

/// Where the camera sits and what it looks at once a zone is reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub position: Vec3,
    pub target: Vec3,
}

/// World placement of the overlay panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelPose {
    pub translation: Vec3,
    /// Yaw in radians.
    pub rotation_y: f32,
    pub scale: f32,
}

impl PanelPose {
    /// Sentinel pose far outside the showroom.
    pub fn parked() -> Self {
        Self {
            translation: PARKED_PANEL_TRANSLATION,
            rotation_y: 0.0,
            scale: 1.0,
        }
    }

    pub fn is_parked(&self) -> bool {
        *self == Self::parked()
    }
}

#[derive(Debug, Clone)]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    pub root: NodeId,
    pub waypoint: Waypoint,
    pub teaser: Vec<NodeId>,
    pub detail: Vec<NodeId>,
    pub dismiss: Vec<NodeId>,
    pub panel: Option<PanelPose>,
    pub menu_label: String,
}

/// Zone description by node names, before interning.
#[derive(Debug, Clone)]
pub struct ZoneDefinition {
    pub name: String,
    pub waypoint: Waypoint,
    pub teaser: Vec<String>,
    pub detail: Vec<String>,
    pub dismiss: Vec<String>,
    pub panel: Option<PanelPose>,
    pub menu_label: Option<String>,
}

impl ZoneDefinition {
    pub fn new(name: impl Into<String>, waypoint: Waypoint) -> Self {
        Self {
            name: name.into(),
            waypoint,
            teaser: Vec::new(),
            detail: Vec::new(),
            dismiss: Vec::new(),
            panel: None,
            menu_label: None,
        }
    }
}

/// Ordered set of zones, immutable once built. Registry order decides which
/// zone wins a hit.
#[derive(Resource, Debug, Default)]
pub struct ZoneRegistry {
    zones: Vec<Zone>,
}

impl ZoneRegistry {
    pub fn build(definitions: &[ZoneDefinition], scene: &SceneGraph) -> Result<Self, SceneError> {
        let mut seen = HashSet::new();
        let mut zones: Vec<Zone> = Vec::with_capacity(definitions.len());

        for definition in definitions {
            if !seen.insert(definition.name.as_str()) {
                return Err(SceneError::DuplicateZone(definition.name.clone()));
            }

            let Some(root) = scene.lookup_by_name(&definition.name) else {
                warn!("Zone root '{}' not found in scene, zone skipped", definition.name);
                continue;
            };

            if let Some(other) = zones.iter().find(|zone| {
                scene.ancestor_match_id(root, zone.root) || scene.ancestor_match_id(zone.root, root)
            }) {
                return Err(SceneError::OverlappingZones {
                    first: other.name.clone(),
                    second: definition.name.clone(),
                });
            }

            let resolve = |names: &[String]| -> Vec<NodeId> {
                names
                    .iter()
                    .filter_map(|name| {
                        let found = scene.lookup_by_name(name);
                        if found.is_none() {
                            warn!("Zone '{}' member '{name}' not found", definition.name);
                        }
                        found
                    })
                    .collect()
            };

            zones.push(Zone {
                id: ZoneId(zones.len() as u16),
                name: definition.name.clone(),
                root,
                waypoint: definition.waypoint,
                teaser: resolve(&definition.teaser),
                detail: resolve(&definition.detail),
                dismiss: resolve(&definition.dismiss),
                panel: definition.panel,
                menu_label: definition
                    .menu_label
                    .clone()
                    .unwrap_or_else(|| definition.name.clone()),
            });
        }

        info!("Registered {} zones", zones.len());
        Ok(Self { zones })
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn get(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }

    pub fn lookup(&self, name: &str) -> Option<ZoneId> {
        self.zones.iter().find(|zone| zone.name == name).map(|zone| zone.id)
    }

    /// First zone, in registry order, whose subtree contains `node`.
    pub fn zone_containing(&self, scene: &SceneGraph, node: NodeId) -> Option<ZoneId> {
        self.zones
            .iter()
            .find(|zone| scene.ancestor_match_id(node, zone.root))
            .map(|zone| zone.id)
    }

    /// Zone whose dismiss affordance contains `node`.
    pub fn dismiss_target(&self, scene: &SceneGraph, node: NodeId) -> Option<ZoneId> {
        self.zones
            .iter()
            .find(|zone| {
                zone.dismiss
                    .iter()
                    .any(|&affordance| scene.ancestor_match_id(node, affordance))
            })
            .map(|zone| zone.id)
    }

    /// Rest visibility: teaser shown, detail and dismiss hidden.
    pub fn show_rest(&self, scene: &mut SceneGraph, id: ZoneId) {
        if let Some(zone) = self.get(id) {
            set_all(scene, &zone.teaser, true);
            set_all(scene, &zone.detail, false);
            set_all(scene, &zone.dismiss, false);
        }
    }

    /// Locked visibility: teaser hidden, detail and dismiss shown.
    pub fn show_detail(&self, scene: &mut SceneGraph, id: ZoneId) {
        if let Some(zone) = self.get(id) {
            set_all(scene, &zone.teaser, false);
            set_all(scene, &zone.detail, true);
            set_all(scene, &zone.dismiss, true);
        }
    }

    pub fn reset_all(&self, scene: &mut SceneGraph) {
        for zone in &self.zones {
            self.show_rest(scene, zone.id);
        }
    }
}

fn set_all(scene: &mut SceneGraph, nodes: &[NodeId], visible: bool) {
    for &node in nodes {
        scene.set_visible(node, visible);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{showroom_fixture, waypoint};

    #[test]
    fn build_interns_zones_in_order() {
        let fixture = showroom_fixture();

        assert_eq!(fixture.zones.len(), 2);
        assert_eq!(fixture.zones.lookup("drop"), Some(ZoneId(0)));
        assert_eq!(fixture.zones.lookup("signup"), Some(ZoneId(1)));
        let signup = fixture.zones.get(ZoneId(1)).unwrap();
        assert_eq!(signup.menu_label, "Sign up");
        assert!(signup.panel.is_some());
    }

    #[test]
    fn duplicate_zone_is_an_error() {
        let fixture = showroom_fixture();
        let defs = vec![
            ZoneDefinition::new("drop", waypoint()),
            ZoneDefinition::new("drop", waypoint()),
        ];

        assert_eq!(
            ZoneRegistry::build(&defs, &fixture.scene).unwrap_err(),
            SceneError::DuplicateZone("drop".into())
        );
    }

    #[test]
    fn nested_zone_roots_are_rejected() {
        let fixture = showroom_fixture();
        let defs = vec![
            ZoneDefinition::new("drop", waypoint()),
            ZoneDefinition::new("drop_teaser", waypoint()),
        ];

        assert!(matches!(
            ZoneRegistry::build(&defs, &fixture.scene),
            Err(SceneError::OverlappingZones { .. })
        ));
    }

    #[test]
    fn missing_root_skips_zone_and_missing_member_is_dropped() {
        let fixture = showroom_fixture();
        let mut drop = ZoneDefinition::new("drop", waypoint());
        drop.teaser = vec!["drop_teaser".into(), "no_such_node".into()];
        let defs = vec![ZoneDefinition::new("ghost", waypoint()), drop];

        let registry = ZoneRegistry::build(&defs, &fixture.scene).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("ghost"), None);
        assert_eq!(registry.get(ZoneId(0)).unwrap().teaser.len(), 1);
    }

    #[test]
    fn zone_containing_walks_ancestors() {
        let fixture = showroom_fixture();
        let detail = fixture.scene.lookup_by_name("drop_detail_text").unwrap();
        let floor = fixture.scene.lookup_by_name("floor").unwrap();

        assert_eq!(fixture.zones.zone_containing(&fixture.scene, detail), Some(ZoneId(0)));
        assert_eq!(fixture.zones.zone_containing(&fixture.scene, floor), None);
    }

    #[test]
    fn detail_and_rest_visibility_are_exclusive() {
        let mut fixture = showroom_fixture();
        let drop = fixture.zones.lookup("drop").unwrap();
        let teaser = fixture.scene.lookup_by_name("drop_teaser").unwrap();
        let detail = fixture.scene.lookup_by_name("drop_detail").unwrap();
        let cross = fixture.scene.lookup_by_name("drop_cross").unwrap();

        fixture.zones.show_detail(&mut fixture.scene, drop);
        assert!(!fixture.scene.get(teaser).unwrap().visible);
        assert!(fixture.scene.get(detail).unwrap().visible);
        assert!(fixture.scene.get(cross).unwrap().visible);
        assert_eq!(fixture.zones.dismiss_target(&fixture.scene, cross), Some(drop));

        fixture.zones.reset_all(&mut fixture.scene);
        assert!(fixture.scene.get(teaser).unwrap().visible);
        assert!(!fixture.scene.get(detail).unwrap().visible);
        assert!(!fixture.scene.get(cross).unwrap().visible);
    }
}
