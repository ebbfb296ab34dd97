use bevy::prelude::*;
use serde::Deserialize;

use crate::engine::render::materials::{Material, MaterialLibrary};
use crate::engine::scene::decor::{Spinner, Spinners};
use crate::engine::scene::glow::{GlowRules, apply_glow_rules};
use crate::engine::scene::{
    PanelPose, SceneError, SceneGraph, SceneNode, Waypoint, ZoneDefinition, ZoneRegistry,
};

#[derive(Debug, Clone, Deserialize)]
pub struct MaterialConfig {
    pub name: String,
    pub base_color: [f32; 3],
    #[serde(default)]
    pub emissive: [f32; 3],
}

/// One scene node. Nodes must be listed after their parent.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub translation: [f32; 3],
    /// XYZ Euler angles in degrees.
    #[serde(default)]
    pub rotation_euler: [f32; 3],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    #[serde(default)]
    pub half_extents: Option<[f32; 3]>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
}

fn unit_scale() -> [f32; 3] {
    [1.0; 3]
}

fn visible_by_default() -> bool {
    true
}

impl NodeConfig {
    fn transform(&self) -> Transform {
        let [x, y, z] = self.rotation_euler.map(f32::to_radians);
        Transform {
            translation: Vec3::from_array(self.translation),
            rotation: Quat::from_euler(EulerRot::XYZ, x, y, z),
            scale: Vec3::from_array(self.scale),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WaypointConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
}

#[derive(Debug, Clone, Deserialize)]
pub struct PanelConfig {
    pub translation: [f32; 3],
    #[serde(default)]
    pub rotation_y_degrees: f32,
    pub scale: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ZoneConfig {
    pub name: String,
    pub waypoint: WaypointConfig,
    #[serde(default)]
    pub teaser: Vec<String>,
    #[serde(default)]
    pub detail: Vec<String>,
    #[serde(default)]
    pub dismiss: Vec<String>,
    #[serde(default)]
    pub panel: Option<PanelConfig>,
    #[serde(default)]
    pub menu_label: Option<String>,
}

impl ZoneConfig {
    fn definition(&self) -> ZoneDefinition {
        ZoneDefinition {
            name: self.name.clone(),
            waypoint: Waypoint {
                position: Vec3::from_array(self.waypoint.position),
                target: Vec3::from_array(self.waypoint.target),
            },
            teaser: self.teaser.clone(),
            detail: self.detail.clone(),
            dismiss: self.dismiss.clone(),
            panel: self.panel.as_ref().map(|panel| PanelPose {
                translation: Vec3::from_array(panel.translation),
                rotation_y: panel.rotation_y_degrees.to_radians(),
                scale: panel.scale,
            }),
            menu_label: self.menu_label.clone(),
        }
    }
}

/// Complete showroom description as a bevy asset. Mirrors the JSON layout.
#[derive(Asset, TypePath, Debug, Clone, Deserialize)]
pub struct SceneManifest {
    #[serde(default)]
    pub materials: Vec<MaterialConfig>,
    pub nodes: Vec<NodeConfig>,
    #[serde(default)]
    pub glow: GlowRules,
    #[serde(default)]
    pub zones: Vec<ZoneConfig>,
    #[serde(default)]
    pub spinners: Vec<Spinner>,
}

/// Runtime resources produced from a manifest.
#[derive(Debug)]
pub struct LoadedShowroom {
    pub scene: SceneGraph,
    pub zones: ZoneRegistry,
    pub materials: MaterialLibrary,
    pub spinners: Spinners,
}

impl SceneManifest {
    /// Build the scene graph, material library and zone registry. Zones start
    /// at rest visibility and glow rules are already applied.
    pub fn build_showroom(&self) -> Result<LoadedShowroom, SceneError> {
        let mut materials = MaterialLibrary::new();
        for config in &self.materials {
            materials.add(
                config.name.clone(),
                Material::emissive(
                    Vec3::from_array(config.base_color),
                    Vec3::from_array(config.emissive),
                ),
            );
        }

        let mut scene = SceneGraph::new();
        for config in &self.nodes {
            let parent = match &config.parent {
                Some(parent) => Some(scene.lookup_by_name(parent).ok_or_else(|| {
                    SceneError::UnknownParent {
                        node: config.name.clone(),
                        parent: parent.clone(),
                    }
                })?),
                None => None,
            };

            let mut node = SceneNode::new(config.name.clone()).with_transform(config.transform());
            node.visible = config.visible;
            if let Some(name) = &config.material {
                node.material = Some(materials.lookup(name).ok_or_else(|| {
                    SceneError::UnknownMaterial {
                        node: config.name.clone(),
                        material: name.clone(),
                    }
                })?);
            }
            node.half_extents = config.half_extents.map(Vec3::from_array);

            scene.add_node(node, parent)?;
        }

        apply_glow_rules(&mut scene, &self.glow);

        let definitions: Vec<ZoneDefinition> = self.zones.iter().map(ZoneConfig::definition).collect();
        let zones = ZoneRegistry::build(&definitions, &scene)?;
        zones.reset_all(&mut scene);

        info!(
            "Showroom built: {} nodes, {} materials, {} zones",
            scene.len(),
            materials.len(),
            zones.len()
        );

        Ok(LoadedShowroom {
            scene,
            zones,
            materials,
            spinners: Spinners(self.spinners.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "materials": [
            { "name": "wall", "base_color": [0.3, 0.3, 0.3] },
            { "name": "neon", "base_color": [1.0, 0.2, 0.8], "emissive": [1.0, 0.2, 0.8] }
        ],
        "nodes": [
            { "name": "showroom" },
            { "name": "floor", "parent": "showroom", "half_extents": [20, 0.1, 20], "material": "wall" },
            { "name": "billboard_signup", "parent": "showroom", "translation": [12, 7, -2],
              "rotation_euler": [0, 90, 0] },
            { "name": "billboard_text0_signup", "parent": "billboard_signup",
              "half_extents": [2, 1, 0.1], "material": "neon" },
            { "name": "billboard_update_title001", "parent": "billboard_signup",
              "half_extents": [2, 1, 0.1], "material": "neon", "visible": true },
            { "name": "billboard_cross_signup", "parent": "billboard_signup",
              "half_extents": [0.3, 0.3, 0.1], "material": "wall" }
        ],
        "glow": { "names": ["billboard_logo"], "prefixes": ["billboard_text", "billboard_update_"] },
        "zones": [
            { "name": "billboard_signup",
              "waypoint": { "position": [14.011, 8.785, -12.503], "target": [12, 7, -2] },
              "teaser": ["billboard_text0_signup"],
              "detail": ["billboard_update_title001"],
              "dismiss": ["billboard_cross_signup"],
              "panel": { "translation": [12.291, 7.409, -2.149], "rotation_y_degrees": 189.29, "scale": 0.01676 },
              "menu_label": "Sign up" }
        ],
        "spinners": [{ "name": "rounding_caption_top", "radians_per_second": 0.48 }]
    }"#;

    fn manifest() -> SceneManifest {
        serde_json::from_str(MANIFEST).unwrap()
    }

    #[test]
    fn manifest_builds_scene_in_rest_state() {
        let showroom = manifest().build_showroom().unwrap();
        let scene = &showroom.scene;
        let teaser = scene.lookup_by_name("billboard_text0_signup").unwrap();
        let detail = scene.lookup_by_name("billboard_update_title001").unwrap();
        let cross = scene.lookup_by_name("billboard_cross_signup").unwrap();

        assert_eq!(scene.len(), 6);
        assert!(scene.get(teaser).unwrap().visible);
        assert!(!scene.get(detail).unwrap().visible);
        assert!(!scene.get(cross).unwrap().visible);
        assert!(scene.is_glow(teaser));
        assert!(scene.is_glow(detail));
        assert!(!scene.is_glow(cross));
        assert_eq!(showroom.spinners.0.len(), 1);
    }

    #[test]
    fn panel_pose_is_converted_to_radians() {
        let showroom = manifest().build_showroom().unwrap();
        let zone = showroom.zones.iter().next().unwrap();
        let panel = zone.panel.unwrap();

        assert!((panel.rotation_y - 189.29_f32.to_radians()).abs() < 1e-6);
        assert_eq!(zone.menu_label, "Sign up");
    }

    #[test]
    fn node_rotation_is_read_in_degrees() {
        let showroom = manifest().build_showroom().unwrap();
        let board = showroom.scene.lookup_by_name("billboard_signup").unwrap();
        let world = showroom.scene.world_affine(board);

        let facing = world.transform_vector3(Vec3::Z);
        assert!((facing - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn unknown_parent_is_a_load_error() {
        let mut manifest = manifest();
        manifest.nodes[1].parent = Some("nowhere".into());

        assert_eq!(
            manifest.build_showroom().unwrap_err(),
            SceneError::UnknownParent {
                node: "floor".into(),
                parent: "nowhere".into()
            }
        );
    }

    #[test]
    fn shipped_manifest_builds() {
        let shipped: SceneManifest =
            serde_json::from_str(include_str!("../../../assets/showroom/manifest.json")).unwrap();
        let showroom = shipped.build_showroom().unwrap();

        assert_eq!(showroom.zones.len(), 4);
        let insider = showroom.zones.lookup("billboard_insideraccess").unwrap();
        assert_eq!(showroom.zones.get(insider).unwrap().detail.len(), 2);
        let caption = showroom.scene.lookup_by_name("rounding_caption_down").unwrap();
        assert!(showroom.scene.is_glow(caption));
        assert_eq!(showroom.spinners.0.len(), 2);
    }

    #[test]
    fn unknown_material_is_a_load_error() {
        let mut manifest = manifest();
        manifest.nodes[1].material = Some("chrome".into());

        assert!(matches!(
            manifest.build_showroom(),
            Err(SceneError::UnknownMaterial { .. })
        ));
    }
}
