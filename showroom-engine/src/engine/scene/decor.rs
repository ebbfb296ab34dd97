use bevy::prelude::*;
use serde::Deserialize;

use super::graph::SceneGraph;

#[derive(Debug, Clone, Deserialize)]
pub struct Spinner {
    pub name: String,
    pub radians_per_second: f32,
}

/// Nodes turned about their local Z axis once per frame.
#[derive(Resource, Debug, Clone, Default)]
pub struct Spinners(pub Vec<Spinner>);

impl Spinners {
    pub fn advance(&self, scene: &mut SceneGraph, delta_seconds: f32) {
        for spinner in &self.0 {
            let Some(id) = scene.lookup_by_name(&spinner.name) else {
                warn_once!("Spinner node '{}' not found", spinner.name);
                continue;
            };
            if let Some(node) = scene.get_mut(id) {
                node.transform
                    .rotate_local_z(spinner.radians_per_second * delta_seconds);
            }
        }
    }
}

pub fn spin_decor(spinners: Res<Spinners>, mut scene: ResMut<SceneGraph>, time: Res<Time>) {
    spinners.advance(&mut scene, time.delta_secs());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scene::graph::SceneNode;

    #[test]
    fn spinner_accumulates_rotation() {
        let mut scene = SceneGraph::new();
        let caption = scene.add_node(SceneNode::new("rounding_caption_top"), None).unwrap();
        let spinners = Spinners(vec![
            Spinner {
                name: "rounding_caption_top".into(),
                radians_per_second: 0.5,
            },
            Spinner {
                name: "missing_caption".into(),
                radians_per_second: 1.0,
            },
        ]);

        spinners.advance(&mut scene, 1.0);
        spinners.advance(&mut scene, 1.0);

        let (axis, angle) = scene.get(caption).unwrap().transform.rotation.to_axis_angle();
        assert!((angle - 1.0).abs() < 1e-5);
        assert!((axis - Vec3::Z).length() < 1e-4);
    }
}
