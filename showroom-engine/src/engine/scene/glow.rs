use bevy::prelude::*;
use serde::Deserialize;

use super::graph::SceneGraph;

/// Which nodes render into the glow layer. A node joins the layer when its
/// name equals one of `names` or starts with one of `prefixes`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlowRules {
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub prefixes: Vec<String>,
}

impl GlowRules {
    pub fn matches(&self, name: &str) -> bool {
        self.names.iter().any(|listed| listed == name)
            || self.prefixes.iter().any(|prefix| name.starts_with(prefix.as_str()))
    }
}

/// Tag every matching node. Returns how many nodes are tagged afterwards.
pub fn apply_glow_rules(scene: &mut SceneGraph, rules: &GlowRules) -> usize {
    for name in &rules.names {
        if scene.lookup_by_name(name).is_none() {
            warn!("Glow node '{name}' not found in scene");
        }
    }

    let matching: Vec<_> = scene
        .node_ids()
        .filter(|&id| scene.get(id).is_some_and(|node| rules.matches(&node.name)))
        .collect();

    for &id in &matching {
        scene.set_glow(id, true);
    }

    debug!("Tagged {} glow nodes", matching.len());
    matching.len()
}
