use bevy::prelude::*;
use constants::render_settings::{BLOOM_SETTINGS, BloomSettings, OUTLINE_SETTINGS, OutlineSettings};

use super::materials::{MaterialId, MaterialLibrary};
use super::post_process::PostProcessSettings;
use crate::engine::scene::{NodeId, SceneGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Glow,
    Base,
    Combine,
    Outline,
}

/// Draw state of one mesh node within a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerDraw {
    pub node: NodeId,
    pub material: MaterialId,
    pub visible: bool,
}

/// Receives each layer's draw list as the compositor walks the passes.
pub trait LayerSink {
    fn submit(&mut self, pass: Pass, draws: &[LayerDraw]);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub passes: Vec<Pass>,
    pub swapped_materials: usize,
    pub outlined_nodes: usize,
}

/// Scoped material substitution for the glow pass. Every swapped node gets
/// its original material back when the guard is dropped, including on unwind.
pub struct MaterialSwap<'a> {
    scene: &'a mut SceneGraph,
    swapped: Vec<(NodeId, Option<MaterialId>)>,
}

impl<'a> MaterialSwap<'a> {
    /// Point every untagged mesh node at `inert`.
    pub fn darken_untagged(scene: &'a mut SceneGraph, inert: MaterialId) -> Self {
        let targets: Vec<(NodeId, Option<MaterialId>)> = scene
            .node_ids()
            .filter_map(|id| {
                let node = scene.get(id)?;
                (node.is_mesh() && !scene.is_glow(id) && node.material.is_some())
                    .then_some((id, node.material))
            })
            .collect();

        for &(id, _) in &targets {
            scene.set_material(id, Some(inert));
        }

        Self {
            scene,
            swapped: targets,
        }
    }

    pub fn scene(&self) -> &SceneGraph {
        self.scene
    }

    /// Put the original materials back now. Returns how many were restored.
    pub fn restore(self) -> usize {
        self.swapped.len()
    }
}

impl Drop for MaterialSwap<'_> {
    fn drop(&mut self) {
        for (id, material) in self.swapped.drain(..).rev() {
            self.scene.set_material(id, material);
        }
    }
}

fn mesh_draws(scene: &SceneGraph) -> Vec<LayerDraw> {
    scene
        .node_ids()
        .filter_map(|id| {
            let node = scene.get(id)?;
            let material = node.material.filter(|_| node.is_mesh())?;
            Some(LayerDraw {
                node: id,
                material,
                visible: scene.is_effectively_visible(id),
            })
        })
        .collect()
}

/// Outline brightness multiplier oscillating between 0.25 and 1 with
/// `period` seconds per cycle scale. Non-positive periods disable the pulse.
pub fn pulse_factor(elapsed_seconds: f32, period: f32) -> f32 {
    if period <= 0.0 {
        return 1.0;
    }
    0.625 + 0.375 * (elapsed_seconds * 10.0 / period).cos()
}

/// Orders the glow, base, combine and outline passes each frame. Layer
/// contents go to a [`LayerSink`]; the combine and outline parameters end up
/// in [`PostProcessSettings`] for the full-screen passes.
#[derive(Resource, Debug)]
pub struct Compositor {
    pub bloom: BloomSettings,
    pub outline: OutlineSettings,
    viewport: UVec2,
    glow_scale: f32,
    settings: PostProcessSettings,
    last_report: FrameReport,
}

impl Compositor {
    pub fn new(viewport: UVec2, glow_scale: f32) -> Self {
        let mut compositor = Self {
            bloom: BLOOM_SETTINGS,
            outline: OUTLINE_SETTINGS,
            viewport: UVec2::ONE,
            glow_scale: glow_scale.max(f32::EPSILON),
            settings: PostProcessSettings::default(),
            last_report: FrameReport::default(),
        };
        compositor.resize(viewport.x, viewport.y);
        compositor
    }

    /// Track a `width` x `height` viewport. Zero extents clamp to one pixel.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = UVec2::new(width.max(1), height.max(1));
        debug!(
            "Compositor targets resized: glow {}, mask {}",
            self.glow_size(),
            self.mask_size()
        );
    }

    pub fn glow_size(&self) -> UVec2 {
        (self.viewport.as_vec2() * self.glow_scale)
            .round()
            .as_uvec2()
            .max(UVec2::ONE)
    }

    pub fn mask_size(&self) -> UVec2 {
        self.viewport
    }

    pub fn settings(&self) -> PostProcessSettings {
        self.settings
    }

    pub fn last_report(&self) -> &FrameReport {
        &self.last_report
    }

    pub fn render_frame<S: LayerSink + ?Sized>(
        &mut self,
        sink: &mut S,
        scene: &mut SceneGraph,
        materials: &MaterialLibrary,
        selection: Option<NodeId>,
        elapsed_seconds: f32,
    ) -> &FrameReport {
        let mut report = FrameReport::default();

        {
            let swap = MaterialSwap::darken_untagged(scene, materials.inert());
            sink.submit(Pass::Glow, &mesh_draws(swap.scene()));
            report.swapped_materials = swap.restore();
        }
        report.passes.push(Pass::Glow);

        let base = mesh_draws(scene);
        sink.submit(Pass::Base, &base);
        report.passes.push(Pass::Base);

        report.passes.push(Pass::Combine);

        let mask: Vec<LayerDraw> = base
            .iter()
            .map(|draw| LayerDraw {
                material: materials.mask(),
                visible: draw.visible
                    && selection.is_some_and(|root| scene.ancestor_match_id(draw.node, root)),
                ..*draw
            })
            .collect();
        report.outlined_nodes = mask.iter().filter(|draw| draw.visible).count();
        sink.submit(Pass::Outline, &mask);
        report.passes.push(Pass::Outline);

        let pulse = pulse_factor(elapsed_seconds, self.outline.pulse_period);
        let edge = self.outline.visible_edge_color * self.outline.edge_strength * pulse;
        self.settings = PostProcessSettings {
            bloom_threshold: self.bloom.threshold,
            bloom_strength: self.bloom.strength,
            blur_radius: self.bloom.blur_radius as f32,
            outline_thickness: self.outline.edge_thickness as f32,
            outline_color: edge.extend(if selection.is_some() { 1.0 } else { 0.0 }),
        };

        self.last_report = report;
        &self.last_report
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use super::*;
    use crate::test_support::showroom_fixture;

    #[derive(Default)]
    struct RecordingSink {
        submitted: Vec<(Pass, Vec<LayerDraw>)>,
    }

    impl RecordingSink {
        fn layer(&self, pass: Pass) -> &[LayerDraw] {
            self.submitted
                .iter()
                .find(|(submitted, _)| *submitted == pass)
                .map(|(_, draws)| draws.as_slice())
                .unwrap()
        }
    }

    impl LayerSink for RecordingSink {
        fn submit(&mut self, pass: Pass, draws: &[LayerDraw]) {
            self.submitted.push((pass, draws.to_vec()));
        }
    }

    fn materials_of(scene: &SceneGraph) -> Vec<Option<MaterialId>> {
        scene.node_ids().map(|id| scene.material(id)).collect()
    }

    #[test]
    fn passes_run_in_fixed_order() {
        let mut fixture = showroom_fixture();
        let mut compositor = Compositor::new(UVec2::new(64, 36), 0.5);
        let mut sink = RecordingSink::default();

        let report = compositor
            .render_frame(&mut sink, &mut fixture.scene, &fixture.materials, None, 0.0)
            .clone();

        assert_eq!(report.passes, vec![Pass::Glow, Pass::Base, Pass::Combine, Pass::Outline]);
        assert_eq!(
            sink.submitted.iter().map(|(pass, _)| *pass).collect::<Vec<_>>(),
            vec![Pass::Glow, Pass::Base, Pass::Outline]
        );
        assert_eq!(report.outlined_nodes, 0);
        assert!(report.swapped_materials > 0);
        assert_eq!(compositor.settings().outline_color.w, 0.0);
    }

    #[test]
    fn glow_layer_darkens_untagged_and_base_layer_keeps_originals() {
        let mut fixture = showroom_fixture();
        let before = materials_of(&fixture.scene);
        let inert = fixture.materials.inert();
        let mut compositor = Compositor::new(UVec2::new(16, 16), 1.0);
        let mut sink = RecordingSink::default();

        compositor.render_frame(&mut sink, &mut fixture.scene, &fixture.materials, None, 0.0);

        for draw in sink.layer(Pass::Glow) {
            let node = fixture.scene.get(draw.node).unwrap();
            if node.glow {
                assert_eq!(Some(draw.material), before[draw.node.index()]);
            } else {
                assert_eq!(draw.material, inert, "{} not darkened", node.name);
            }
        }
        for draw in sink.layer(Pass::Base) {
            assert_eq!(Some(draw.material), before[draw.node.index()]);
        }
        assert_eq!(materials_of(&fixture.scene), before);
    }

    #[test]
    fn hidden_nodes_stay_hidden_in_every_layer() {
        let mut fixture = showroom_fixture();
        let detail_text = fixture.scene.lookup_by_name("drop_detail_text").unwrap();
        let mut compositor = Compositor::new(UVec2::new(16, 16), 1.0);
        let mut sink = RecordingSink::default();

        compositor.render_frame(&mut sink, &mut fixture.scene, &fixture.materials, None, 0.0);

        for (_, draws) in &sink.submitted {
            let draw = draws.iter().find(|draw| draw.node == detail_text).unwrap();
            assert!(!draw.visible);
        }
    }

    #[test]
    fn materials_survive_a_panicking_sink() {
        struct Exploding;
        impl LayerSink for Exploding {
            fn submit(&mut self, _: Pass, _: &[LayerDraw]) {
                panic!("layer upload failure");
            }
        }

        let mut fixture = showroom_fixture();
        let before = materials_of(&fixture.scene);
        let mut compositor = Compositor::new(UVec2::new(8, 8), 1.0);

        let result = catch_unwind(AssertUnwindSafe(|| {
            compositor.render_frame(&mut Exploding, &mut fixture.scene, &fixture.materials, None, 0.0);
        }));

        assert!(result.is_err());
        assert_eq!(materials_of(&fixture.scene), before);
    }

    #[test]
    fn selection_masks_only_its_visible_subtree() {
        let mut fixture = showroom_fixture();
        let drop = fixture.scene.lookup_by_name("drop").unwrap();
        let teaser = fixture.scene.lookup_by_name("drop_teaser").unwrap();
        let cross = fixture.scene.lookup_by_name("drop_cross").unwrap();
        let mut compositor = Compositor::new(UVec2::new(16, 16), 1.0);
        let mut sink = RecordingSink::default();

        let report = compositor
            .render_frame(&mut sink, &mut fixture.scene, &fixture.materials, Some(drop), 0.0)
            .clone();

        let masked: Vec<NodeId> = sink
            .layer(Pass::Outline)
            .iter()
            .filter(|draw| draw.visible)
            .map(|draw| draw.node)
            .collect();
        assert_eq!(masked, vec![teaser]);
        assert!(sink.layer(Pass::Outline).iter().any(|draw| draw.node == cross));
        assert!(sink
            .layer(Pass::Outline)
            .iter()
            .all(|draw| draw.material == fixture.materials.mask()));
        assert_eq!(report.outlined_nodes, 1);

        let settings = compositor.settings();
        assert_eq!(settings.outline_color.w, 1.0);
        assert!(settings.outline_color.truncate().length() > 0.0);
        assert_eq!(settings.blur_radius, BLOOM_SETTINGS.blur_radius as f32);
    }

    #[test]
    fn resize_clamps_and_scales_the_glow_target() {
        let mut compositor = Compositor::new(UVec2::new(100, 60), 0.5);
        assert_eq!(compositor.glow_size(), UVec2::new(50, 30));
        assert_eq!(compositor.mask_size(), UVec2::new(100, 60));

        compositor.resize(0, 0);
        assert_eq!(compositor.glow_size(), UVec2::ONE);
        assert_eq!(compositor.mask_size(), UVec2::ONE);
    }

    #[test]
    fn pulse_stays_in_range() {
        for step in 0..100 {
            let factor = pulse_factor(step as f32 * 0.05, 2.0);
            assert!((0.25..=1.0).contains(&factor));
        }
        assert_eq!(pulse_factor(3.0, 0.0), 1.0);
    }
}
