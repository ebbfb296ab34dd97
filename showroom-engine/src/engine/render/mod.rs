//! Selective-glow compositor on top of bevy's renderer.
//!
//! Every mesh node is spawned three times: lit on the main layer, flat on
//! the glow layer and flat white on the mask layer. Each frame the compositor
//! swaps untagged glow proxies to black, hides mask proxies outside the
//! hovered zone, and hands bloom and outline parameters to the full-screen
//! passes that run after tonemapping.
//!
//! ```text
//! glow camera ──> glow image ─┐
//! mask camera ──> mask image ─┼─> GlowCombine ──> Outline ──> screen
//! main camera ──> view target ┘
//! ```

use bevy::prelude::*;
use constants::render_settings::{DEFAULT_VIEWPORT, GLOW_TARGET_SCALE};

use crate::engine::core::app_state::{AppState, FrameSet};

/// Glow, base, combine and outline ordering with the material swap guard.
///
/// Produces per-layer draw lists and the post-process settings for a frame.
pub mod compositor;

/// Material records, the reserved inert and mask slots, and their
/// `StandardMaterial` assets.
pub mod materials;

/// Render-graph nodes for the glow combine and outline passes.
pub mod post_process;

/// Cameras, layer targets and mesh entities mirroring the scene graph.
pub mod scene_view;

pub struct CompositorPlugin;

impl Plugin for CompositorPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(post_process::ShowroomPostProcessPlugin)
            .insert_resource(compositor::Compositor::new(
                UVec2::from(DEFAULT_VIEWPORT),
                GLOW_TARGET_SCALE,
            ))
            .add_systems(Startup, scene_view::setup_scene_view)
            .add_systems(OnEnter(AppState::Running), scene_view::spawn_scene_entities)
            .add_systems(Update, scene_view::composite_frame.in_set(FrameSet::Render))
            .add_systems(
                Update,
                (
                    scene_view::sync_camera_rig,
                    scene_view::sync_scene_transforms,
                    scene_view::resize_layer_targets,
                )
                    .in_set(FrameSet::Present),
            );
    }
}
