use bevy::prelude::*;
use constants::navigation::PANEL_WIDTH_PX;

use crate::engine::render::scene_view::ShowroomView;
use crate::engine::scene::{PanelPose, ZoneId};
use crate::interaction::navigation::NavigationController;

/// Height in panel pixels of the overlay panel before world scaling.
pub const PANEL_HEIGHT_PX: f32 = 260.0;

/// Flat UI surface living in world space. Parked far outside the scene with
/// zero opacity whenever no zone is showing it.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPanel {
    pose: PanelPose,
    opacity: f32,
    zone: Option<ZoneId>,
}

impl Default for OverlayPanel {
    fn default() -> Self {
        Self {
            pose: PanelPose::parked(),
            opacity: 0.0,
            zone: None,
        }
    }
}

impl OverlayPanel {
    pub fn pose(&self) -> PanelPose {
        self.pose
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn zone(&self) -> Option<ZoneId> {
        self.zone
    }

    pub fn place(&mut self, zone: ZoneId, pose: PanelPose) {
        self.pose = pose;
        self.zone = Some(zone);
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn park(&mut self) {
        *self = Self::default();
    }

    pub fn is_parked(&self) -> bool {
        self.pose.is_parked()
    }
}

/// Where and how large the panel appears on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelProjection {
    /// Viewport pixel of the panel centre.
    pub center: Vec2,
    /// Screen pixels per panel pixel.
    pub scale: f32,
    /// Horizontal squash from the panel's yaw relative to the camera.
    pub facing: f32,
    pub opacity: f32,
}

/// Project the panel through a camera at `view`. `project` maps world points
/// to viewport pixels and fails behind the camera. Parked, transparent or
/// behind-camera panels produce nothing.
pub fn project_panel(
    panel: &OverlayPanel,
    view: &GlobalTransform,
    project: impl Fn(Vec3) -> Option<Vec2>,
) -> Option<PanelProjection> {
    if panel.is_parked() || panel.opacity <= 0.0 {
        return None;
    }
    let translation = panel.pose.translation;
    let center = project(translation)?;
    let pixels_per_unit = project(translation + *view.right())?.distance(center);

    let normal = Quat::from_rotation_y(panel.pose.rotation_y) * Vec3::Z;
    let to_camera = (view.translation() - translation).normalize_or_zero();

    Some(PanelProjection {
        center,
        scale: panel.pose.scale * pixels_per_unit,
        facing: normal.dot(to_camera).abs(),
        opacity: panel.opacity,
    })
}

#[derive(Component)]
pub struct OverlayPanelRoot;

pub fn place_overlay_panel(
    navigation: Res<NavigationController>,
    view: Query<(&Camera, &GlobalTransform), With<ShowroomView>>,
    mut panels: Query<
        (&mut Node, &mut Transform, &mut Visibility, &mut BackgroundColor),
        With<OverlayPanelRoot>,
    >,
) {
    let projection = view.single().ok().and_then(|(camera, camera_transform)| {
        project_panel(navigation.panel(), camera_transform, |point| {
            camera.world_to_viewport(camera_transform, point).ok()
        })
    });

    for (mut node, mut transform, mut visibility, mut background) in &mut panels {
        let Some(projection) = projection else {
            *visibility = Visibility::Hidden;
            continue;
        };

        *visibility = Visibility::Visible;
        node.left = Val::Px(projection.center.x - PANEL_WIDTH_PX * 0.5);
        node.top = Val::Px(projection.center.y - PANEL_HEIGHT_PX * 0.5);
        transform.scale = Vec3::new(
            projection.scale * projection.facing,
            projection.scale,
            1.0,
        );
        background.0.set_alpha(0.92 * projection.opacity);
    }
}
