use bevy::prelude::*;
use constants::navigation::{
    CAMERA_FAR, CAMERA_FOV_Y_DEGREES, CAMERA_NEAR, HOME_POSITION, HOME_TARGET,
};
use constants::render_settings::DEFAULT_VIEWPORT;

/// Pose and lens of the showroom view, looking from `position` at `target`
/// with Y up. The bevy camera entity is kept in sync with it every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowroomCamera {
    pub position: Vec3,
    /// Orbit target, also the look-at point.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub viewport: UVec2,
}

impl Default for ShowroomCamera {
    fn default() -> Self {
        Self {
            position: HOME_POSITION,
            target: HOME_TARGET,
            fov_y: CAMERA_FOV_Y_DEGREES.to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            viewport: UVec2::new(DEFAULT_VIEWPORT.0, DEFAULT_VIEWPORT.1),
        }
    }
}

impl ShowroomCamera {
    pub fn aspect(&self) -> f32 {
        self.viewport.x as f32 / self.viewport.y as f32
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).looking_at(self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Projection {
        Projection::Perspective(PerspectiveProjection {
            fov: self.fov_y,
            aspect_ratio: self.aspect(),
            near: self.near,
            far: self.far,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = UVec2::new(width.max(1), height.max(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> ShowroomCamera {
        ShowroomCamera {
            position: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::new(0.0, 0.0, 2.0),
            viewport: UVec2::new(200, 100),
            ..default()
        }
    }

    #[test]
    fn transform_faces_the_target() {
        let transform = camera().transform();

        assert_eq!(transform.translation, Vec3::new(0.0, 0.0, 10.0));
        assert!((*transform.forward() - Vec3::NEG_Z).length() < 1e-5);
        assert!((*transform.up() - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn projection_carries_the_lens() {
        let camera = camera();
        let Projection::Perspective(perspective) = camera.projection() else {
            panic!("showroom camera is perspective");
        };

        assert_eq!(perspective.fov, camera.fov_y);
        assert_eq!(perspective.aspect_ratio, 2.0);
        assert_eq!(perspective.near, camera.near);
        assert_eq!(perspective.far, camera.far);
    }

    #[test]
    fn resize_clamps_to_one_pixel() {
        let mut camera = camera();
        camera.resize(0, 0);
        assert_eq!(camera.viewport, UVec2::ONE);
        assert_eq!(camera.aspect(), 1.0);
    }
}
