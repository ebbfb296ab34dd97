use std::f32::consts::TAU;

use bevy::prelude::*;
use constants::navigation::{
    ORBIT_DAMPING, ORBIT_MAX_DISTANCE, ORBIT_MAX_POLAR, ORBIT_MIN_DISTANCE, ORBIT_MIN_POLAR,
    ORBIT_ROTATE_SPEED, ORBIT_ZOOM_SPEED,
};

use super::showroom_camera::ShowroomCamera;

const MOMENTUM_EPSILON: f32 = 1e-6;
/// Frame rate the damping factor is tuned for.
const DAMPING_REFERENCE_HZ: f32 = 60.0;

/// Orbits the camera about its target in spherical coordinates. Angular
/// momentum decays by `damping` per 1/60 s, whatever the frame rate.
/// Panning is not supported.
#[derive(Debug, Clone)]
pub struct OrbitController {
    enabled: bool,
    pub damping: f32,
    /// Polar angle range measured from +Y.
    pub min_polar: f32,
    pub max_polar: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self {
            enabled: true,
            damping: ORBIT_DAMPING,
            min_polar: ORBIT_MIN_POLAR,
            max_polar: ORBIT_MAX_POLAR,
            rotate_speed: ORBIT_ROTATE_SPEED,
            zoom_speed: ORBIT_ZOOM_SPEED,
            min_distance: ORBIT_MIN_DISTANCE,
            max_distance: ORBIT_MAX_DISTANCE,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
        }
    }
}

impl OrbitController {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling drops any remaining momentum so the camera stops dead.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.scale = 1.0;
        }
    }

    /// Queue rotation for a pointer drag of `delta_px` pixels.
    pub fn rotate(&mut self, delta_px: Vec2, viewport_height: f32) {
        if !self.enabled {
            return;
        }
        let height = viewport_height.max(1.0);
        self.delta_theta -= TAU * delta_px.x / height * self.rotate_speed;
        self.delta_phi -= TAU * delta_px.y / height * self.rotate_speed;
    }

    /// Positive steps move the camera closer to its target.
    pub fn zoom(&mut self, steps: f32) {
        if !self.enabled {
            return;
        }
        self.scale *= 0.95_f32.powf(steps * self.zoom_speed);
    }

    pub fn has_momentum(&self) -> bool {
        self.delta_theta.abs() > MOMENTUM_EPSILON
            || self.delta_phi.abs() > MOMENTUM_EPSILON
            || (self.scale - 1.0).abs() > MOMENTUM_EPSILON
    }

    /// Integrate `delta_seconds` worth of queued motion into the camera.
    /// Returns whether it moved.
    pub fn update(&mut self, camera: &mut ShowroomCamera, delta_seconds: f32) -> bool {
        if !self.enabled || !self.has_momentum() {
            return false;
        }

        let offset = camera.position - camera.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return false;
        }

        // Each step applies the share of momentum it removes, so the total
        // swept angle is the queued delta at any frame rate.
        let keep = (1.0 - self.damping).powf(delta_seconds.max(0.0) * DAMPING_REFERENCE_HZ);
        let applied = 1.0 - keep;

        let theta = offset.x.atan2(offset.z) + self.delta_theta * applied;
        let phi = ((offset.y / radius).clamp(-1.0, 1.0).acos() + self.delta_phi * applied)
            .clamp(self.min_polar, self.max_polar);
        let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        camera.position = camera.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );

        self.delta_theta *= keep;
        self.delta_phi *= keep;
        if self.delta_theta.abs() <= MOMENTUM_EPSILON {
            self.delta_theta = 0.0;
        }
        if self.delta_phi.abs() <= MOMENTUM_EPSILON {
            self.delta_phi = 0.0;
        }
        self.scale = 1.0;
        true
    }
}

/// The showroom camera together with the orbit controller driving it.
#[derive(Resource, Debug, Clone, Default)]
pub struct CameraRig {
    pub camera: ShowroomCamera,
    pub orbit: OrbitController,
}
