//! Showroom camera and orbit navigation.
//!
//! The rig holds the camera pose that navigation tweens and the orbit
//! controller move. The scene view copies it onto the bevy camera entity,
//! which does the projection and ray casting.

/// Damped orbit controller with polar limits and dolly zoom.
pub mod orbit;

/// Camera pose and lens, convertible to a bevy transform and projection.
pub mod showroom_camera;

pub use orbit::{CameraRig, OrbitController};
pub use showroom_camera::ShowroomCamera;
