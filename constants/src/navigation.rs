use bevy::math::Vec3;

/// Camera position of the home waypoint every dismissal returns to.
pub const HOME_POSITION: Vec3 = Vec3::new(0.0, 15.0, -40.0);

/// Orbit target of the home waypoint.
pub const HOME_TARGET: Vec3 = Vec3::new(0.0, 5.0, 0.0);

/// Seconds for the camera to travel from its current pose to a zone waypoint.
pub const ARRIVAL_SECONDS: f32 = 1.0;

/// Seconds for the camera to travel back to the home waypoint.
pub const RETURN_SECONDS: f32 = 2.0;

/// Seconds for the overlay panel to fade in or out.
pub const PANEL_FADE_SECONDS: f32 = 1.0;

/// Sentinel translation of a parked overlay panel, far outside the visible scene.
pub const PARKED_PANEL_TRANSLATION: Vec3 = Vec3::new(-1000.0, -1000.0, -1000.0);

/// Width in panel pixels of the overlay panel before world scaling.
pub const PANEL_WIDTH_PX: f32 = 420.0;

/// Vertical field of view in degrees.
pub const CAMERA_FOV_Y_DEGREES: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

/// Polar angle limits (radians from +Y) of the orbit controller.
pub const ORBIT_MIN_POLAR: f32 = 0.5;
pub const ORBIT_MAX_POLAR: f32 = 1.6;

/// Fraction of orbit momentum consumed per tick.
pub const ORBIT_DAMPING: f32 = 0.05;

pub const ORBIT_ROTATE_SPEED: f32 = 1.0;
pub const ORBIT_ZOOM_SPEED: f32 = 1.0;
pub const ORBIT_MIN_DISTANCE: f32 = 5.0;
pub const ORBIT_MAX_DISTANCE: f32 = 80.0;

/// Pointer travel in pixels between press and release that still counts as a click.
pub const CLICK_SLOP_PX: f32 = 4.0;
