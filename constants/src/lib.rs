//! Compile-time configuration shared by the showroom crates.

/// Loading overlay copy and cadence.
pub mod loading;

/// Camera waypoints, transition timings and orbit limits.
pub mod navigation;

/// Asset locations relative to the bevy asset root.
pub mod path;

/// Compositor settings for the glow, combine and outline passes.
pub mod render_settings;
