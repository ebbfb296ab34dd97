//! Core application setup and state management.
//!
//! Handles the application lifecycle, window configuration, the per-frame
//! system ordering and plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with the compositor, manifest loading and the
/// interaction plugin.
pub mod app_setup;

/// Application states and the fixed per-frame system sets.
pub mod app_state;

/// Platform-specific window configuration for native and WASM builds.
pub mod window_config;
