//! Scene manifest loading and installation.
//!
//! The manifest is requested at startup; once bevy has parsed it, the scene
//! graph, zone registry and materials are built and inserted as resources.

/// Manifest request and scene installation once the asset is available.
pub mod manifest_loader;

/// Loading progress tracking resource for the state transition.
pub mod progress;
