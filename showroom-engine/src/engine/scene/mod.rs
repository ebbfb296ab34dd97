//! Scene graph arena, glow tagging and the zone registry.
//!
//! The node tree is built once from the scene manifest and never shrinks;
//! interaction only flips visibility, glow tags and material references.

/// Decorative nodes that spin slowly every frame.
pub mod decor;

/// Load-time structural errors.
pub mod error;

/// Flat node arena with parent back-links and name index.
pub mod graph;

/// Glow-layer membership rules applied at load.
pub mod glow;

/// Interned zone registry mapping zones to node sets and waypoints.
pub mod zones;

pub use error::SceneError;
pub use graph::{NodeId, SceneGraph, SceneNode};
pub use zones::{PanelPose, Waypoint, Zone, ZoneDefinition, ZoneId, ZoneRegistry};
