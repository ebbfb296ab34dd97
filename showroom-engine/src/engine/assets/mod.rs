//! Showroom asset definitions.
//!
//! The scene manifest is a JSON bevy asset describing the node tree,
//! materials, glow rules, zone registry and decorative spinners.

/// Scene manifest asset and its conversion into runtime scene resources.
pub mod scene_manifest;
