/// Scene manifest describing nodes, materials, glow rules and zones.
pub const SCENE_MANIFEST_PATH: &str = "showroom/manifest.json";

/// Full-screen pass adding the blurred glow layer over the base image.
pub const GLOW_COMBINE_SHADER_PATH: &str = "shaders/glow_combine.wgsl";

/// Full-screen pass ringing the selection mask with the outline colour.
pub const OUTLINE_SHADER_PATH: &str = "shaders/outline.wgsl";
