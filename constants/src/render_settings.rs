use bevy::math::Vec3;

/// Luminosity high-pass, blur and strength applied to the glow layer when it
/// is combined over the base image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomSettings {
    pub threshold: f32,
    pub strength: f32,
    /// Box blur radius in glow-target texels.
    pub blur_radius: u32,
}

pub const BLOOM_SETTINGS: BloomSettings = BloomSettings {
    threshold: 0.5,
    strength: 0.5,
    blur_radius: 3,
};

/// Silhouette drawn around the highlighted zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineSettings {
    pub edge_strength: f32,
    /// Ring width in screen pixels.
    pub edge_thickness: u32,
    /// Seconds per pulse cycle, zero disables pulsing.
    pub pulse_period: f32,
    pub visible_edge_color: Vec3,
}

pub const OUTLINE_SETTINGS: OutlineSettings = OutlineSettings {
    edge_strength: 3.0,
    edge_thickness: 1,
    pulse_period: 2.0,
    visible_edge_color: Vec3::new(0.627, 0.125, 0.941),
};

/// Fraction of the window resolution the offscreen glow target renders at.
pub const GLOW_TARGET_SCALE: f32 = 0.5;

/// Render layer seen only by the glow camera.
pub const GLOW_LAYER: usize = 1;

/// Render layer seen only by the outline mask camera.
pub const MASK_LAYER: usize = 2;

pub const CLEAR_COLOR: Vec3 = Vec3::new(0.02, 0.025, 0.035);
pub const AMBIENT_BRIGHTNESS: f32 = 250.0;
pub const LIGHT_ILLUMINANCE: f32 = 4_000.0;
pub const LIGHT_DIRECTION: Vec3 = Vec3::new(-0.4, -1.0, 0.3);

/// Colour of the inert material substituted during the glow pass.
pub const INERT_COLOR: Vec3 = Vec3::ZERO;

/// Colour of the flat material selected nodes show in the mask layer.
pub const MASK_COLOR: Vec3 = Vec3::ONE;

/// Initial window size before the first resize event arrives.
pub const DEFAULT_VIEWPORT: (u32, u32) = (1280, 720);
