/// Lines revealed one by one on the loading overlay.
pub const LOADING_TEXT: &[&str] = &[
    "Initializing DSTRKT World...",
    "Loading the New Dimension of Streetwear...",
    "Running script...",
    "Establishing Mainframe...",
    "Loading components...",
    "System Live...",
    "Welcome to DSTRKT - The New Age Streetwear Marketplace...",
    "Get exclusive access and discover brands from around the world...",
    "Ready to enter...",
];

/// Seconds between two revealed loading lines.
pub const LINE_INTERVAL_SECONDS: f32 = 0.6;

/// Seconds the overlay lingers after the last line before it hides.
pub const OVERLAY_LINGER_SECONDS: f32 = 2.0;
