//! Global constants for the tipview renderer

/// Frames rendered per transition when the config does not say
pub const DEFAULT_FRAMES: u32 = 12;

/// Output file stem when neither config nor command line name one
pub const DEFAULT_OUTPUT_STEM: &str = "tipview";

/// Minimum scale at which the bubble is still composited
pub const MIN_VISIBLE_SCALE: f32 = 1e-3;
