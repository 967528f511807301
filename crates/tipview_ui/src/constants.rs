//! Centralized defaults for tipview_ui
//!
//! All magic numbers used by the default preferences live here.

// =============================================================================
// Typography
// =============================================================================

/// Default font size in pixels
pub const DEFAULT_FONT_SIZE: f32 = 17.0;

/// Approximate character width as a ratio of font size
/// Used by the approximate text measurement
pub const CHAR_WIDTH_FACTOR: f32 = 0.55;

/// Line height as a ratio of font size
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;

// =============================================================================
// Bubble Shape
// =============================================================================

pub const DEFAULT_CORNER_RADIUS: f32 = 4.0;

pub const DEFAULT_ARROW_HEIGHT: f32 = 4.0;

pub const DEFAULT_ARROW_WIDTH: f32 = 8.0;

// =============================================================================
// Insets
// =============================================================================

/// Gap between the content frame and the painted bubble
pub const DEFAULT_BUBBLE_INSET: f32 = 2.0;

/// Gap between the bubble outline and the text block
pub const DEFAULT_TEXT_INSET: f32 = 8.0;

/// Text wraps beyond this width
pub const DEFAULT_MAX_TEXT_WIDTH: f32 = 200.0;

// =============================================================================
// Animation
// =============================================================================

pub const DEFAULT_SPRING_DAMPING: f32 = 0.7;

pub const DEFAULT_SPRING_VELOCITY: f32 = 0.7;

/// Show and dismiss duration in seconds
pub const DEFAULT_TRANSITION_SECS: f32 = 0.7;

/// Duration of the move to a new frame after a container change
pub const RELAYOUT_TRANSITION_SECS: f32 = 0.3;
