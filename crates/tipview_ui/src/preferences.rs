//! Tooltip preferences: how the bubble looks, where it sits, how it moves.
//!
//! Every field has a serde default so partial JSON documents load cleanly.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::layout::ClampMode;
use crate::placement::Side;
use crate::renderer::Color;

/// Horizontal alignment of text inside its block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    Left,
    #[default]
    Center,
    Right,
    Justified,
}

/// Font family selection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    SansSerif,
    Serif,
    Monospace,
    /// A family looked up by name in the host's font database.
    Named(String),
}

/// Font used to measure and draw tooltip text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Font {
    pub family: FontFamily,
    /// Font size in pixels.
    pub size: f32,
    /// Line height as a ratio of font size.
    pub line_height: f32,
}

impl Font {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Line height in pixels.
    pub fn line_height_px(&self) -> f32 {
        self.size * self.line_height
    }
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: FontFamily::default(),
            size: DEFAULT_FONT_SIZE,
            line_height: LINE_HEIGHT_FACTOR,
        }
    }
}

/// Visual styling of the bubble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Styling {
    pub corner_radius: f32,
    pub arrow_height: f32,
    pub arrow_width: f32,
    pub foreground_color: Color,
    pub background_color: Color,
    /// Side tried first when arranging. The side actually used is reported
    /// in the arrangement and never written back here.
    pub arrow_side: Side,
    pub text_alignment: TextAlignment,
    pub border_width: f32,
    pub border_color: Color,
    pub font: Font,
}

impl Default for Styling {
    fn default() -> Self {
        Self {
            corner_radius: DEFAULT_CORNER_RADIUS,
            arrow_height: DEFAULT_ARROW_HEIGHT,
            arrow_width: DEFAULT_ARROW_WIDTH,
            foreground_color: Color::WHITE,
            background_color: Color::BLUE,
            arrow_side: Side::Bottom,
            text_alignment: TextAlignment::Center,
            border_width: 0.0,
            border_color: Color::TRANSPARENT,
            font: Font::default(),
        }
    }
}

/// Insets and sizing limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Positioning {
    /// Gap between the content frame and the drawn bubble, horizontally.
    pub bubble_h_inset: f32,
    /// Gap between the content frame and the drawn bubble, vertically.
    pub bubble_v_inset: f32,
    /// Gap between the bubble outline and the text block, horizontally.
    pub text_h_inset: f32,
    /// Gap between the bubble outline and the text block, vertically.
    pub text_v_inset: f32,
    /// Wrapping width handed to text measurement.
    pub max_width: f32,
    pub clamp_mode: ClampMode,
}

impl Default for Positioning {
    fn default() -> Self {
        Self {
            bubble_h_inset: DEFAULT_BUBBLE_INSET,
            bubble_v_inset: DEFAULT_BUBBLE_INSET,
            text_h_inset: DEFAULT_TEXT_INSET,
            text_v_inset: DEFAULT_TEXT_INSET,
            max_width: DEFAULT_MAX_TEXT_WIDTH,
            clamp_mode: ClampMode::default(),
        }
    }
}

/// Show/dismiss transition parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Animating {
    /// Uniform scale the bubble shrinks to while dismissing.
    pub dismiss_scale: f32,
    pub show_initial_scale: f32,
    pub show_final_scale: f32,
    pub spring_damping: f32,
    pub spring_velocity: f32,
    pub show_initial_alpha: f32,
    pub dismiss_final_alpha: f32,
    /// Seconds.
    pub show_duration: f32,
    /// Seconds.
    pub dismiss_duration: f32,
    /// Seconds spent moving to a new frame after the container changes.
    pub relayout_duration: f32,
    pub dismiss_on_tap: bool,
}

impl Default for Animating {
    fn default() -> Self {
        Self {
            dismiss_scale: 0.1,
            show_initial_scale: 0.0,
            show_final_scale: 1.0,
            spring_damping: DEFAULT_SPRING_DAMPING,
            spring_velocity: DEFAULT_SPRING_VELOCITY,
            show_initial_alpha: 0.0,
            dismiss_final_alpha: 0.0,
            show_duration: DEFAULT_TRANSITION_SECS,
            dismiss_duration: DEFAULT_TRANSITION_SECS,
            relayout_duration: RELAYOUT_TRANSITION_SECS,
            dismiss_on_tap: true,
        }
    }
}

/// All tooltip preferences.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub drawing: Styling,
    pub positioning: Positioning,
    pub animating: Animating,
}

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the preferred arrow side.
    pub fn with_side(mut self, side: Side) -> Self {
        self.drawing.arrow_side = side;
        self
    }

    /// A border is drawn only when it is both wide and visible.
    pub fn has_border(&self) -> bool {
        self.drawing.border_width > 0.0 && !self.drawing.border_color.is_transparent()
    }
}
