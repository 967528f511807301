//! Rendering surface abstraction.
//!
//! The tooltip never talks to a graphics API directly. It issues draw calls
//! against a [`Surface`] whose coordinate system matches the bubble's local
//! frame. [`RecordingSurface`] keeps those calls as [`DrawCommand`]s, which is
//! what the tests inspect and what a retained-mode host can replay.

use serde::{Deserialize, Serialize};

use crate::layout::Rectangle;
use crate::outline::BubbleOutline;
use crate::preferences::{Font, TextAlignment};

/// RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const BLUE: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 1.0,
        a: 1.0,
    };
    pub const TRANSPARENT: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Fully transparent colors draw nothing regardless of their rgb part.
    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    /// Same color with alpha multiplied by `factor`.
    pub fn with_alpha_scaled(self, factor: f32) -> Self {
        Self {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..self
        }
    }

    /// Convert to 8-bit RGBA.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [channel(self.r), channel(self.g), channel(self.b), channel(self.a)]
    }
}

/// Drawing collaborator used by [`crate::TooltipView::draw`].
pub trait Surface {
    /// Fill the interior of a closed outline.
    fn fill_path(&mut self, path: &BubbleOutline, color: Color);

    /// Stroke an outline with the given line width.
    fn stroke_path(&mut self, path: &BubbleOutline, color: Color, width: f32);

    /// Draw (wrapped) text inside `rect`.
    fn draw_text(
        &mut self,
        rect: Rectangle,
        text: &str,
        font: &Font,
        color: Color,
        alignment: TextAlignment,
    );
}

/// A draw command recorded by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillPath {
        path: BubbleOutline,
        color: Color,
    },
    StrokePath {
        path: BubbleOutline,
        color: Color,
        width: f32,
    },
    DrawText {
        rect: Rectangle,
        text: String,
        font: Font,
        color: Color,
        alignment: TextAlignment,
    },
}

/// Surface that records every call instead of painting.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded so far, in call order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the surface empty.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Surface for RecordingSurface {
    fn fill_path(&mut self, path: &BubbleOutline, color: Color) {
        self.commands.push(DrawCommand::FillPath {
            path: path.clone(),
            color,
        });
    }

    fn stroke_path(&mut self, path: &BubbleOutline, color: Color, width: f32) {
        self.commands.push(DrawCommand::StrokePath {
            path: path.clone(),
            color,
            width,
        });
    }

    fn draw_text(
        &mut self,
        rect: Rectangle,
        text: &str,
        font: &Font,
        color: Color,
        alignment: TextAlignment,
    ) {
        self.commands.push(DrawCommand::DrawText {
            rect,
            text: text.to_string(),
            font: font.clone(),
            color,
            alignment,
        });
    }
}
