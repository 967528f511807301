//! tipview_ui - Tooltip bubbles anchored to views
//!
//! This crate computes where a tooltip bubble goes relative to the view it
//! annotates, which edge carries the arrow and the outline of the bubble
//! itself. Rendering, text measurement, the view hierarchy and animation
//! are collaborators expressed as traits so any host can plug in its own.

pub mod animation;
pub mod arrow;
pub mod constants;
mod error;
pub mod layout;
pub mod outline;
pub mod placement;
pub mod preferences;
pub mod renderer;
pub mod text_metrics;
mod tooltip;
pub mod view_tree;

pub use animation::{
    AnimationFrame, Animator, SpringCurve, TimelineAnimator, Transition, TransitionKind,
    VisualState,
};
pub use arrow::arrow_tip;
pub use error::{Result, TooltipError};
pub use layout::{clamp_into, ClampMode, Point, Rectangle, Size};
pub use outline::{build_outline, bubble_frame, draw_bubble, BubbleOutline, CornerArc, PathSegment};
pub use placement::{arrange, compute_frame, Side};
pub use preferences::{
    Animating, Font, FontFamily, Positioning, Preferences, Styling, TextAlignment,
};
pub use renderer::{Color, DrawCommand, RecordingSurface, Surface};
pub use text_metrics::{TextMeasure, TextMetrics};
pub use tooltip::{Arrangement, PresentationState, TooltipView};
pub use view_tree::{ViewArena, ViewId, ViewTree};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::animation::{Animator, TimelineAnimator, Transition, TransitionKind};
    pub use crate::layout::{Point, Rectangle, Size};
    pub use crate::placement::Side;
    pub use crate::preferences::Preferences;
    pub use crate::renderer::{Color, Surface};
    pub use crate::text_metrics::TextMeasure;
    pub use crate::tooltip::{PresentationState, TooltipView};
    pub use crate::view_tree::{ViewArena, ViewId, ViewTree};
    pub use crate::TooltipError;
}
