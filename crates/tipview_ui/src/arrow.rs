//! Arrow tip placement in bubble-local coordinates.

use crate::layout::{Point, Rectangle, Size};
use crate::placement::Side;
use crate::preferences::Positioning;

/// Where the arrow's apex sits inside a bubble placed at `frame`.
///
/// Along the arrow edge the tip points at the reference's center, which
/// keeps it aimed correctly after the frame was clamped. A bubble narrower
/// (or shorter, for left/right) than the reference centers the tip instead.
/// Across the edge the tip sits one bubble inset in from the content bounds;
/// left/right reuse the vertical inset.
pub fn arrow_tip(
    side: Side,
    frame: &Rectangle,
    reference: &Rectangle,
    content: Size,
    positioning: &Positioning,
) -> Point {
    let inset = positioning.bubble_v_inset;

    if side.is_vertical() {
        let x = if frame.width < reference.width {
            content.width / 2.0
        } else {
            (frame.x - reference.x).abs() + reference.width / 2.0
        };
        let y = match side {
            Side::Bottom => content.height - inset,
            _ => inset,
        };
        Point::new(x, y)
    } else {
        let y = if frame.height < reference.height {
            content.height / 2.0
        } else {
            (frame.y - reference.y).abs() + reference.height / 2.0
        };
        let x = match side {
            Side::Left => inset,
            _ => content.width - inset,
        };
        Point::new(x, y)
    }
}
