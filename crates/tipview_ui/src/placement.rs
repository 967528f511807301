//! Bubble placement around a reference rectangle.
//!
//! [`compute_frame`] places the bubble against one side of the reference and
//! clamps it into the container. [`arrange`] adds the fallback: when
//! clamping pushes the bubble onto the element it annotates, the remaining
//! sides are tried in [`Side::ALL`] order.

use serde::{Deserialize, Serialize};

use crate::layout::{clamp_into, ClampMode, Rectangle, Size};

/// The bubble edge that carries the arrow.
///
/// `Top` means the arrow points up at the reference, so the bubble sits
/// below it. `Left` means the arrow points left, so the bubble sits to the
/// right of the reference, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

impl Side {
    /// Fallback order.
    pub const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Right, Side::Left];

    /// Whether the arrow sits on a horizontal edge (top or bottom).
    pub fn is_vertical(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Bottom => "bottom",
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(Side::Top),
            "bottom" => Ok(Side::Bottom),
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            other => Err(format!("unknown arrow side '{}'", other)),
        }
    }
}

/// Frame of a `content`-sized bubble anchored on `side` of `reference`,
/// clamped into `container`.
pub fn compute_frame(
    side: Side,
    reference: &Rectangle,
    container: &Rectangle,
    content: Size,
    mode: ClampMode,
) -> Rectangle {
    let center = reference.center();
    let (x, y) = match side {
        Side::Top => (center.x - content.width / 2.0, reference.max_y()),
        Side::Bottom => (center.x - content.width / 2.0, reference.y - content.height),
        Side::Right => (reference.x - content.width, center.y - content.height / 2.0),
        Side::Left => (reference.max_x(), center.y - content.height / 2.0),
    };

    let frame = Rectangle::new(x, y, content.width, content.height);
    clamp_into(frame, container, mode)
}

/// A frame is usable when it leaves the reference uncovered.
fn is_frame_valid(frame: &Rectangle, reference: &Rectangle) -> bool {
    !frame.intersects(reference)
}

/// Choose the final frame and side for a bubble.
///
/// Returns the preferred side's frame when it does not cover the
/// reference; otherwise the first non-covering alternative in
/// [`Side::ALL`] order; otherwise the preferred side's frame anyway.
pub fn arrange(
    preferred: Side,
    reference: &Rectangle,
    container: &Rectangle,
    content: Size,
    mode: ClampMode,
) -> (Rectangle, Side) {
    let frame = compute_frame(preferred, reference, container, content, mode);
    if is_frame_valid(&frame, reference) {
        return (frame, preferred);
    }

    let fallback = Side::ALL
        .iter()
        .copied()
        .filter(|side| *side != preferred)
        .map(|side| (compute_frame(side, reference, container, content, mode), side))
        .find(|(candidate, _)| is_frame_valid(candidate, reference));

    match fallback {
        Some((candidate, side)) => {
            log::info!(
                "Arrow side {} covers the reference view; using {} instead",
                preferred,
                side
            );
            (candidate, side)
        }
        None => {
            log::debug!(
                "No arrow side avoids the reference view; keeping {}",
                preferred
            );
            (frame, preferred)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container() -> Rectangle {
        Rectangle::new(0.0, 0.0, 320.0, 480.0)
    }

    const CONTENT: Size = Size {
        width: 60.0,
        height: 40.0,
    };

    #[test]
    fn test_compute_frame_each_side() {
        let reference = Rectangle::new(100.0, 200.0, 50.0, 30.0);
        let c = container();
        let mode = ClampMode::Legacy;

        let top = compute_frame(Side::Top, &reference, &c, CONTENT, mode);
        assert_eq!((top.x, top.y), (95.0, 230.0));

        let bottom = compute_frame(Side::Bottom, &reference, &c, CONTENT, mode);
        assert_eq!((bottom.x, bottom.y), (95.0, 160.0));

        let right = compute_frame(Side::Right, &reference, &c, CONTENT, mode);
        assert_eq!((right.x, right.y), (40.0, 195.0));

        let left = compute_frame(Side::Left, &reference, &c, CONTENT, mode);
        assert_eq!((left.x, left.y), (150.0, 195.0));

        for frame in [top, bottom, right, left] {
            assert_eq!(frame.size(), CONTENT);
            assert!(!frame.intersects(&reference));
        }
    }

    #[test]
    fn test_frames_stay_inside_container() {
        let c = container();
        let references = [
            Rectangle::new(0.0, 0.0, 20.0, 20.0),
            Rectangle::new(300.0, 0.0, 20.0, 20.0),
            Rectangle::new(0.0, 460.0, 20.0, 20.0),
            Rectangle::new(300.0, 460.0, 20.0, 20.0),
            Rectangle::new(140.0, 220.0, 40.0, 40.0),
        ];
        for reference in references {
            for side in Side::ALL {
                let frame = compute_frame(side, &reference, &c, CONTENT, ClampMode::Legacy);
                assert!(
                    c.contains_rect(&frame),
                    "{:?} for {:?} escaped: {:?}",
                    side,
                    reference,
                    frame
                );
            }
        }
    }

    #[test]
    fn test_right_edge_reference_clamps_back() {
        let c = container();
        let reference = Rectangle::new(300.0, 0.0, 20.0, 20.0);
        let (frame, _) = arrange(Side::Right, &reference, &c, CONTENT, ClampMode::Legacy);
        assert!(frame.x >= 0.0);
        assert!(frame.x <= c.width - frame.width);
    }

    #[test]
    fn test_preferred_side_kept_when_valid() {
        let reference = Rectangle::new(100.0, 200.0, 50.0, 30.0);
        for side in Side::ALL {
            let (_, chosen) = arrange(side, &reference, &container(), CONTENT, ClampMode::Legacy);
            assert_eq!(chosen, side);
        }
    }

    #[test]
    fn test_top_falls_back_to_bottom_in_short_container() {
        // Bubble below the reference would run past the bottom and be
        // clamped back over it.
        let c = Rectangle::new(0.0, 0.0, 320.0, 100.0);
        let reference = Rectangle::new(100.0, 70.0, 50.0, 20.0);
        let (frame, side) = arrange(Side::Top, &reference, &c, CONTENT, ClampMode::Legacy);
        assert_eq!(side, Side::Bottom);
        assert_eq!(frame.y, 30.0);
        assert!(!frame.intersects(&reference));
    }

    #[test]
    fn test_fallback_order_skips_to_right() {
        // Neither above nor below fits; left of the reference does.
        let c = Rectangle::new(0.0, 0.0, 320.0, 50.0);
        let reference = Rectangle::new(200.0, 10.0, 30.0, 30.0);
        let (frame, side) = arrange(Side::Top, &reference, &c, CONTENT, ClampMode::Legacy);
        assert_eq!(side, Side::Right);
        assert_eq!(frame.x, 140.0);
    }

    #[test]
    fn test_fallback_reaches_left() {
        // Reference hugs the left edge of a short container, so only the
        // bubble to its right avoids it.
        let c = Rectangle::new(0.0, 0.0, 320.0, 50.0);
        let reference = Rectangle::new(10.0, 10.0, 30.0, 30.0);
        let (frame, side) = arrange(Side::Bottom, &reference, &c, CONTENT, ClampMode::Legacy);
        assert_eq!(side, Side::Left);
        assert_eq!(frame.x, 40.0);
    }

    #[test]
    fn test_no_valid_side_keeps_preferred() {
        let c = Rectangle::new(0.0, 0.0, 60.0, 40.0);
        let reference = Rectangle::new(10.0, 10.0, 20.0, 20.0);
        let expected = compute_frame(Side::Left, &reference, &c, CONTENT, ClampMode::Legacy);
        let (frame, side) = arrange(Side::Left, &reference, &c, CONTENT, ClampMode::Legacy);
        assert_eq!(side, Side::Left);
        assert_eq!(frame, expected);
    }

    #[test]
    fn test_arrange_is_idempotent() {
        let c = Rectangle::new(0.0, 0.0, 320.0, 100.0);
        let reference = Rectangle::new(100.0, 70.0, 50.0, 20.0);
        let first = arrange(Side::Top, &reference, &c, CONTENT, ClampMode::Legacy);
        let second = arrange(Side::Top, &reference, &c, CONTENT, ClampMode::Legacy);
        assert_eq!(first, second);
    }

    #[test]
    fn test_side_parse() {
        assert_eq!("Right".parse::<Side>(), Ok(Side::Right));
        assert!("diagonal".parse::<Side>().is_err());
        assert_eq!(Side::Left.to_string(), "left");
    }
}
