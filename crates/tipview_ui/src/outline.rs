//! Bubble outline construction.
//!
//! The outline is a rounded rectangle with a triangular notch on the arrow
//! edge. One builder handles every [`Side`]: the side only decides which
//! way the notch points and in which order the corners are visited.

use crate::layout::{Point, Rectangle, Size};
use crate::placement::Side;
use crate::preferences::Preferences;
use crate::renderer::Surface;

/// A rounded corner, resolved from a tangent-arc request into concrete
/// geometry.
///
/// A renderer draws a straight line from the current point to `start`,
/// then the circular arc to `end`. `control1`/`control2` give the cubic
/// Bézier approximation of that arc for backends without native arcs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerArc {
    /// The rectangle corner both tangent lines meet at.
    pub corner: Point,
    pub start: Point,
    pub end: Point,
    pub center: Point,
    pub radius: f32,
    pub control1: Point,
    pub control2: Point,
}

/// One outline segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    Arc(CornerArc),
    /// Straight segment back to the last `MoveTo`.
    Close,
}

/// Closed bubble outline in bubble-local coordinates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BubbleOutline {
    segments: Vec<PathSegment>,
}

impl BubbleOutline {
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.segments.last(), Some(PathSegment::Close))
    }

    /// Number of rounded corners.
    pub fn arc_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, PathSegment::Arc(_)))
            .count()
    }

    /// First point of the outline.
    pub fn start(&self) -> Option<Point> {
        match self.segments.first() {
            Some(PathSegment::MoveTo(p)) => Some(*p),
            _ => None,
        }
    }

    fn move_to(&mut self, p: Point) {
        self.segments.push(PathSegment::MoveTo(p));
    }

    fn line_to(&mut self, p: Point) {
        self.segments.push(PathSegment::LineTo(p));
    }

    fn close(&mut self) {
        self.segments.push(PathSegment::Close);
    }

    /// Where the pen currently is.
    fn current(&self) -> Point {
        match self.segments.last() {
            Some(PathSegment::MoveTo(p)) | Some(PathSegment::LineTo(p)) => *p,
            Some(PathSegment::Arc(arc)) => arc.end,
            Some(PathSegment::Close) => self.start().unwrap_or_default(),
            None => Point::zero(),
        }
    }

    /// Round the corner at `corner`, tangent to the line from the current
    /// point to `corner` and to the line from `corner` to `next`.
    fn arc_to(&mut self, corner: Point, next: Point, radius: f32) {
        let from = self.current();
        match tangent_arc(from, corner, next, radius) {
            Some(arc) => self.segments.push(PathSegment::Arc(arc)),
            None => self.line_to(corner),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    fn of(self, rect: &Rectangle) -> Point {
        match self {
            Corner::TopLeft => Point::new(rect.x, rect.y),
            Corner::TopRight => Point::new(rect.max_x(), rect.y),
            Corner::BottomRight => Point::new(rect.max_x(), rect.max_y()),
            Corner::BottomLeft => Point::new(rect.x, rect.max_y()),
        }
    }
}

/// Corners visited after leaving the notch, starting at the end of the
/// arrow edge the first base point faces.
fn corner_order(side: Side) -> [Corner; 4] {
    use Corner::*;
    match side {
        Side::Top => [TopLeft, BottomLeft, BottomRight, TopRight],
        Side::Bottom => [BottomLeft, TopLeft, TopRight, BottomRight],
        Side::Left => [TopLeft, TopRight, BottomRight, BottomLeft],
        Side::Right => [TopRight, TopLeft, BottomLeft, BottomRight],
    }
}

/// Unit vector pointing out of the bubble through the arrow, and the unit
/// vector running along the arrow edge.
fn notch_axes(side: Side) -> ((f32, f32), (f32, f32)) {
    match side {
        Side::Top => ((0.0, -1.0), (1.0, 0.0)),
        Side::Bottom => ((0.0, 1.0), (1.0, 0.0)),
        Side::Left => ((-1.0, 0.0), (0.0, 1.0)),
        Side::Right => ((1.0, 0.0), (0.0, 1.0)),
    }
}

/// The bubble body inside a `content`-sized frame: the content shrunk by
/// the bubble insets and, on the arrow's axis, by the arrow height.
pub fn bubble_frame(side: Side, content: Size, preferences: &Preferences) -> Rectangle {
    let h_inset = preferences.positioning.bubble_h_inset;
    let v_inset = preferences.positioning.bubble_v_inset;
    let arrow_height = preferences.drawing.arrow_height;

    match side {
        Side::Top | Side::Bottom => Rectangle::new(
            h_inset,
            if side == Side::Bottom {
                v_inset
            } else {
                v_inset + arrow_height
            },
            content.width - 2.0 * h_inset,
            content.height - 2.0 * v_inset - arrow_height,
        ),
        Side::Left | Side::Right => Rectangle::new(
            if side == Side::Right {
                h_inset
            } else {
                h_inset + arrow_height
            },
            v_inset,
            content.width - 2.0 * h_inset - arrow_height,
            content.height - 2.0 * v_inset,
        ),
    }
}

/// Build the closed outline for a bubble whose arrow apex is `tip`.
///
/// The corner radius is limited to half the bubble's shorter side.
pub fn build_outline(
    side: Side,
    bubble: &Rectangle,
    corner_radius: f32,
    arrow_width: f32,
    arrow_height: f32,
    tip: Point,
) -> BubbleOutline {
    let radius = corner_radius
        .min(bubble.width / 2.0)
        .min(bubble.height / 2.0)
        .max(0.0);
    let ((nx, ny), (px, py)) = notch_axes(side);
    let half = arrow_width / 2.0;
    let base = tip.offset(-nx * arrow_height, -ny * arrow_height);

    let mut outline = BubbleOutline::default();
    outline.move_to(tip);
    outline.line_to(base.offset(-px * half, -py * half));

    let corners = corner_order(side).map(|c| c.of(bubble));
    for (i, corner) in corners.iter().enumerate() {
        let next = corners[(i + 1) % corners.len()];
        outline.arc_to(*corner, next, radius);
    }

    outline.line_to(base.offset(px * half, py * half));
    outline.close();
    outline
}

/// Fill the outline and, when configured, stroke its border.
pub fn draw_bubble<S: Surface + ?Sized>(
    surface: &mut S,
    outline: &BubbleOutline,
    preferences: &Preferences,
) {
    surface.fill_path(outline, preferences.drawing.background_color);
    if preferences.has_border() {
        surface.stroke_path(
            outline,
            preferences.drawing.border_color,
            preferences.drawing.border_width,
        );
    }
}

/// A `text`-sized block centered inside the bubble body.
pub fn text_rect(bubble: &Rectangle, text: Size) -> Rectangle {
    Rectangle::new(
        bubble.x + (bubble.width - text.width) / 2.0,
        bubble.y + (bubble.height - text.height) / 2.0,
        text.width,
        text.height,
    )
}

/// Resolve a tangent arc. Returns `None` when the corner is degenerate
/// (zero radius, zero-length tangent or collinear tangents).
fn tangent_arc(from: Point, corner: Point, next: Point, radius: f32) -> Option<CornerArc> {
    const EPS: f32 = 1e-4;

    if radius <= EPS {
        return None;
    }
    let len1 = from.distance(corner);
    let len2 = next.distance(corner);
    if len1 <= EPS || len2 <= EPS {
        return None;
    }

    let u1 = ((from.x - corner.x) / len1, (from.y - corner.y) / len1);
    let u2 = ((next.x - corner.x) / len2, (next.y - corner.y) / len2);
    let cos = (u1.0 * u2.0 + u1.1 * u2.1).clamp(-1.0, 1.0);
    let theta = cos.acos();
    if theta <= EPS || (std::f32::consts::PI - theta) <= EPS {
        return None;
    }

    let tangent = radius / (theta / 2.0).tan();
    let start = corner.offset(u1.0 * tangent, u1.1 * tangent);
    let end = corner.offset(u2.0 * tangent, u2.1 * tangent);

    let (bx, by) = (u1.0 + u2.0, u1.1 + u2.1);
    let blen = (bx * bx + by * by).sqrt();
    let to_center = radius / (theta / 2.0).sin();
    let center = corner.offset(bx / blen * to_center, by / blen * to_center);

    // Bézier handle length for a circular arc of the given sweep.
    let sweep = std::f32::consts::PI - theta;
    let handle = 4.0 / 3.0 * (sweep / 4.0).tan() * radius;
    let control1 = start.offset(-u1.0 * handle, -u1.1 * handle);
    let control2 = end.offset(-u2.0 * handle, -u2.1 * handle);

    Some(CornerArc {
        corner,
        start,
        end,
        center,
        radius,
        control1,
        control2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < EPS
    }

    fn arcs(outline: &BubbleOutline) -> Vec<CornerArc> {
        outline
            .segments()
            .iter()
            .filter_map(|s| match s {
                PathSegment::Arc(a) => Some(*a),
                _ => None,
            })
            .collect()
    }

    fn line_points(outline: &BubbleOutline) -> Vec<Point> {
        outline
            .segments()
            .iter()
            .filter_map(|s| match s {
                PathSegment::LineTo(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_bubble_frame_per_side() {
        let prefs = Preferences::default();
        let content = Size::new(60.0, 40.0);

        assert_eq!(
            bubble_frame(Side::Bottom, content, &prefs),
            Rectangle::new(2.0, 2.0, 56.0, 32.0)
        );
        assert_eq!(
            bubble_frame(Side::Top, content, &prefs),
            Rectangle::new(2.0, 6.0, 56.0, 32.0)
        );
        assert_eq!(
            bubble_frame(Side::Right, content, &prefs),
            Rectangle::new(2.0, 2.0, 52.0, 36.0)
        );
        assert_eq!(
            bubble_frame(Side::Left, content, &prefs),
            Rectangle::new(6.0, 2.0, 52.0, 36.0)
        );
    }

    #[test]
    fn test_outline_structure() {
        let bubble = Rectangle::new(2.0, 6.0, 56.0, 32.0);
        let outline = build_outline(Side::Top, &bubble, 4.0, 8.0, 4.0, Point::new(30.0, 2.0));

        assert_eq!(outline.start(), Some(Point::new(30.0, 2.0)));
        assert!(outline.is_closed());
        assert_eq!(outline.arc_count(), 4);
        assert_eq!(outline.segments().len(), 8);
    }

    #[test]
    fn test_notch_base_points_per_side() {
        let prefs = Preferences::default();
        let content = Size::new(60.0, 40.0);
        let cases = [
            (Side::Top, Point::new(30.0, 2.0), Point::new(26.0, 6.0), Point::new(34.0, 6.0)),
            (Side::Bottom, Point::new(30.0, 38.0), Point::new(26.0, 34.0), Point::new(34.0, 34.0)),
            (Side::Left, Point::new(2.0, 20.0), Point::new(6.0, 16.0), Point::new(6.0, 24.0)),
            (Side::Right, Point::new(58.0, 20.0), Point::new(54.0, 16.0), Point::new(54.0, 24.0)),
        ];

        for (side, tip, first, second) in cases {
            let bubble = bubble_frame(side, content, &prefs);
            let outline = build_outline(side, &bubble, 4.0, 8.0, 4.0, tip);
            let lines = line_points(&outline);
            assert_eq!(lines.len(), 2, "{:?}", side);
            assert!(close(lines[0], first), "{:?}: {:?}", side, lines[0]);
            assert!(close(lines[1], second), "{:?}: {:?}", side, lines[1]);
        }
    }

    #[test]
    fn test_notch_base_sits_on_bubble_edge() {
        let prefs = Preferences::default();
        let content = Size::new(60.0, 40.0);
        let tip = Point::new(30.0, 2.0);
        let bubble = bubble_frame(Side::Top, content, &prefs);
        let outline = build_outline(Side::Top, &bubble, 4.0, 8.0, 4.0, tip);
        for p in line_points(&outline) {
            assert!((p.y - bubble.y).abs() < EPS);
        }
    }

    #[test]
    fn test_corner_order_for_top() {
        let bubble = Rectangle::new(2.0, 6.0, 56.0, 32.0);
        let outline = build_outline(Side::Top, &bubble, 4.0, 8.0, 4.0, Point::new(30.0, 2.0));
        let corners: Vec<Point> = arcs(&outline).iter().map(|a| a.corner).collect();
        assert_eq!(
            corners,
            vec![
                Point::new(2.0, 6.0),
                Point::new(2.0, 38.0),
                Point::new(58.0, 38.0),
                Point::new(58.0, 6.0),
            ]
        );
    }

    #[test]
    fn test_arc_tangent_points_and_center() {
        let bubble = Rectangle::new(2.0, 6.0, 56.0, 32.0);
        let outline = build_outline(Side::Top, &bubble, 4.0, 8.0, 4.0, Point::new(30.0, 2.0));
        let first = arcs(&outline)[0];

        // Top-left corner, approached along the top edge, leaving down the
        // left edge.
        assert!(close(first.start, Point::new(6.0, 6.0)));
        assert!(close(first.end, Point::new(2.0, 10.0)));
        assert!(close(first.center, Point::new(6.0, 10.0)));
        assert!((first.radius - 4.0).abs() < EPS);

        // Quarter circle handle length is about 0.5523 * r.
        assert!(close(first.control1, Point::new(6.0 - 2.2091, 6.0)));
        assert!(close(first.control2, Point::new(2.0, 10.0 - 2.2091)));
    }

    #[test]
    fn test_arcs_chain_around_rectangle() {
        let prefs = Preferences::default();
        let content = Size::new(80.0, 50.0);
        let tips = [
            (Side::Top, Point::new(40.0, 2.0)),
            (Side::Bottom, Point::new(40.0, 48.0)),
            (Side::Left, Point::new(2.0, 25.0)),
            (Side::Right, Point::new(78.0, 25.0)),
        ];
        for (side, tip) in tips {
            let bubble = bubble_frame(side, content, &prefs);
            let outline = build_outline(side, &bubble, 4.0, 8.0, 4.0, tip);
            assert_eq!(outline.arc_count(), 4);
            for arc in arcs(&outline) {
                assert!((arc.start.distance(arc.center) - arc.radius).abs() < EPS);
                assert!((arc.end.distance(arc.center) - arc.radius).abs() < EPS);
                assert!(bubble.contains(arc.center));
            }
        }
    }

    #[test]
    fn test_radius_limited_to_half_side() {
        let bubble = Rectangle::new(0.0, 0.0, 40.0, 10.0);
        let outline = build_outline(Side::Bottom, &bubble, 50.0, 8.0, 4.0, Point::new(20.0, 14.0));
        for arc in arcs(&outline) {
            assert!((arc.radius - 5.0).abs() < EPS);
        }
    }

    #[test]
    fn test_zero_radius_uses_sharp_corners() {
        let bubble = Rectangle::new(0.0, 0.0, 40.0, 20.0);
        let outline = build_outline(Side::Bottom, &bubble, 0.0, 8.0, 4.0, Point::new(20.0, 24.0));
        assert_eq!(outline.arc_count(), 0);
        assert_eq!(line_points(&outline).len(), 6);
    }

    #[test]
    fn test_text_rect_centered() {
        let bubble = Rectangle::new(2.0, 2.0, 56.0, 32.0);
        let rect = text_rect(&bubble, Size::new(20.0, 16.0));
        assert_eq!(rect, Rectangle::new(20.0, 10.0, 20.0, 16.0));
    }
}
