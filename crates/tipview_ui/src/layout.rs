//! Geometry primitives shared by the placement, arrow and outline modules.
//!
//! All rectangles live in a single coordinate space chosen by the caller
//! (usually the container's). Sizes are expected to be finite and
//! non-negative; constructors clamp negative extents to zero.

use serde::{Deserialize, Serialize};

/// A 2D size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Create a size, clamping negative or non-finite extents to zero.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: non_negative(width),
            height: non_negative(height),
        }
    }

    pub fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }

    /// Round both extents up to the next whole pixel.
    pub fn ceil(self) -> Self {
        Self::new(self.width.ceil(), self.height.ceil())
    }
}

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Offset this point by `(dx, dy)`.
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// A rectangle defined by position and size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: non_negative(width),
            height: non_negative(height),
        }
    }

    /// Create a rectangle from an origin and a size.
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge.
    #[inline]
    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    /// Get the center point of this rectangle.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.max_x() && point.y >= self.y && point.y <= self.max_y()
    }

    /// Whether the interiors of two rectangles overlap.
    ///
    /// Rectangles that only share an edge do not intersect, and an empty
    /// rectangle never intersects anything.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        if self.width <= 0.0 || self.height <= 0.0 || other.width <= 0.0 || other.height <= 0.0 {
            return false;
        }
        self.x < other.max_x()
            && other.x < self.max_x()
            && self.y < other.max_y()
            && other.y < self.max_y()
    }

    /// Whether `other` lies entirely inside this rectangle.
    pub fn contains_rect(&self, other: &Rectangle) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }
}

/// How the vertical clamp treats the container's origin.
///
/// `Legacy` tests vertical overflow against the container's bottom edge
/// (`max_y`) but corrects with its height, which only matters for
/// containers not anchored at `y = 0`. `Strict` uses the container height
/// for both, the same way the horizontal clamp uses its width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClampMode {
    #[default]
    Legacy,
    Strict,
}

/// Push `frame` back inside `container`.
///
/// Each axis is corrected once: a negative origin snaps to zero, otherwise
/// an overflowing far edge is pulled back so it meets the container's
/// extent. A frame larger than the container therefore stays at zero and
/// overflows on the far side.
pub fn clamp_into(frame: Rectangle, container: &Rectangle, mode: ClampMode) -> Rectangle {
    let mut frame = frame;

    if frame.x < 0.0 {
        frame.x = 0.0;
    } else if frame.max_x() > container.width {
        frame.x = container.width - frame.width;
    }

    let bottom = match mode {
        ClampMode::Legacy => container.max_y(),
        ClampMode::Strict => container.height,
    };
    if frame.y < 0.0 {
        frame.y = 0.0;
    } else if frame.max_y() > bottom {
        frame.y = container.height - frame.height;
    }

    frame
}

#[inline]
fn non_negative(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
