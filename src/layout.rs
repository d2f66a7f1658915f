//! Geometry value types for panels
//!
//! Panels are positioned in screen space with the origin at the top-left
//! corner of the window and the y axis pointing down. Every panel is made of
//! nested boxes: the outer margin box, the border box, the padding box and the
//! content box.

use std::fmt;

/// Represents a 2D point with x and y coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Offset this point by another point
    pub fn offset(&self, by: Point) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Represents a 2D size with width and height
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a rectangle with position and size
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn x(&self) -> f32 {
        self.origin.x
    }

    pub fn y(&self) -> f32 {
        self.origin.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn max_x(&self) -> f32 {
        self.origin.x + self.size.width
    }

    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.height
    }

    /// Edges are inclusive on all four sides
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x() && point.x <= self.max_x() && point.y >= self.y() && point.y <= self.max_y()
    }

    /// Shrink the rectangle by the given edge widths
    pub fn inset(&self, edges: &EdgeValues) -> Self {
        Self::new(
            self.x() + edges.left,
            self.y() + edges.top,
            (self.width() - edges.horizontal()).max(0.0),
            (self.height() - edges.vertical()).max(0.0),
        )
    }
}

/// Edge widths for margins, borders and paddings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeValues {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl EdgeValues {
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self { top, right, bottom, left }
    }

    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn zero() -> Self {
        Self::uniform(0.0)
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

impl Default for EdgeValues {
    fn default() -> Self {
        Self::zero()
    }
}
