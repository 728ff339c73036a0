//! Plane geometry used by collision and rasterisation.
//!
//! Coordinates grow right (x) and down (y).  Rectangles are axis-aligned
//! and anchored at their top-left corner.  Every predicate here is pure.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Invariant: both size components are non-negative.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rectangle {
    pub position: Point,
    pub size: Size,
}

impl Rectangle {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            position: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.size.width
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.height
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.position.x + self.size.width / 2.0,
            self.position.y + self.size.height / 2.0,
        )
    }
}

/// Invariant: `radius > 0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f32,
}

impl Circle {
    pub const fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            center: Point::new(x, y),
            radius,
        }
    }
}

/// Half-open containment: `x ∈ [left, right)` and `y ∈ [top, bottom)`.
pub fn point_in_rectangle(p: Point, r: &Rectangle) -> bool {
    p.x >= r.position.x && p.x < r.right() && p.y >= r.position.y && p.y < r.bottom()
}

/// Closed disc: the boundary counts as inside.
pub fn point_in_circle(p: Point, c: &Circle) -> bool {
    let dx = p.x - c.center.x;
    let dy = p.y - c.center.y;
    dx * dx + dy * dy <= c.radius * c.radius
}

/// Overlap test between a circle and an axis-aligned rectangle.
///
/// The circle centre is clamped onto the rectangle; the circle overlaps iff
/// that nearest point lies within the radius.  This covers the centre being
/// inside the rectangle (distance zero) as well as edge and corner contacts.
pub fn intersects_circle_rectangle(c: &Circle, r: &Rectangle) -> bool {
    let nearest = Point::new(
        c.center.x.clamp(r.position.x, r.right()),
        c.center.y.clamp(r.position.y, r.bottom()),
    );
    point_in_circle(nearest, c)
}
