use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A point on the canvas, in points, origin at the top-left corner.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl Location {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Add<Size> for Location {
    type Output = Location;

    fn add(self, s: Size) -> Location {
        Location::new(self.x + s.width, self.y + s.height)
    }
}

impl Sub for Location {
    type Output = Size;

    fn sub(self, b: Location) -> Size {
        Size::new(self.x - b.x, self.y - b.y)
    }
}

impl Mul<f64> for Size {
    type Output = Size;

    fn mul(self, v: f64) -> Size {
        Size::new(self.width * v, self.height * v)
    }
}

/// Rectangle given by its top-left corner and size.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub origin: Location,
    pub size: Size,
}

impl Viewport {
    pub fn new(origin: Location, size: Size) -> Self {
        Self { origin, size }
    }

    /// Inner rectangle of `canvas`. `border` is relative to the canvas size:
    /// half of it goes to the left, top and bottom. The right edge stays
    /// 10 points from the canvas edge.
    ///
    /// ```
    /// use tredraw::libs::geometry::{Size, Viewport};
    /// let v = Viewport::inset(Size::new(600.0, 800.0), 0.1);
    /// assert_eq!(v.origin.x, 30.0);
    /// assert_eq!(v.origin.y, 40.0);
    /// assert_eq!(v.opposite().x, 590.0);
    /// assert_eq!(v.opposite().y, 760.0);
    /// ```
    pub fn inset(canvas: Size, border: f64) -> Self {
        const RIGHT_PADDING: f64 = 10.0;
        let origin = Location::default() + canvas * (border * 0.5);
        let width = canvas.width - origin.x - RIGHT_PADDING;
        Self::new(
            origin,
            Size::new(width.max(0.0), canvas.height * (1.0 - border)),
        )
    }

    /// Bottom-right corner
    pub fn opposite(&self) -> Location {
        self.origin + self.size
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = self.opposite();
        write!(
            f,
            "[{} {} {} {}]",
            self.origin.x, self.origin.y, o.x, o.y
        )
    }
}
