//! Plain 2D geometry used by the collision resolver and pointer sensor.
//!
//! Coordinates are `f64` so the same code serves terminal cells and pixel
//! space. The y axis grows downwards.

/// A position in board space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    ///
    /// # Examples
    ///
    /// ```
    /// use hireboard_pipeline::Point;
    ///
    /// assert_eq!(Point::new(0.0, 0.0).distance_to(Point::new(3.0, 4.0)), 5.0);
    /// ```
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Bounds {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Horizontal center.
    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Width of the overlap between the horizontal extents of two rectangles.
    ///
    /// # Examples
    ///
    /// ```
    /// use hireboard_pipeline::Bounds;
    ///
    /// let column = Bounds::new(0.0, 0.0, 10.0, 100.0);
    /// assert_eq!(column.horizontal_overlap(&Bounds::new(6.0, 50.0, 8.0, 2.0)), 4.0);
    /// assert_eq!(column.horizontal_overlap(&Bounds::new(10.0, 0.0, 8.0, 2.0)), 0.0);
    /// ```
    #[must_use]
    pub fn horizontal_overlap(&self, other: &Self) -> f64 {
        (self.right().min(other.right()) - self.x.max(other.x)).max(0.0)
    }

    /// Returns `true` if `y` lies within the vertical extent.
    #[must_use]
    pub fn contains_y(&self, y: f64) -> bool {
        y >= self.y && y < self.bottom()
    }

    /// Returns `true` if the point lies inside the rectangle.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && self.contains_y(point.y)
    }

    /// Returns the rectangle moved by `(dx, dy)`.
    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}
