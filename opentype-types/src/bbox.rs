/// Minimum and maximum extents of a rectangular region.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox<T> {
    /// Minimum extent in the x direction-- the left side of a region.
    pub x_min: T,
    /// Minimum extent in the y direction. In a Y-up coordinate system,
    /// which is used by fonts, this represents the bottom of a region.
    pub y_min: T,
    /// Maximum extent in the x direction-- the right side of a region.
    pub x_max: T,
    /// Maximum extent in the y direction; the top of the region in font
    /// coordinates.
    pub y_max: T,
}

impl<T> BoundingBox<T> {
    /// Create a new bounding box from its extents.
    pub const fn new(x_min: T, y_min: T, x_max: T, y_max: T) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }
}

impl BoundingBox<i16> {
    /// The width of the box, widened to avoid overflow.
    pub fn width(&self) -> i32 {
        self.x_max as i32 - self.x_min as i32
    }

    /// The height of the box, widened to avoid overflow.
    pub fn height(&self) -> i32 {
        self.y_max as i32 - self.y_min as i32
    }
}
