//! Core value types for the slider puzzle.
//!
//! Grid cells are addressed by `GridPos { col, row }`; pixel offsets on the
//! source image and on the drawing surface are derived from a cell and the
//! tile size, never accumulated, so every module agrees on the same values.

use serde::Serialize;

/// A cell of the puzzle grid in row-major coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct GridPos {
    pub col: u32,
    pub row: u32,
}

impl GridPos {
    /// The top-left cell. The tile whose home is here is always the hole.
    pub const ORIGIN: GridPos = GridPos { col: 0, row: 0 };

    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    /// Row-major linear index for a grid `cols` wide.
    #[inline(always)]
    pub const fn index(self, cols: u32) -> usize {
        self.row as usize * cols as usize + self.col as usize
    }

    /// Inverse of [`GridPos::index`].
    #[inline(always)]
    pub const fn from_index(index: usize, cols: u32) -> Self {
        Self {
            col: index as u32 % cols,
            row: index as u32 / cols,
        }
    }

    /// True when `other` shares an edge with `self`.
    pub fn is_neighbor_of(self, other: GridPos) -> bool {
        self.col.abs_diff(other.col) + self.row.abs_diff(other.row) == 1
    }
}

/// A pixel coordinate, either on the source image or on the drawing surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned pixel rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open containment: `[x, x + width) × [y, y + height)`.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

/// An RGB colour handed to the render adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS hex form, e.g. `#FFFFFF`.
    pub fn to_css(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// One cell of the source image.
///
/// `home` is where the tile sits in the source image and never changes;
/// it is also the tile's identity. `current` is where the tile is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    home: GridPos,
    pub current: GridPos,
}

impl Tile {
    /// A tile sitting at its home cell.
    pub const fn at_home(home: GridPos) -> Self {
        Self {
            home,
            current: home,
        }
    }

    #[inline(always)]
    pub const fn home(&self) -> GridPos {
        self.home
    }

    #[inline(always)]
    pub fn is_home(&self) -> bool {
        self.current == self.home
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_pos_index_roundtrip() {
        for i in 0..16 {
            assert_eq!(GridPos::from_index(i, 4).index(4), i);
        }
        assert_eq!(GridPos::from_index(6, 4), GridPos::new(2, 1));
    }

    #[test]
    fn test_neighbors_are_four_connected() {
        let c = GridPos::new(1, 1);
        assert!(c.is_neighbor_of(GridPos::new(0, 1)));
        assert!(c.is_neighbor_of(GridPos::new(2, 1)));
        assert!(c.is_neighbor_of(GridPos::new(1, 0)));
        assert!(c.is_neighbor_of(GridPos::new(1, 2)));
        assert!(!c.is_neighbor_of(GridPos::new(2, 2)));
        assert!(!c.is_neighbor_of(GridPos::new(0, 0)));
        assert!(!c.is_neighbor_of(c));
        assert!(!c.is_neighbor_of(GridPos::new(3, 1)));
    }

    #[test]
    fn test_rect_contains_is_half_open() {
        let r = Rect::new(100., 100., 100., 100.);
        assert!(r.contains(Point::new(100., 100.)));
        assert!(r.contains(Point::new(199.9, 150.)));
        assert!(!r.contains(Point::new(200., 150.)));
        assert!(!r.contains(Point::new(150., 200.)));
        assert!(!r.contains(Point::new(99.9, 150.)));
    }

    #[test]
    fn test_color_css() {
        assert_eq!(Color::WHITE.to_css(), "#FFFFFF");
        assert_eq!(Color::rgb(1, 0xAB, 0).to_css(), "#01AB00");
    }
}
