//! Grid geometry: tile size, row-major cell enumeration, and the mapping
//! between grid cells and pixel rectangles.

use serde::Deserialize;

use crate::error::PuzzleError;
use crate::types::{GridPos, Point, Rect};

/// How wide the shuffle's random draw is for each position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShuffleBound {
    /// Draw from `[0, i + 1]`, one slot wider than Fisher–Yates.
    #[default]
    Widened,
    /// Draw from `[0, i]`.
    Classic,
}

/// Per-game parameters. Decodable from a JS options object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PuzzleConfig {
    pub rows: u32,
    pub cols: u32,
    pub shuffle: ShuffleBound,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            rows: 4,
            cols: 4,
            shuffle: ShuffleBound::Widened,
        }
    }
}

/// Tile width and height for an image cut into `cols` × `rows` tiles.
///
/// A tile may not be narrower or shorter than one pixel, and the tile count
/// must fit in a `u32`.
pub fn compute_tile_size(
    image_width: u32,
    image_height: u32,
    cols: u32,
    rows: u32,
) -> Result<(f64, f64), PuzzleError> {
    if cols == 0 || rows == 0 {
        return Err(PuzzleError::InvalidGrid { cols, rows });
    }
    if image_width == 0 || image_height == 0 {
        return Err(PuzzleError::DegenerateImage {
            width: image_width,
            height: image_height,
        });
    }
    if cols > image_width || rows > image_height || cols.checked_mul(rows).is_none() {
        return Err(PuzzleError::InvalidGrid { cols, rows });
    }
    let width = image_width as f64 / cols as f64;
    let height = image_height as f64 / rows as f64;
    if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
        return Err(PuzzleError::NonFiniteTileSize { width, height });
    }
    Ok((width, height))
}

/// Pixel offsets of all `cols * rows` cells in row-major order: x wraps to 0
/// and y advances by `tile_height` every `cols` steps.
pub fn cell_offsets(
    cols: u32,
    rows: u32,
    tile_width: f64,
    tile_height: f64,
) -> impl Iterator<Item = Point> {
    (0..rows).flat_map(move |row| {
        (0..cols).map(move |col| Point::new(col as f64 * tile_width, row as f64 * tile_height))
    })
}

/// Maps a window/client coordinate onto the drawing surface, given the
/// surface's on-screen bounding box and its pixel size.
pub fn to_surface(client: Point, bbox: Rect, surface_width: f64, surface_height: f64) -> Point {
    let sx = if bbox.width > 0.0 { surface_width / bbox.width } else { 1.0 };
    let sy = if bbox.height > 0.0 { surface_height / bbox.height } else { 1.0 };
    Point::new((client.x - bbox.x) * sx, (client.y - bbox.y) * sy)
}

/// Validated layout of one puzzle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    cols: u32,
    rows: u32,
    tile_width: f64,
    tile_height: f64,
}

impl Geometry {
    pub fn new(config: &PuzzleConfig, image_width: u32, image_height: u32) -> Result<Self, PuzzleError> {
        let (tile_width, tile_height) =
            compute_tile_size(image_width, image_height, config.cols, config.rows)?;
        Ok(Self {
            cols: config.cols,
            rows: config.rows,
            tile_width,
            tile_height,
        })
    }

    pub const fn cols(&self) -> u32 {
        self.cols
    }

    pub const fn tile_width(&self) -> f64 {
        self.tile_width
    }

    pub const fn tile_height(&self) -> f64 {
        self.tile_height
    }

    pub const fn tile_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    /// All cells, row-major.
    pub fn cells(&self) -> impl Iterator<Item = GridPos> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| GridPos::new(col, row)))
    }

    pub fn cell_offsets(&self) -> impl Iterator<Item = Point> {
        cell_offsets(self.cols, self.rows, self.tile_width, self.tile_height)
    }

    /// Top-left pixel of a cell.
    pub fn offset(&self, pos: GridPos) -> Point {
        Point::new(pos.col as f64 * self.tile_width, pos.row as f64 * self.tile_height)
    }

    pub fn tile_rect(&self, pos: GridPos) -> Rect {
        let o = self.offset(pos);
        Rect::new(o.x, o.y, self.tile_width, self.tile_height)
    }
}
