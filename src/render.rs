//! Render adapter seam.
//!
//! The core never touches a drawing API directly. It walks the tile set and
//! issues rectangle-level calls on a [`RenderAdapter`]; the browser build
//! backs this with a 2D canvas context (see `canvas.rs`).

use crate::tiles::TileSet;
use crate::types::{Color, Rect};

/// A decoded raster image: its size plus an opaque handle the adapter can
/// draw sub-rectangles from.
#[derive(Clone, Debug)]
pub struct SourceImage<H> {
    pub width: u32,
    pub height: u32,
    pub handle: H,
}

impl<H> SourceImage<H> {
    pub const fn new(width: u32, height: u32, handle: H) -> Self {
        Self {
            width,
            height,
            handle,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f64, self.height as f64)
    }
}

/// Drawing surface operations the puzzle needs.
pub trait RenderAdapter {
    /// Handle type of images this adapter can draw from.
    type Image;

    fn clear(&mut self);
    fn draw_region(&mut self, image: &Self::Image, src: Rect, dst: Rect);
    fn fill_rect(&mut self, dst: Rect, color: Color);
    fn stroke_rect(&mut self, dst: Rect, color: Color);
}

pub const EMPTY_FILL: Color = Color::WHITE;
pub const TILE_BORDER: Color = Color::WHITE;

/// Draws the unsliced source image over the whole surface.
pub fn draw_source<R: RenderAdapter>(renderer: &mut R, image: &SourceImage<R::Image>) {
    renderer.clear();
    let rect = image.rect();
    renderer.draw_region(&image.handle, rect, rect);
}

/// Draws every tile in collection order: the empty slot as a white fill,
/// everything else as its home region copied to its current cell, each
/// followed by a border.
pub fn draw_puzzle<R: RenderAdapter>(renderer: &mut R, image: &SourceImage<R::Image>, set: &TileSet) {
    renderer.clear();
    for (i, tile) in set.tiles().iter().enumerate() {
        let dst = set.current_rect(tile);
        if set.is_empty_slot(i) {
            renderer.fill_rect(dst, EMPTY_FILL);
        } else {
            renderer.draw_region(&image.handle, set.home_rect(tile), dst);
        }
        renderer.stroke_rect(dst, TILE_BORDER);
    }
}
