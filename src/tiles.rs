//! The tile collection and its empty slot.

use std::fmt::{self, Display, Formatter};

use crate::geometry::Geometry;
use crate::types::{GridPos, Point, Rect, Tile};

/// Exactly `cols * rows` tiles. The tile whose home is the top-left cell is
/// the empty slot for the whole life of the set.
///
/// Invariant: the `current` cells of all tiles are a permutation of the grid
/// cells.
#[derive(Clone, Debug)]
pub struct TileSet {
    geometry: Geometry,
    tiles: Vec<Tile>,
    /// Index of the empty slot in `tiles`. Refreshed whenever the order changes.
    empty: usize,
}

impl TileSet {
    /// One tile per cell in row-major order, each sitting at home.
    pub fn initialize(geometry: Geometry) -> Self {
        let tiles: Vec<Tile> = geometry.cells().map(Tile::at_home).collect();
        let mut set = Self {
            geometry,
            tiles,
            empty: 0,
        };
        set.refresh_empty();
        set
    }

    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub const fn empty_index(&self) -> usize {
        self.empty
    }

    pub fn empty_slot(&self) -> &Tile {
        &self.tiles[self.empty]
    }

    pub fn is_empty_slot(&self, index: usize) -> bool {
        index == self.empty
    }

    /// Pixel offset of a tile in the source image.
    pub fn home_offset(&self, tile: &Tile) -> Point {
        self.geometry.offset(tile.home())
    }

    /// Pixel offset of a tile on the drawing surface.
    pub fn current_offset(&self, tile: &Tile) -> Point {
        self.geometry.offset(tile.current)
    }

    pub fn home_rect(&self, tile: &Tile) -> Rect {
        self.geometry.tile_rect(tile.home())
    }

    pub fn current_rect(&self, tile: &Tile) -> Rect {
        self.geometry.tile_rect(tile.current)
    }

    /// Callers that reorder must follow up with `refresh_empty`.
    pub(crate) fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    pub(crate) fn refresh_empty(&mut self) {
        if let Some(i) = self.tiles.iter().position(|t| t.home() == GridPos::ORIGIN) {
            self.empty = i;
        }
    }

    /// Swaps the `current` cells of two tiles.
    pub(crate) fn swap_current(&mut self, a: usize, b: usize) {
        let pos_a = self.tiles[a].current;
        self.tiles[a].current = self.tiles[b].current;
        self.tiles[b].current = pos_a;
    }
}

impl Display for TileSet {
    /// Board as seen on screen: each cell shows the row-major home index of
    /// the tile drawn there, blank for the empty slot.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let cols = self.geometry.cols();
        let mut board = vec![None; self.tiles.len()];
        for (i, tile) in self.tiles.iter().enumerate() {
            if let Some(cell) = board.get_mut(tile.current.index(cols)) {
                *cell = (i != self.empty).then(|| tile.home().index(cols));
            }
        }
        for row in board.chunks(cols as usize) {
            for cell in row {
                match cell {
                    Some(v) => write!(f, "{v:>02} ")?,
                    None => write!(f, "   ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PuzzleConfig;

    fn set_4x4() -> TileSet {
        TileSet::initialize(Geometry::new(&PuzzleConfig::default(), 400, 400).unwrap())
    }

    #[test]
    fn test_initialize_row_major_homes() {
        let set = set_4x4();
        assert_eq!(set.len(), 16);
        for (i, tile) in set.tiles().iter().enumerate() {
            assert_eq!(tile.home(), GridPos::from_index(i, 4));
            assert!(tile.is_home());
        }
        assert_eq!(set.home_offset(&set.tiles()[5]), Point::new(100., 100.));
    }

    #[test]
    fn test_exactly_one_empty_slot_at_origin() {
        let set = set_4x4();
        let origins = set.tiles().iter().filter(|t| t.home() == GridPos::ORIGIN).count();
        assert_eq!(origins, 1);
        assert_eq!(set.empty_index(), 0);
        assert_eq!(set.empty_slot().home(), GridPos::ORIGIN);
        assert_eq!(set.current_offset(set.empty_slot()), Point::new(0., 0.));
    }

    #[test]
    fn test_empty_slot_follows_reorder() {
        let mut set = set_4x4();
        set.tiles_mut().swap(0, 9);
        set.refresh_empty();
        assert_eq!(set.empty_index(), 9);
        assert_eq!(set.empty_slot().home(), GridPos::ORIGIN);
    }

    #[test]
    fn test_swap_current() {
        let mut set = set_4x4();
        set.swap_current(0, 1);
        assert_eq!(set.tiles()[0].current, GridPos::new(1, 0));
        assert_eq!(set.tiles()[1].current, GridPos::new(0, 0));
        assert_eq!(set.tiles()[1].home(), GridPos::new(1, 0));
    }

    #[test]
    fn test_display_solved_board() {
        let set = set_4x4();
        let text = set.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "   01 02 03 ");
        assert_eq!(lines[3], "12 13 14 15 ");
    }
}
