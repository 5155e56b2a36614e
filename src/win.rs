//! Win detection.

use crate::tiles::TileSet;

/// True iff every tile, the empty slot included, sits at its home cell.
pub fn is_solved(set: &TileSet) -> bool {
    set.tiles().iter().all(|tile| tile.is_home())
}
