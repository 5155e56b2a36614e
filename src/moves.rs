//! Move engine: hit testing, adjacency, and the swap with the empty slot.

use log::debug;

use crate::error::PuzzleError;
use crate::tiles::TileSet;
use crate::types::{Point, Tile};

/// Index of the first tile whose current rectangle contains `point`.
///
/// Linear scan in tile order; `None` when the point lies outside the grid.
pub fn tile_at(set: &TileSet, point: Point) -> Option<usize> {
    set.tiles()
        .iter()
        .position(|tile| set.current_rect(tile).contains(point))
}

/// True iff `tile` is exactly one cell left, right, above or below the empty
/// slot. Diagonals and the empty slot itself are never movable.
pub fn can_move(tile: &Tile, empty_slot: &Tile) -> bool {
    tile.current.is_neighbor_of(empty_slot.current)
}

/// Swaps the current cells of the tile at `index` and the empty slot.
///
/// Applying the same move twice restores both tiles.
pub fn move_tile(set: &mut TileSet, index: usize) -> Result<(), PuzzleError> {
    let empty = set.empty_index();
    let tile = *set.get(index).ok_or(PuzzleError::UnknownTile(index))?;
    if !can_move(&tile, set.empty_slot()) {
        return Err(PuzzleError::NotAdjacent { tile: tile.current });
    }
    set.swap_current(index, empty);
    debug!(
        "moved tile {:?} from {:?} to {:?}",
        tile.home(),
        tile.current,
        set.tiles()[index].current
    );
    Ok(())
}
