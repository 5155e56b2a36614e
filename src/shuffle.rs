//! Shuffler: reorder the tile sequence, then deal the grid cells out to the
//! tiles in their new order.
//!
//! Solvability of the result is not guaranteed. A 4×4 board dealt from an
//! arbitrary permutation is unsolvable half of the time.

use log::debug;

use crate::geometry::ShuffleBound;
use crate::rng::IndexSource;
use crate::tiles::TileSet;
use crate::types::GridPos;

/// Fisher–Yates-style pass over the tile order.
///
/// For each `i` from the last index down to 1 the partner index is drawn
/// from `[0, i + 1]` with [`ShuffleBound::Widened`], or `[0, i]` with
/// [`ShuffleBound::Classic`]. A draw past the end of the sequence (only
/// possible for the last index) leaves that step a no-op.
pub fn shuffle_order<T>(items: &mut [T], bound: ShuffleBound, source: &mut impl IndexSource) {
    let len = items.len();
    for i in (1..len).rev() {
        let max = match bound {
            ShuffleBound::Widened => i + 1,
            ShuffleBound::Classic => i,
        };
        let j = source.index_up_to(max);
        if j < len {
            items.swap(i, j);
        }
    }
}

/// Assigns the row-major cells to the tiles' `current` field in sequence
/// order. The tile order is a permutation, so every cell is used once.
pub fn mix_tiles(set: &mut TileSet) {
    let cols = set.geometry().cols();
    for (i, tile) in set.tiles_mut().iter_mut().enumerate() {
        tile.current = GridPos::from_index(i, cols);
    }
    set.refresh_empty();
}

/// Shuffles a tile set in place: reorder, then [`mix_tiles`].
pub fn shuffle(set: &mut TileSet, bound: ShuffleBound, source: &mut impl IndexSource) {
    shuffle_order(set.tiles_mut(), bound, source);
    mix_tiles(set);
    debug!(
        "shuffled {} tiles, empty slot at {:?}\n{}",
        set.len(),
        set.empty_slot().current,
        set
    );
}
