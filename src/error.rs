//! Error type shared by every puzzle operation.

use thiserror::Error;

use crate::session::GameState;
use crate::types::GridPos;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PuzzleError {
    #[error("image has degenerate dimensions {width}x{height}")]
    DegenerateImage { width: u32, height: u32 },

    #[error("grid needs at least one column and one row, got {cols}x{rows}")]
    InvalidGrid { cols: u32, rows: u32 },

    #[error("tile size {width}x{height} is not finite")]
    NonFiniteTileSize { width: f64, height: f64 },

    #[error("failed to load image: {0}")]
    ImageLoad(String),

    #[error("no tile at index {0}")]
    UnknownTile(usize),

    #[error("tile at {tile:?} is not next to the empty slot")]
    NotAdjacent { tile: GridPos },

    #[error("cannot {action} while {state:?}")]
    InvalidState {
        action: &'static str,
        state: GameState,
    },

    #[error("no image loaded")]
    NoImage,
}
