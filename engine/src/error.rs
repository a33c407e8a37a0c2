//! Error types for the board engine.
//!
//! Normal play never errors: commands that make no sense in the current
//! state (revealing a revealed cell, anything after the game ended) are
//! logged no-ops. Errors are reserved for board configurations that could
//! never produce a playable game.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Board dimensions with zero area.
    #[error("board must have non-zero dimensions, got {rows}x{cols}")]
    EmptyBoard { rows: usize, cols: usize },

    /// More mines than cells outside the first click's safe zone. Placing
    /// them would loop forever in rejection sampling, so the configuration
    /// is rejected up front.
    #[error(
        "cannot place {mines} mines on a {rows}x{cols} board with only {available} cells outside the safe zone"
    )]
    InvalidConfiguration {
        rows: usize,
        cols: usize,
        mines: usize,
        available: usize,
    },
}

pub type EngineResult<T> = Result<T, EngineError>;
