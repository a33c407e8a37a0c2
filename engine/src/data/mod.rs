use minefield_common::models::BoardSpec;

/// A single cell of the grid. Updated in place under the single-writer
/// discipline of [`crate::logic::GameSession`]; `adjacent_mines` is only
/// meaningful on non-mine cells of a populated board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub is_mine: bool,
    pub is_revealed: bool,
    pub is_flagged: bool,
    pub adjacent_mines: u8,
}

/// Flat row-major grid of cells.
///
/// `populated == false` is the pre-first-click sentinel: the grid exists at
/// its final dimensions but holds no mines yet. `revealed` counts opened
/// safe cells; mines exposed by a loss do not count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    pub spec: BoardSpec,
    pub populated: bool,
    pub revealed: usize,
    pub cells: Vec<Cell>,
}
