use minefield_common::{
    models::{BoardSpec, Difficulty, GameState, Pos},
    view::{CellView, SessionSnapshot},
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, info, instrument, warn};

use crate::{
    data::{Board, Cell},
    error::{EngineError, EngineResult},
};

/// One game of minesweeper, from first click to win or loss.
///
/// The session is a synchronous state machine: every operation is an
/// immediate transformation and invalid commands are logged no-ops. The
/// board stays unpopulated until the first reveal so the 3x3 zone around
/// that click can be kept mine-free.
#[derive(Clone, Debug)]
pub struct GameSession {
    board: Board,
    state: GameState,
    first_move_taken: bool,
    flag_mode: bool,
    rng: StdRng,
}

fn check_spec(spec: BoardSpec) -> EngineResult<()> {
    if spec.rows == 0 || spec.cols == 0 {
        return Err(EngineError::EmptyBoard {
            rows: spec.rows,
            cols: spec.cols,
        });
    }
    Ok(())
}

/// Membership test for the safe zone around the first click. The ranges are
/// deliberately raw, not clipped to the grid: a corner click excludes the
/// same 3x3 block even though only four of its cells exist.
fn in_safe_zone(pos: Pos, center: Pos) -> bool {
    (pos.row as i64 - center.row as i64).abs() <= 1
        && (pos.col as i64 - center.col as i64).abs() <= 1
}

/// Number of grid cells the safe zone actually covers (4, 6 or 9 depending
/// on how close `center` is to an edge).
fn safe_zone_cells(spec: BoardSpec, center: Pos) -> usize {
    let rows = center.row.saturating_sub(1)..=(center.row + 1).min(spec.rows - 1);
    let cols = center.col.saturating_sub(1)..=(center.col + 1).min(spec.cols - 1);
    rows.count() * cols.count()
}

/// Rejection sampling: draw uniform positions until `spec.mines` of them
/// landed outside the safe zone on previously mine-free cells. The caller
/// has already checked that enough cells are available.
fn place_mines(cells: &mut [Cell], spec: BoardSpec, exclude: Pos, rng: &mut impl Rng) {
    let mut placed = 0;
    while placed < spec.mines {
        let pos = Pos::new(
            rng.random_range(0..spec.rows),
            rng.random_range(0..spec.cols),
        );
        let idx = pos.row * spec.cols + pos.col;
        if cells[idx].is_mine || in_safe_zone(pos, exclude) {
            continue;
        }
        cells[idx].is_mine = true;
        placed += 1;
    }
}

fn count_adjacent_mines(cells: &[Cell], spec: BoardSpec, pos: Pos) -> u8 {
    let mut count = 0;
    for dr in -1i64..=1 {
        for dc in -1i64..=1 {
            if dr == 0 && dc == 0 {
                continue;
            }

            let row = pos.row as i64 + dr;
            let col = pos.col as i64 + dc;

            if row >= 0
                && row < spec.rows as i64
                && col >= 0
                && col < spec.cols as i64
                && cells[row as usize * spec.cols + col as usize].is_mine
            {
                count += 1;
            }
        }
    }
    count
}

fn fill_adjacency(cells: &mut [Cell], spec: BoardSpec) {
    for row in 0..spec.rows {
        for col in 0..spec.cols {
            let idx = row * spec.cols + col;
            if !cells[idx].is_mine {
                let adjacent = count_adjacent_mines(cells, spec, Pos::new(row, col));
                cells[idx].adjacent_mines = adjacent;
            }
        }
    }
}

impl From<&Cell> for CellView {
    fn from(cell: &Cell) -> Self {
        if cell.is_revealed {
            if cell.is_mine {
                CellView::Mine
            } else {
                CellView::Revealed {
                    adjacent: cell.adjacent_mines,
                }
            }
        } else if cell.is_flagged {
            CellView::Flagged
        } else {
            CellView::Hidden
        }
    }
}

impl Board {
    /// Mine-free grid at its final dimensions, pending the first click.
    pub fn empty(spec: BoardSpec) -> Self {
        Self {
            spec,
            populated: false,
            revealed: 0,
            cells: vec![Cell::default(); spec.cells()],
        }
    }

    /// Grid with exactly `spec.mines` mines placed outside the safe zone
    /// around `exclude`, and adjacency counts filled in for every non-mine
    /// cell.
    pub fn populated(spec: BoardSpec, exclude: Pos, rng: &mut impl Rng) -> EngineResult<Self> {
        let available = spec.cells() - safe_zone_cells(spec, exclude);
        if spec.mines > available {
            warn!(
                "Rejecting configuration: {} mines but only {} cells outside the safe zone",
                spec.mines, available
            );
            return Err(EngineError::InvalidConfiguration {
                rows: spec.rows,
                cols: spec.cols,
                mines: spec.mines,
                available,
            });
        }

        let mut board = Board::empty(spec);
        board.populated = true;
        place_mines(&mut board.cells, spec, exclude, rng);
        fill_adjacency(&mut board.cells, spec);
        Ok(board)
    }

    fn idx(&self, pos: Pos) -> usize {
        pos.row * self.spec.cols + pos.col
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.spec.rows && pos.col < self.spec.cols
    }

    pub fn cell(&self, pos: Pos) -> Option<&Cell> {
        if self.contains(pos) {
            self.cells.get(self.idx(pos))
        } else {
            None
        }
    }

    fn cell_mut(&mut self, pos: Pos) -> Option<&mut Cell> {
        if self.contains(pos) {
            let idx = self.idx(pos);
            self.cells.get_mut(idx)
        } else {
            None
        }
    }

    /// Worklist-driven flood fill. Opens the starting cell and expands
    /// through all 8 neighbors of every zero-adjacency cell it opens.
    /// Flagged cells act as barriers and are never auto-revealed. Returns
    /// the number of cells opened.
    fn flood_reveal(&mut self, start: Pos) -> usize {
        let mut opened = 0;
        let mut stack = vec![start];

        while let Some(pos) = stack.pop() {
            if !self.contains(pos) {
                continue;
            }
            let idx = self.idx(pos);
            let cell = self.cells[idx];
            if cell.is_revealed || cell.is_flagged {
                continue;
            }

            self.cells[idx].is_revealed = true;
            self.revealed += 1;
            opened += 1;

            if cell.adjacent_mines != 0 || cell.is_mine {
                continue;
            }

            for dr in -1i64..=1 {
                for dc in -1i64..=1 {
                    if dr == 0 && dc == 0 {
                        continue;
                    }
                    let row = pos.row as i64 + dr;
                    let col = pos.col as i64 + dc;
                    if row >= 0 && col >= 0 {
                        stack.push(Pos::new(row as usize, col as usize));
                    }
                }
            }
        }

        opened
    }

    /// Expose every mine on the board, the "show all mines" loss screen.
    /// Does not touch the safe-cell counter.
    fn reveal_mines(&mut self) -> usize {
        let mut exposed = 0;
        for cell in &mut self.cells {
            if cell.is_mine {
                cell.is_revealed = true;
                exposed += 1;
            }
        }
        exposed
    }

    fn all_safe_revealed(&self) -> bool {
        self.revealed + self.spec.mines == self.spec.cells()
    }

    pub fn flags_placed(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_flagged).count()
    }

    /// Render-facing view of the grid, row by row.
    pub fn view(&self) -> Vec<Vec<CellView>> {
        self.cells
            .iter()
            .map(CellView::from)
            .collect::<Vec<CellView>>()
            .chunks(self.spec.cols)
            .map(|chunk| chunk.to_vec())
            .collect()
    }
}

impl GameSession {
    /// Fresh session for a built-in difficulty preset.
    pub fn new(difficulty: Difficulty) -> Self {
        Self::build(difficulty.spec(), StdRng::from_os_rng())
    }

    /// Fresh session for a custom board. The mines-to-space check happens
    /// at first reveal, once the safe-zone center is known.
    pub fn with_spec(spec: BoardSpec) -> EngineResult<Self> {
        check_spec(spec)?;
        Ok(Self::build(spec, StdRng::from_os_rng()))
    }

    /// Session with a deterministic mine layout per seed, for tests and
    /// replays.
    pub fn seeded(spec: BoardSpec, seed: u64) -> EngineResult<Self> {
        check_spec(spec)?;
        Ok(Self::build(spec, StdRng::seed_from_u64(seed)))
    }

    fn build(spec: BoardSpec, rng: StdRng) -> Self {
        info!(
            "Creating new game: {}x{} with {} mines",
            spec.rows, spec.cols, spec.mines
        );
        Self {
            board: Board::empty(spec),
            state: GameState::Playing,
            first_move_taken: false,
            flag_mode: false,
            rng,
        }
    }

    /// Primary gesture. Populates the board on the first reveal, delegates
    /// to [`Self::toggle_flag`] while flag mode is active, floods open
    /// zero-adjacency regions and settles the win/loss state. The only
    /// error is a board configuration whose mines cannot fit outside the
    /// first click's safe zone.
    #[instrument(level = "trace", skip(self), fields(row = pos.row, col = pos.col))]
    pub fn reveal(&mut self, pos: Pos) -> EngineResult<()> {
        if self.state.is_terminal() {
            debug!(
                "Ignoring reveal on finished game at ({}, {})",
                pos.row, pos.col
            );
            return Ok(());
        }

        let Some(cell) = self.board.cell(pos).copied() else {
            warn!("Invalid reveal position: ({}, {})", pos.row, pos.col);
            return Ok(());
        };

        if cell.is_revealed {
            debug!(
                "Ignoring reveal on already revealed cell ({}, {})",
                pos.row, pos.col
            );
            return Ok(());
        }

        if self.flag_mode {
            debug!("Flag mode active, flagging ({}, {}) instead", pos.row, pos.col);
            self.toggle_flag(pos);
            return Ok(());
        }

        if cell.is_flagged {
            debug!("Ignoring reveal on flagged cell ({}, {})", pos.row, pos.col);
            return Ok(());
        }

        if !self.first_move_taken {
            // Replaces the unpopulated grid wholesale; flags placed before
            // the first reveal do not survive.
            self.board = Board::populated(self.board.spec, pos, &mut self.rng)?;
            self.first_move_taken = true;
        }

        if self.board.cell(pos).is_some_and(|cell| cell.is_mine) {
            let exposed = self.board.reveal_mines();
            self.state = GameState::Lost;
            info!(
                "Mine hit at ({}, {}), game lost, {} mines exposed",
                pos.row, pos.col, exposed
            );
            return Ok(());
        }

        let opened = self.board.flood_reveal(pos);
        debug!(
            "Revealed {} cells starting at ({}, {})",
            opened, pos.row, pos.col
        );

        if self.board.all_safe_revealed() {
            self.state = GameState::Won;
            info!("All safe cells revealed, game won");
        }
        Ok(())
    }

    /// Secondary gesture. Works in any input mode and on the unpopulated
    /// board; ignored on revealed cells and finished games.
    #[instrument(level = "trace", skip(self), fields(row = pos.row, col = pos.col))]
    pub fn toggle_flag(&mut self, pos: Pos) {
        if self.state.is_terminal() {
            debug!(
                "Ignoring flag action on finished game at ({}, {})",
                pos.row, pos.col
            );
            return;
        }

        let Some(cell) = self.board.cell_mut(pos) else {
            warn!("Invalid flag position: ({}, {})", pos.row, pos.col);
            return;
        };

        if cell.is_revealed {
            debug!(
                "Ignoring flag action on revealed cell ({}, {})",
                pos.row, pos.col
            );
            return;
        }

        cell.is_flagged = !cell.is_flagged;
        debug!(
            "Cell ({}, {}) {}",
            pos.row,
            pos.col,
            if cell.is_flagged { "flagged" } else { "unflagged" }
        );
    }

    /// Switch what a primary gesture does: reveal (off) or flag (on).
    pub fn set_flag_mode(&mut self, enabled: bool) {
        debug!("Flag mode {}", if enabled { "enabled" } else { "disabled" });
        self.flag_mode = enabled;
    }

    /// Back to a blank board with the same dimensions and mine count. The
    /// input mode is a device preference and carries over; use a new
    /// session to change difficulty.
    #[instrument(level = "trace", skip(self))]
    pub fn restart(&mut self) {
        let spec = self.board.spec;
        info!(
            "Restarting game: {}x{} with {} mines",
            spec.rows, spec.cols, spec.mines
        );
        self.board = Board::empty(spec);
        self.state = GameState::Playing;
        self.first_move_taken = false;
    }

    /// Flag counter for the status display: total mines minus flags placed.
    /// Goes negative when over-flagged.
    pub fn mines_remaining(&self) -> i32 {
        self.board.spec.mines as i32 - self.board.flags_placed() as i32
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn flag_mode(&self) -> bool {
        self.flag_mode
    }

    pub fn first_move_taken(&self) -> bool {
        self.first_move_taken
    }

    pub fn spec(&self) -> BoardSpec {
        self.board.spec
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Render model for the presentation layer.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            spec: self.board.spec,
            state: self.state,
            flag_mode: self.flag_mode,
            mines_remaining: self.mines_remaining(),
            grid: self.board.view(),
        }
    }
}
