use minefield_common::models::{Difficulty, GameState, Pos};
use minefield_common::view::CellView;
use minefield_engine::{EngineError, GameSession};

fn main() -> Result<(), EngineError> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let mut session = GameSession::new(Difficulty::Easy);
    let spec = session.spec();
    println!(
        "🎮 New game: {}x{} with {} mines",
        spec.rows, spec.cols, spec.mines
    );

    // Open the center first, then sweep hidden cells until the game ends.
    session.reveal(Pos::new(spec.rows / 2, spec.cols / 2))?;

    'sweep: while session.state() == GameState::Playing {
        for row in 0..spec.rows {
            for col in 0..spec.cols {
                let pos = Pos::new(row, col);
                let hidden = session
                    .board()
                    .cell(pos)
                    .is_some_and(|cell| !cell.is_revealed && !cell.is_flagged);
                if hidden {
                    session.reveal(pos)?;
                    continue 'sweep;
                }
            }
        }
        break;
    }

    print_grid(&session);
    match session.state() {
        GameState::Won => println!("🎉 You won!"),
        GameState::Lost => println!("💣 Game over!"),
        GameState::Playing => println!("Still playing"),
    }
    println!("Mines remaining: {}", session.mines_remaining());
    if let Ok(json) = serde_json::to_string(&session.snapshot()) {
        println!("Snapshot for a renderer: {json}");
    }
    Ok(())
}

fn print_grid(session: &GameSession) {
    for row in session.snapshot().grid {
        let line: String = row
            .into_iter()
            .map(|cell| match cell {
                CellView::Hidden => '·',
                CellView::Flagged => '⚑',
                CellView::Revealed { adjacent: 0 } => ' ',
                CellView::Revealed { adjacent } => char::from(b'0' + adjacent),
                CellView::Mine => '✸',
            })
            .collect();
        println!("{line}");
    }
}
