//! Minesweeper board engine.
//!
//! A pure, synchronous game-logic state machine: board generation with a
//! safe first-click zone, flood-fill reveals, flag bookkeeping and win/loss
//! determination. Rendering, gesture handling and localization live in
//! whatever presentation layer drives the engine; it only ever sees
//! [`GameSession`] and the snapshot types from `minefield-common`.
//!
//! ```rust
//! use minefield_common::models::{Difficulty, GameState, Pos};
//! use minefield_engine::GameSession;
//!
//! let mut session = GameSession::new(Difficulty::Easy);
//! session.reveal(Pos::new(4, 4))?;
//! assert!(session.first_move_taken());
//! assert_ne!(session.state(), GameState::Lost);
//! # Ok::<(), minefield_engine::EngineError>(())
//! ```

pub mod data;
pub mod error;
pub mod logic;

pub use error::{EngineError, EngineResult};
pub use logic::GameSession;
