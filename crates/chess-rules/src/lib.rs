//! Chess rules engine for the online platform.
//!
//! This crate is a pure rules evaluator over an abstract 8x8 position:
//! - [`Board`] - the game state: piece grid, side to move, castling
//!   rights, en-passant target, move history with exact undo
//! - Move generation and legality filtering (simulate-and-rollback)
//! - Disambiguated movetext via [`notation`]
//! - [`Game`] - the facade external collaborators drive a match through
//! - [`Snapshot`] - the serialized boundary representation for callers
//!   that persist and reconstruct games
//!
//! Transport, matchmaking, authentication, persistence, and rating are
//! external concerns; the engine performs no I/O and manages no clocks.
//!
//! # Example
//!
//! ```
//! use chess_rules::Game;
//!
//! let mut game = Game::new();
//! assert_eq!(game.legal_moves().len(), 20);
//!
//! game.play("e4", None).unwrap();
//! game.play("e5", None).unwrap();
//! game.play("Nf3", None).unwrap();
//! assert_eq!(game.legal_moves().len(), 29);
//! ```

mod board;
mod game;
mod movegen;
pub mod notation;
mod snapshot;

pub use board::{Board, CastlingRights};
pub use game::{Game, GameConfig, GameError, Outcome, PlayedMove};
pub use snapshot::{CastlingSnapshot, PieceToken, Snapshot, SnapshotError};
