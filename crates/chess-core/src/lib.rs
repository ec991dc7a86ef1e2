//! Core types for the chess rules engine.
//!
//! This crate provides the fundamental value types shared by the engine:
//! - [`Color`] and [`PieceKind`]/[`Piece`] for piece representation
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] and [`MoveFlag`] for single-ply transitions
//!
//! All types are plain values: pieces carry no board position and no
//! reference to any board. Placement is owned exclusively by the board
//! in the `chess-rules` crate.

mod color;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use mov::{Move, MoveFlag};
pub use piece::{Piece, PieceKind};
pub use square::{File, Rank, Square};
