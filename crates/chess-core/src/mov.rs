//! Move representation.
//!
//! A [`Move`] is a self-contained value describing one ply: where a piece
//! went, what it captured, and which special rule (if any) applied. It
//! carries everything needed to both apply the transition and exactly
//! invert it later.

use crate::{Piece, PieceKind, Square};
use std::fmt;

/// Special-rule marker for a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveFlag {
    /// Plain move or capture.
    Quiet,
    /// Pawn double push from its starting rank.
    DoublePush,
    /// Kingside castling (king moves two files toward the h-file rook).
    CastleKingside,
    /// Queenside castling (king moves two files toward the a-file rook).
    CastleQueenside,
    /// En passant capture; the captured pawn does not sit on the
    /// destination square.
    EnPassant,
}

impl MoveFlag {
    /// Returns true for either castling flag.
    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self, MoveFlag::CastleKingside | MoveFlag::CastleQueenside)
    }
}

/// A single-ply move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    /// Source square.
    pub from: Square,
    /// Destination square.
    pub to: Square,
    /// The piece being moved (the pawn, for promotions).
    pub piece: Piece,
    /// The piece removed by this move, if any. For en passant this is
    /// the pawn adjacent to the destination, not a piece on it.
    pub captured: Option<Piece>,
    /// Special-rule marker.
    pub flag: MoveFlag,
    /// Promotion choice, if one has been attached. Generators leave this
    /// empty; the game facade fills it in before applying a move that
    /// [`requires_promotion`](Move::requires_promotion).
    pub promotion: Option<PieceKind>,
}

impl Move {
    /// Creates a quiet move or plain capture.
    pub const fn new(from: Square, to: Square, piece: Piece, captured: Option<Piece>) -> Self {
        Move {
            from,
            to,
            piece,
            captured,
            flag: MoveFlag::Quiet,
            promotion: None,
        }
    }

    /// Creates a move with a special-rule flag.
    pub const fn flagged(
        from: Square,
        to: Square,
        piece: Piece,
        captured: Option<Piece>,
        flag: MoveFlag,
    ) -> Self {
        Move {
            from,
            to,
            piece,
            captured,
            flag,
            promotion: None,
        }
    }

    /// Returns true if this move removes an opposing piece.
    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Returns true if this move carries a pawn onto its promotion rank,
    /// so a promotion choice is required before it can be applied.
    #[inline]
    pub fn requires_promotion(&self) -> bool {
        self.piece.kind == PieceKind::Pawn && self.to.rank() == self.piece.color.promotion_rank()
    }

    /// Returns the coordinate form of this move (e.g. "e2e4").
    pub fn to_coords(&self) -> String {
        format!("{}{}", self.from, self.to)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_coords())
    }
}
