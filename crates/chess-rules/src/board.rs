//! Board and game state.
//!
//! [`Board`] owns the 64-square grid outright: pieces are plain
//! `{kind, color}` values with no back-reference, and every placement
//! change goes through [`Board::apply_move`]/[`Board::undo_move`], which
//! are exact inverses of each other (see `undo_move` for the one
//! documented en-passant asymmetry).
//!
//! Legality filtering is simulate-and-rollback: apply the candidate,
//! test whether the mover's own king is attacked, undo. No incremental
//! attack maps; the apply/undo pair is the whole mechanism.

use crate::movegen;
use chess_core::{Color, File, Move, MoveFlag, Piece, PieceKind, Rank, Square};
use std::fmt;

/// Castling rights, four flags packed in a byte.
///
/// Rights are monotonically revocable: once a flag is cleared it is
/// never set again for the remainder of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingRights(u8);

impl CastlingRights {
    const WHITE_KINGSIDE: u8 = 0b0001;
    const WHITE_QUEENSIDE: u8 = 0b0010;
    const BLACK_KINGSIDE: u8 = 0b0100;
    const BLACK_QUEENSIDE: u8 = 0b1000;

    /// No castling available for either side.
    pub const NONE: CastlingRights = CastlingRights(0);
    /// All four rights intact (game start).
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Builds rights from the four named flags.
    pub fn from_flags(
        white_kingside: bool,
        white_queenside: bool,
        black_kingside: bool,
        black_queenside: bool,
    ) -> Self {
        let mut raw = 0;
        if white_kingside {
            raw |= Self::WHITE_KINGSIDE;
        }
        if white_queenside {
            raw |= Self::WHITE_QUEENSIDE;
        }
        if black_kingside {
            raw |= Self::BLACK_KINGSIDE;
        }
        if black_queenside {
            raw |= Self::BLACK_QUEENSIDE;
        }
        CastlingRights(raw)
    }

    const fn kingside_bit(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        }
    }

    const fn queenside_bit(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        }
    }

    /// Returns true if the given side may still castle kingside.
    #[inline]
    pub const fn kingside(self, color: Color) -> bool {
        self.0 & Self::kingside_bit(color) != 0
    }

    /// Returns true if the given side may still castle queenside.
    #[inline]
    pub const fn queenside(self, color: Color) -> bool {
        self.0 & Self::queenside_bit(color) != 0
    }

    /// Revokes both rights for a color (the king moved).
    #[inline]
    pub fn revoke_color(&mut self, color: Color) {
        self.0 &= !(Self::kingside_bit(color) | Self::queenside_bit(color));
    }

    /// Revokes the kingside right for a color.
    #[inline]
    pub fn revoke_kingside(&mut self, color: Color) {
        self.0 &= !Self::kingside_bit(color);
    }

    /// Revokes the queenside right for a color.
    #[inline]
    pub fn revoke_queenside(&mut self, color: Color) {
        self.0 &= !Self::queenside_bit(color);
    }
}

/// One entry of the move history.
///
/// The pre-move castling rights ride along with the move itself, so the
/// history is a single stack and undo can never observe rights that
/// drifted out of step with the moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HistoryEntry {
    mov: Move,
    rights_before: CastlingRights,
}

/// Complete game state for one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: [Option<Piece>; 64],
    /// The color whose turn it is.
    pub side_to_move: Color,
    /// Current castling rights.
    pub castling: CastlingRights,
    /// The square a double-stepping pawn skipped over, capturable en
    /// passant for exactly the next ply.
    pub en_passant: Option<Square>,
    kings: [Square; 2],
    history: Vec<HistoryEntry>,
    checkmate: bool,
    stalemate: bool,
}

impl Board {
    /// Creates the standard initial position, White to move.
    pub fn new() -> Self {
        let mut board = Self::blank();
        let layout = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for color in [Color::White, Color::Black] {
            for (file, kind) in File::ALL.into_iter().zip(layout) {
                board.put(Square::new(file, color.back_rank()), Piece::new(color, kind));
            }
            for file in File::ALL {
                board.put(
                    Square::new(file, color.pawn_start_rank()),
                    Piece::new(color, PieceKind::Pawn),
                );
            }
        }
        board
    }

    /// Creates an empty board with no pieces and all rights cleared.
    ///
    /// Used by snapshot reconstruction; the king squares are placeholders
    /// until kings are placed with [`Board::put`].
    pub(crate) fn blank() -> Self {
        Board {
            grid: [None; 64],
            side_to_move: Color::White,
            castling: CastlingRights::ALL,
            en_passant: None,
            kings: [Square::E1, Square::E8],
            history: Vec::new(),
            checkmate: false,
            stalemate: false,
        }
    }

    /// Places a piece, tracking the king square.
    pub(crate) fn put(&mut self, sq: Square, piece: Piece) {
        self.grid[sq.index() as usize] = Some(piece);
        if piece.kind == PieceKind::King {
            self.kings[piece.color.index()] = sq;
        }
    }

    /// Returns the piece on the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.grid[sq.index() as usize]
    }

    /// Returns the square the given color's king stands on.
    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.kings[color.index()]
    }

    /// Returns true if the most recent legality pass found checkmate.
    #[inline]
    pub fn is_checkmate(&self) -> bool {
        self.checkmate
    }

    /// Returns true if the most recent legality pass found stalemate.
    #[inline]
    pub fn is_stalemate(&self) -> bool {
        self.stalemate
    }

    /// Number of plies applied so far.
    #[inline]
    pub fn ply_count(&self) -> usize {
        self.history.len()
    }

    /// The most recently applied move, if any.
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|entry| entry.mov)
    }

    /// Generates the pseudo-legal moves for every piece of `color`.
    ///
    /// Castling is not included here; it needs rights and attack
    /// knowledge, so [`Board::legal_moves`] synthesizes it separately.
    pub fn pseudo_legal_moves(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::with_capacity(48);
        for sq in Square::all() {
            if let Some(piece) = self.piece_at(sq) {
                if piece.color == color {
                    movegen::pseudo_legal_from(self, sq, piece, self.en_passant, &mut moves);
                }
            }
        }
        moves
    }

    /// Returns true if any pseudo-legal move of `by` lands on `sq`.
    ///
    /// This is the attack test used both for check detection and for
    /// castling-path safety.
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        self.pseudo_legal_moves(by).iter().any(|m| m.to == sq)
    }

    /// Returns true if the given color's king is attacked.
    #[inline]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.is_square_attacked(self.king_square(color), color.opposite())
    }

    /// Applies `m`, runs `probe`, undoes `m`, and returns the probe result.
    ///
    /// Keeps the apply/undo pairing in one place so the legality filter
    /// cannot leave a candidate half-applied.
    fn with_applied<R>(&mut self, m: Move, probe: impl FnOnce(&mut Self) -> R) -> R {
        self.apply_move(m);
        let result = probe(self);
        self.undo_move();
        result
    }

    /// Generates the legal moves for the side to move and refreshes the
    /// checkmate/stalemate flags.
    ///
    /// Every pseudo-legal candidate (plus synthesized castling moves) is
    /// applied, tested for leaving the own king attacked, and rolled
    /// back.
    pub fn legal_moves(&mut self) -> Vec<Move> {
        let color = self.side_to_move;
        // undo_move only reconstructs the en-passant target for specific
        // move kinds, so pin it across the probe loop.
        let saved_en_passant = self.en_passant;

        let mut candidates = self.pseudo_legal_moves(color);
        self.castling_moves(color, &mut candidates);

        let mut legal = Vec::with_capacity(candidates.len());
        for m in candidates {
            let safe = self.with_applied(m, |board| !board.is_in_check(color));
            if safe {
                legal.push(m);
            }
        }
        self.en_passant = saved_en_passant;

        if legal.is_empty() {
            self.checkmate = self.is_in_check(color);
            self.stalemate = !self.checkmate;
        } else {
            self.checkmate = false;
            self.stalemate = false;
        }
        legal
    }

    /// Appends the castling moves available to `color`, if any.
    ///
    /// The king must not currently be attacked, the corridor toward the
    /// rook must be empty (three squares on the queenside), the two
    /// squares the king crosses - destination included - must be safe,
    /// and the matching rights flag must still be set.
    fn castling_moves(&self, color: Color, out: &mut Vec<Move>) {
        let king_sq = self.king_square(color);
        let king = match self.piece_at(king_sq) {
            Some(piece) if piece.kind == PieceKind::King => piece,
            _ => return,
        };
        if self.is_square_attacked(king_sq, color.opposite()) {
            return;
        }

        if self.castling.kingside(color) {
            let corridor: Vec<_> = (1..=2).filter_map(|d| king_sq.offset(d, 0)).collect();
            if corridor.len() == 2
                && corridor.iter().all(|&sq| self.piece_at(sq).is_none())
                && !corridor
                    .iter()
                    .any(|&sq| self.is_square_attacked(sq, color.opposite()))
            {
                out.push(Move::flagged(
                    king_sq,
                    corridor[1],
                    king,
                    None,
                    MoveFlag::CastleKingside,
                ));
            }
        }

        if self.castling.queenside(color) {
            let corridor: Vec<_> = (1..=3).filter_map(|d| king_sq.offset(-d, 0)).collect();
            if corridor.len() == 3
                && corridor.iter().all(|&sq| self.piece_at(sq).is_none())
                && !corridor[..2]
                    .iter()
                    .any(|&sq| self.is_square_attacked(sq, color.opposite()))
            {
                out.push(Move::flagged(
                    king_sq,
                    corridor[1],
                    king,
                    None,
                    MoveFlag::CastleQueenside,
                ));
            }
        }
    }

    /// Applies a move, mutating the position in place.
    ///
    /// Handles capture removal, en-passant pawn removal, rook relocation
    /// for castling, promotion replacement, castling-rights revocation,
    /// en-passant target bookkeeping, king tracking, and the side flip -
    /// all within this one transaction. The pre-move castling rights are
    /// folded into the history entry for undo.
    pub fn apply_move(&mut self, m: Move) {
        let color = m.piece.color;
        self.history.push(HistoryEntry {
            mov: m,
            rights_before: self.castling,
        });

        self.grid[m.from.index() as usize] = None;
        if m.flag == MoveFlag::EnPassant {
            // The captured pawn sits beside the destination, on the
            // mover's origin rank.
            let captured_sq = Square::new(m.to.file(), m.from.rank());
            self.grid[captured_sq.index() as usize] = None;
        }
        let placed = match m.promotion {
            Some(kind) if m.requires_promotion() => Piece::new(color, kind),
            _ => m.piece,
        };
        self.grid[m.to.index() as usize] = Some(placed);

        match m.flag {
            MoveFlag::CastleKingside => self.relocate_rook(m.to.offset(1, 0), m.to.offset(-1, 0)),
            MoveFlag::CastleQueenside => self.relocate_rook(m.to.offset(-2, 0), m.to.offset(1, 0)),
            _ => {}
        }

        if m.piece.kind == PieceKind::King {
            self.kings[color.index()] = m.to;
            self.castling.revoke_color(color);
        } else if m.piece.kind == PieceKind::Rook {
            self.revoke_rook_rights(color, m.from);
        }

        self.en_passant = if m.flag == MoveFlag::DoublePush {
            m.from.offset(0, color.pawn_direction())
        } else {
            None
        };

        self.side_to_move = self.side_to_move.opposite();
    }

    /// Undoes the most recent move, restoring the prior position.
    ///
    /// Castling rights come back exactly from the history entry. The
    /// en-passant target is only reconstructed when the undone move was
    /// itself an en-passant capture (restored to that capture square) or
    /// a double push (cleared); other undos leave it untouched.
    /// [`Board::legal_moves`] pins the target around its probe loop, so
    /// the asymmetry is not observable through the facade.
    pub fn undo_move(&mut self) -> Option<Move> {
        let entry = self.history.pop()?;
        let m = entry.mov;
        let color = m.piece.color;

        self.grid[m.from.index() as usize] = Some(m.piece);
        if m.flag == MoveFlag::EnPassant {
            self.grid[m.to.index() as usize] = None;
            let captured_sq = Square::new(m.to.file(), m.from.rank());
            self.grid[captured_sq.index() as usize] = m.captured;
            self.en_passant = Some(m.to);
        } else {
            self.grid[m.to.index() as usize] = m.captured;
            if m.flag == MoveFlag::DoublePush {
                self.en_passant = None;
            }
        }

        match m.flag {
            MoveFlag::CastleKingside => self.relocate_rook(m.to.offset(-1, 0), m.to.offset(1, 0)),
            MoveFlag::CastleQueenside => self.relocate_rook(m.to.offset(1, 0), m.to.offset(-2, 0)),
            _ => {}
        }

        if m.piece.kind == PieceKind::King {
            self.kings[color.index()] = m.from;
        }
        self.castling = entry.rights_before;
        self.side_to_move = self.side_to_move.opposite();
        Some(m)
    }

    fn relocate_rook(&mut self, from: Option<Square>, to: Option<Square>) {
        if let (Some(from), Some(to)) = (from, to) {
            let rook = self.grid[from.index() as usize].take();
            self.grid[to.index() as usize] = rook;
        }
    }

    /// Clears the right matching a rook leaving its home square.
    ///
    /// Capturing a rook on its home square does not clear the right;
    /// only the rook's own movement does.
    fn revoke_rook_rights(&mut self, color: Color, from: Square) {
        let (queenside_home, kingside_home) = match color {
            Color::White => (Square::A1, Square::H1),
            Color::Black => (Square::A8, Square::H8),
        };
        if from == queenside_home {
            self.castling.revoke_queenside(color);
        } else if from == kingside_home {
            self.castling.revoke_kingside(color);
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            for file in File::ALL {
                match self.piece_at(Square::new(file, rank)) {
                    Some(piece) => write!(f, "{} ", piece.to_char())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "{} to move", self.side_to_move)
    }
}
