//! Serialized game boundary.
//!
//! A [`Snapshot`] is the JSON shape callers persist between requests: the
//! move log, an 8x8 grid of piece tokens (row 0 is Black's back rank, as
//! a spectator behind White sees it), whose turn it is, the terminal
//! flags, and the castling rights by name.
//!
//! Reconstruction prefers the move log: replaying it from the initial
//! position recovers the exact state, en-passant target and history
//! included. A snapshot without moves is rebuilt structurally from the
//! grid instead, which is lossy - no history and no en-passant target -
//! but enough to continue from an arbitrary position.
//!
//! Storage hands us whatever bytes it has; a snapshot that fails to
//! parse, validate, or replay is logged and replaced by a fresh game
//! rather than surfaced as an error ([`Game::from_json`]).

use crate::board::{Board, CastlingRights};
use crate::game::{Game, GameConfig, GameError};
use chess_core::{Color, File, Piece, PieceKind, Rank, Square};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while decoding or rebuilding a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot board must be 8x8")]
    BadShape,
    #[error("snapshot must contain exactly one {0} king")]
    KingCount(Color),
    #[error("snapshot has {0} to move while the other king is in check")]
    InconsistentTurn(Color),
    #[error("snapshot move log failed to replay: {0}")]
    Replay(#[from] GameError),
}

/// One piece as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceToken {
    pub color: Color,
    pub kind: PieceKind,
}

impl From<Piece> for PieceToken {
    fn from(piece: Piece) -> Self {
        PieceToken {
            color: piece.color,
            kind: piece.kind,
        }
    }
}

impl From<PieceToken> for Piece {
    fn from(token: PieceToken) -> Self {
        Piece::new(token.color, token.kind)
    }
}

/// Castling rights, spelled out per flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastlingSnapshot {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl From<CastlingRights> for CastlingSnapshot {
    fn from(rights: CastlingRights) -> Self {
        CastlingSnapshot {
            white_kingside: rights.kingside(Color::White),
            white_queenside: rights.queenside(Color::White),
            black_kingside: rights.kingside(Color::Black),
            black_queenside: rights.queenside(Color::Black),
        }
    }
}

impl From<CastlingSnapshot> for CastlingRights {
    fn from(snapshot: CastlingSnapshot) -> Self {
        CastlingRights::from_flags(
            snapshot.white_kingside,
            snapshot.white_queenside,
            snapshot.black_kingside,
            snapshot.black_queenside,
        )
    }
}

/// The full serialized state of a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Movetext log from the initial position. May be empty for
    /// positions set up directly.
    #[serde(default)]
    pub moves: Vec<String>,
    /// 8x8 grid, row 0 = Black's back rank, column 0 = the a-file.
    pub board: Vec<Vec<Option<PieceToken>>>,
    pub turn: Color,
    pub checkmate: bool,
    pub stalemate: bool,
    pub castling: CastlingSnapshot,
}

/// Maps a (row, column) cell of the wire grid to its square.
fn cell_square(row: usize, col: usize) -> Option<Square> {
    let file = File::from_index(col as u8)?;
    let rank = Rank::from_index(7 - row as u8)?;
    Some(Square::new(file, rank))
}

impl Game {
    /// Captures the current state as a [`Snapshot`].
    pub fn snapshot(&self) -> Snapshot {
        let board = (0..8)
            .map(|row| {
                (0..8)
                    .map(|col| {
                        cell_square(row, col)
                            .and_then(|sq| self.board().piece_at(sq))
                            .map(PieceToken::from)
                    })
                    .collect()
            })
            .collect();
        Snapshot {
            moves: self
                .history()
                .iter()
                .map(|played| played.notation.clone())
                .collect(),
            board,
            turn: self.turn(),
            checkmate: self.is_checkmate(),
            stalemate: self.is_stalemate(),
            castling: self.castling_rights().into(),
        }
    }

    /// Serializes the current state to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.snapshot())
    }

    /// Rebuilds a game from a snapshot.
    ///
    /// A non-empty move log is replayed for an exact reconstruction;
    /// otherwise the grid is loaded structurally after validating its
    /// shape and that each side has exactly one king.
    pub fn from_snapshot(snapshot: &Snapshot, config: GameConfig) -> Result<Game, SnapshotError> {
        if !snapshot.moves.is_empty() {
            return Self::replay(&snapshot.moves, config);
        }

        if snapshot.board.len() != 8 || snapshot.board.iter().any(|row| row.len() != 8) {
            return Err(SnapshotError::BadShape);
        }
        let mut board = Board::blank();
        let mut kings = [0usize; 2];
        for (row, cells) in snapshot.board.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let (Some(token), Some(sq)) = (cell, cell_square(row, col)) else {
                    continue;
                };
                let piece = Piece::from(*token);
                if piece.kind == PieceKind::King {
                    kings[piece.color.index()] += 1;
                }
                board.put(sq, piece);
            }
        }
        for color in [Color::White, Color::Black] {
            if kings[color.index()] != 1 {
                return Err(SnapshotError::KingCount(color));
            }
        }
        board.side_to_move = snapshot.turn;
        board.castling = snapshot.castling.into();
        // The side that just moved cannot have left its own king hanging.
        if board.is_in_check(snapshot.turn.opposite()) {
            return Err(SnapshotError::InconsistentTurn(snapshot.turn));
        }
        Ok(Game::from_parts(board, Vec::new(), config))
    }

    /// Replays a movetext log from the initial position.
    ///
    /// Promotion tokens carry their `=Q` style suffix; the suffix picks
    /// the promoted piece when the move is played.
    pub fn replay(moves: &[String], config: GameConfig) -> Result<Game, SnapshotError> {
        let mut game = Game::with_config(config);
        for token in moves {
            let (base, promotion) = split_promotion(token)?;
            game.play(base, promotion)?;
        }
        Ok(game)
    }

    /// Decodes persisted JSON, falling back to a fresh game when the
    /// bytes are corrupted or inconsistent.
    pub fn from_json(json: &str) -> Game {
        let restored = serde_json::from_str::<Snapshot>(json)
            .map_err(SnapshotError::from)
            .and_then(|snapshot| Self::from_snapshot(&snapshot, GameConfig::default()));
        match restored {
            Ok(game) => game,
            Err(error) => {
                tracing::warn!(%error, "discarding corrupted game snapshot, starting fresh");
                Game::new()
            }
        }
    }
}

/// Splits a logged token into its base notation and promotion choice.
fn split_promotion(token: &str) -> Result<(&str, Option<PieceKind>), SnapshotError> {
    match token.split_once('=') {
        None => Ok((token, None)),
        Some((base, suffix)) => {
            let mut chars = suffix.chars();
            let kind = chars
                .next()
                .filter(|_| chars.next().is_none())
                .and_then(PieceKind::from_letter)
                .ok_or_else(|| {
                    SnapshotError::Replay(GameError::InvalidInput(token.to_owned()))
                })?;
            Ok((base, Some(kind)))
        }
    }
}
