//! Game facade.
//!
//! [`Game`] is the surface external collaborators drive a match through:
//! list legal moves as movetext, play one by its token (or by origin and
//! destination squares), and observe turn and terminal state. The legal
//! set and its tokens are computed once per position and cached until
//! the next move lands, so repeated queries between moves are free.

use crate::board::{Board, CastlingRights};
use crate::notation;
use chess_core::{Color, Move, PieceKind, Square};
use thiserror::Error;

/// Errors reported by the game facade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The input could not be interpreted as a move at all.
    #[error("invalid move input: {0}")]
    InvalidInput(String),
    /// The input named a move that is not legal in the current position.
    /// Carries the full legal set so callers can report it verbatim.
    #[error("illegal move: {notation}")]
    IllegalMove {
        notation: String,
        legal: Vec<String>,
    },
}

/// Terminal result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The side to move is mated; `winner` delivered the mate.
    Checkmate { winner: Color },
    /// The side to move has no legal move but is not in check.
    Stalemate,
}

/// Tunable behavior of the facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Piece a promotion converts to when the caller does not pick one.
    pub default_promotion: PieceKind,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            default_promotion: PieceKind::Queen,
        }
    }
}

/// One applied move as recorded in the game log.
///
/// `notation` is the token the move was listed under, with the `=Q`
/// style suffix appended for promotions; the log is sufficient to replay
/// the game from the initial position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayedMove {
    pub notation: String,
    pub mov: Move,
}

/// A running chess match.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    config: GameConfig,
    log: Vec<PlayedMove>,
    moves: Vec<Move>,
    tokens: Vec<String>,
}

impl Game {
    /// Starts a new game from the initial position.
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    /// Starts a new game with the given configuration.
    pub fn with_config(config: GameConfig) -> Self {
        Self::from_parts(Board::new(), Vec::new(), config)
    }

    /// Assembles a game around an existing position and log.
    pub(crate) fn from_parts(board: Board, log: Vec<PlayedMove>, config: GameConfig) -> Self {
        let mut game = Game {
            board,
            config,
            log,
            moves: Vec::new(),
            tokens: Vec::new(),
        };
        game.refresh();
        game
    }

    /// Recomputes the cached legal set and its tokens.
    fn refresh(&mut self) {
        self.moves = self.board.legal_moves();
        self.tokens = notation::annotate(&self.moves);
    }

    /// The color whose turn it is.
    #[inline]
    pub fn turn(&self) -> Color {
        self.board.side_to_move
    }

    /// The movetext tokens of every legal move, in generation order.
    pub fn legal_moves(&self) -> &[String] {
        &self.tokens
    }

    /// Read access to the underlying position.
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current castling rights.
    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.board.castling
    }

    /// The moves played so far.
    pub fn history(&self) -> &[PlayedMove] {
        &self.log
    }

    /// Returns true if the side to move is checkmated.
    #[inline]
    pub fn is_checkmate(&self) -> bool {
        self.board.is_checkmate()
    }

    /// Returns true if the side to move is stalemated.
    #[inline]
    pub fn is_stalemate(&self) -> bool {
        self.board.is_stalemate()
    }

    /// The terminal result, if the game is over.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.is_checkmate() {
            Some(Outcome::Checkmate {
                winner: self.turn().opposite(),
            })
        } else if self.is_stalemate() {
            Some(Outcome::Stalemate)
        } else {
            None
        }
    }

    /// The configuration this game runs with.
    #[inline]
    pub fn config(&self) -> GameConfig {
        self.config
    }

    /// Plays the move listed under `notation`.
    ///
    /// The token must match a listed legal move exactly. When the move is
    /// a promotion, `promotion` picks the piece; an absent choice falls
    /// back to [`GameConfig::default_promotion`], and for any other move
    /// the choice is ignored. On an illegal token the error carries the
    /// full legal list and the position is untouched.
    pub fn play(&mut self, notation: &str, promotion: Option<PieceKind>) -> Result<(), GameError> {
        let notation = notation.trim();
        if notation.is_empty() {
            return Err(GameError::InvalidInput("empty move".to_owned()));
        }
        let index = self
            .tokens
            .iter()
            .position(|token| token == notation)
            .ok_or_else(|| GameError::IllegalMove {
                notation: notation.to_owned(),
                legal: self.tokens.clone(),
            })?;
        self.commit(index, promotion)
    }

    /// Plays the legal move from `from` to `to`, if one exists.
    pub fn play_from_to(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<(), GameError> {
        let index = self
            .moves
            .iter()
            .position(|m| m.from == from && m.to == to)
            .ok_or_else(|| GameError::IllegalMove {
                notation: format!("{from}{to}"),
                legal: self.tokens.clone(),
            })?;
        self.commit(index, promotion)
    }

    /// Plays a move given in coordinate form, e.g. `"e2e4"`.
    pub fn play_coords(
        &mut self,
        coords: &str,
        promotion: Option<PieceKind>,
    ) -> Result<(), GameError> {
        let coords = coords.trim();
        let (from, to) = coords
            .split_at_checked(2)
            .and_then(|(a, b)| Some((Square::from_algebraic(a)?, Square::from_algebraic(b)?)))
            .ok_or_else(|| GameError::InvalidInput(coords.to_owned()))?;
        self.play_from_to(from, to, promotion)
    }

    /// Applies the cached move at `index` and records it in the log.
    fn commit(&mut self, index: usize, promotion: Option<PieceKind>) -> Result<(), GameError> {
        let mut m = self.moves[index];
        let mut recorded = self.tokens[index].clone();
        if m.requires_promotion() {
            let kind = promotion.unwrap_or(self.config.default_promotion);
            if !PieceKind::PROMOTIONS.contains(&kind) {
                return Err(GameError::InvalidInput(format!(
                    "cannot promote to {kind}"
                )));
            }
            m.promotion = Some(kind);
            recorded = notation::promoted(&recorded, kind);
        }
        self.board.apply_move(m);
        self.log.push(PlayedMove {
            notation: recorded,
            mov: m,
        });
        self.refresh();
        Ok(())
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Piece;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn promotion_game() -> Game {
        // White pawn one step from promoting, kings tucked away.
        let mut board = Board::blank();
        board.put(sq("a1"), Piece::new(Color::White, PieceKind::King));
        board.put(sq("h8"), Piece::new(Color::Black, PieceKind::King));
        board.put(sq("e7"), Piece::new(Color::White, PieceKind::Pawn));
        board.castling = CastlingRights::NONE;
        Game::from_parts(board, Vec::new(), GameConfig::default())
    }

    #[test]
    fn twenty_openers_and_alternating_turns() {
        let mut game = Game::new();
        assert_eq!(game.legal_moves().len(), 20);
        assert_eq!(game.turn(), Color::White);

        game.play("e4", None).unwrap();
        assert_eq!(game.turn(), Color::Black);
        game.play("e5", None).unwrap();
        game.play("Nf3", None).unwrap();
        assert_eq!(game.legal_moves().len(), 29);
        assert_eq!(game.outcome(), None);
    }

    #[test]
    fn illegal_move_reports_legal_set_and_changes_nothing() {
        let mut game = Game::new();
        let before = game.legal_moves().to_vec();

        let err = game.play("Qh5", None).unwrap_err();
        match err {
            GameError::IllegalMove { notation, legal } => {
                assert_eq!(notation, "Qh5");
                assert_eq!(legal, before);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(game.legal_moves(), before.as_slice());
        assert_eq!(game.turn(), Color::White);
        assert!(game.history().is_empty());
    }

    #[test]
    fn empty_input_is_invalid_not_illegal() {
        let mut game = Game::new();
        assert!(matches!(
            game.play("  ", None),
            Err(GameError::InvalidInput(_))
        ));
    }

    #[test]
    fn fools_mate_reaches_checkmate_outcome() {
        let mut game = Game::new();
        for token in ["f3", "e5", "g4", "Qh4"] {
            game.play(token, None).unwrap();
        }
        assert!(game.is_checkmate());
        assert!(game.legal_moves().is_empty());
        assert_eq!(
            game.outcome(),
            Some(Outcome::Checkmate {
                winner: Color::Black
            })
        );
    }

    #[test]
    fn history_records_notation_in_order() {
        let mut game = Game::new();
        game.play("e4", None).unwrap();
        game.play("e5", None).unwrap();
        let played: Vec<_> = game.history().iter().map(|p| p.notation.as_str()).collect();
        assert_eq!(played, ["e4", "e5"]);
        assert_eq!(game.history()[0].mov.to_coords(), "e2e4");
    }

    #[test]
    fn promotion_defaults_to_queen() {
        let mut game = promotion_game();
        assert!(game.legal_moves().contains(&"e8".to_owned()));
        game.play("e8", None).unwrap();
        assert_eq!(
            game.board().piece_at(sq("e8")),
            Some(Piece::new(Color::White, PieceKind::Queen))
        );
        assert_eq!(game.history()[0].notation, "e8=Q");
    }

    #[test]
    fn promotion_honors_explicit_choice() {
        let mut game = promotion_game();
        game.play("e8", Some(PieceKind::Knight)).unwrap();
        assert_eq!(
            game.board().piece_at(sq("e8")),
            Some(Piece::new(Color::White, PieceKind::Knight))
        );
        assert_eq!(game.history()[0].notation, "e8=N");
    }

    #[test]
    fn promotion_to_king_is_rejected() {
        let mut game = promotion_game();
        let err = game.play("e8", Some(PieceKind::King)).unwrap_err();
        assert!(matches!(err, GameError::InvalidInput(_)));
        // Nothing applied.
        assert!(game.history().is_empty());
        assert_eq!(game.turn(), Color::White);
    }

    #[test]
    fn promotion_choice_ignored_for_ordinary_moves() {
        let mut game = Game::new();
        game.play("e4", Some(PieceKind::Rook)).unwrap();
        assert_eq!(
            game.board().piece_at(sq("e4")),
            Some(Piece::new(Color::White, PieceKind::Pawn))
        );
        assert_eq!(game.history()[0].notation, "e4");
    }

    #[test]
    fn coordinate_input_plays_and_validates() {
        let mut game = Game::new();
        game.play_coords("e2e4", None).unwrap();
        assert_eq!(game.history()[0].notation, "e4");

        assert!(matches!(
            game.play_coords("e9e4", None),
            Err(GameError::InvalidInput(_))
        ));
        assert!(matches!(
            game.play_coords("e2", None),
            Err(GameError::InvalidInput(_))
        ));
        assert!(matches!(
            game.play_from_to(sq("e2"), sq("e4"), None),
            Err(GameError::IllegalMove { .. })
        ));
    }

    #[test]
    fn castling_plays_by_token() {
        let mut game = Game::new();
        for token in ["Nf3", "Nf6", "e3", "e6", "Be2", "Be7"] {
            game.play(token, None).unwrap();
        }
        assert!(game.legal_moves().contains(&"O-O".to_owned()));
        game.play("O-O", None).unwrap();
        assert_eq!(
            game.board().piece_at(sq("g1")),
            Some(Piece::new(Color::White, PieceKind::King))
        );
        assert!(!game.castling_rights().kingside(Color::White));
    }
}
