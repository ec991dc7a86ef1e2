//! Movetext rendering.
//!
//! Legal moves are presented to callers as compact movetext tokens:
//! `e4`, `exd5`, `Nf3`, `O-O`. Tokens carry no check or mate suffix, and
//! promotion candidates are listed bare (`e8`, not `e8=Q`) - the
//! promotion choice arrives separately when the move is played, and only
//! the recorded notation of an applied promotion gains the `=Q` suffix.
//!
//! Disambiguation is progressive: when two pieces of the same kind can
//! reach the same square, the origin file is inserted first; if the
//! files match, the origin rank; if several clashes pin both, file and
//! rank together.

use chess_core::{Move, MoveFlag, PieceKind};

/// Renders one token per move, disambiguated within the given set.
///
/// The set should be the full legal-move list for a position; a token is
/// only unique relative to the other moves it was rendered with.
pub fn annotate(moves: &[Move]) -> Vec<String> {
    moves.iter().map(|m| token(m, moves)).collect()
}

/// Renders the token for `m`, consulting `all` for disambiguation.
fn token(m: &Move, all: &[Move]) -> String {
    match m.flag {
        MoveFlag::CastleKingside => return "O-O".to_owned(),
        MoveFlag::CastleQueenside => return "O-O-O".to_owned(),
        _ => {}
    }

    let dest = m.to.to_algebraic();
    if m.piece.kind == PieceKind::Pawn {
        // Pawn captures are always origin-file qualified, which keeps
        // them unique without the piece-style disambiguation below.
        return if m.is_capture() {
            format!("{}x{}", m.from.file().to_char(), dest)
        } else {
            dest
        };
    }

    let clashes: Vec<_> = all
        .iter()
        .filter(|other| {
            other.piece.kind == m.piece.kind
                && other.piece.color == m.piece.color
                && other.to == m.to
                && other.from != m.from
        })
        .collect();

    let disamb = if clashes.is_empty() {
        String::new()
    } else if clashes.iter().all(|c| c.from.file() != m.from.file()) {
        m.from.file().to_char().to_string()
    } else if clashes.iter().all(|c| c.from.rank() != m.from.rank()) {
        m.from.rank().to_char().to_string()
    } else {
        m.from.to_algebraic()
    };

    let capture = if m.is_capture() { "x" } else { "" };
    format!("{}{}{}{}", m.piece.kind.letter(), disamb, capture, dest)
}

/// Appends the promotion suffix to a recorded token (`e8` -> `e8=Q`).
pub fn promoted(base: &str, kind: PieceKind) -> String {
    format!("{}={}", base, kind.letter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Board;
    use chess_core::{Color, Piece, Square};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn quiet(from: &str, to: &str, color: Color, kind: PieceKind) -> Move {
        Move::new(sq(from), sq(to), Piece::new(color, kind), None)
    }

    #[test]
    fn initial_position_tokens() {
        let mut board = Board::new();
        let moves = board.legal_moves();
        let tokens = annotate(&moves);
        assert_eq!(tokens.len(), 20);
        for expected in ["e4", "e3", "d4", "Nf3", "Nc3", "Na3", "Nh3"] {
            assert!(tokens.iter().any(|t| t == expected), "missing {expected}");
        }
        // No duplicates in a well-formed list.
        let mut sorted = tokens.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), tokens.len());
    }

    #[test]
    fn pawn_capture_carries_origin_file() {
        let capture = Move::new(
            sq("e4"),
            sq("d5"),
            Piece::new(Color::White, PieceKind::Pawn),
            Some(Piece::new(Color::Black, PieceKind::Pawn)),
        );
        assert_eq!(annotate(&[capture]), vec!["exd5"]);
    }

    #[test]
    fn castling_tokens() {
        let king = Piece::new(Color::White, PieceKind::King);
        let kingside = Move::flagged(sq("e1"), sq("g1"), king, None, MoveFlag::CastleKingside);
        let queenside = Move::flagged(sq("e1"), sq("c1"), king, None, MoveFlag::CastleQueenside);
        assert_eq!(annotate(&[kingside, queenside]), vec!["O-O", "O-O-O"]);
    }

    #[test]
    fn file_disambiguation_comes_first() {
        let moves = [
            quiet("a1", "d1", Color::White, PieceKind::Rook),
            quiet("h1", "d1", Color::White, PieceKind::Rook),
        ];
        assert_eq!(annotate(&moves), vec!["Rad1", "Rhd1"]);
    }

    #[test]
    fn rank_disambiguation_when_files_match() {
        let moves = [
            quiet("a1", "a3", Color::White, PieceKind::Rook),
            quiet("a8", "a3", Color::White, PieceKind::Rook),
        ];
        assert_eq!(annotate(&moves), vec!["R1a3", "R8a3"]);
    }

    #[test]
    fn full_square_when_both_axes_clash() {
        // Queens on e4, h4, and h1 all reaching e1: h4 shares a rank with
        // e4 and a file with h1, so only the full origin square works.
        let moves = [
            quiet("e4", "e1", Color::White, PieceKind::Queen),
            quiet("h4", "e1", Color::White, PieceKind::Queen),
            quiet("h1", "e1", Color::White, PieceKind::Queen),
        ];
        assert_eq!(annotate(&moves), vec!["Qee1", "Qh4e1", "Q1e1"]);
    }

    #[test]
    fn opposing_pieces_do_not_force_disambiguation() {
        let moves = [
            quiet("b1", "d2", Color::White, PieceKind::Knight),
            quiet("b3", "d2", Color::Black, PieceKind::Knight),
        ];
        assert_eq!(annotate(&moves), vec!["Nd2", "Nd2"]);
    }

    #[test]
    fn promotion_tokens_listed_bare_then_suffixed() {
        let push = quiet("e7", "e8", Color::White, PieceKind::Pawn);
        let tokens = annotate(&[push]);
        assert_eq!(tokens, vec!["e8"]);
        assert_eq!(promoted(&tokens[0], PieceKind::Queen), "e8=Q");
        assert_eq!(promoted(&tokens[0], PieceKind::Knight), "e8=N");
    }
}
