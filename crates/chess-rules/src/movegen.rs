//! Pseudo-legal move generation.
//!
//! Each generator walks outward from one square with bounds-checked
//! [`Square::offset`] steps and records every destination the piece
//! could reach if check were not a concern. Captured pieces are resolved
//! here, at generation time, so the resulting [`Move`] values are
//! self-contained and exactly invertible. Castling is not generated
//! here; it depends on rights and attack state, which the board layer
//! owns.

use crate::Board;
use chess_core::{Move, MoveFlag, Piece, PieceKind, Square};

const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const QUEEN_DIRS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// Appends every pseudo-legal move for the piece on `from`.
pub(crate) fn pseudo_legal_from(
    board: &Board,
    from: Square,
    piece: Piece,
    en_passant: Option<Square>,
    out: &mut Vec<Move>,
) {
    match piece.kind {
        PieceKind::Pawn => pawn_moves(board, from, piece, en_passant, out),
        PieceKind::Knight => leaper_moves(board, from, piece, &KNIGHT_JUMPS, out),
        PieceKind::Bishop => slider_moves(board, from, piece, &BISHOP_DIRS, out),
        PieceKind::Rook => slider_moves(board, from, piece, &ROOK_DIRS, out),
        PieceKind::Queen => slider_moves(board, from, piece, &QUEEN_DIRS, out),
        PieceKind::King => leaper_moves(board, from, piece, &QUEEN_DIRS, out),
    }
}

/// Rays outward in each direction until a piece or the board edge stops
/// the slide. An enemy piece is a capture destination; an own piece
/// blocks without being one.
fn slider_moves(
    board: &Board,
    from: Square,
    piece: Piece,
    dirs: &[(i8, i8)],
    out: &mut Vec<Move>,
) {
    for &(df, dr) in dirs {
        let mut to = from.offset(df, dr);
        while let Some(dest) = to {
            match board.piece_at(dest) {
                None => {
                    out.push(Move::new(from, dest, piece, None));
                    to = dest.offset(df, dr);
                }
                Some(target) => {
                    if target.color != piece.color {
                        out.push(Move::new(from, dest, piece, Some(target)));
                    }
                    break;
                }
            }
        }
    }
}

/// Single fixed-offset steps (knight jumps and king steps).
fn leaper_moves(
    board: &Board,
    from: Square,
    piece: Piece,
    offsets: &[(i8, i8)],
    out: &mut Vec<Move>,
) {
    for &(df, dr) in offsets {
        if let Some(dest) = from.offset(df, dr) {
            match board.piece_at(dest) {
                None => out.push(Move::new(from, dest, piece, None)),
                Some(target) if target.color != piece.color => {
                    out.push(Move::new(from, dest, piece, Some(target)));
                }
                Some(_) => {}
            }
        }
    }
}

/// Pawn pushes, double pushes, diagonal captures, and en passant.
///
/// Moves that land on the promotion rank are emitted with an empty
/// promotion choice; the caller attaches the promoted kind before
/// applying.
fn pawn_moves(
    board: &Board,
    from: Square,
    piece: Piece,
    en_passant: Option<Square>,
    out: &mut Vec<Move>,
) {
    let dir = piece.color.pawn_direction();

    if let Some(one) = from.offset(0, dir) {
        if board.piece_at(one).is_none() {
            out.push(Move::new(from, one, piece, None));
            if from.rank() == piece.color.pawn_start_rank() {
                if let Some(two) = from.offset(0, 2 * dir) {
                    if board.piece_at(two).is_none() {
                        out.push(Move::flagged(from, two, piece, None, MoveFlag::DoublePush));
                    }
                }
            }
        }
    }

    for df in [-1, 1] {
        let Some(dest) = from.offset(df, dir) else {
            continue;
        };
        match board.piece_at(dest) {
            Some(target) if target.color != piece.color => {
                out.push(Move::new(from, dest, piece, Some(target)));
            }
            Some(_) => {}
            None if en_passant == Some(dest) => {
                // The victim pawn stands beside us, on our own rank.
                let victim_sq = Square::new(dest.file(), from.rank());
                if let Some(victim) = board.piece_at(victim_sq) {
                    out.push(Move::flagged(
                        from,
                        dest,
                        piece,
                        Some(victim),
                        MoveFlag::EnPassant,
                    ));
                }
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Color;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn moves_from(board: &Board, from: &str) -> Vec<Move> {
        let from = sq(from);
        let piece = board.piece_at(from).unwrap();
        let mut out = Vec::new();
        pseudo_legal_from(board, from, piece, board.en_passant, &mut out);
        out
    }

    #[test]
    fn knight_in_the_open_has_eight_moves() {
        let mut board = Board::blank();
        board.put(sq("d4"), Piece::new(Color::White, PieceKind::Knight));
        assert_eq!(moves_from(&board, "d4").len(), 8);
    }

    #[test]
    fn knight_in_the_corner_has_two_moves() {
        let mut board = Board::blank();
        board.put(sq("a1"), Piece::new(Color::White, PieceKind::Knight));
        let moves = moves_from(&board, "a1");
        assert_eq!(moves.len(), 2);
        assert!(moves.iter().any(|m| m.to == sq("b3")));
        assert!(moves.iter().any(|m| m.to == sq("c2")));
    }

    #[test]
    fn rook_stops_at_blockers() {
        let mut board = Board::blank();
        board.put(sq("a1"), Piece::new(Color::White, PieceKind::Rook));
        board.put(sq("a4"), Piece::new(Color::White, PieceKind::Pawn));
        board.put(sq("d1"), Piece::new(Color::Black, PieceKind::Pawn));
        let moves = moves_from(&board, "a1");
        // a2, a3 up; b1, c1, d1(x) right.
        assert_eq!(moves.len(), 5);
        let capture = moves.iter().find(|m| m.to == sq("d1")).unwrap();
        assert!(capture.is_capture());
        assert!(moves.iter().all(|m| m.to != sq("a4")));
    }

    #[test]
    fn bishop_rays_follow_diagonals() {
        let mut board = Board::blank();
        board.put(sq("c1"), Piece::new(Color::White, PieceKind::Bishop));
        assert_eq!(moves_from(&board, "c1").len(), 7);
    }

    #[test]
    fn queen_combines_rook_and_bishop() {
        let mut board = Board::blank();
        board.put(sq("d4"), Piece::new(Color::White, PieceKind::Queen));
        assert_eq!(moves_from(&board, "d4").len(), 27);
    }

    #[test]
    fn pawn_double_push_only_from_start_rank() {
        let board = Board::new();
        let moves = moves_from(&board, "e2");
        assert_eq!(moves.len(), 2);
        assert!(moves
            .iter()
            .any(|m| m.to == sq("e4") && m.flag == MoveFlag::DoublePush));

        let mut board = Board::blank();
        board.put(sq("e3"), Piece::new(Color::White, PieceKind::Pawn));
        let moves = moves_from(&board, "e3");
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].to, sq("e4"));
    }

    #[test]
    fn blocked_pawn_cannot_double_push_over() {
        let mut board = Board::blank();
        board.put(sq("e2"), Piece::new(Color::White, PieceKind::Pawn));
        board.put(sq("e3"), Piece::new(Color::Black, PieceKind::Knight));
        assert!(moves_from(&board, "e2").is_empty());
    }

    #[test]
    fn pawn_captures_diagonally_only() {
        let mut board = Board::blank();
        board.put(sq("e4"), Piece::new(Color::White, PieceKind::Pawn));
        board.put(sq("d5"), Piece::new(Color::Black, PieceKind::Pawn));
        board.put(sq("e5"), Piece::new(Color::Black, PieceKind::Pawn));
        board.put(sq("f5"), Piece::new(Color::White, PieceKind::Pawn));
        let moves = moves_from(&board, "e4");
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].to, sq("d5"));
        assert!(moves[0].is_capture());
    }

    #[test]
    fn en_passant_capture_records_the_victim() {
        let mut board = Board::blank();
        board.put(sq("e5"), Piece::new(Color::White, PieceKind::Pawn));
        board.put(sq("d5"), Piece::new(Color::Black, PieceKind::Pawn));
        board.en_passant = Some(sq("d6"));
        let moves = moves_from(&board, "e5");
        let ep = moves
            .iter()
            .find(|m| m.flag == MoveFlag::EnPassant)
            .unwrap();
        assert_eq!(ep.to, sq("d6"));
        assert_eq!(ep.captured, Some(Piece::new(Color::Black, PieceKind::Pawn)));
    }

    #[test]
    fn promotion_push_left_without_choice() {
        let mut board = Board::blank();
        board.put(sq("b7"), Piece::new(Color::White, PieceKind::Pawn));
        let moves = moves_from(&board, "b7");
        assert_eq!(moves.len(), 1);
        assert!(moves[0].requires_promotion());
        assert_eq!(moves[0].promotion, None);
    }

    #[test]
    fn black_pawns_move_down_the_board() {
        let board = Board::new();
        let moves = moves_from(&board, "e7");
        assert_eq!(moves.len(), 2);
        assert!(moves.iter().any(|m| m.to == sq("e6")));
        assert!(moves.iter().any(|m| m.to == sq("e5")));
    }
}
