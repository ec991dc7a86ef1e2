//! Chess piece representation.
//!
//! A piece is just a kind and a color. Pieces never know where they
//! stand; the board's grid is the single source of placement truth.

use crate::Color;
use serde::{Deserialize, Serialize};

/// The six kinds of chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    /// All piece kinds in order.
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// The four kinds a pawn may promote to.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    /// Returns the movetext letter for this kind ('N', 'B', 'R', 'Q', 'K').
    ///
    /// Pawns have no letter in movetext; this returns 'P' only for
    /// contexts that need a placeholder.
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    /// Parses a movetext letter into a piece kind.
    pub const fn from_letter(c: char) -> Option<Self> {
        match c {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        };
        write!(f, "{}", name)
    }
}

/// A colored piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    /// Creates a new piece.
    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Piece { kind, color }
    }

    /// Returns the single-character representation: uppercase for White,
    /// lowercase for Black (e.g. 'K', 'n').
    pub fn to_char(self) -> char {
        match self.color {
            Color::White => self.kind.letter(),
            Color::Black => self.kind.letter().to_ascii_lowercase(),
        }
    }

    /// Parses a single-character representation into a piece.
    pub fn from_char(c: char) -> Option<Self> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = PieceKind::from_letter(c.to_ascii_uppercase())?;
        Some(Piece { kind, color })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_chars() {
        assert_eq!(Piece::new(Color::White, PieceKind::King).to_char(), 'K');
        assert_eq!(Piece::new(Color::Black, PieceKind::Knight).to_char(), 'n');
        assert_eq!(
            Piece::from_char('q'),
            Some(Piece::new(Color::Black, PieceKind::Queen))
        );
        assert_eq!(
            Piece::from_char('P'),
            Some(Piece::new(Color::White, PieceKind::Pawn))
        );
        assert_eq!(Piece::from_char('x'), None);
    }

    #[test]
    fn letters_roundtrip() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_letter(kind.letter()), Some(kind));
        }
    }

    #[test]
    fn promotion_kinds() {
        assert!(!PieceKind::PROMOTIONS.contains(&PieceKind::Pawn));
        assert!(!PieceKind::PROMOTIONS.contains(&PieceKind::King));
        assert_eq!(PieceKind::PROMOTIONS.len(), 4);
    }

    #[test]
    fn serde_tokens() {
        let piece = Piece::new(Color::Black, PieceKind::Rook);
        let json = serde_json::to_string(&piece).unwrap();
        assert_eq!(json, r#"{"kind":"rook","color":"black"}"#);
        assert_eq!(serde_json::from_str::<Piece>(&json).unwrap(), piece);
    }
}
