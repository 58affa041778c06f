use std::{fmt::Display, ops::Not};

use ratatui::prelude::*;

use crate::game::position::Position;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PieceType {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceType {
    pub fn render(&self) -> &'static str {
        match self {
            Self::Pawn => "♟",
            Self::Rook => "♜",
            Self::Knight => "♞",
            Self::Bishop => "♝",
            Self::Queen => "♛",
            Self::King => "♚",
        }
    }

    /// rook, bishop and queen need a clear path between `from` and `to`
    pub fn is_sliding(&self) -> bool {
        matches!(self, Self::Rook | Self::Bishop | Self::Queen)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum PieceColor {
    White,
    Black,
}

/// rank a white pawn must stand on to capture en passant
pub const WHITE_EN_PASSANT_RANK: u8 = 4;
/// rank a black pawn must stand on to capture en passant
pub const BLACK_EN_PASSANT_RANK: u8 = 3;

impl PieceColor {
    pub fn render(&self) -> Color {
        match self {
            Self::White => Color::White,
            Self::Black => Color::Black,
        }
    }

    /// +1 for white, -1 for black: white advances toward increasing rank
    pub fn direction(&self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }

    pub fn pawn_starting_rank(&self) -> u8 {
        match self {
            Self::White => 1,
            Self::Black => 6,
        }
    }

    pub fn piece_starting_rank(&self) -> u8 {
        match self {
            Self::White => 0,
            Self::Black => 7,
        }
    }

    pub fn promotion_rank(&self) -> u8 {
        (!*self).piece_starting_rank()
    }

    pub fn en_passant_rank(&self) -> u8 {
        match self {
            Self::White => WHITE_EN_PASSANT_RANK,
            Self::Black => BLACK_EN_PASSANT_RANK,
        }
    }
}

impl Not for PieceColor {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

impl Display for PieceColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PieceColor::White => write!(f, "White"),
            PieceColor::Black => write!(f, "Black"),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Piece {
    pub color: PieceColor,
    pub piece: PieceType,
    /// gates the pawn double step
    pub has_moved: bool,
}

impl Piece {
    pub fn new(piece: PieceType, color: PieceColor) -> Self {
        Self {
            color,
            piece,
            has_moved: false,
        }
    }

    pub fn render(&self) -> Span<'static> {
        Span::raw(self.piece.render()).fg(self.color.render())
    }

    /// Whether `from -> to` has the right shape for this piece type.
    ///
    /// Occupancy, blocking and history are not considered here; pawn
    /// diagonals in particular are left to the game mode.
    pub fn is_move_valid(&self, from: Position, to: Position) -> bool {
        let dx = to.x() as i8 - from.x() as i8;
        let dy = to.y() as i8 - from.y() as i8;
        if dx == 0 && dy == 0 {
            return false;
        }
        match self.piece {
            PieceType::Pawn => {
                let direction = self.color.direction();
                dx == 0 && (dy == direction || (!self.has_moved && dy == 2 * direction))
            }
            PieceType::Rook => dx == 0 || dy == 0,
            PieceType::Knight => matches!((dx.abs(), dy.abs()), (1, 2) | (2, 1)),
            PieceType::Bishop => dx.abs() == dy.abs(),
            PieceType::Queen => dx == 0 || dy == 0 || dx.abs() == dy.abs(),
            PieceType::King => dx.abs() <= 1 && dy.abs() <= 1,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Piece, PieceColor, PieceType};
    use crate::game::position::Position;

    fn at(x: u8, y: u8) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn pawn_double_step_only_before_first_move() {
        let mut pawn = Piece::new(PieceType::Pawn, PieceColor::White);
        assert!(pawn.is_move_valid(at(3, 1), at(3, 2)));
        assert!(pawn.is_move_valid(at(3, 1), at(3, 3)));
        assert!(!pawn.is_move_valid(at(3, 1), at(3, 0)));
        assert!(!pawn.is_move_valid(at(3, 1), at(4, 2)));
        pawn.has_moved = true;
        assert!(!pawn.is_move_valid(at(3, 2), at(3, 4)));
        assert!(pawn.is_move_valid(at(3, 2), at(3, 3)));
    }

    #[test]
    fn black_pawn_moves_down() {
        let pawn = Piece::new(PieceType::Pawn, PieceColor::Black);
        assert!(pawn.is_move_valid(at(2, 6), at(2, 5)));
        assert!(pawn.is_move_valid(at(2, 6), at(2, 4)));
        assert!(!pawn.is_move_valid(at(2, 6), at(2, 7)));
    }

    #[test]
    fn knight_shapes() {
        let knight = Piece::new(PieceType::Knight, PieceColor::White);
        let from = at(4, 4);
        let reachable = Position::all()
            .filter(|&to| knight.is_move_valid(from, to))
            .count();
        assert_eq!(reachable, 8);
        assert!(!knight.is_move_valid(from, at(6, 6)));
    }

    #[test]
    fn sliders_and_king() {
        let rook = Piece::new(PieceType::Rook, PieceColor::Black);
        let bishop = Piece::new(PieceType::Bishop, PieceColor::Black);
        let queen = Piece::new(PieceType::Queen, PieceColor::Black);
        let king = Piece::new(PieceType::King, PieceColor::Black);
        assert!(rook.is_move_valid(at(0, 0), at(0, 7)));
        assert!(!rook.is_move_valid(at(0, 0), at(1, 1)));
        assert!(bishop.is_move_valid(at(0, 0), at(7, 7)));
        assert!(!bishop.is_move_valid(at(0, 0), at(0, 1)));
        assert!(queen.is_move_valid(at(3, 3), at(3, 7)));
        assert!(queen.is_move_valid(at(3, 3), at(0, 0)));
        assert!(!queen.is_move_valid(at(3, 3), at(4, 5)));
        assert!(king.is_move_valid(at(4, 0), at(5, 1)));
        assert!(!king.is_move_valid(at(4, 0), at(6, 0)));
        assert!(!king.is_move_valid(at(4, 0), at(4, 0)));
    }

    #[test]
    fn rank_constants() {
        assert_eq!(PieceColor::White.promotion_rank(), 7);
        assert_eq!(PieceColor::Black.promotion_rank(), 0);
        assert_eq!(PieceColor::White.en_passant_rank(), 4);
        assert_eq!(PieceColor::Black.en_passant_rank(), 3);
        assert_eq!(!PieceColor::White, PieceColor::Black);
    }
}
