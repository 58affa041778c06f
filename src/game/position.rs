use std::fmt::{Debug, Display};

use crate::game::piece::PieceColor;

/// A square on the board, packed as `x + y * 8`.
///
/// Every `Position` is on the board; use [`Position::checked`] for
/// coordinates that may fall off it.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct Position(u8);

impl Position {
    pub fn new(x: u8, y: u8) -> Self {
        debug_assert!(x < 8, "x = {x}");
        debug_assert!(y < 8, "y = {y}");
        Self(y << 3 | x)
    }

    pub fn checked(x: i32, y: i32) -> Option<Self> {
        ((0..8).contains(&x) && (0..8).contains(&y)).then(|| Self::new(x as u8, y as u8))
    }

    pub fn from_index(index: usize) -> Self {
        debug_assert!(index < 64, "index = {index}");
        Self(index as u8)
    }

    /// file, 0..8
    pub fn x(self) -> u8 {
        self.0 & 0b111
    }

    /// rank, 0..8; white starts on rank 0
    pub fn y(self) -> u8 {
        self.0 >> 3
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Self::checked(self.x() as i32 + dx, self.y() as i32 + dy)
    }

    /// One square toward the far side for `color`'s pawns.
    pub fn forward(self, color: PieceColor) -> Option<Self> {
        self.offset(0, color.direction() as i32)
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..64).map(Position)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", (b'a' + self.x()) as char, self.y() + 1)
    }
}

impl Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

#[cfg(test)]
mod test {
    use super::Position;
    use crate::game::piece::PieceColor;

    #[test]
    fn packing_is_row_major() {
        let position = Position::new(3, 5);
        assert_eq!(position.index(), 3 + 5 * 8);
        assert_eq!((position.x(), position.y()), (3, 5));
        assert_eq!(Position::from_index(43), position);
        assert_eq!(position.to_string(), "d6");
    }

    #[test]
    fn off_board_is_unrepresentable() {
        assert_eq!(Position::checked(-1, 0), None);
        assert_eq!(Position::checked(0, 8), None);
        assert_eq!(Position::checked(7, 7), Some(Position::new(7, 7)));
        assert_eq!(Position::new(0, 0).offset(-1, 1), None);
        assert_eq!(Position::new(6, 6).offset(1, 1), Some(Position::new(7, 7)));
    }

    #[test]
    fn forward_stops_at_the_edge() {
        assert_eq!(Position::new(0, 0).forward(PieceColor::Black), None);
        assert_eq!(Position::new(5, 7).forward(PieceColor::White), None);
        assert_eq!(
            Position::new(0, 0).forward(PieceColor::White),
            Some(Position::new(0, 1))
        );
        assert_eq!(
            Position::new(2, 6).forward(PieceColor::Black),
            Some(Position::new(2, 5))
        );
        assert_eq!(Position::all().count(), 64);
    }
}
