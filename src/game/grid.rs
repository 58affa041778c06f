use std::{
    fmt::Debug,
    ops::{Index, IndexMut},
};

use crate::game::{
    piece::{Piece, PieceColor, PieceType},
    position::Position,
};

/// What a renderer needs to draw the board, indexed by `x + y * 8`.
pub type Placement = [Option<(PieceType, PieceColor)>; 64];

/// The 64 squares of the board.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Grid([Option<Piece>; 64]);

impl Index<Position> for Grid {
    type Output = Option<Piece>;

    fn index(&self, position: Position) -> &Self::Output {
        &self.0[position.index()]
    }
}

impl IndexMut<Position> for Grid {
    fn index_mut(&mut self, position: Position) -> &mut Self::Output {
        &mut self.0[position.index()]
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}

impl Grid {
    pub fn empty() -> Self {
        Self([None; 64])
    }

    pub fn get(&self, position: Position) -> Option<Piece> {
        self[position]
    }

    pub fn set(&mut self, position: Position, piece: Option<Piece>) {
        self[position] = piece;
    }

    /// Moves whatever is on `from` onto `to`, returning what `to` held.
    pub fn r#move(&mut self, from: Position, to: Position) -> Option<Piece> {
        let piece = self[from].take();
        std::mem::replace(&mut self[to], piece)
    }

    pub fn clear(&mut self) {
        self.0 = [None; 64];
    }

    pub fn is_vacant(&self, position: Position) -> bool {
        self.get(position).is_none()
    }

    pub fn iter(&self, color: PieceColor) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.0.iter().enumerate().filter_map(move |(i, piece_opt)| {
            piece_opt
                .filter(|piece| piece.color == color)
                .map(|piece| (Position::from_index(i), piece))
        })
    }

    pub fn placement(&self) -> Placement {
        self.0.map(|piece_opt| piece_opt.map(|piece| (piece.piece, piece.color)))
    }
}

impl Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in (0..8).rev() {
            for x in 0..8 {
                let symbol = match self.get(Position::new(x, y)) {
                    None => '.',
                    Some(piece) => {
                        let symbol = match piece.piece {
                            PieceType::Pawn => 'p',
                            PieceType::Rook => 'r',
                            PieceType::Knight => 'n',
                            PieceType::Bishop => 'b',
                            PieceType::Queen => 'q',
                            PieceType::King => 'k',
                        };
                        match piece.color {
                            PieceColor::White => symbol.to_ascii_uppercase(),
                            PieceColor::Black => symbol,
                        }
                    }
                };
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
