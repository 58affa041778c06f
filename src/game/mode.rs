//! Rule variants.
//!
//! A [`GameMode`] decides how the board is set up, which moves are legal,
//! what a move actually does, and what happens between turns. The default
//! method bodies are the classic rules; variants override only what they
//! change and call back into [`classic`] for the rest.

pub mod classic;
pub mod drunk;

use ratatui::prelude::*;

use crate::game::{
    grid::Grid,
    piece::{Piece, PieceColor},
    position::Position,
};
pub use classic::ClassicChessMode;
pub use drunk::DrunkChessMode;

/// Where a moved piece actually landed and what it took.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MoveOutcome {
    pub to: Position,
    pub captured: Option<Piece>,
}

/// Per-square decorations a renderer should apply on top of the tile colour.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct TileEffect {
    /// horizontal offset, in cells, for the piece glyph
    pub wobble: i8,
    /// a pickup sits on this square
    pub bottle: bool,
}

pub trait GameMode {
    fn name(&self) -> &'static str {
        "Classic chess"
    }

    fn description(&self) -> &'static str {
        "Standard chess rules; the game ends when a king is captured"
    }

    /// Clears `grid` and places the starting position.
    fn initialize_board(&mut self, grid: &mut Grid) {
        classic::initialize_board(grid)
    }

    fn is_valid_move(&self, grid: &Grid, from: Position, to: Position, piece: Piece) -> bool {
        classic::is_valid_move(grid, from, to, piece)
    }

    /// REQUIRES: the move was accepted by `is_valid_move`.
    fn execute_move(&mut self, grid: &mut Grid, from: Position, to: Position) -> MoveOutcome {
        classic::execute_move(grid, from, to)
    }

    /// A piece of `color` arrived on `position` without going through
    /// `execute_move`, as an en passant capture does.
    fn square_entered(&mut self, _position: Position, _color: PieceColor) {}

    /// Runs once per completed half-move; `turn` is the colour now to move.
    fn update_per_turn(&mut self, _grid: &mut Grid, _turn: PieceColor) {}

    /// A blacked out player cannot move, so their turn is passed.
    fn is_blacked_out(&self, _color: PieceColor) -> bool {
        false
    }

    fn tile_color(&self, position: Position, _elapsed: f32) -> Color {
        classic::tile_color(position)
    }

    fn tile_effect(&self, _position: Position, _piece: Option<Piece>, _elapsed: f32) -> TileEffect {
        TileEffect::default()
    }

    /// Extra lines for the side panel.
    fn status_lines(&self) -> Vec<Line<'static>> {
        Vec::new()
    }
}

/// Whether every square strictly between `from` and `to` is empty,
/// walking one step at a time along the line joining them.
pub fn is_path_clear(grid: &Grid, from: Position, to: Position) -> bool {
    let step_x = (to.x() as i32 - from.x() as i32).signum();
    let step_y = (to.y() as i32 - from.y() as i32).signum();
    let mut position = from;
    loop {
        let Some(next) = position.offset(step_x, step_y) else {
            return false;
        };
        if next == to {
            return true;
        }
        if !grid.is_vacant(next) {
            return false;
        }
        position = next;
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, clap::ValueEnum)]
pub enum ModeKind {
    #[default]
    Classic,
    Drunk,
}

impl ModeKind {
    pub fn build(self, seed: Option<u64>) -> Box<dyn GameMode> {
        match self {
            Self::Classic => Box::new(ClassicChessMode),
            Self::Drunk => Box::new(match seed {
                Some(seed) => DrunkChessMode::with_seed(seed),
                None => DrunkChessMode::new(),
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{is_path_clear, ModeKind};
    use crate::game::{
        grid::Grid,
        piece::{Piece, PieceColor, PieceType},
        position::Position,
    };

    #[test]
    fn path_is_blocked_by_any_piece() {
        let mut grid = Grid::empty();
        let from = Position::new(0, 0);
        let to = Position::new(0, 7);
        assert!(is_path_clear(&grid, from, to));
        grid.set(
            Position::new(0, 3),
            Some(Piece::new(PieceType::Knight, PieceColor::Black)),
        );
        assert!(!is_path_clear(&grid, from, to));
        assert!(is_path_clear(&grid, from, Position::new(0, 3)));
    }

    #[test]
    fn diagonal_paths() {
        let mut grid = Grid::empty();
        assert!(is_path_clear(&grid, Position::new(7, 0), Position::new(0, 7)));
        grid.set(
            Position::new(4, 3),
            Some(Piece::new(PieceType::Pawn, PieceColor::White)),
        );
        assert!(!is_path_clear(&grid, Position::new(7, 0), Position::new(0, 7)));
        assert!(is_path_clear(&grid, Position::new(5, 1), Position::new(6, 0)));
    }

    #[test]
    fn mode_kinds_build_named_modes() {
        assert_eq!(ModeKind::Classic.build(None).name(), "Classic chess");
        assert_eq!(ModeKind::Drunk.build(Some(7)).name(), "Drunk chess");
    }
}
