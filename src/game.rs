use std::fmt::Debug;

use tracing::{debug, info};

mod grid;
pub mod mode;
pub mod piece;
pub mod position;

pub use grid::{Grid, Placement};
use mode::{classic, MoveOutcome};
pub use mode::{ClassicChessMode, DrunkChessMode, GameMode, ModeKind, TileEffect};
pub use piece::{Piece, PieceColor, PieceType};
pub use position::Position;

pub const PROMOTIONS: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Knight,
];

/// A pawn waiting for its owner to pick what it becomes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Promotion {
    pub position: Position,
    pub color: PieceColor,
}

type Listener = Box<dyn FnMut(&Placement)>;

/// The board and everything needed to referee a game on it.
///
/// Input arrives as clicks: the first click on one of the mover's pieces
/// selects it, the second click tries to move it there. Anything illegal
/// simply drops the selection. Which moves are legal and what a move does
/// is up to the active [`GameMode`].
pub struct Board {
    grid: Grid,
    turn: PieceColor,
    selected: Option<Position>,
    /// for en passant; only good for the very next move
    last_double_pawn_move: Option<Position>,
    promotion: Option<Promotion>,
    winner: Option<PieceColor>,
    last_move: Option<(Position, Position)>,
    mode: Box<dyn GameMode>,
    listeners: Vec<Listener>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self::with_mode(Box::new(ClassicChessMode))
    }

    pub fn with_mode(mode: Box<dyn GameMode>) -> Self {
        let mut this = Self {
            grid: Grid::empty(),
            turn: PieceColor::White,
            selected: None,
            last_double_pawn_move: None,
            promotion: None,
            winner: None,
            last_move: None,
            mode,
            listeners: Vec::new(),
        };
        this.initialize_board();
        this
    }

    /// Puts the pieces back where the active mode wants them.
    pub fn initialize_board(&mut self) {
        self.selected = None;
        self.last_double_pawn_move = None;
        self.promotion = None;
        self.last_move = None;
        self.mode.initialize_board(&mut self.grid);
        self.notify();
    }

    pub fn set_game_mode(&mut self, mode: Box<dyn GameMode>) {
        info!(mode = mode.name(), "switching game mode");
        self.mode = mode;
        self.turn = PieceColor::White;
        self.winner = None;
        self.initialize_board();
    }

    pub fn mode(&self) -> &dyn GameMode {
        self.mode.as_ref()
    }

    pub fn get(&self, position: Position) -> Option<Piece> {
        self.grid.get(position)
    }

    pub fn set(&mut self, position: Position, piece: Option<Piece>) {
        self.grid.set(position, piece)
    }

    /// Relocates a piece without any rule checks.
    pub fn r#move(&mut self, from: Position, to: Position) {
        self.grid.r#move(from, to);
    }

    pub fn turn(&self) -> PieceColor {
        self.turn
    }

    pub fn selected(&self) -> Option<Position> {
        self.selected
    }

    pub fn last_double_pawn_move(&self) -> Option<Position> {
        self.last_double_pawn_move
    }

    pub fn last_move(&self) -> Option<(Position, Position)> {
        self.last_move
    }

    pub fn promotion(&self) -> Option<Promotion> {
        self.promotion
    }

    pub fn promotion_in_progress(&self) -> bool {
        self.promotion.is_some()
    }

    pub fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }

    /// `None` while the game is still in progress
    pub fn winner(&self) -> Option<PieceColor> {
        self.winner
    }

    pub fn placement(&self) -> Placement {
        self.grid.placement()
    }

    /// `listener` receives the full placement after every change to it.
    pub fn on_change(&mut self, listener: impl FnMut(&Placement) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self) {
        let placement = self.grid.placement();
        for listener in &mut self.listeners {
            listener(&placement);
        }
    }

    pub fn handle_click(&mut self, position: Position) {
        if self.promotion.is_some() || self.is_game_over() {
            return;
        }
        match self.selected {
            None => self.select_piece(position),
            Some(_)
                if self
                    .grid
                    .get(position)
                    .is_some_and(|piece| piece.color == self.turn) =>
            {
                self.select_piece(position)
            }
            Some(_) => self.move_piece(position),
        }
    }

    /// The right click.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn select_piece(&mut self, position: Position) {
        let owned = self
            .grid
            .get(position)
            .is_some_and(|piece| piece.color == self.turn);
        self.selected = (owned && !self.is_game_over()).then_some(position);
        if owned {
            debug!(%position, "selected");
        }
    }

    /// Tries to move the selected piece to `to`. The selection is gone
    /// afterwards whether or not the move happened.
    pub fn move_piece(&mut self, to: Position) {
        let Some(from) = self.selected.take() else {
            return;
        };
        if self.promotion.is_some() || self.is_game_over() {
            return;
        }
        let Some(piece) = self.grid.get(from) else {
            return;
        };
        if !self.mode.is_valid_move(&self.grid, from, to, piece) {
            debug!(%from, %to, "illegal move");
            return;
        }

        let outcome = if self.is_en_passant_capture(from, to) {
            let mut outcome = classic::execute_move(&mut self.grid, from, to);
            let captured_at = Position::new(to.x(), from.y());
            outcome.captured = self.grid[captured_at].take();
            self.mode.square_entered(to, piece.color);
            debug!(%from, %to, captured = %captured_at, "en passant");
            outcome
        } else if is_pawn_diagonal(piece, from, to) && self.grid.is_vacant(to) {
            debug!(%from, %to, "no en passant available");
            return;
        } else {
            self.mode.execute_move(&mut self.grid, from, to)
        };
        let MoveOutcome { to: landed, captured } = outcome;
        debug!(color = %piece.color, %from, to = %landed, "moved");

        // a push that staggers two squares ahead was never a double step
        let advanced_two = piece.piece == PieceType::Pawn
            && landed == to
            && landed.x() == from.x()
            && landed.y().abs_diff(from.y()) == 2;
        self.last_double_pawn_move = advanced_two.then_some(landed);
        self.last_move = Some((from, landed));
        self.notify();

        if captured.is_some_and(|captured| captured.piece == PieceType::King) {
            info!(winner = %piece.color, "king captured");
            self.winner = Some(piece.color);
            self.promotion = None;
            return;
        }

        if piece.piece == PieceType::Pawn && landed.y() == piece.color.promotion_rank() {
            debug!(position = %landed, "awaiting promotion");
            self.promotion = Some(Promotion {
                position: landed,
                color: piece.color,
            });
            return;
        }

        self.next_turn();
    }

    /// Resolves a pending promotion. Anything but a queen, rook, bishop or
    /// knight is ignored.
    pub fn promote(&mut self, choice: PieceType) {
        if self.is_game_over() || !PROMOTIONS.contains(&choice) {
            return;
        }
        let Some(Promotion { position, color }) = self.promotion.take() else {
            return;
        };
        debug!(%position, ?choice, "promoted");
        self.grid.set(
            position,
            Some(Piece {
                color,
                piece: choice,
                has_moved: true,
            }),
        );
        self.notify();
        self.next_turn();
    }

    /// Hands the move to the other player. If the mode says they cannot
    /// move, the turn comes straight back, at most once.
    pub fn next_turn(&mut self) {
        self.pass_turn();
        if self.mode.is_blacked_out(self.turn) {
            debug!(turn = %self.turn, "blacked out, turn passes");
            self.pass_turn();
        }
        debug!(turn = %self.turn, "next turn");
    }

    fn pass_turn(&mut self) {
        self.turn = !self.turn;
        self.mode.update_per_turn(&mut self.grid, self.turn);
    }

    pub fn is_en_passant_capture(&self, from: Position, to: Position) -> bool {
        let Some(target) = self.last_double_pawn_move else {
            return false;
        };
        let Some(piece) = self.grid.get(from) else {
            return false;
        };
        is_pawn_diagonal(piece, from, to)
            && self.grid.is_vacant(to)
            && from.y() == piece.color.en_passant_rank()
            && target == Position::new(to.x(), from.y())
            && self
                .grid
                .get(target)
                .is_some_and(|other| other.piece == PieceType::Pawn && other.color != piece.color)
    }

    /// Every square the piece on `from` could move to right now.
    pub fn valid_moves(&self, from: Position) -> Vec<Position> {
        let Some(piece) = self.grid.get(from) else {
            return Vec::new();
        };
        let mut moves = Vec::new();
        if piece.piece == PieceType::Pawn {
            let en_passant = self
                .last_double_pawn_move
                .and_then(|passed| passed.forward(piece.color))
                .filter(|&to| self.is_en_passant_capture(from, to))
                .filter(|&to| self.mode.is_valid_move(&self.grid, from, to, piece));
            moves.extend(en_passant);
        }
        for to in Position::all() {
            if moves.contains(&to) || !self.mode.is_valid_move(&self.grid, from, to, piece) {
                continue;
            }
            if is_pawn_diagonal(piece, from, to) && self.grid.is_vacant(to) {
                // the only empty diagonal a pawn may take is en passant
                continue;
            }
            moves.push(to);
        }
        moves
    }
}

fn is_pawn_diagonal(piece: Piece, from: Position, to: Position) -> bool {
    piece.piece == PieceType::Pawn
        && to.x().abs_diff(from.x()) == 1
        && to.y() as i8 - from.y() as i8 == piece.color.direction()
}

impl Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} to move ({})", self.turn, self.mode.name())?;
        write!(f, "{:?}", self.grid)
    }
}
