//! Chess where every move costs a drink.
//!
//! Each player carries an alcohol level in `[0, 100]`. Past
//! [`DEVIATION_THRESHOLD`] moves may land off target, past
//! [`BLACKOUT_THRESHOLD`] a player may black out and lose the ability to
//! move for a turn or two. Bottles appear on empty squares and are drunk by
//! whichever piece lands on them.

use std::{f32::consts::PI, ops::RangeInclusive};

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use ratatui::prelude::*;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::game::{
    grid::Grid,
    mode::{classic, GameMode, MoveOutcome, TileEffect},
    piece::{Piece, PieceColor, PieceType},
    position::Position,
};

pub const MAX_ALCOHOL: f32 = 100.0;
pub const DEVIATION_THRESHOLD: f32 = 20.0;
pub const WIDE_DEVIATION_THRESHOLD: f32 = 70.0;
pub const BLACKOUT_THRESHOLD: f32 = 80.0;
const DEVIATION_FACTOR: f32 = 0.8;
const BLACKOUT_CHANCE: f64 = 0.3;
const BLACKOUT_TURNS: RangeInclusive<u8> = 1..=2;
const MOVE_DRINK: RangeInclusive<f32> = 1.0..=5.0;
const CAPTURE_DRINK: f32 = 3.0;
const PROMOTION_DRINK: f32 = 5.0;
const WAITING_DRINK: RangeInclusive<f32> = 0.1..=0.5;
const DECAY_PER_TURN: f32 = 0.2;
const BOTTLE_SPAWN_CHANCE: f64 = 0.5;
const BOTTLE_AMOUNT: RangeInclusive<f32> = 5.0..=15.0;
const MAX_BOTTLES: usize = 6;
const DISTORTION_THRESHOLD: f32 = 3.0;
const WOBBLE_THRESHOLD: f32 = 10.0;
/// widest glyph swing, in terminal cells
const MAX_WOBBLE: f32 = 2.0;

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct PlayerState {
    pub alcohol_level: f32,
    pub blackout_turns: u8,
}

impl PlayerState {
    pub fn intoxication(&self) -> Intoxication {
        if self.blackout_turns > 0 {
            Intoxication::Blackout
        } else if self.alcohol_level > BLACKOUT_THRESHOLD {
            Intoxication::Wasted
        } else if self.alcohol_level > 50.0 {
            Intoxication::Drunk
        } else if self.alcohol_level > DEVIATION_THRESHOLD {
            Intoxication::Tipsy
        } else {
            Intoxication::Sober
        }
    }

    fn drink(&mut self, amount: f32) {
        self.alcohol_level = (self.alcohol_level + amount).clamp(0.0, MAX_ALCOHOL);
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Intoxication {
    Sober,
    Tipsy,
    Drunk,
    Wasted,
    Blackout,
}

impl Intoxication {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sober => "sober",
            Self::Tipsy => "tipsy",
            Self::Drunk => "drunk",
            Self::Wasted => "wasted",
            Self::Blackout => "BLACKOUT",
        }
    }

    pub fn render(&self) -> Color {
        match self {
            Self::Sober => Color::Rgb(0, 255, 0),
            Self::Tipsy => Color::Rgb(255, 204, 0),
            Self::Drunk => Color::Rgb(255, 102, 0),
            Self::Wasted | Self::Blackout => Color::Rgb(204, 0, 0),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Bottle {
    pub alcohol_amount: f32,
}

pub struct DrunkChessMode {
    white: PlayerState,
    black: PlayerState,
    bottles: FxHashMap<Position, Bottle>,
    turn_count: u32,
    rng: StdRng,
}

impl Default for DrunkChessMode {
    fn default() -> Self {
        Self::new()
    }
}

impl DrunkChessMode {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Same seed, same deviations, blackouts and bottles.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            white: PlayerState::default(),
            black: PlayerState::default(),
            bottles: FxHashMap::default(),
            turn_count: 0,
            rng,
        }
    }

    pub fn player(&self, color: PieceColor) -> PlayerState {
        match color {
            PieceColor::White => self.white,
            PieceColor::Black => self.black,
        }
    }

    pub fn player_mut(&mut self, color: PieceColor) -> &mut PlayerState {
        match color {
            PieceColor::White => &mut self.white,
            PieceColor::Black => &mut self.black,
        }
    }

    pub fn average_alcohol_level(&self) -> f32 {
        (self.white.alcohol_level + self.black.alcohol_level) / 2.0
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn bottle_at(&self, position: Position) -> Option<Bottle> {
        self.bottles.get(&position).copied()
    }

    pub fn bottles(&self) -> impl Iterator<Item = (Position, Bottle)> + '_ {
        self.bottles.iter().map(|(&position, &bottle)| (position, bottle))
    }

    pub fn place_bottle(&mut self, position: Position, alcohol_amount: f32) {
        self.bottles.insert(position, Bottle { alcohol_amount });
    }

    /// Where a move aimed at `to` ends up given how drunk `piece`'s owner is.
    fn stagger(&mut self, grid: &Grid, piece: Piece, to: Position) -> Position {
        let level = self.player(piece.color).alcohol_level;
        if level <= DEVIATION_THRESHOLD {
            return to;
        }
        let effect = level / MAX_ALCOHOL;
        if self.rng.gen::<f32>() >= effect * DEVIATION_FACTOR {
            return to;
        }
        let max = if level > WIDE_DEVIATION_THRESHOLD { 2 } else { 1 };
        let dx = self.rng.gen_range(-max..=max);
        let dy = self.rng.gen_range(-max..=max);
        match to.offset(dx, dy) {
            Some(deviated) if grid.get(deviated).is_none_or(|other| other.color != piece.color) => {
                deviated
            }
            _ => to,
        }
    }

    fn try_spawn_bottle(&mut self, grid: &Grid) {
        if self.bottles.len() >= MAX_BOTTLES || !self.rng.gen_bool(BOTTLE_SPAWN_CHANCE) {
            return;
        }
        let free: Vec<Position> = Position::all()
            .filter(|&position| grid.is_vacant(position) && !self.bottles.contains_key(&position))
            .collect();
        let Some(&position) = free.choose(&mut self.rng) else {
            return;
        };
        let alcohol_amount = self.rng.gen_range(BOTTLE_AMOUNT);
        debug!(%position, alcohol_amount, "bottle appears");
        self.place_bottle(position, alcohol_amount);
    }

    fn pick_up_bottle(&mut self, position: Position, color: PieceColor) -> f32 {
        let Some(bottle) = self.bottles.remove(&position) else {
            return 0.0;
        };
        debug!(%color, %position, "bottle picked up");
        bottle.alcohol_amount
    }

    fn player_line(&self, color: PieceColor) -> Line<'static> {
        let state = self.player(color);
        let tier = state.intoxication();
        let mut line = Line::from(vec![
            Span::raw(format!("{color}: {:.1}% ", state.alcohol_level)).fg(tier.render()),
            Span::raw(format!("({})", tier.label())).fg(tier.render()),
        ]);
        if state.blackout_turns > 0 {
            line.push_span(Span::raw(format!(" {} turns", state.blackout_turns)).fg(Color::Red));
        }
        line
    }
}

impl GameMode for DrunkChessMode {
    fn name(&self) -> &'static str {
        "Drunk chess"
    }

    fn description(&self) -> &'static str {
        "Every move costs a drink; drunk players miss their squares and may black out"
    }

    fn initialize_board(&mut self, grid: &mut Grid) {
        classic::initialize_board(grid);
        self.white = PlayerState::default();
        self.black = PlayerState::default();
        self.bottles.clear();
        self.turn_count = 0;
    }

    fn is_valid_move(&self, grid: &Grid, from: Position, to: Position, piece: Piece) -> bool {
        self.player(piece.color).blackout_turns == 0 && classic::is_valid_move(grid, from, to, piece)
    }

    fn execute_move(&mut self, grid: &mut Grid, from: Position, to: Position) -> MoveOutcome {
        let Some(piece) = grid.get(from) else {
            return classic::execute_move(grid, from, to);
        };
        let actual_to = self.stagger(grid, piece, to);
        if actual_to != to {
            debug!(color = %piece.color, %from, aimed = %to, landed = %actual_to, "move staggers");
        }
        let promotes =
            piece.piece == PieceType::Pawn && actual_to.y() == piece.color.promotion_rank();

        let outcome = classic::execute_move(grid, from, actual_to);

        let mut drink = self.rng.gen_range(MOVE_DRINK);
        drink += self.pick_up_bottle(actual_to, piece.color);
        if outcome.captured.is_some() {
            drink += CAPTURE_DRINK;
        }
        if promotes {
            drink += PROMOTION_DRINK;
        }
        self.player_mut(piece.color).drink(drink);

        if self.player(piece.color).alcohol_level > BLACKOUT_THRESHOLD
            && self.rng.gen_bool(BLACKOUT_CHANCE)
        {
            let turns = self.rng.gen_range(BLACKOUT_TURNS);
            debug!(color = %piece.color, turns, "blackout");
            self.player_mut(piece.color).blackout_turns = turns;
        }
        outcome
    }

    fn square_entered(&mut self, position: Position, color: PieceColor) {
        let drink = self.pick_up_bottle(position, color);
        self.player_mut(color).drink(drink);
    }

    fn update_per_turn(&mut self, grid: &mut Grid, turn: PieceColor) {
        self.turn_count += 1;
        for state in [&mut self.white, &mut self.black] {
            state.drink(-DECAY_PER_TURN);
            state.blackout_turns = state.blackout_turns.saturating_sub(1);
        }
        let sip = self.rng.gen_range(WAITING_DRINK);
        self.player_mut(turn).drink(sip);
        self.try_spawn_bottle(grid);
    }

    fn is_blacked_out(&self, color: PieceColor) -> bool {
        self.player(color).blackout_turns > 0
    }

    fn tile_color(&self, position: Position, elapsed: f32) -> Color {
        let light = !classic::is_dark(position);
        let base = if light {
            [0.9, 0.9, 0.7]
        } else {
            [0.5, 0.3, 0.1]
        };
        let average = self.average_alcohol_level();
        if average < DISTORTION_THRESHOLD {
            return rgb(base);
        }

        let time = elapsed * 1.2;
        let effect = (average / MAX_ALCOHOL * 1.5).min(1.0);
        let x = position.x() as f32;
        let y = position.y() as f32;
        let psychedelic = [
            0.5 + 0.5 * (time + x * 0.4).sin(),
            0.5 + 0.5 * (time * 1.3 + y * 0.6 + 2.0).sin(),
            0.5 + 0.5 * (time * 0.7 + x * 0.4 + y * 0.6 + 4.0).sin(),
        ];
        let wave = (time * 0.4 + (x + y) * 0.3).sin() * 0.15;
        let waves = [wave, -wave * 0.5, wave * 0.7];
        let shade = if light { 1.0 } else { 0.7 };
        let mut blended = [0.0; 3];
        for i in 0..3 {
            let channel = base[i] * (1.0 - effect) + psychedelic[i] * effect + waves[i];
            blended[i] = channel.clamp(0.0, 1.0) * shade;
        }
        rgb(blended)
    }

    fn tile_effect(&self, position: Position, piece: Option<Piece>, elapsed: f32) -> TileEffect {
        let bottle = self.bottles.contains_key(&position);
        let wobble = piece
            .map(|piece| self.player(piece.color).alcohol_level)
            .filter(|&level| level > WOBBLE_THRESHOLD)
            .map(|level| {
                let oscillation = ((level - WOBBLE_THRESHOLD) / (MAX_ALCOHOL - WOBBLE_THRESHOLD)).min(1.0);
                let phase = (position.x() + position.y()) as f32 * PI / 8.0;
                let time = elapsed * (2.0 + oscillation * 2.0) + phase;
                (time.sin() * oscillation * MAX_WOBBLE).round() as i8
            })
            .unwrap_or(0);
        TileEffect { wobble, bottle }
    }

    fn status_lines(&self) -> Vec<Line<'static>> {
        vec![
            Line::raw(format!("Turn {}", self.turn_count)),
            self.player_line(PieceColor::White),
            self.player_line(PieceColor::Black),
            Line::raw(format!("Bottles on board: {}", self.bottles.len())),
            Line::raw(""),
            Line::raw("0-20% sober: moves land where aimed").fg(Intoxication::Sober.render()),
            Line::raw("21-50% tipsy: pieces sway").fg(Intoxication::Tipsy.render()),
            Line::raw("51-80% drunk: moves may miss").fg(Intoxication::Drunk.render()),
            Line::raw(">80% risk of blackout for 1-2 turns").fg(Intoxication::Wasted.render()),
        ]
    }
}

fn rgb([r, g, b]: [f32; 3]) -> Color {
    let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb(channel(r), channel(g), channel(b))
}
