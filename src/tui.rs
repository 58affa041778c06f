use std::time::{Duration, Instant};

use ratatui::{
    crossterm::event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
    },
    layout::Flex,
    prelude::*,
};

use crate::game::{Board, ModeKind, PieceColor, PieceType, Position, PROMOTIONS};

/// columns per square; the extra room lets drunk pieces sway
const TILE_WIDTH: u16 = 5;
const GLYPH_COLUMN: i8 = 2;
const INFO_WIDTH: u16 = 44;
const HEIGHT: u16 = 20;
/// redraw interval, so drunk tiles keep moving without input
const FRAME: Duration = Duration::from_millis(50);

pub struct Tui {
    board: Board,
    kind: ModeKind,
    seed: Option<u64>,
    started: Instant,
    click_targets: Vec<(Rect, Position)>,
    promotion_targets: Vec<(Rect, PieceType)>,
}

impl Tui {
    pub fn new(kind: ModeKind, seed: Option<u64>) -> Self {
        let board = Board::with_mode(kind.build(seed));
        let started = Instant::now();
        let click_targets = Vec::new();
        let promotion_targets = Vec::new();
        Self {
            board,
            kind,
            seed,
            started,
            click_targets,
            promotion_targets,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the winner, or `None` if the player quit first.
    pub fn run<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> std::io::Result<Option<PieceColor>> {
        loop {
            terminal.draw(|frame| frame.render_widget(&mut *self, frame.area()))?;
            if !event::poll(FRAME)? {
                continue;
            }
            if self.handle(event::read()?) {
                break;
            }
        }
        Ok(self.board.winner())
    }

    /// returns whether to exit
    pub fn handle(&mut self, event: Event) -> bool {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                modifiers: _,
                state: _,
            }) => {
                if self.board.is_game_over() {
                    return true;
                }
                match code {
                    KeyCode::Esc | KeyCode::Char('q') => return true,
                    KeyCode::Char('1') => self.switch(ModeKind::Classic),
                    KeyCode::Char('2') => self.switch(ModeKind::Drunk),
                    KeyCode::Char('r') => self.switch(self.kind),
                    _ => {}
                }
                false
            }
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(button),
                column,
                row,
                modifiers: _,
            }) => {
                let click = ratatui::layout::Position { x: column, y: row };
                match button {
                    MouseButton::Left => self.click(click),
                    MouseButton::Right => self.board.clear_selection(),
                    MouseButton::Middle => {}
                }
                false
            }
            _ => false,
        }
    }

    fn click(&mut self, click: ratatui::layout::Position) {
        if self.board.promotion_in_progress() {
            if let Some(&(_, piece)) = self
                .promotion_targets
                .iter()
                .find(|(rect, _)| rect.contains(click))
            {
                self.board.promote(piece);
            }
            return;
        }
        if let Some(&(_, position)) = self
            .click_targets
            .iter()
            .find(|(rect, _)| rect.contains(click))
        {
            self.board.handle_click(position);
        }
    }

    fn switch(&mut self, kind: ModeKind) {
        self.kind = kind;
        self.board.set_game_mode(kind.build(self.seed));
    }

    fn render_board(&mut self, area: Rect, buf: &mut Buffer) {
        let elapsed = self.started.elapsed().as_secs_f32();
        let mode = self.board.mode();
        let hints = self
            .board
            .selected()
            .map(|from| self.board.valid_moves(from))
            .unwrap_or_default();
        let ranks = Layout::vertical([Constraint::Fill(1); 8]).split(area);
        self.click_targets.clear();
        for (y, rect) in ranks.iter().copied().rev().enumerate() {
            let files = Layout::horizontal([Constraint::Fill(1); 8]).split(rect);
            for (x, rect) in files.iter().copied().enumerate() {
                let position = Position::new(x as u8, y as u8);
                let piece = self.board.get(position);
                let effect = mode.tile_effect(position, piece, elapsed);

                let mut bg = mode.tile_color(position, elapsed);
                if self
                    .board
                    .last_move()
                    .is_some_and(|(from, to)| position == from || position == to)
                {
                    bg = highlight_last_move(bg);
                }
                let mut line = Line::default().bg(bg);
                let indent = (GLYPH_COLUMN + effect.wobble).max(0) as usize;
                line.push_span(" ".repeat(indent));
                match piece {
                    Some(piece) => line.push_span(piece.render()),
                    None => line.push_span(" "),
                }
                if self.board.selected() == Some(position)
                    || self
                        .board
                        .promotion()
                        .is_some_and(|promotion| promotion.position == position)
                {
                    line.push_span(Span::raw("●").fg(Color::LightYellow))
                } else if hints.contains(&position) {
                    line.push_span(Span::raw("○").fg(Color::LightGreen))
                } else if effect.bottle {
                    line.push_span(Span::raw("¡").fg(Color::Magenta))
                }
                line.render(rect, buf);
                self.click_targets.push((rect, position));
            }
        }
    }

    fn render_info(&mut self, area: Rect, buf: &mut Buffer) {
        let mode = self.board.mode();
        let turn = self.board.turn();
        let mut text = Text::default();
        text.push_line(Line::raw(mode.name()).bold());
        text.push_line(Line::raw(mode.description()).italic());
        text.push_line(Line::raw(""));
        match self.board.winner() {
            Some(winner) => {
                text.push_line(
                    Line::raw(format!("{winner} wins! Press any key."))
                        .fg(winner.render())
                        .bg(Color::LightRed),
                );
            }
            None => {
                text.push_line(
                    Line::raw(format!("{turn} to move"))
                        .fg(turn.render())
                        .bg(Color::Gray),
                );
            }
        }
        let promotion_row = text.lines.len();
        text.push_line(Line::raw(""));
        for line in mode.status_lines() {
            text.push_line(line);
        }
        text.push_line(Line::raw(""));
        text.push_line(Line::raw("1 classic  2 drunk  r restart  q quit").dark_gray());
        text.render(area, buf);

        self.promotion_targets.clear();
        if let Some(promotion) = self.board.promotion() {
            let row = Rect {
                y: area.y + promotion_row as u16,
                height: 1,
                ..area
            };
            let [label, choices] = Layout::horizontal([8, 8]).areas(row);
            Span::raw("Promote:").render(label, buf);
            let columns = Layout::horizontal([Constraint::Length(2); 4]).split(choices);
            for (&rect, piece) in columns.iter().zip(PROMOTIONS) {
                piece
                    .render()
                    .fg(promotion.color.render())
                    .bg(Color::Gray)
                    .render(rect, buf);
                self.promotion_targets.push((rect, piece));
            }
        }
    }
}

fn highlight_last_move(color: Color) -> Color {
    match color {
        Color::DarkGray => Color::Yellow,
        Color::Gray => Color::LightYellow,
        Color::Rgb(r, g, b) => Color::Rgb(
            ((r as u16 + 255) / 2) as u8,
            ((g as u16 + 255) / 2) as u8,
            b / 2,
        ),
        color => color,
    }
}

impl Widget for &mut Tui {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let [area] = Layout::vertical([HEIGHT]).flex(Flex::Center).areas(area);
        let [board_column, info_area] = Layout::horizontal([8 * TILE_WIDTH, INFO_WIDTH])
            .spacing(2)
            .flex(Flex::Center)
            .areas(area);
        let [board_area] = Layout::vertical([8]).flex(Flex::Start).areas(board_column);
        self.render_board(board_area, buf);
        self.render_info(info_area, buf);
    }
}
