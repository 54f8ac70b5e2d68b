use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::{direction_of, Game, GridPos};
use crate::input::{Action, Controls};
use crate::ui;

pub const GRID_SIZE: usize = 12;
const PURSUER_INTERVAL: Duration = Duration::from_millis(500);
const DOT_POINTS: u32 = 10;
const PLAYER_START: GridPos = GridPos::new(1, 1);
const PURSUER_STARTS: [GridPos; 2] = [GridPos::new(10, 10), GridPos::new(10, 1)];

/// 1 is wall, 0 is open floor.
const LAYOUT: [[u8; GRID_SIZE]; GRID_SIZE] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 1, 0, 1, 0, 1, 1, 1, 0, 1],
    [1, 0, 1, 0, 0, 0, 0, 0, 0, 1, 0, 1],
    [1, 0, 1, 0, 1, 1, 1, 1, 0, 1, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 0, 1],
    [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 1, 0, 1, 0, 1, 1, 1, 0, 1],
    [1, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

const WALL_BG: Color = Color::Rgb(29, 78, 216);
const FLOOR_BG: Color = Color::Rgb(23, 37, 84);

fn is_open(pos: GridPos) -> bool {
    if pos.x < 0 || pos.y < 0 || pos.x >= GRID_SIZE as i32 || pos.y >= GRID_SIZE as i32 {
        return false;
    }
    LAYOUT[pos.y as usize][pos.x as usize] == 0
}

pub struct Maze {
    title: String,
    icon: String,
    player: GridPos,
    pursuers: Vec<GridPos>,
    /// Uncollected dots, indexed like the layout.
    dots: [[bool; GRID_SIZE]; GRID_SIZE],
    score: u32,
    caught: bool,
    cleared: bool,
    rng: StdRng,
}

impl Maze {
    pub fn new(title: &str, icon: &str, seed: u64) -> Self {
        let mut dots = [[false; GRID_SIZE]; GRID_SIZE];
        for (y, row) in LAYOUT.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                dots[y][x] = *cell == 0;
            }
        }
        // The player starts on a cell that is already eaten.
        dots[PLAYER_START.y as usize][PLAYER_START.x as usize] = false;

        Self {
            title: title.to_string(),
            icon: icon.to_string(),
            player: PLAYER_START,
            pursuers: PURSUER_STARTS.to_vec(),
            dots,
            score: 0,
            caught: false,
            cleared: false,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[cfg(test)]
    pub fn player(&self) -> GridPos {
        self.player
    }

    pub fn dots_left(&self) -> usize {
        self.dots.iter().flatten().filter(|d| **d).count()
    }

    #[cfg(test)]
    pub fn is_caught(&self) -> bool {
        self.caught
    }

    fn move_player(&mut self, dx: i32, dy: i32) {
        let next = self.player.offset(dx, dy);
        if !is_open(next) {
            return;
        }
        self.player = next;

        let dot = &mut self.dots[next.y as usize][next.x as usize];
        if *dot {
            *dot = false;
            self.score += DOT_POINTS;
            if self.dots_left() == 0 {
                self.cleared = true;
                log::info!("Maze cleared, score {}", self.score);
            }
        }
        self.check_caught();
    }

    /// Step toward the player along a randomly preferred axis, falling back
    /// to the other axis, else stay put.
    fn chase_step(&mut self, from: GridPos, occupied: &[GridPos]) -> GridPos {
        let dx = (self.player.x - from.x).signum();
        let dy = (self.player.y - from.y).signum();
        let horizontal = GridPos::new(from.x + dx, from.y);
        let vertical = GridPos::new(from.x, from.y + dy);
        let (first, second) = if self.rng.gen_bool(0.5) {
            (horizontal, vertical)
        } else {
            (vertical, horizontal)
        };

        [first, second]
            .into_iter()
            .find(|c| *c != from && is_open(*c) && !occupied.contains(c))
            .unwrap_or(from)
    }

    fn move_pursuers(&mut self) {
        for i in 0..self.pursuers.len() {
            let from = self.pursuers[i];
            let others: Vec<GridPos> = self
                .pursuers
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, p)| *p)
                .collect();
            self.pursuers[i] = self.chase_step(from, &others);
        }
        self.check_caught();
    }

    fn check_caught(&mut self) {
        if !self.caught && self.pursuers.contains(&self.player) {
            self.caught = true;
            log::info!("Maze runner caught at ({}, {}), score {}", self.player.x, self.player.y, self.score);
        }
    }

    fn render_board(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::with_capacity(GRID_SIZE);
        for (y, row) in LAYOUT.iter().enumerate() {
            let mut spans = Vec::with_capacity(GRID_SIZE);
            for (x, cell) in row.iter().enumerate() {
                let pos = GridPos::new(x as i32, y as i32);
                let span = if *cell == 1 {
                    Span::styled("  ", Style::default().bg(WALL_BG))
                } else if pos == self.player {
                    Span::styled(self.icon.clone(), Style::default().bg(FLOOR_BG))
                } else if self.pursuers.contains(&pos) {
                    Span::styled("👾", Style::default().bg(FLOOR_BG))
                } else if self.dots[y][x] {
                    Span::styled("· ", Style::default().fg(Color::Rgb(250, 204, 21)).bg(FLOOR_BG))
                } else {
                    Span::styled("  ", Style::default().bg(FLOOR_BG))
                };
                spans.push(span);
            }
            lines.push(Line::from(spans));
        }
        lines
    }
}

impl Game for Maze {
    fn tick_interval(&self) -> Duration {
        PURSUER_INTERVAL
    }

    fn step(&mut self, _controls: &Controls) {
        if self.is_game_over() {
            return;
        }
        self.move_pursuers();
    }

    fn press(&mut self, action: Action) {
        if self.is_game_over() {
            return;
        }
        if let Some((dx, dy)) = direction_of(action) {
            self.move_player(dx, dy);
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some([status, field, help]) = ui::game_layout(frame, area, " 👾 Maze Master ", Color::Rgb(96, 165, 250)) else {
            return;
        };

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!(" Score: {} ", self.score), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                ui::separator(),
                Span::styled(format!("{} ", self.title), Style::default().fg(Color::Rgb(147, 197, 253))),
                ui::separator(),
                Span::styled(format!("Dots: {} ", self.dots_left()), Style::default().fg(Color::Green)),
            ])),
            status,
        );

        let board = ui::centered(field, GRID_SIZE as u16 * 2, GRID_SIZE as u16);
        frame.render_widget(Paragraph::new(self.render_board()), board);

        let footer = if self.caught {
            ui::game_over_line("CAUGHT!", self.score)
        } else if self.cleared {
            ui::win_line("CLEARED!", self.score)
        } else {
            ui::key_hints(&[("↑↓←→", "Move"), ("P", "Pause"), ("R", "Restart"), ("Esc", "Vault")])
        };
        frame.render_widget(Paragraph::new(footer), help);
    }

    fn reset(&mut self) {
        let seed = self.rng.gen();
        *self = Maze::new(&self.title, &self.icon, seed);
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn is_game_over(&self) -> bool {
        self.caught || self.cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::HoldMode;

    fn idle() -> Controls {
        Controls::new(HoldMode::UntilRelease)
    }

    #[test]
    fn test_walls_block_the_player() {
        let mut game = Maze::new("Pac-Man", "🟡", 1);
        game.press(Action::Up);
        game.press(Action::Left);
        assert_eq!(game.player(), PLAYER_START);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_dot_scores_once() {
        let mut game = Maze::new("Pac-Man", "🟡", 1);
        let total = game.dots_left();
        game.press(Action::Right);
        assert_eq!(game.player(), GridPos::new(2, 1));
        assert_eq!(game.score(), DOT_POINTS);
        game.press(Action::Left);
        game.press(Action::Right);
        assert_eq!(game.score(), DOT_POINTS);
        assert_eq!(game.dots_left(), total - 1);
    }

    fn manhattan(a: GridPos, b: GridPos) -> i32 {
        (a.x - b.x).abs() + (a.y - b.y).abs()
    }

    #[test]
    fn test_pursuers_close_in() {
        let mut game = Maze::new("Pac-Man", "🟡", 7);
        game.step(&idle());
        for (now, start) in game.pursuers.iter().zip(PURSUER_STARTS) {
            assert_eq!(manhattan(*now, PLAYER_START), manhattan(start, PLAYER_START) - 1);
        }
        // (10,1) shares the player's row, so only the horizontal step exists
        assert_eq!(game.pursuers[1], GridPos::new(9, 1));
    }

    #[test]
    fn test_pursuer_falls_back_to_other_axis() {
        let mut game = Maze::new("Pac-Man", "🟡", 3);
        game.player = GridPos::new(1, 3);
        game.pursuers = vec![GridPos::new(3, 1)];
        // down is a wall, left is open
        game.step(&idle());
        assert_eq!(game.pursuers[0], GridPos::new(2, 1));

        game.player = GridPos::new(3, 5);
        game.pursuers = vec![GridPos::new(2, 1)];
        // down is a wall, right is open
        game.step(&idle());
        assert_eq!(game.pursuers[0], GridPos::new(3, 1));
    }

    #[test]
    fn test_pursuer_stays_when_boxed_in() {
        let mut game = Maze::new("Pac-Man", "🟡", 3);
        game.player = GridPos::new(4, 5);
        game.pursuers = vec![GridPos::new(6, 7)];
        // left and up are both walls
        for _ in 0..5 {
            game.step(&idle());
        }
        assert_eq!(game.pursuers[0], GridPos::new(6, 7));
    }

    #[test]
    fn test_pursuers_never_share_a_cell() {
        let mut game = Maze::new("Pac-Man", "🟡", 11);
        game.player = GridPos::new(4, 5);
        // the front pursuer is boxed in; the one behind it may only step onto it
        game.pursuers = vec![GridPos::new(6, 7), GridPos::new(7, 7)];
        game.step(&idle());
        assert_eq!(game.pursuers, vec![GridPos::new(6, 7), GridPos::new(7, 7)]);
    }

    #[test]
    fn test_caught_latches() {
        let mut game = Maze::new("Pac-Man", "🟡", 1);
        game.pursuers = vec![GridPos::new(3, 1)];
        game.press(Action::Right);
        assert!(!game.is_caught());
        game.press(Action::Right);
        assert!(game.is_caught());
        assert!(game.is_game_over());

        let score = game.score();
        let pursuers = game.pursuers.clone();
        game.press(Action::Down);
        game.step(&idle());
        assert_eq!(game.player(), GridPos::new(3, 1));
        assert_eq!(game.pursuers, pursuers);
        assert_eq!(game.score(), score);
    }

    #[test]
    fn test_eating_every_dot_wins() {
        let mut game = Maze::new("Pac-Man", "🟡", 1);
        game.dots = [[false; GRID_SIZE]; GRID_SIZE];
        game.dots[1][2] = true;
        game.press(Action::Right);
        assert!(game.is_game_over());
        assert!(!game.is_caught());
        assert_eq!(game.dots_left(), 0);
    }

    #[test]
    fn test_reset_restores_layout() {
        let mut game = Maze::new("Pac-Man", "🟡", 1);
        game.press(Action::Right);
        game.step(&idle());
        game.reset();
        assert_eq!(game.player(), PLAYER_START);
        assert_eq!(game.pursuers, PURSUER_STARTS.to_vec());
        assert_eq!(game.score(), 0);
    }
}
