use std::collections::VecDeque;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::{direction_of, Game, GridPos};
use crate::input::{Action, Controls};
use crate::ui;

pub const GRID_SIZE: i32 = 15;
const STEP_INTERVAL: Duration = Duration::from_millis(200);
const FOOD_POINTS: u32 = 10;
const START: GridPos = GridPos::new(7, 7);
const FIRST_FOOD: GridPos = GridPos::new(5, 5);

const BOARD_BG: Color = Color::Rgb(12, 20, 12);

pub struct Snake {
    /// Head first.
    body: VecDeque<GridPos>,
    food: Option<GridPos>,
    dir: (i32, i32),
    /// Direction of the last executed move; turns are checked against it.
    last_dir: (i32, i32),
    score: u32,
    game_over: bool,
    rng: StdRng,
}

impl Snake {
    pub fn new(seed: u64) -> Self {
        Self {
            body: VecDeque::from([START]),
            food: Some(FIRST_FOOD),
            dir: (0, -1),
            last_dir: (0, -1),
            score: 0,
            game_over: false,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn head(&self) -> GridPos {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[cfg(test)]
    pub fn food(&self) -> Option<GridPos> {
        self.food
    }

    /// Pick a random cell not covered by the body. `None` once the board is full.
    fn place_food(&mut self) -> Option<GridPos> {
        let free: Vec<GridPos> = (0..GRID_SIZE)
            .flat_map(|y| (0..GRID_SIZE).map(move |x| GridPos::new(x, y)))
            .filter(|cell| !self.body.contains(cell))
            .collect();
        free.choose(&mut self.rng).copied()
    }

    fn turn(&mut self, dir: (i32, i32)) {
        let perpendicular = (dir.1 != 0 && self.last_dir.1 == 0) || (dir.0 != 0 && self.last_dir.0 == 0);
        if perpendicular {
            self.dir = dir;
        }
    }

    fn advance(&mut self) {
        let next = self.head().offset_wrapped(self.dir.0, self.dir.1, GRID_SIZE);

        if self.body.contains(&next) {
            self.game_over = true;
            log::info!("Snake bit itself at ({}, {}), score {}", next.x, next.y, self.score);
            return;
        }

        self.body.push_front(next);
        self.last_dir = self.dir;

        if self.food == Some(next) {
            self.score += FOOD_POINTS;
            self.food = self.place_food();
            if self.food.is_none() {
                // Board full
                self.game_over = true;
            }
        } else {
            self.body.pop_back();
        }
    }

    fn render_board(&self) -> Vec<Line<'static>> {
        let empty = Style::default().fg(Color::Rgb(30, 45, 30)).bg(BOARD_BG);
        let mut grid: Vec<Vec<(&'static str, Style)>> =
            vec![vec![("· ", empty); GRID_SIZE as usize]; GRID_SIZE as usize];

        if let Some(food) = self.food {
            grid[food.y as usize][food.x as usize] =
                ("◆ ", Style::default().fg(Color::Rgb(240, 80, 80)).bg(BOARD_BG).add_modifier(Modifier::BOLD));
        }
        for (i, seg) in self.body.iter().enumerate() {
            let color = if i == 0 {
                Color::Rgb(120, 255, 120)
            } else {
                Color::Rgb(40, 180, 60)
            };
            grid[seg.y as usize][seg.x as usize] = ("██", Style::default().fg(color).bg(BOARD_BG));
        }

        grid.into_iter()
            .map(|row| Line::from(row.into_iter().map(|(s, st)| Span::styled(s, st)).collect::<Vec<_>>()))
            .collect()
    }
}

impl Game for Snake {
    fn tick_interval(&self) -> Duration {
        STEP_INTERVAL
    }

    fn step(&mut self, _controls: &Controls) {
        if self.game_over {
            return;
        }
        self.advance();
    }

    fn press(&mut self, action: Action) {
        if self.game_over {
            return;
        }
        if let Some(dir) = direction_of(action) {
            self.turn(dir);
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some([status, field, help]) = ui::game_layout(frame, area, " 🐍 Snake ", Color::Rgb(80, 220, 80)) else {
            return;
        };

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!(" Score: {} ", self.score), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                ui::separator(),
                Span::styled(format!("Length: {} ", self.len()), Style::default().fg(Color::Green)),
            ])),
            status,
        );

        let board = ui::centered(field, GRID_SIZE as u16 * 2, GRID_SIZE as u16);
        frame.render_widget(Paragraph::new(self.render_board()), board);

        let footer = if self.game_over {
            ui::game_over_line("GAME OVER", self.score)
        } else {
            ui::key_hints(&[("↑↓←→", "Steer"), ("P", "Pause"), ("R", "Restart"), ("Esc", "Vault")])
        };
        frame.render_widget(Paragraph::new(footer), help);
    }

    fn reset(&mut self) {
        let seed = self.rng.gen();
        *self = Snake::new(seed);
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }
}
