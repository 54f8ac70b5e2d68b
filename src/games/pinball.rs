use std::time::Duration;

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::physics::{distance, to_local, Body};
use crate::games::ticker::FRAME_INTERVAL;
use crate::games::Game;
use crate::input::{Action, Controls};
use crate::ui;
use crate::ui::canvas::Canvas;

pub const BOARD_W: f32 = 300.0;
pub const BOARD_H: f32 = 400.0;

const GRAVITY: f32 = 0.15;
const FRICTION: f32 = 0.99;
const WALL_BOUNCE: f32 = -0.8;
const BALL_RADIUS: f32 = 8.0;
const PLUNGER: (f32, f32) = (280.0, 350.0);
const LAUNCH_VELOCITY: (f32, f32) = (-1.0, -12.0);

const BUMPER_SPEED: f32 = 8.0;
const BUMPER_POINTS: u32 = 50;
const BUMPER_FLASH_TICKS: u32 = 8;

const FLIPPER_LEN: f32 = 60.0;
const FLIPPER_WIDTH: f32 = 10.0;
const FLIPPER_KICK: (f32, f32) = (2.0, -10.0);
const FLIPPER_POINTS: u32 = 10;

const TABLE_BG: Color = Color::Rgb(8, 15, 8);

#[derive(Debug, Clone)]
struct Bumper {
    x: f32,
    y: f32,
    radius: f32,
    color: Color,
    flash: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
struct Flipper {
    side: Side,
    pivot_x: f32,
    pivot_y: f32,
}

impl Flipper {
    fn angle(&self, raised: bool) -> f32 {
        match (self.side, raised) {
            (Side::Left, true) => -0.5,
            (Side::Left, false) => 0.4,
            (Side::Right, true) => 0.5,
            (Side::Right, false) => -0.4,
        }
    }

    /// The flipper extends right of a left pivot and left of a right pivot.
    fn span(&self) -> (f32, f32) {
        match self.side {
            Side::Left => (0.0, FLIPPER_LEN),
            Side::Right => (-FLIPPER_LEN, 0.0),
        }
    }

    fn touches(&self, ball: &Body, raised: bool) -> bool {
        let (lx, ly) = to_local(ball.x - self.pivot_x, ball.y - self.pivot_y, self.angle(raised));
        let (start, end) = self.span();
        lx > start && lx < end && ly.abs() < BALL_RADIUS + FLIPPER_WIDTH / 2.0
    }

    fn tip(&self, raised: bool) -> (f32, f32) {
        let (sin, cos) = self.angle(raised).sin_cos();
        let reach = match self.side {
            Side::Left => FLIPPER_LEN,
            Side::Right => -FLIPPER_LEN,
        };
        (self.pivot_x + reach * cos, self.pivot_y + reach * sin)
    }
}

pub struct Pinball {
    ball: Body,
    launched: bool,
    bumpers: Vec<Bumper>,
    flippers: [Flipper; 2],
    left_up: bool,
    right_up: bool,
    score: u32,
    game_over: bool,
}

impl Pinball {
    pub fn new() -> Self {
        Self {
            ball: Body::new(PLUNGER.0, PLUNGER.1, 0.0, 0.0),
            launched: false,
            bumpers: vec![
                Bumper { x: 100.0, y: 100.0, radius: 20.0, color: Color::Rgb(239, 68, 68), flash: 0 },
                Bumper { x: 220.0, y: 120.0, radius: 20.0, color: Color::Rgb(239, 68, 68), flash: 0 },
                Bumper { x: 160.0, y: 200.0, radius: 25.0, color: Color::Rgb(245, 158, 11), flash: 0 },
            ],
            flippers: [
                Flipper { side: Side::Left, pivot_x: 80.0, pivot_y: 360.0 },
                Flipper { side: Side::Right, pivot_x: 220.0, pivot_y: 360.0 },
            ],
            left_up: false,
            right_up: false,
            score: 0,
            game_over: false,
        }
    }

    fn launch(&mut self) {
        if !self.launched && self.ball.is_resting() {
            self.ball.vx = LAUNCH_VELOCITY.0;
            self.ball.vy = LAUNCH_VELOCITY.1;
            self.launched = true;
        }
    }

    fn bounce_walls(&mut self) {
        let ball = &mut self.ball;
        if ball.x < BALL_RADIUS {
            ball.x = BALL_RADIUS;
            ball.vx *= WALL_BOUNCE;
        }
        if ball.x > BOARD_W - BALL_RADIUS {
            ball.x = BOARD_W - BALL_RADIUS;
            ball.vx *= WALL_BOUNCE;
        }
        if ball.y < BALL_RADIUS {
            ball.y = BALL_RADIUS;
            ball.vy *= WALL_BOUNCE;
        }
    }

    fn hit_bumpers(&mut self) {
        for bumper in &mut self.bumpers {
            bumper.flash = bumper.flash.saturating_sub(1);
            let dist = distance(self.ball.x, self.ball.y, bumper.x, bumper.y);
            if dist < BALL_RADIUS + bumper.radius {
                let angle = (self.ball.y - bumper.y).atan2(self.ball.x - bumper.x);
                self.ball.vx = angle.cos() * BUMPER_SPEED;
                self.ball.vy = angle.sin() * BUMPER_SPEED;
                bumper.flash = BUMPER_FLASH_TICKS;
                self.score += BUMPER_POINTS;
            }
        }
    }

    fn hit_flippers(&mut self) {
        for flipper in self.flippers {
            let raised = match flipper.side {
                Side::Left => self.left_up,
                Side::Right => self.right_up,
            };
            if flipper.touches(&self.ball, raised) {
                self.ball.vy = FLIPPER_KICK.1;
                self.ball.vx = match flipper.side {
                    Side::Left => FLIPPER_KICK.0,
                    Side::Right => -FLIPPER_KICK.0,
                };
                self.score += FLIPPER_POINTS;
            }
        }
    }

    fn render_field(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let mut canvas = Canvas::new(width, height, BOARD_W, BOARD_H, TABLE_BG);

        // Plunger lane
        canvas.segment(BOARD_W - 40.0, BOARD_H * 0.75, BOARD_W - 40.0, BOARD_H, '│', Color::Rgb(80, 80, 60));

        for bumper in &self.bumpers {
            let color = if bumper.flash > 0 { Color::Rgb(255, 255, 255) } else { bumper.color };
            canvas.disc(bumper.x, bumper.y, bumper.radius, '◉', color);
        }

        for flipper in &self.flippers {
            let raised = match flipper.side {
                Side::Left => self.left_up,
                Side::Right => self.right_up,
            };
            let (tx, ty) = flipper.tip(raised);
            canvas.segment(flipper.pivot_x, flipper.pivot_y, tx, ty, '▬', Color::Rgb(29, 78, 216));
        }

        canvas.disc(self.ball.x, self.ball.y, BALL_RADIUS, '●', Color::Rgb(220, 220, 220));

        canvas.into_lines()
    }
}

impl Default for Pinball {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Pinball {
    fn tick_interval(&self) -> Duration {
        FRAME_INTERVAL
    }

    fn step(&mut self, controls: &Controls) {
        if self.game_over {
            return;
        }
        self.left_up = controls.is_held(Action::Left);
        self.right_up = controls.is_held(Action::Right);
        if !self.launched {
            return;
        }

        self.ball.vy += GRAVITY;
        self.ball.vx *= FRICTION;
        self.ball.vy *= FRICTION;
        self.ball.advance();

        self.bounce_walls();
        if self.ball.y > BOARD_H {
            self.game_over = true;
            log::info!("Pinball drained, score {}", self.score);
            return;
        }

        self.hit_bumpers();
        self.hit_flippers();
    }

    fn press(&mut self, action: Action) {
        if self.game_over {
            return;
        }
        match action {
            Action::Fire | Action::Up => self.launch(),
            Action::Left => self.left_up = true,
            Action::Right => self.right_up = true,
            Action::Down => {}
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some([status, field, help]) = ui::game_layout(frame, area, " ⚽ Pinball ", Color::Rgb(245, 158, 11)) else {
            return;
        };

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!(" Score: {} ", self.score), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                ui::separator(),
                Span::styled(
                    if self.launched { "Ball in play " } else { "Ball ready " },
                    Style::default().fg(Color::Green),
                ),
            ])),
            status,
        );

        let lines = self.render_field(field.width as usize, field.height as usize);
        frame.render_widget(Paragraph::new(lines), field);

        let footer = if self.game_over {
            ui::game_over_line("GAME OVER", self.score)
        } else if !self.launched {
            ui::key_hints(&[("Space", "Launch"), ("Z / ←", "Left flip"), ("M / →", "Right flip"), ("R", "Restart")])
        } else {
            ui::key_hints(&[("Z / ←", "Left flip"), ("M / →", "Right flip"), ("P", "Pause"), ("R", "Restart")])
        };
        frame.render_widget(Paragraph::new(footer), help);
    }

    fn reset(&mut self) {
        *self = Pinball::new();
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }
}
