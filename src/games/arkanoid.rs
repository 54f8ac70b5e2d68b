use std::time::Duration;

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::physics::{Aabb, Body};
use crate::games::ticker::FRAME_INTERVAL;
use crate::games::Game;
use crate::input::{Action, Controls};
use crate::ui;
use crate::ui::canvas::Canvas;

pub const BOARD_W: f32 = 300.0;
pub const BOARD_H: f32 = 240.0;

const BALL_RADIUS: f32 = 6.0;
const BALL_START: Body = Body::new(BOARD_W / 2.0, BOARD_H - 30.0, 2.0, -2.0);

const PADDLE_W: f32 = 75.0;
const PADDLE_H: f32 = 10.0;
const PADDLE_SPEED: f32 = 7.0;

const BRICK_ROWS: usize = 3;
const BRICK_COLS: usize = 5;
const BRICK_W: f32 = 50.0;
const BRICK_H: f32 = 15.0;
const BRICK_PADDING: f32 = 10.0;
const BRICK_OFFSET_TOP: f32 = 30.0;
const BRICK_OFFSET_LEFT: f32 = 30.0;
pub const BRICK_POINTS: u32 = 10;

const FIELD_BG: Color = Color::Rgb(10, 10, 20);

#[derive(Debug, Clone)]
struct Brick {
    bounds: Aabb,
    alive: bool,
    color: Color,
}

pub struct Arkanoid {
    ball: Body,
    paddle_x: f32,
    bricks: Vec<Brick>,
    score: u32,
    game_over: bool,
    cleared: bool,
}

impl Arkanoid {
    pub fn new() -> Self {
        Self {
            ball: BALL_START,
            paddle_x: (BOARD_W - PADDLE_W) / 2.0,
            bricks: Self::build_wall(),
            score: 0,
            game_over: false,
            cleared: false,
        }
    }

    fn build_wall() -> Vec<Brick> {
        let colors = [
            Color::Rgb(34, 197, 94),
            Color::Rgb(60, 210, 120),
            Color::Rgb(110, 225, 150),
        ];
        let mut bricks = Vec::with_capacity(BRICK_ROWS * BRICK_COLS);
        for col in 0..BRICK_COLS {
            for row in 0..BRICK_ROWS {
                bricks.push(Brick {
                    bounds: Aabb::new(
                        BRICK_OFFSET_LEFT + col as f32 * (BRICK_W + BRICK_PADDING),
                        BRICK_OFFSET_TOP + row as f32 * (BRICK_H + BRICK_PADDING),
                        BRICK_W,
                        BRICK_H,
                    ),
                    alive: true,
                    color: colors[row % colors.len()],
                });
            }
        }
        bricks
    }

    pub fn bricks_left(&self) -> usize {
        self.bricks.iter().filter(|b| b.alive).count()
    }

    #[cfg(test)]
    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    /// Point-in-rect of the ball centre against every active brick.
    fn hit_bricks(&mut self) {
        for brick in self.bricks.iter_mut().filter(|b| b.alive) {
            if brick.bounds.contains(self.ball.x, self.ball.y) {
                self.ball.vy = -self.ball.vy;
                brick.alive = false;
                self.score += BRICK_POINTS;
            }
        }
        if self.bricks.iter().all(|b| !b.alive) {
            self.cleared = true;
            self.game_over = true;
            log::info!("Arkanoid wall cleared, score {}", self.score);
        }
    }

    /// Walls, ceiling, then paddle or drain at the bottom.
    fn bounce(&mut self) {
        let ball = &mut self.ball;
        if ball.x + ball.vx > BOARD_W - BALL_RADIUS || ball.x + ball.vx < BALL_RADIUS {
            ball.vx = -ball.vx;
        }
        if ball.y + ball.vy < BALL_RADIUS {
            ball.vy = -ball.vy;
        } else if ball.y + ball.vy > BOARD_H - BALL_RADIUS {
            if ball.x > self.paddle_x && ball.x < self.paddle_x + PADDLE_W {
                ball.vy = -ball.vy;
            } else {
                self.game_over = true;
                log::info!("Arkanoid ball lost, score {}", self.score);
            }
        }
    }

    fn move_paddle(&mut self, direction: f32) {
        if direction > 0.0 && self.paddle_x < BOARD_W - PADDLE_W {
            self.paddle_x = (self.paddle_x + PADDLE_SPEED).min(BOARD_W - PADDLE_W);
        } else if direction < 0.0 && self.paddle_x > 0.0 {
            self.paddle_x = (self.paddle_x - PADDLE_SPEED).max(0.0);
        }
    }

    fn render_field(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let mut canvas = Canvas::new(width, height, BOARD_W, BOARD_H, FIELD_BG);

        for brick in self.bricks.iter().filter(|b| b.alive) {
            let b = brick.bounds;
            canvas.fill_rect(b.x, b.y, b.w, b.h, '█', brick.color);
        }

        canvas.fill_rect(self.paddle_x, BOARD_H - PADDLE_H, PADDLE_W, PADDLE_H, '▀', Color::Rgb(34, 197, 94));

        // Ball trail
        canvas.plot(
            self.ball.x - self.ball.vx * 4.0,
            self.ball.y - self.ball.vy * 4.0,
            '·',
            Color::Rgb(100, 100, 120),
        );
        canvas.disc(self.ball.x, self.ball.y, BALL_RADIUS, '●', Color::Rgb(120, 160, 255));

        canvas.into_lines()
    }
}

impl Default for Arkanoid {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Arkanoid {
    fn tick_interval(&self) -> Duration {
        FRAME_INTERVAL
    }

    fn step(&mut self, controls: &Controls) {
        if self.game_over {
            return;
        }
        self.hit_bricks();
        if self.game_over {
            return;
        }
        self.bounce();
        if self.game_over {
            return;
        }
        self.move_paddle(controls.horizontal());
        self.ball.advance();
    }

    fn press(&mut self, _action: Action) {}

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some([status, field, help]) = ui::game_layout(frame, area, " 🧱 Arkanoid ", Color::Rgb(220, 80, 80)) else {
            return;
        };

        let total = BRICK_ROWS * BRICK_COLS;
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!(" Score: {} ", self.score), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                ui::separator(),
                Span::styled(format!("Bricks: {}/{} ", self.bricks_left(), total), Style::default().fg(Color::Green)),
            ])),
            status,
        );

        let lines = self.render_field(field.width as usize, field.height as usize);
        frame.render_widget(Paragraph::new(lines), field);

        let footer = if self.cleared {
            ui::win_line("CLEARED!", self.score)
        } else if self.game_over {
            ui::game_over_line("GAME OVER", self.score)
        } else {
            ui::key_hints(&[("←→", "Move paddle"), ("P", "Pause"), ("R", "Restart"), ("Esc", "Vault")])
        };
        frame.render_widget(Paragraph::new(footer), help);
    }

    fn reset(&mut self) {
        *self = Arkanoid::new();
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::HoldMode;

    fn idle() -> Controls {
        Controls::new(HoldMode::UntilRelease)
    }

    /// Keep the paddle centred under the ball so it never drains.
    fn follow_ball(game: &mut Arkanoid) {
        game.paddle_x = (game.ball.x - PADDLE_W / 2.0).clamp(0.0, BOARD_W - PADDLE_W);
    }

    #[test]
    fn test_score_tracks_inactive_bricks() {
        let mut game = Arkanoid::new();
        let c = idle();
        let mut seen_dead = vec![false; game.bricks.len()];
        for _ in 0..20_000 {
            follow_ball(&mut game);
            game.step(&c);
            let dead = game.bricks.iter().filter(|b| !b.alive).count() as u32;
            assert_eq!(game.score(), BRICK_POINTS * dead);
            for (i, brick) in game.bricks.iter().enumerate() {
                // once inactive, never active again
                assert!(!(seen_dead[i] && brick.alive));
                seen_dead[i] |= !brick.alive;
            }
            if game.is_game_over() {
                break;
            }
        }
        assert!(game.score() > 0);
    }

    #[test]
    fn test_brick_hit_flips_vertical_velocity() {
        let mut game = Arkanoid::new();
        let target = game.bricks[0].bounds;
        game.ball = Body::new(target.x + 10.0, target.y + 5.0, 2.0, -2.0);
        game.step(&idle());
        assert!(!game.bricks[0].alive);
        assert_eq!(game.ball.vy, 2.0);
        assert_eq!(game.score(), BRICK_POINTS);
    }

    #[test]
    fn test_missing_the_paddle_ends_game() {
        let mut game = Arkanoid::new();
        game.paddle_x = 0.0;
        game.ball = Body::new(250.0, BOARD_H - BALL_RADIUS - 1.0, 0.0, 2.0);
        game.step(&idle());
        assert!(game.is_game_over());
        assert!(!game.is_cleared());

        let ball = game.ball;
        let mut c = idle();
        c.press(Action::Left);
        for _ in 0..10 {
            game.step(&c);
        }
        assert_eq!(game.ball, ball);
        assert_eq!(game.paddle_x, 0.0);
    }

    #[test]
    fn test_paddle_returns_ball() {
        let mut game = Arkanoid::new();
        game.paddle_x = 100.0;
        game.ball = Body::new(130.0, BOARD_H - BALL_RADIUS - 1.0, 0.0, 2.0);
        game.step(&idle());
        assert!(!game.is_game_over());
        assert_eq!(game.ball.vy, -2.0);
    }

    #[test]
    fn test_side_wall_reflects() {
        let mut game = Arkanoid::new();
        game.ball = Body::new(BOARD_W - BALL_RADIUS - 1.0, 150.0, 2.0, -2.0);
        game.step(&idle());
        assert_eq!(game.ball.vx, -2.0);
    }

    #[test]
    fn test_paddle_stays_on_board() {
        let mut game = Arkanoid::new();
        game.ball = Body::new(150.0, 150.0, 0.0, 0.0);
        let mut c = idle();
        c.press(Action::Right);
        for _ in 0..100 {
            game.step(&c);
        }
        assert_eq!(game.paddle_x, BOARD_W - PADDLE_W);
    }

    #[test]
    fn test_clearing_all_bricks_wins() {
        let mut game = Arkanoid::new();
        for brick in game.bricks.iter_mut().skip(1) {
            brick.alive = false;
        }
        let target = game.bricks[0].bounds;
        game.ball = Body::new(target.x + 10.0, target.y + 5.0, 0.0, -2.0);
        game.step(&idle());
        assert!(game.is_cleared());
        assert!(game.is_game_over());
    }
}
