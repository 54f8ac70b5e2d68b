use std::time::Duration;

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::physics::Body;
use crate::games::ticker::FRAME_INTERVAL;
use crate::games::Game;
use crate::input::{Action, Controls};
use crate::ui;
use crate::ui::canvas::Canvas;

pub const BOARD_W: f32 = 300.0;
pub const BOARD_H: f32 = 200.0;

const BALL_RADIUS: f32 = 6.0;
const SERVE_TO_PLAYER: Body = Body::new(150.0, 100.0, 3.0, 2.0);
const SERVE_TO_CPU: Body = Body::new(150.0, 100.0, -3.0, 2.0);

const PADDLE_W: f32 = 10.0;
const PADDLE_H: f32 = 50.0;
const PLAYER_X: f32 = 10.0;
const CPU_X: f32 = BOARD_W - 20.0;
const PADDLE_START_Y: f32 = 150.0;
const PLAYER_SPEED: f32 = 5.0;
const CPU_SPEED: f32 = 2.5;
const SPEED_UP: f32 = 0.2;
const SPIN: f32 = 0.1;

pub const WINNING_SCORE: u32 = 7;

const COURT_BG: Color = Color::Rgb(15, 23, 42);

pub struct Pong {
    title: String,
    ball: Body,
    player_y: f32,
    cpu_y: f32,
    player_score: u32,
    cpu_score: u32,
    game_over: bool,
}

impl Pong {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ball: SERVE_TO_PLAYER,
            player_y: PADDLE_START_Y,
            cpu_y: PADDLE_START_Y,
            player_score: 0,
            cpu_score: 0,
            game_over: false,
        }
    }

    #[cfg(test)]
    pub fn cpu_score(&self) -> u32 {
        self.cpu_score
    }

    pub fn player_won(&self) -> bool {
        self.player_score >= WINNING_SCORE
    }

    fn move_player(&mut self, direction: f32) {
        self.player_y = (self.player_y + direction * PLAYER_SPEED).clamp(0.0, BOARD_H - PADDLE_H);
    }

    fn hit_paddles(&mut self) {
        let ball = &mut self.ball;
        if ball.x < PLAYER_X + PADDLE_W && ball.y > self.player_y && ball.y < self.player_y + PADDLE_H {
            ball.vx = ball.vx.abs() + SPEED_UP;
            ball.vy += (ball.y - (self.player_y + PADDLE_H / 2.0)) * SPIN;
        }
        if ball.x > CPU_X && ball.y > self.cpu_y && ball.y < self.cpu_y + PADDLE_H {
            ball.vx = -ball.vx.abs() - SPEED_UP;
        }
    }

    fn track_ball(&mut self) {
        if self.cpu_y + PADDLE_H / 2.0 < self.ball.y {
            self.cpu_y += CPU_SPEED;
        } else {
            self.cpu_y -= CPU_SPEED;
        }
        self.cpu_y = self.cpu_y.clamp(0.0, BOARD_H - PADDLE_H);
    }

    fn check_point(&mut self) {
        if self.ball.x < 0.0 {
            self.cpu_score += 1;
            self.ball = SERVE_TO_PLAYER;
        } else if self.ball.x > BOARD_W {
            self.player_score += 1;
            self.ball = SERVE_TO_CPU;
        } else {
            return;
        }
        log::debug!("Pong point, {} - {}", self.player_score, self.cpu_score);

        if self.player_score >= WINNING_SCORE || self.cpu_score >= WINNING_SCORE {
            self.game_over = true;
            log::info!("Pong match over, {} - {}", self.player_score, self.cpu_score);
        }
    }

    fn render_field(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let mut canvas = Canvas::new(width, height, BOARD_W, BOARD_H, COURT_BG);

        // Dashed centre line
        let mut y = 0.0;
        while y < BOARD_H {
            canvas.plot(BOARD_W / 2.0, y, '╎', Color::Rgb(90, 90, 110));
            y += 10.0;
        }

        let white = Color::Rgb(240, 240, 240);
        canvas.fill_rect(PLAYER_X, self.player_y, PADDLE_W, PADDLE_H, '█', white);
        canvas.fill_rect(CPU_X, self.cpu_y, PADDLE_W, PADDLE_H, '█', white);
        canvas.disc(self.ball.x, self.ball.y, BALL_RADIUS, '●', white);

        canvas.into_lines()
    }
}

impl Game for Pong {
    fn tick_interval(&self) -> Duration {
        FRAME_INTERVAL
    }

    fn step(&mut self, controls: &Controls) {
        if self.game_over {
            return;
        }
        self.move_player(controls.vertical());

        self.ball.advance();
        if self.ball.y < BALL_RADIUS || self.ball.y > BOARD_H - BALL_RADIUS {
            self.ball.vy = -self.ball.vy;
        }
        self.hit_paddles();
        self.track_ball();
        self.check_point();
    }

    fn press(&mut self, _action: Action) {}

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some([status, field, help]) = ui::game_layout(frame, area, " 🏓 Pong ", Color::Rgb(148, 163, 184)) else {
            return;
        };

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!(" You {} ", self.player_score), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                ui::separator(),
                Span::styled(format!("{} ", self.title), Style::default().fg(Color::DarkGray)),
                ui::separator(),
                Span::styled(format!("CPU {} ", self.cpu_score), Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            ])),
            status,
        );

        let lines = self.render_field(field.width as usize, field.height as usize);
        frame.render_widget(Paragraph::new(lines), field);

        let footer = if self.game_over && self.player_won() {
            ui::win_line("YOU WIN!", self.player_score)
        } else if self.game_over {
            ui::game_over_line("GAME OVER", self.player_score)
        } else {
            ui::key_hints(&[("↑↓", "Move paddle"), ("P", "Pause"), ("R", "Restart"), ("Esc", "Vault")])
        };
        frame.render_widget(Paragraph::new(footer), help);
    }

    fn reset(&mut self) {
        *self = Pong::new(&self.title);
    }

    fn score(&self) -> u32 {
        self.player_score
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

    #[test]
    fn test_top_wall_reflects() {
        let mut game = Pong::new("Pong");
        game.ball = Body::new(150.0, BALL_RADIUS + 1.0, 3.0, -2.0);
        game.step(&idle());
        assert_eq!(game.ball.vy, 2.0);
    }

    #[test]
    fn test_cpu_chases_ball() {
        let mut game = Pong::new("Pong");
        game.ball = Body::new(150.0, 20.0, 0.0, 0.0);
        game.step(&idle());
        assert_eq!(game.cpu_y, PADDLE_START_Y - CPU_SPEED);
        game.ball = Body::new(150.0, 195.0, 0.0, 0.0);
        game.cpu_y = 50.0;
        game.step(&idle());
        assert_eq!(game.cpu_y, 50.0 + CPU_SPEED);
    }

    #[test]
    fn test_player_hit_speeds_up_and_spins() {
        let mut game = Pong::new("Pong");
        game.player_y = 80.0;
        // lands 10 px below the paddle centre
        game.ball = Body::new(PLAYER_X + PADDLE_W + 2.0, 115.0 - 2.0, -3.0, 2.0);
        game.step(&idle());
        assert!((game.ball.vx - 3.2).abs() < 1e-5);
        assert!((game.ball.vy - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_cpu_hit_sends_ball_back() {
        let mut game = Pong::new("Pong");
        game.cpu_y = 75.0;
        game.ball = Body::new(CPU_X - 1.0, 100.0, 3.0, 0.0);
        game.step(&idle());
        assert!((game.ball.vx + 3.2).abs() < 1e-5);
    }

    #[test]
    fn test_points_respawn_toward_the_scorer() {
        let mut game = Pong::new("Pong");
        game.player_y = 0.0;
        game.ball = Body::new(1.0, 180.0, -3.0, 0.0);
        game.step(&idle());
        assert_eq!(game.cpu_score(), 1);
        assert_eq!(game.ball, SERVE_TO_PLAYER);

        game.cpu_y = 0.0;
        game.ball = Body::new(BOARD_W - 1.0, 180.0, 3.0, 0.0);
        game.step(&idle());
        assert_eq!(game.score(), 1);
        assert_eq!(game.ball, SERVE_TO_CPU);
    }

    #[test]
    fn test_held_key_moves_paddle_within_court() {
        let mut game = Pong::new("Pong");
        let mut c = idle();
        c.press(Action::Up);
        game.step(&c);
        assert_eq!(game.player_y, PADDLE_START_Y - PLAYER_SPEED);
        for _ in 0..100 {
            game.step(&c);
        }
        assert_eq!(game.player_y, 0.0);
    }

    #[test]
    fn test_match_ends_at_winning_score() {
        let mut game = Pong::new("Pong");
        game.player_score = WINNING_SCORE - 1;
        game.cpu_y = 0.0;
        game.ball = Body::new(BOARD_W - 1.0, 180.0, 3.0, 0.0);
        game.step(&idle());
        assert!(game.is_game_over());
        assert!(game.player_won());

        let ball = game.ball;
        game.step(&idle());
        assert_eq!(game.ball, ball);
        assert_eq!(game.score(), WINNING_SCORE);
    }
}
