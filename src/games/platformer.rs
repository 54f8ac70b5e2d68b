use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::physics::Aabb;
use crate::games::ticker::FRAME_INTERVAL;
use crate::games::Game;
use crate::input::{Action, Controls};
use crate::ui;
use crate::ui::canvas::Canvas;

pub const BOARD_W: f32 = 300.0;
pub const BOARD_H: f32 = 400.0;

const GRAVITY: f32 = 0.8;
const RUN_SPEED: f32 = 4.0;
const JUMP_VELOCITY: f32 = -14.0;
const PLAYER_W: f32 = 24.0;
const PLAYER_H: f32 = 32.0;
const PLAYER_START: (f32, f32) = (50.0, 200.0);

const COIN_COUNT: usize = 5;
const COIN_SIZE: f32 = 15.0;
const COIN_POINTS: u32 = 500;
const COIN_SPAWN_W: f32 = 250.0;
const COIN_SPAWN_H: f32 = 300.0;

const PLATFORMS: [Aabb; 4] = [
    Aabb::new(0.0, 350.0, 300.0, 50.0),
    Aabb::new(50.0, 280.0, 80.0, 15.0),
    Aabb::new(170.0, 220.0, 80.0, 15.0),
    Aabb::new(30.0, 160.0, 80.0, 15.0),
];

const SKY_BG: Color = Color::Rgb(51, 65, 85);

#[derive(Debug, Clone, Copy)]
struct Coin {
    bounds: Aabb,
    collected: bool,
}

pub struct Platformer {
    title: String,
    icon: String,
    x: f32,
    y: f32,
    vy: f32,
    grounded: bool,
    coins: Vec<Coin>,
    score: u32,
    game_over: bool,
    rng: StdRng,
}

impl Platformer {
    pub fn new(title: &str, icon: &str, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let coins = Self::scatter_coins(&mut rng);
        Self {
            title: title.to_string(),
            icon: icon.to_string(),
            x: PLAYER_START.0,
            y: PLAYER_START.1,
            vy: 0.0,
            grounded: false,
            coins,
            score: 0,
            game_over: false,
            rng,
        }
    }

    fn scatter_coins(rng: &mut StdRng) -> Vec<Coin> {
        (0..COIN_COUNT)
            .map(|_| Coin {
                bounds: Aabb::new(
                    rng.gen_range(0.0..COIN_SPAWN_W),
                    rng.gen_range(0.0..COIN_SPAWN_H),
                    COIN_SIZE,
                    COIN_SIZE,
                ),
                collected: false,
            })
            .collect()
    }

    fn hitbox(&self) -> Aabb {
        Aabb::new(self.x, self.y, PLAYER_W, PLAYER_H)
    }

    #[cfg(test)]
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn coins_left(&self) -> usize {
        self.coins.iter().filter(|c| !c.collected).count()
    }

    fn jump(&mut self) {
        if self.grounded {
            self.vy = JUMP_VELOCITY;
            self.grounded = false;
        }
    }

    /// Feet inside the platform top band this tick; only reachable from
    /// above because the band grows with downward velocity.
    fn land(&mut self) {
        self.grounded = false;
        for p in &PLATFORMS {
            let feet = self.y + PLAYER_H;
            let spans_x = self.x < p.right() && self.x + PLAYER_W > p.x;
            if spans_x && feet > p.y && feet < p.bottom() + self.vy {
                self.y = p.y - PLAYER_H;
                self.vy = 0.0;
                self.grounded = true;
            }
        }
    }

    fn collect_coins(&mut self) {
        let hitbox = self.hitbox();
        for coin in self.coins.iter_mut().filter(|c| !c.collected) {
            if hitbox.overlaps(&coin.bounds) {
                coin.collected = true;
                self.score += COIN_POINTS;
            }
        }
        if self.coins.iter().all(|c| c.collected) {
            self.coins = Self::scatter_coins(&mut self.rng);
        }
    }

    fn render_field(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let mut canvas = Canvas::new(width, height, BOARD_W, BOARD_H, SKY_BG);

        for p in &PLATFORMS {
            canvas.fill_rect(p.x, p.y, p.w, p.h, '▓', Color::Rgb(30, 41, 59));
        }
        for coin in self.coins.iter().filter(|c| !c.collected) {
            let b = coin.bounds;
            canvas.plot(b.x + b.w / 2.0, b.y + b.h / 2.0, '✦', Color::Rgb(250, 204, 21));
        }
        canvas.fill_rect(self.x, self.y, PLAYER_W, PLAYER_H, '█', Color::Rgb(34, 197, 94));
        canvas.text(self.x, self.y, &self.icon, Color::White);

        canvas.into_lines()
    }
}

impl Game for Platformer {
    fn tick_interval(&self) -> Duration {
        FRAME_INTERVAL
    }

    fn step(&mut self, controls: &Controls) {
        if self.game_over {
            return;
        }
        self.vy += GRAVITY;
        self.y += self.vy;
        self.x += controls.horizontal() * RUN_SPEED;

        self.land();
        self.collect_coins();

        if self.y > BOARD_H {
            self.game_over = true;
            log::info!("Platformer runner fell, score {}", self.score);
        }
    }

    fn press(&mut self, action: Action) {
        if self.game_over {
            return;
        }
        if matches!(action, Action::Up | Action::Fire) {
            self.jump();
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some([status, field, help]) = ui::game_layout(frame, area, " 🏃 Platformer ", Color::Rgb(250, 204, 21)) else {
            return;
        };

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!(" Points: {} ", self.score), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                ui::separator(),
                Span::styled(format!("{} - 16BIT ", self.title), Style::default().fg(Color::Gray)),
                ui::separator(),
                Span::styled(format!("Coins: {} ", self.coins_left()), Style::default().fg(Color::Rgb(250, 204, 21))),
            ])),
            status,
        );

        let lines = self.render_field(field.width as usize, field.height as usize);
        frame.render_widget(Paragraph::new(lines), field);

        let footer = if self.game_over {
            ui::game_over_line("FALLEN", self.score)
        } else {
            ui::key_hints(&[("←→", "Run"), ("↑ / Space", "Jump"), ("P", "Pause"), ("R", "Restart")])
        };
        frame.render_widget(Paragraph::new(footer), help);
    }

    fn reset(&mut self) {
        let seed = self.rng.gen();
        *self = Platformer::new(&self.title, &self.icon, seed);
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }
}
