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

const SHIP_W: f32 = 30.0;
const SHIP_H: f32 = 20.0;
const SHIP_SPEED: f32 = 5.0;

const BULLET_W: f32 = 4.0;
const BULLET_H: f32 = 10.0;
const BULLET_SPEED: f32 = 7.0;
const FIRE_EVERY: u64 = 15;

const ENEMY_SIZE: f32 = 20.0;
const SPAWN_EVERY: u64 = 60;
const KILL_POINTS: u32 = 100;

const SPACE_BG: Color = Color::Rgb(2, 6, 23);

#[derive(Debug, Clone, Copy)]
struct Enemy {
    bounds: Aabb,
    speed: f32,
}

pub struct Shooter {
    title: String,
    icon: String,
    ship: Aabb,
    bullets: Vec<Aabb>,
    enemies: Vec<Enemy>,
    frame: u64,
    score: u32,
    game_over: bool,
    rng: StdRng,
}

impl Shooter {
    pub fn new(title: &str, icon: &str, seed: u64) -> Self {
        Self {
            title: title.to_string(),
            icon: icon.to_string(),
            ship: Aabb::new(BOARD_W / 2.0 - SHIP_W / 2.0, BOARD_H - 40.0, SHIP_W, SHIP_H),
            bullets: Vec::new(),
            enemies: Vec::new(),
            frame: 0,
            score: 0,
            game_over: false,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[cfg(test)]
    pub fn bullets(&self) -> usize {
        self.bullets.len()
    }

    #[cfg(test)]
    pub fn enemies(&self) -> usize {
        self.enemies.len()
    }

    fn move_ship(&mut self, direction: f32) {
        if direction < 0.0 && self.ship.x > 0.0 {
            self.ship.x -= SHIP_SPEED;
        } else if direction > 0.0 && self.ship.x < BOARD_W - SHIP_W {
            self.ship.x += SHIP_SPEED;
        }
    }

    fn spawn_enemy(&mut self) {
        self.enemies.push(Enemy {
            bounds: Aabb::new(
                self.rng.gen_range(0.0..BOARD_W - ENEMY_SIZE),
                -ENEMY_SIZE,
                ENEMY_SIZE,
                ENEMY_SIZE,
            ),
            speed: self.rng.gen_range(1.0..3.0),
        });
    }

    /// Each bullet removes at most one enemy and vice versa.
    fn resolve_hits(&mut self) {
        let mut i = 0;
        while i < self.enemies.len() {
            let enemy = self.enemies[i].bounds;
            if let Some(b) = self.bullets.iter().position(|b| b.overlaps(&enemy)) {
                self.bullets.remove(b);
                self.enemies.remove(i);
                self.score += KILL_POINTS;
            } else {
                i += 1;
            }
        }
    }

    fn render_field(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let mut canvas = Canvas::new(width, height, BOARD_W, BOARD_H, SPACE_BG);

        for b in &self.bullets {
            canvas.fill_rect(b.x, b.y, b.w, b.h, '│', Color::Rgb(245, 158, 11));
        }
        for e in &self.enemies {
            let b = e.bounds;
            canvas.text(b.x, b.y + b.h / 2.0, &self.icon, Color::Rgb(239, 68, 68));
        }
        let s = self.ship;
        canvas.fill_rect(s.x, s.y, s.w, s.h, '▄', Color::Rgb(34, 197, 94));
        canvas.fill_rect(s.x + 10.0, s.y - 5.0, 10.0, 5.0, '▲', Color::White);

        canvas.into_lines()
    }
}

impl Game for Shooter {
    fn tick_interval(&self) -> Duration {
        FRAME_INTERVAL
    }

    fn step(&mut self, controls: &Controls) {
        if self.game_over {
            return;
        }
        self.move_ship(controls.horizontal());

        if self.frame % FIRE_EVERY == 0 {
            self.bullets.push(Aabb::new(self.ship.x + 13.0, self.ship.y, BULLET_W, BULLET_H));
        }
        for b in &mut self.bullets {
            b.y -= BULLET_SPEED;
        }
        self.bullets.retain(|b| b.y >= 0.0);

        if self.frame % SPAWN_EVERY == 0 {
            self.spawn_enemy();
        }
        for e in &mut self.enemies {
            e.bounds.y += e.speed;
        }

        self.resolve_hits();

        if self.enemies.iter().any(|e| e.bounds.overlaps(&self.ship)) {
            self.game_over = true;
            log::info!("Shooter ship destroyed, score {}", self.score);
            return;
        }
        self.enemies.retain(|e| e.bounds.y <= BOARD_H);

        self.frame += 1;
    }

    fn press(&mut self, _action: Action) {}

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some([status, field, help]) = ui::game_layout(frame, area, " 🚀 Shooter ", Color::Rgb(59, 130, 246)) else {
            return;
        };

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!(" Score: {} ", self.score), Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                ui::separator(),
                Span::styled(format!("{} ", self.title), Style::default().fg(Color::White)),
            ])),
            status,
        );

        let lines = self.render_field(field.width as usize, field.height as usize);
        frame.render_widget(Paragraph::new(lines), field);

        let footer = if self.game_over {
            ui::game_over_line("GAME OVER", self.score)
        } else {
            ui::key_hints(&[("←→", "Move"), ("P", "Pause"), ("R", "Restart"), ("Esc", "Vault")])
        };
        frame.render_widget(Paragraph::new(footer), help);
    }

    fn reset(&mut self) {
        let seed = self.rng.gen();
        *self = Shooter::new(&self.title, &self.icon, seed);
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }
}
