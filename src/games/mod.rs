pub mod arkanoid;
pub mod maze;
pub mod physics;
pub mod pinball;
pub mod platformer;
pub mod pong;
pub mod session;
pub mod shooter;
pub mod snake;
pub mod tetris;
pub mod ticker;

use std::time::Duration;

use ratatui::prelude::*;

use crate::input::{Action, Controls};

/// Common capability interface of every mini-game.
///
/// `step` advances the simulation by exactly one tick and must leave the
/// state untouched once `is_game_over` is true. Held inputs are read from
/// `Controls` during the step; one-shot inputs arrive through `press`.
pub trait Game {
    /// Time between two steps.
    fn tick_interval(&self) -> Duration;
    fn step(&mut self, controls: &Controls);
    fn press(&mut self, action: Action);
    fn render(&self, frame: &mut Frame, area: Rect);
    /// Reinitialize in place, as if freshly mounted.
    fn reset(&mut self);
    fn score(&self) -> u32;
    fn is_game_over(&self) -> bool;
}

/// A cell on a grid board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Offset, wrapping around a `size`×`size` board.
    pub fn offset_wrapped(self, dx: i32, dy: i32, size: i32) -> Self {
        Self::new((self.x + dx).rem_euclid(size), (self.y + dy).rem_euclid(size))
    }
}

/// Unit step for a direction action, `None` for `Fire`.
pub fn direction_of(action: Action) -> Option<(i32, i32)> {
    match action {
        Action::Left => Some((-1, 0)),
        Action::Right => Some((1, 0)),
        Action::Up => Some((0, -1)),
        Action::Down => Some((0, 1)),
        Action::Fire => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_wrapped() {
        assert_eq!(GridPos::new(0, 7).offset_wrapped(-1, 0, 15), GridPos::new(14, 7));
        assert_eq!(GridPos::new(7, 14).offset_wrapped(0, 1, 15), GridPos::new(7, 0));
        assert_eq!(GridPos::new(3, 3).offset_wrapped(1, 0, 15), GridPos::new(4, 3));
    }
}
