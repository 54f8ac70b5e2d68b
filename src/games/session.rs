use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::catalog::{GameKind, GameMetadata};
use crate::games::arkanoid::Arkanoid;
use crate::games::maze::Maze;
use crate::games::pinball::Pinball;
use crate::games::platformer::Platformer;
use crate::games::pong::Pong;
use crate::games::shooter::Shooter;
use crate::games::snake::Snake;
use crate::games::tetris::Tetris;
use crate::games::ticker::Ticker;
use crate::games::Game;
use crate::input::{Action, Controls, HoldMode};
use crate::ui;

/// One mounted game, tagged by engine.
pub enum Cabinet {
    Tetris(Tetris),
    Snake(Snake),
    Arkanoid(Arkanoid),
    Pinball(Pinball),
    Pong(Pong),
    Maze(Maze),
    Platformer(Platformer),
    Shooter(Shooter),
}

impl Cabinet {
    pub fn build(kind: GameKind, meta: &GameMetadata, seed: u64) -> Self {
        match kind {
            GameKind::Tetris => Cabinet::Tetris(Tetris::new(seed)),
            GameKind::Snake => Cabinet::Snake(Snake::new(seed)),
            GameKind::Arkanoid => Cabinet::Arkanoid(Arkanoid::new()),
            GameKind::Pinball => Cabinet::Pinball(Pinball::new()),
            GameKind::Pong => {
                let title = if meta.title == "Pong" { "PONG" } else { meta.title };
                Cabinet::Pong(Pong::new(title))
            }
            GameKind::Maze => Cabinet::Maze(Maze::new(meta.title, meta.icon, seed)),
            GameKind::Platformer => Cabinet::Platformer(Platformer::new(meta.title, meta.icon, seed)),
            GameKind::Shooter => Cabinet::Shooter(Shooter::new(meta.title, meta.icon, seed)),
        }
    }

    pub fn kind(&self) -> GameKind {
        match self {
            Cabinet::Tetris(_) => GameKind::Tetris,
            Cabinet::Snake(_) => GameKind::Snake,
            Cabinet::Arkanoid(_) => GameKind::Arkanoid,
            Cabinet::Pinball(_) => GameKind::Pinball,
            Cabinet::Pong(_) => GameKind::Pong,
            Cabinet::Maze(_) => GameKind::Maze,
            Cabinet::Platformer(_) => GameKind::Platformer,
            Cabinet::Shooter(_) => GameKind::Shooter,
        }
    }

    pub fn game(&self) -> &dyn Game {
        match self {
            Cabinet::Tetris(g) => g,
            Cabinet::Snake(g) => g,
            Cabinet::Arkanoid(g) => g,
            Cabinet::Pinball(g) => g,
            Cabinet::Pong(g) => g,
            Cabinet::Maze(g) => g,
            Cabinet::Platformer(g) => g,
            Cabinet::Shooter(g) => g,
        }
    }

    pub fn game_mut(&mut self) -> &mut dyn Game {
        match self {
            Cabinet::Tetris(g) => g,
            Cabinet::Snake(g) => g,
            Cabinet::Arkanoid(g) => g,
            Cabinet::Pinball(g) => g,
            Cabinet::Pong(g) => g,
            Cabinet::Maze(g) => g,
            Cabinet::Platformer(g) => g,
            Cabinet::Shooter(g) => g,
        }
    }
}

/// A running game plus the ticker, held inputs and pause flag that drive it.
///
/// Dropping the session unmounts the game; nothing it owns outlives it.
pub struct Session {
    meta: GameMetadata,
    cabinet: Cabinet,
    ticker: Ticker,
    controls: Controls,
    paused: bool,
    reported_over: bool,
}

impl Session {
    pub fn mount(meta: GameMetadata, seed: u64, hold: HoldMode) -> Self {
        let kind = meta.kind();
        let cabinet = Cabinet::build(kind, &meta, seed);
        let ticker = Ticker::new(cabinet.game().tick_interval());
        log::info!("Mounted {} ({}) on the {} engine", meta.title, meta.id, kind.label());
        Self {
            meta,
            cabinet,
            ticker,
            controls: Controls::new(hold),
            paused: false,
            reported_over: false,
        }
    }

    pub fn meta(&self) -> &GameMetadata {
        &self.meta
    }

    pub fn kind(&self) -> GameKind {
        self.cabinet.kind()
    }

    pub fn score(&self) -> u32 {
        self.cabinet.game().score()
    }

    pub fn is_game_over(&self) -> bool {
        self.cabinet.game().is_game_over()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Run the steps due for `elapsed` wall-clock time, then age the held
    /// inputs by one frame. Returns the number of steps run.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.paused || self.is_game_over() {
            return 0;
        }
        let steps = self.ticker.advance(elapsed);
        let game = self.cabinet.game_mut();
        for _ in 0..steps {
            game.step(&self.controls);
            if game.is_game_over() {
                break;
            }
        }
        self.controls.end_frame();

        if self.is_game_over() && !self.reported_over {
            self.reported_over = true;
            log::info!("{} over with score {}", self.meta.title, self.score());
        }
        steps
    }

    /// Handle a key press. Returns false for keys the session does not use.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('p') | KeyCode::Char('P') => {
                if !self.is_game_over() {
                    self.paused = !self.paused;
                    self.ticker.reset();
                }
                true
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.reset();
                true
            }
            KeyCode::Enter if self.is_game_over() => {
                self.reset();
                true
            }
            code => match Action::from_key(code) {
                Some(action) => {
                    if !self.paused {
                        self.controls.press(action);
                        let game = self.cabinet.game_mut();
                        game.press(action);
                    }
                    true
                }
                None => false,
            },
        }
    }

    pub fn on_release(&mut self, key: KeyEvent) {
        if let Some(action) = Action::from_key(key.code) {
            self.controls.release(action);
        }
    }

    pub fn reset(&mut self) {
        self.cabinet.game_mut().reset();
        self.ticker.reset();
        self.controls.clear();
        self.paused = false;
        self.reported_over = false;
        log::info!("Reset {}", self.meta.title);
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        self.cabinet.game().render(frame, area);

        if self.is_paused() {
            let popup = ui::centered(area, 24, 5);
            frame.render_widget(Clear, popup);
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from(Span::styled(
                        "PAUSED",
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled("P to resume", Style::default().fg(Color::Gray))),
                ])
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(Color::Yellow)),
                ),
                popup,
            );
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        log::info!("Unmounted {} with score {}", self.meta.title, self.score());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RETRO_GAMES;
    use crate::games::ticker::FRAME_INTERVAL;
    use crate::input::HOLD_WINDOW_FRAMES;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};
    use ratatui::backend::TestBackend;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mount(title: &str) -> Session {
        let meta = *RETRO_GAMES.iter().find(|g| g.title == title).unwrap();
        Session::mount(meta, 42, HoldMode::UntilRelease)
    }

    #[test]
    fn test_mount_picks_engine() {
        assert_eq!(mount("Tetris").kind(), GameKind::Tetris);
        assert_eq!(mount("Galaga").kind(), GameKind::Shooter);
        assert_eq!(mount("Tapper").kind(), GameKind::Pong);
    }

    #[test]
    fn test_steps_follow_the_game_interval() {
        let mut s = mount("Snake");
        assert_eq!(s.advance(Duration::from_millis(150)), 0);
        assert_eq!(s.advance(Duration::from_millis(100)), 1);
    }

    #[test]
    fn test_pause_stops_stepping() {
        let mut s = mount("Snake");
        assert!(s.on_key(press(KeyCode::Char('p'))));
        assert!(s.is_paused());
        assert_eq!(s.advance(Duration::from_secs(1)), 0);
        s.on_key(press(KeyCode::Char('p')));
        assert_eq!(s.advance(Duration::from_millis(200)), 1);
    }

    #[test]
    fn test_game_over_stops_stepping_and_enter_resets() {
        // Untouched pieces pile up in the spawn columns until one cannot spawn.
        let mut s = mount("Tetris");
        let mut drops = 0;
        while !s.is_game_over() && drops < 10_000 {
            s.advance(Duration::from_millis(800));
            drops += 1;
        }
        assert!(s.is_game_over());
        assert_eq!(s.advance(Duration::from_secs(1)), 0);

        // P is ignored once the latch is set
        s.on_key(press(KeyCode::Char('p')));
        assert!(!s.is_paused());

        assert!(s.on_key(press(KeyCode::Enter)));
        assert!(!s.is_game_over());
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn test_unused_keys_are_not_consumed() {
        let mut s = mount("Pong");
        assert!(!s.on_key(press(KeyCode::Char('x'))));
        // Enter only resets after game over
        assert!(!s.on_key(press(KeyCode::Enter)));
        assert!(s.on_key(press(KeyCode::Up)));
    }

    #[test]
    fn test_reset_clears_held_input() {
        let mut s = mount("Breakout");
        s.on_key(press(KeyCode::Right));
        assert!(s.controls.is_held(Action::Right));
        s.on_key(press(KeyCode::Char('r')));
        assert!(!s.controls.is_held(Action::Right));
    }

    fn draw(session: &Session, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                session.render(frame, area);
            })
            .unwrap();
        terminal.backend().buffer().clone()
    }

    #[test]
    fn test_every_engine_renders_at_any_size() {
        for kind in GameKind::all() {
            let meta = *RETRO_GAMES.iter().find(|g| g.kind() == *kind).unwrap();
            let mut s = Session::mount(meta, 7, HoldMode::Window(HOLD_WINDOW_FRAMES));
            for frame in 0..600 {
                match frame % 40 {
                    0 => s.on_key(press(KeyCode::Right)),
                    10 => s.on_key(press(KeyCode::Char(' '))),
                    20 => s.on_key(press(KeyCode::Left)),
                    30 => s.on_key(press(KeyCode::Up)),
                    _ => false,
                };
                s.advance(FRAME_INTERVAL);
            }

            let empty = draw(&s, 0, 0);
            assert_eq!(empty, Buffer::empty(Rect::new(0, 0, 0, 0)), "{:?}", kind);
            draw(&s, 11, 5);
            let full = draw(&s, 80, 24);
            assert_ne!(full, Buffer::empty(Rect::new(0, 0, 80, 24)), "{:?} drew nothing", kind);

            s.on_key(press(KeyCode::Char('p')));
            draw(&s, 80, 24);
        }
    }

    #[test]
    fn test_zero_area_draws_nothing() {
        let s = mount("Pinball");
        let mut terminal = Terminal::new(TestBackend::new(10, 4)).unwrap();
        terminal
            .draw(|frame| s.render(frame, Rect::new(0, 0, 0, 0)))
            .unwrap();
        assert_eq!(terminal.backend().buffer(), &Buffer::empty(Rect::new(0, 0, 10, 4)));
    }
}
