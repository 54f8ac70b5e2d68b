use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::layout::Rect;

use crate::catalog::{GameMetadata, LATEST_GAMES_2025, RETRO_GAMES};
use crate::event::Event;
use crate::games::session::Session;
use crate::input::HoldMode;
use crate::trivia::{TriviaDesk, TriviaReply, TriviaState};
use crate::ui;

/// Tiles per row in the library grid.
pub const LIBRARY_COLUMNS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Library,
    Game,
    History,
    Gallery,
}

impl View {
    /// Views that get a tab in the header.
    pub fn tabs() -> &'static [View] {
        &[View::Library, View::Gallery]
    }

    pub fn title(&self) -> &str {
        match self {
            View::Library => " Library ",
            View::Game => " Playing ",
            View::History => " History ",
            View::Gallery => " 2025 New ",
        }
    }

    /// Header tab to highlight. Playing and reading history live under the
    /// library tab.
    pub fn tab_index(&self) -> usize {
        match self {
            View::Library | View::Game | View::History => 0,
            View::Gallery => 1,
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub view: View,
    /// Index into the catalog.
    pub selected: usize,
    pub gallery_selected: usize,
    pub history_game: Option<GameMetadata>,
    pub history_scroll: u16,
    pub session: Option<Session>,
    pub trivia: TriviaDesk,
    events: mpsc::Sender<Event>,
    hold: HoldMode,
    rng: StdRng,
    last_frame: Option<Instant>,
    /// Last drawn screen size.
    screen: Rect,
}

impl App {
    pub fn new(trivia: TriviaDesk, events: mpsc::Sender<Event>, hold: HoldMode, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            should_quit: false,
            view: View::Library,
            selected: 0,
            gallery_selected: 0,
            history_game: None,
            history_scroll: 0,
            session: None,
            trivia,
            events,
            hold,
            rng,
            last_frame: None,
            screen: Rect::default(),
        }
    }

    pub fn selected_game(&self) -> &GameMetadata {
        &RETRO_GAMES[self.selected]
    }

    /// Frame tick from the event loop: feed wall-clock time to the session.
    pub fn on_tick(&mut self) {
        let now = Instant::now();
        let elapsed = self.last_frame.map(|t| now - t).unwrap_or_default();
        self.last_frame = Some(now);
        self.advance(elapsed);
    }

    pub fn advance(&mut self, elapsed: Duration) {
        if self.view != View::Game {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.advance(elapsed);
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Global keys
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Char('g') | KeyCode::Char('G') => {
                self.toggle_gallery();
                return;
            }
            KeyCode::Esc => {
                if self.view != View::Library {
                    self.back_to_library();
                }
                return;
            }
            _ => {}
        }

        match self.view {
            View::Library => self.on_library_key(key),
            View::Game => {
                if let Some(session) = self.session.as_mut() {
                    session.on_key(key);
                }
            }
            View::History => self.on_history_key(key),
            View::Gallery => self.on_gallery_key(key),
        }
    }

    /// Record the screen size before a draw and keep the history scroll
    /// within the text at that size.
    pub fn on_resize(&mut self, screen: Rect) {
        self.screen = screen;
        self.history_scroll = self.history_scroll.min(self.history_max_scroll());
    }

    pub fn on_key_release(&mut self, key: KeyEvent) {
        if let Some(session) = self.session.as_mut() {
            session.on_release(key);
        }
    }

    pub fn on_trivia(&mut self, reply: TriviaReply) {
        if self.trivia.apply(reply) {
            self.history_scroll = 0;
        }
    }

    fn on_library_key(&mut self, key: KeyEvent) {
        let count = RETRO_GAMES.len();
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Right => self.selected = (self.selected + 1) % count,
            KeyCode::Left => self.selected = (self.selected + count - 1) % count,
            KeyCode::Down => {
                if self.selected + LIBRARY_COLUMNS < count {
                    self.selected += LIBRARY_COLUMNS;
                }
            }
            KeyCode::Up => {
                if self.selected >= LIBRARY_COLUMNS {
                    self.selected -= LIBRARY_COLUMNS;
                }
            }
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = count - 1,
            KeyCode::Enter | KeyCode::Char(' ') => self.play(),
            KeyCode::Char('h') | KeyCode::Char('H') => self.show_history(),
            _ => {}
        }
    }

    fn on_history_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.scroll_history(-1),
            KeyCode::Down => self.scroll_history(1),
            KeyCode::PageUp => self.scroll_history(-10),
            KeyCode::PageDown => self.scroll_history(10),
            KeyCode::Char('r') | KeyCode::Char('R') if !self.trivia.is_loading() => {
                if let Some(game) = self.history_game {
                    self.request_history(&game);
                }
            }
            KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Enter => self.play(),
            _ => {}
        }
    }

    fn history_max_scroll(&self) -> u16 {
        match self.trivia.state() {
            TriviaState::Ready { text, .. } => ui::history::max_scroll(ui::content_area(self.screen), text),
            _ => 0,
        }
    }

    fn scroll_history(&mut self, lines: i32) {
        let target = (i32::from(self.history_scroll) + lines).max(0);
        let target = u16::try_from(target).unwrap_or(u16::MAX);
        self.history_scroll = target.min(self.history_max_scroll());
    }

    fn on_gallery_key(&mut self, key: KeyEvent) {
        let count = LATEST_GAMES_2025.len();
        match key.code {
            KeyCode::Right | KeyCode::Down => self.gallery_selected = (self.gallery_selected + 1) % count,
            KeyCode::Left | KeyCode::Up => self.gallery_selected = (self.gallery_selected + count - 1) % count,
            KeyCode::Char('q') | KeyCode::Char('Q') => self.back_to_library(),
            _ => {}
        }
    }

    /// Mount a fresh session for the selected title.
    pub fn play(&mut self) {
        let meta = *self.selected_game();
        // Drop the old session before mounting so its unmount is logged first.
        self.session = None;
        self.session = Some(Session::mount(meta, self.rng.gen(), self.hold));
        self.last_frame = None;
        self.view = View::Game;
    }

    pub fn show_history(&mut self) {
        let game = *self.selected_game();
        self.history_game = Some(game);
        self.history_scroll = 0;
        self.view = View::History;
        self.request_history(&game);
    }

    fn request_history(&mut self, game: &GameMetadata) {
        let tx = self.events.clone();
        self.trivia.request(game.title, move |reply| {
            // The UI may have quit; nothing to deliver to then.
            let _ = tx.send(Event::Trivia(reply));
        });
    }

    fn back_to_library(&mut self) {
        self.session = None;
        self.view = View::Library;
    }

    fn toggle_gallery(&mut self) {
        if self.view == View::Gallery {
            self.view = View::Library;
        } else {
            self.session = None;
            self.view = View::Gallery;
        }
    }
}
