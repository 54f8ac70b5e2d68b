mod app;
mod catalog;
mod config;
mod event;
mod games;
mod input;
mod logging;
mod trivia;
mod ui;

use std::io;
use std::sync::Arc;

use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use app::App;
use config::Config;
use event::{Event, EventHandler};
use input::{HoldMode, HOLD_WINDOW_FRAMES};
use trivia::{GeminiClient, TriviaDesk};

fn main() -> io::Result<()> {
    logging::init();
    let config = Config::load();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Key releases make held controls exact; otherwise emulate them.
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    let hold = if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
        HoldMode::UntilRelease
    } else {
        HoldMode::Window(HOLD_WINDOW_FRAMES)
    };
    log::info!("Keyboard release events: {}", if enhanced { "on" } else { "emulated" });

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Create app and event handler
    let event_handler = EventHandler::new(config.frame_interval());
    let trivia = TriviaDesk::new(Arc::new(GeminiClient::new(&config)), &config.model);
    let mut app = App::new(trivia, event_handler.sender(), hold, config.seed);

    let result = run(&mut terminal, &mut app, &event_handler);

    // Restore terminal
    if enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        log::error!("Exiting on terminal error: {}", e);
    }
    log::info!("RetroVault closed");
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| {
            app.on_resize(frame.area());
            ui::render(frame, app);
        })?;

        match events.next()? {
            Event::Tick => app.on_tick(),
            Event::Key(key) => app.on_key(key),
            Event::KeyUp(key) => app.on_key_release(key),
            Event::Trivia(reply) => app.on_trivia(reply),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
