use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, KeyEvent, KeyEventKind};

use crate::trivia::TriviaReply;

pub enum Event {
    Key(KeyEvent),
    KeyUp(KeyEvent),
    Tick,
    Trivia(TriviaReply),
}

/// Merges terminal input, frame ticks and background results into one
/// channel read by the UI thread.
pub struct EventHandler {
    tx: mpsc::Sender<Event>,
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new(frame: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let pump = tx.clone();

        thread::spawn(move || {
            let mut next_tick = Instant::now() + frame;
            loop {
                let timeout = next_tick.saturating_duration_since(Instant::now());
                if event::poll(timeout).unwrap_or(false) {
                    if let Ok(event::Event::Key(key)) = event::read() {
                        let sent = match key.kind {
                            KeyEventKind::Press | KeyEventKind::Repeat => pump.send(Event::Key(key)),
                            KeyEventKind::Release => pump.send(Event::KeyUp(key)),
                        };
                        if sent.is_err() {
                            return;
                        }
                    }
                }
                if Instant::now() >= next_tick {
                    if pump.send(Event::Tick).is_err() {
                        return;
                    }
                    next_tick += frame;
                    // Fell behind: skip the missed ticks instead of bursting.
                    let now = Instant::now();
                    if next_tick < now {
                        next_tick = now + frame;
                    }
                }
            }
        });

        Self { tx, rx }
    }

    /// Handle for background work that reports back to the UI thread.
    pub fn sender(&self) -> mpsc::Sender<Event> {
        self.tx.clone()
    }

    pub fn next(&self) -> io::Result<Event> {
        self.rx
            .recv()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}
