use crossterm::event::KeyCode;

/// How long a press keeps an action held when the terminal cannot report
/// key releases. Key auto-repeat refreshes the window while a key is down.
pub const HOLD_WINDOW_FRAMES: u32 = 30;

/// Logical game inputs shared by every mini-game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Fire,
}

impl Action {
    fn index(self) -> usize {
        match self {
            Action::Left => 0,
            Action::Right => 1,
            Action::Up => 2,
            Action::Down => 3,
            Action::Fire => 4,
        }
    }

    /// Map a key to an action. Z and M double as the pinball flipper keys.
    pub fn from_key(code: KeyCode) -> Option<Action> {
        match code {
            KeyCode::Left => Some(Action::Left),
            KeyCode::Right => Some(Action::Right),
            KeyCode::Up => Some(Action::Up),
            KeyCode::Down => Some(Action::Down),
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'a' | 'z' => Some(Action::Left),
                'd' | 'm' => Some(Action::Right),
                'w' => Some(Action::Up),
                's' => Some(Action::Down),
                ' ' => Some(Action::Fire),
                _ => None,
            },
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldMode {
    /// The terminal reports key releases; an action stays held until then.
    UntilRelease,
    /// No release events; a press holds the action for this many frames.
    Window(u32),
}

/// Held-action flags consumed by the simulation step.
#[derive(Debug, Clone)]
pub struct Controls {
    held: [u32; 5],
    mode: HoldMode,
}

impl Controls {
    pub fn new(mode: HoldMode) -> Self {
        Self { held: [0; 5], mode }
    }

    pub fn press(&mut self, action: Action) {
        self.held[action.index()] = match self.mode {
            HoldMode::UntilRelease => u32::MAX,
            HoldMode::Window(frames) => frames.max(1),
        };
    }

    pub fn release(&mut self, action: Action) {
        self.held[action.index()] = 0;
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held[action.index()] > 0
    }

    /// -1 for left, 1 for right, 0 for neither or both.
    pub fn horizontal(&self) -> f32 {
        match (self.is_held(Action::Left), self.is_held(Action::Right)) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    /// -1 for up, 1 for down, 0 for neither or both.
    pub fn vertical(&self) -> f32 {
        match (self.is_held(Action::Up), self.is_held(Action::Down)) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    /// Age the hold windows by one frame.
    pub fn end_frame(&mut self) {
        if let HoldMode::Window(_) = self.mode {
            for h in &mut self.held {
                *h = h.saturating_sub(1);
            }
        }
    }

    pub fn clear(&mut self) {
        self.held = [0; 5];
    }
}
