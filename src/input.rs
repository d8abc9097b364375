use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns the `(dx, dy)` cell offset of one step; rows grow downwards.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// High-level input events consumed by the session driver.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    Quit,
    Confirm,
}

/// Returns whether a direction change is legal (no immediate 180° turns).
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    next != current.opposite()
}

/// Edge-triggered latch allowing one input-driven change per key press.
///
/// The first press engages the latch; further presses are refused until
/// [`TurnLatch::release`] is called for the key-up.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct TurnLatch {
    held: bool,
}

impl TurnLatch {
    /// Engages the latch. Returns `false` when a press is already latched.
    pub fn engage(&mut self) -> bool {
        if self.held {
            return false;
        }
        self.held = true;
        true
    }

    /// Re-arms the latch.
    pub fn release(&mut self) {
        self.held = false;
    }

    #[must_use]
    pub fn is_held(self) -> bool {
        self.held
    }
}

/// Maps a terminal key event to a game input. Unmapped keys yield `None`.
#[must_use]
pub fn map_key_event(key: KeyEvent) -> Option<GameInput> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(GameInput::Quit);
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W') => Some(GameInput::Direction(Direction::Up)),
        KeyCode::Down | KeyCode::Char('s' | 'S') => Some(GameInput::Direction(Direction::Down)),
        KeyCode::Left | KeyCode::Char('a' | 'A') => Some(GameInput::Direction(Direction::Left)),
        KeyCode::Right | KeyCode::Char('d' | 'D') => {
            Some(GameInput::Direction(Direction::Right))
        }
        KeyCode::Enter => Some(GameInput::Confirm),
        KeyCode::Esc | KeyCode::Char('q' | 'Q') => Some(GameInput::Quit),
        _ => None,
    }
}
