use std::collections::VecDeque;

use crate::input::{direction_change_is_valid, Direction};

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring cell one step in `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Snake body, heading and length target.
///
/// The body is stored tail first: the head is always the back of the deque,
/// so a move is one `push_back` plus at most one `pop_front`.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    heading: Direction,
    target_length: usize,
    turned_this_tick: bool,
    trimmed_tail: Option<Position>,
}

// Never empty: the head always exists.
#[allow(clippy::len_without_is_empty)]
impl Snake {
    /// Creates a one-cell snake at `start` heading in `heading`.
    #[must_use]
    pub fn new(start: Position, heading: Direction) -> Self {
        let mut body = VecDeque::new();
        body.push_back(start);

        Self {
            body,
            heading,
            target_length: 1,
            turned_this_tick: false,
            trimmed_tail: None,
        }
    }

    /// Creates a snake from explicit segments ordered tail to head.
    ///
    /// The length target equals the segment count. An empty list yields a
    /// one-cell snake at the origin.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, heading: Direction) -> Self {
        if segments.is_empty() {
            return Self::new(Position::new(0, 0), heading);
        }

        let target_length = segments.len();
        Self {
            body: VecDeque::from(segments),
            heading,
            target_length,
            turned_this_tick: false,
            trimmed_tail: None,
        }
    }

    /// Requests a heading change.
    ///
    /// Only the first request between two moves is considered, and a request
    /// for the exact opposite of the current heading is dropped. Returns
    /// whether the heading changed.
    pub fn turn(&mut self, intent: Direction) -> bool {
        if self.turned_this_tick {
            return false;
        }
        self.turned_this_tick = true;

        if !direction_change_is_valid(self.heading, intent) {
            return false;
        }

        let changed = self.heading != intent;
        self.heading = intent;
        changed
    }

    /// Moves one cell along the heading, trimming the tail beyond the length
    /// target. Returns the new head.
    pub fn advance(&mut self) -> Position {
        let next_head = self.head().step(self.heading);

        self.body.push_back(next_head);
        self.trimmed_tail = if self.body.len() > self.target_length {
            self.body.pop_front()
        } else {
            None
        };
        self.turned_this_tick = false;

        next_head
    }

    /// Adjusts the length target by `by`, never going below one cell.
    ///
    /// The body itself catches up on the following moves.
    pub fn grow(&mut self, by: i32) {
        let current = i64::try_from(self.target_length).unwrap_or(i64::MAX);
        let next = current.saturating_add(i64::from(by)).max(1);
        self.target_length = usize::try_from(next).unwrap_or(usize::MAX);
    }

    /// Returns true if the head landed on a cell the body occupied before the
    /// last move, the cell vacated by that move's tail trim included.
    #[must_use]
    pub fn self_collides(&self) -> bool {
        let head = self.head();
        let hits_body = self
            .body
            .iter()
            .take(self.body.len().saturating_sub(1))
            .any(|segment| *segment == head);

        hits_body || self.trimmed_tail == Some(head)
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        // The body is created non-empty and `advance` pushes before it pops.
        self.body.back().copied().unwrap_or(Position::new(0, 0))
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    pub fn target_length(&self) -> usize {
        self.target_length
    }

    #[must_use]
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Iterates over body segments from tail to head.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}
