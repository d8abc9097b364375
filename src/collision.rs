use crate::config::Grid;
use crate::snake::{Position, Snake};

/// Terminal collision signals ending a session.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Collision {
    /// Head left the grid.
    Wall,
    /// Head ran into the body.
    SelfCollision,
}

impl Collision {
    /// Short human-readable cause.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::Wall => "hit the wall",
            Self::SelfCollision => "hit yourself",
        }
    }
}

/// Boundary check for a head position.
#[must_use]
pub fn check(head: Position, grid: Grid) -> Option<Collision> {
    if grid.contains(head) {
        None
    } else {
        Some(Collision::Wall)
    }
}

/// Full collision check after a move: the wall first, then the body.
#[must_use]
pub fn detect(snake: &Snake, grid: Grid) -> Option<Collision> {
    check(snake.head(), grid).or_else(|| snake.self_collides().then_some(Collision::SelfCollision))
}
