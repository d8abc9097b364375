use crate::snake::Position;

/// Width of the playable world area in world units.
pub const DEFAULT_WORLD_WIDTH: i32 = 510;

/// Height of the playable world area in world units.
pub const DEFAULT_WORLD_HEIGHT: i32 = 510;

/// Side length of one grid cell in world units.
pub const DEFAULT_CELL_SIZE: i32 = 30;

/// Base simulation rate restored on every new session.
pub const BASE_TICKS_PER_SECOND: u32 = 7;

/// Score granted for nourishing food.
pub const NOURISHING_REWARD: i32 = 1;

/// Score removed for harmful food.
pub const HARMFUL_PENALTY: i32 = 5;

/// Lowest score at which the milestone branch of the harmful spawn policy applies.
pub const MILESTONE_MIN_SCORE: i32 = 15;

/// Milestone scores are multiples of this step.
pub const MILESTONE_STEP: i32 = 10;

/// Non-milestone scores that are multiples of this step spawn one harmful item.
pub const REGULAR_HARMFUL_STEP: i32 = 5;

/// Logical grid geometry: dimensions in cells plus the world size of one cell.
///
/// Pure geometry, no state. Positions handed around the game are always cell
/// indices; world coordinates only appear at the conversion functions below.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Grid {
    pub width: u16,
    pub height: u16,
    pub cell_size: u16,
}

impl Grid {
    /// Creates a grid of `width` x `height` cells.
    #[must_use]
    pub fn new(width: u16, height: u16, cell_size: u16) -> Self {
        Self {
            width,
            height,
            cell_size,
        }
    }

    /// Derives the cell grid covering a world area.
    ///
    /// Partial cells at the right and bottom edges are dropped.
    #[must_use]
    pub fn from_world(world_width: i32, world_height: i32, cell_size: i32) -> Self {
        let cell = cell_size.max(1);
        let to_cells = |extent: i32| u16::try_from((extent / cell).max(0)).unwrap_or(u16::MAX);

        Self {
            width: to_cells(world_width),
            height: to_cells(world_height),
            cell_size: u16::try_from(cell).unwrap_or(u16::MAX),
        }
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Returns true when `position` lies inside `[0, width) x [0, height)`.
    #[must_use]
    pub fn contains(self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < i32::from(self.width)
            && position.y < i32::from(self.height)
    }

    /// Returns the cell a fresh snake starts on.
    ///
    /// Equivalent to `round((extent - cell) / (2 * cell))` on the world area,
    /// with ties going to the even cell.
    #[must_use]
    pub fn center(self) -> Position {
        Position {
            x: center_axis(self.width),
            y: center_axis(self.height),
        }
    }

    /// Converts a cell index into the world coordinates of its top-left corner.
    #[must_use]
    pub fn to_world(self, position: Position) -> (i32, i32) {
        let cell = i32::from(self.cell_size);
        (position.x * cell, position.y * cell)
    }

    /// Converts world coordinates into the containing cell index.
    #[must_use]
    pub fn to_cell(self, world_x: i32, world_y: i32) -> Position {
        let cell = i32::from(self.cell_size.max(1));
        Position {
            x: world_x.div_euclid(cell),
            y: world_y.div_euclid(cell),
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::from_world(DEFAULT_WORLD_WIDTH, DEFAULT_WORLD_HEIGHT, DEFAULT_CELL_SIZE)
    }
}

fn center_axis(cells: u16) -> i32 {
    let span = i32::from(cells) - 1;
    if span <= 0 {
        return 0;
    }

    let floor = span / 2;
    if span % 2 == 0 || floor % 2 == 0 {
        floor
    } else {
        floor + 1
    }
}
