use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{Grid, MILESTONE_MIN_SCORE, MILESTONE_STEP, REGULAR_HARMFUL_STEP};
use crate::snake::Position;

/// Effect class of a food item.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum FoodKind {
    /// Grants score and growth.
    Nourishing,
    /// Costs score, never length.
    Harmful,
}

/// Food entity on the board. Lives until the head reaches it.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct FoodItem {
    pub position: Position,
    pub kind: FoodKind,
}

impl FoodItem {
    #[must_use]
    pub fn nourishing(position: Position) -> Self {
        Self {
            position,
            kind: FoodKind::Nourishing,
        }
    }

    #[must_use]
    pub fn harmful(position: Position) -> Self {
        Self {
            position,
            kind: FoodKind::Harmful,
        }
    }
}

/// How spawn positions relate to cells that are already taken.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum SpawnPolicy {
    /// Uniform over the whole grid; food may land under the snake or on
    /// other food.
    #[default]
    Anywhere,
    /// Uniform over free cells, falling back to `Anywhere` on a full board.
    AvoidOccupied,
}

/// Source of randomized, grid-aligned food positions.
#[derive(Debug, Clone)]
pub struct FoodSpawner {
    rng: StdRng,
    policy: SpawnPolicy,
}

impl FoodSpawner {
    /// Creates a spawner seeded from OS entropy.
    #[must_use]
    pub fn new(policy: SpawnPolicy) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            policy,
        }
    }

    /// Creates a deterministic spawner for tests and reproducible runs.
    #[must_use]
    pub fn with_seed(policy: SpawnPolicy, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            policy,
        }
    }

    /// Returns a random cell on `grid`. `excluded` only matters under
    /// [`SpawnPolicy::AvoidOccupied`].
    pub fn spawn_random(&mut self, grid: Grid, excluded: &HashSet<Position>) -> Position {
        match self.policy {
            SpawnPolicy::Anywhere => random_cell(&mut self.rng, grid),
            SpawnPolicy::AvoidOccupied => free_cell(&mut self.rng, grid, excluded)
                .unwrap_or_else(|| random_cell(&mut self.rng, grid)),
        }
    }
}

fn random_cell<R: Rng + ?Sized>(rng: &mut R, grid: Grid) -> Position {
    Position {
        x: rng.gen_range(0..i32::from(grid.width.max(1))),
        y: rng.gen_range(0..i32::from(grid.height.max(1))),
    }
}

fn free_cell<R: Rng + ?Sized>(
    rng: &mut R,
    grid: Grid,
    excluded: &HashSet<Position>,
) -> Option<Position> {
    let mut candidates = Vec::new();

    for y in 0..i32::from(grid.height) {
        for x in 0..i32::from(grid.width) {
            let position = Position { x, y };
            if !excluded.contains(&position) {
                candidates.push(position);
            }
        }
    }

    if candidates.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}

/// Number of harmful items to spawn after nourishing food lifts the score to
/// `score`.
///
/// Milestones (multiples of ten from fifteen up) bump `counter` and spawn the
/// bumped value, so waves grow with every milestone. Other multiples of five
/// spawn a single item. Scores are taken modulo as non-negative residues.
pub fn harmful_spawn_count(score: i32, counter: &mut u32) -> u32 {
    if score >= MILESTONE_MIN_SCORE && score.rem_euclid(MILESTONE_STEP) == 0 {
        *counter += 1;
        *counter
    } else if score.rem_euclid(REGULAR_HARMFUL_STEP) == 0 {
        1
    } else {
        0
    }
}

/// Live food on the board plus the harmful spawn-rate state.
#[derive(Debug, Clone, Default)]
pub struct FoodSet {
    nourishing: Vec<Position>,
    harmful: Vec<Position>,
    harmful_spawn_counter: u32,
}

impl FoodSet {
    /// Creates the session-start food state: one nourishing item, no harmful
    /// items, counter at zero.
    pub fn initial(grid: Grid, spawner: &mut FoodSpawner, occupied: &HashSet<Position>) -> Self {
        let mut food = Self::default();
        let position = spawner.spawn_random(grid, occupied);
        food.nourishing.push(position);
        food
    }

    /// Places an item directly.
    pub fn insert(&mut self, item: FoodItem) {
        match item.kind {
            FoodKind::Nourishing => self.nourishing.push(item.position),
            FoodKind::Harmful => self.harmful.push(item.position),
        }
    }

    /// Removes every item, keeping the spawn counter.
    pub fn clear(&mut self) {
        self.nourishing.clear();
        self.harmful.clear();
    }

    /// Removes one item at `position` and returns its kind.
    ///
    /// Harmful food is matched before nourishing food when both share a cell.
    pub fn consume(&mut self, position: Position) -> Option<FoodKind> {
        if let Some(index) = self.harmful.iter().position(|cell| *cell == position) {
            self.harmful.remove(index);
            return Some(FoodKind::Harmful);
        }

        if let Some(index) = self.nourishing.iter().position(|cell| *cell == position) {
            self.nourishing.remove(index);
            return Some(FoodKind::Nourishing);
        }

        None
    }

    /// Follow-up to eating nourishing food: refills the nourishing slot when
    /// it ran empty, then applies the harmful spawn policy for `score`.
    ///
    /// `occupied` should hold the snake cells; food cells are added here.
    /// Returns the number of harmful items spawned.
    pub fn replenish(
        &mut self,
        score: i32,
        grid: Grid,
        spawner: &mut FoodSpawner,
        mut occupied: HashSet<Position>,
    ) -> u32 {
        occupied.extend(self.cells());

        if self.nourishing.is_empty() {
            let position = spawner.spawn_random(grid, &occupied);
            occupied.insert(position);
            self.nourishing.push(position);
        }

        let wave = harmful_spawn_count(score, &mut self.harmful_spawn_counter);
        for _ in 0..wave {
            let position = spawner.spawn_random(grid, &occupied);
            occupied.insert(position);
            self.harmful.push(position);
        }

        wave
    }

    /// Nourishing food cells in spawn order.
    #[must_use]
    pub fn nourishing(&self) -> &[Position] {
        &self.nourishing
    }

    /// Harmful food cells in spawn order.
    #[must_use]
    pub fn harmful(&self) -> &[Position] {
        &self.harmful
    }

    #[must_use]
    pub fn harmful_spawn_counter(&self) -> u32 {
        self.harmful_spawn_counter
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nourishing.is_empty() && self.harmful.is_empty()
    }

    fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.nourishing.iter().chain(self.harmful.iter()).copied()
    }
}
