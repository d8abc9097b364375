use std::collections::HashSet;
use std::time::Duration;

use log::{debug, info};

use crate::collision::{self, Collision};
use crate::config::{Grid, BASE_TICKS_PER_SECOND};
use crate::food::{FoodKind, FoodSet, FoodSpawner, SpawnPolicy};
use crate::input::Direction;
use crate::score::ScoreTracker;
use crate::snake::{Position, Snake};

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// Food eaten during one tick.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Meal {
    pub nourishing: u32,
    pub harmful: u32,
    pub harmful_spawned: u32,
}

/// What one call to [`GameSession::advance`] did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickOutcome {
    /// The session is over; nothing moved.
    Skipped,
    /// The snake moved and survived.
    Moved(Meal),
    /// The move ended the session.
    Ended(Collision),
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSnapshot {
    /// Snake cells from tail to head.
    pub snake: Vec<Position>,
    pub nourishing: Vec<Position>,
    pub harmful: Vec<Position>,
    pub score: i32,
    pub status: GameStatus,
    /// Only present once the session is over.
    pub high_score: Option<u32>,
    pub collision: Option<Collision>,
    pub grid: Grid,
}

/// Complete mutable state for one play-through.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub snake: Snake,
    pub food: FoodSet,
    pub score: ScoreTracker,
    pub status: GameStatus,
    pub collision: Option<Collision>,
    pub ticks_per_second: u32,
    pub tick_count: u64,
    base_ticks_per_second: u32,
    grid: Grid,
    spawner: FoodSpawner,
}

impl GameSession {
    /// Creates a session with entropy-seeded food placement.
    #[must_use]
    pub fn new(grid: Grid, policy: SpawnPolicy) -> Self {
        Self::with_spawner(grid, FoodSpawner::new(policy))
    }

    /// Creates a deterministic state for tests and reproducible simulations.
    #[must_use]
    pub fn new_with_seed(grid: Grid, seed: u64) -> Self {
        Self::with_spawner(grid, FoodSpawner::with_seed(SpawnPolicy::Anywhere, seed))
    }

    /// Creates a fresh session: one-cell snake at the grid center heading
    /// right, one nourishing item, score zero, base tick rate.
    #[must_use]
    pub fn with_spawner(grid: Grid, mut spawner: FoodSpawner) -> Self {
        let snake = Snake::new(grid.center(), Direction::Right);
        let occupied: HashSet<Position> = snake.segments().copied().collect();
        let food = FoodSet::initial(grid, &mut spawner, &occupied);

        Self {
            snake,
            food,
            score: ScoreTracker::new(),
            status: GameStatus::Playing,
            collision: None,
            ticks_per_second: BASE_TICKS_PER_SECOND,
            tick_count: 0,
            base_ticks_per_second: BASE_TICKS_PER_SECOND,
            grid,
            spawner,
        }
    }

    /// Discards this session and starts a new one on the same grid.
    ///
    /// The spawner state carries over so seeded runs do not replay the same food.
    pub fn restart(&mut self) {
        let base_rate = self.base_ticks_per_second;
        *self = Self::with_spawner(self.grid, self.spawner.clone()).with_tick_rate(base_rate);
    }

    /// Replaces the base tick rate, which restarts also return to.
    #[must_use]
    pub fn with_tick_rate(mut self, ticks_per_second: u32) -> Self {
        let rate = ticks_per_second.max(1);
        self.base_ticks_per_second = rate;
        self.ticks_per_second = rate;
        self
    }

    /// Forwards a directional intent to the snake while playing.
    pub fn turn(&mut self, intent: Direction) -> bool {
        if self.status != GameStatus::Playing {
            return false;
        }
        self.snake.turn(intent)
    }

    /// Advances simulation by one gameplay tick.
    pub fn advance(&mut self) -> TickOutcome {
        if self.status != GameStatus::Playing {
            return TickOutcome::Skipped;
        }

        self.tick_count += 1;
        self.snake.advance();

        let collision = collision::detect(&self.snake, self.grid);
        // An off-grid head cannot be on food.
        let meal = match collision {
            Some(Collision::Wall) => Meal::default(),
            _ => self.eat_under_head(),
        };

        if let Some(collision) = collision {
            self.status = GameStatus::GameOver;
            self.collision = Some(collision);
            info!(
                "game over: {} at tick {} with score {} and length {}",
                collision.describe(),
                self.tick_count,
                self.score.value(),
                self.snake.len()
            );
            return TickOutcome::Ended(collision);
        }

        TickOutcome::Moved(meal)
    }

    /// Builds the frame handed to the renderer. `high_score` is only exposed
    /// once the session is over.
    #[must_use]
    pub fn snapshot(&self, high_score: u32) -> FrameSnapshot {
        FrameSnapshot {
            snake: self.snake.segments().copied().collect(),
            nourishing: self.food.nourishing().to_vec(),
            harmful: self.food.harmful().to_vec(),
            score: self.score.value(),
            status: self.status,
            high_score: (self.status == GameStatus::GameOver).then_some(high_score),
            collision: self.collision,
            grid: self.grid,
        }
    }

    /// Wall-clock interval between two ticks at the current rate.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.ticks_per_second.max(1)
    }

    #[must_use]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    fn eat_under_head(&mut self) -> Meal {
        let head = self.snake.head();
        let eaten: Vec<FoodKind> = std::iter::from_fn(|| self.food.consume(head)).collect();

        let mut meal = Meal::default();
        for kind in eaten {
            match kind {
                FoodKind::Harmful => {
                    self.score.apply_harmful();
                    meal.harmful += 1;
                }
                FoodKind::Nourishing => {
                    self.score.apply_nourishing();
                    self.snake.grow(1);
                    meal.nourishing += 1;
                    meal.harmful_spawned += self.replenish_food();
                }
            }
        }

        meal
    }

    fn replenish_food(&mut self) -> u32 {
        let occupied: HashSet<Position> = self.snake.segments().copied().collect();
        let score = self.score.value();
        let spawned = self
            .food
            .replenish(score, self.grid, &mut self.spawner, occupied);

        if spawned > 0 {
            debug!(
                "score {score} spawned {spawned} harmful food (counter {}, live {})",
                self.food.harmful_spawn_counter(),
                self.food.harmful().len()
            );
        }

        spawned
    }
}
