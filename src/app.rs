use log::{debug, info, warn};

use crate::game::{FrameSnapshot, GameSession, GameStatus, TickOutcome};
use crate::input::{GameInput, TurnLatch};
use crate::score::HighScoreStore;

/// Loop control returned by the input handler.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Control {
    Continue,
    Quit,
}

/// Drives sessions: latches input, advances ticks, and keeps the high score
/// current across restarts.
pub struct App {
    session: GameSession,
    latch: TurnLatch,
    store: Box<dyn HighScoreStore>,
    high_score: u32,
    release_events: bool,
}

impl App {
    /// Wraps `session`, reading the stored high score. A store that cannot be
    /// read counts as zero.
    #[must_use]
    pub fn new(session: GameSession, store: Box<dyn HighScoreStore>) -> Self {
        let high_score = store.load().unwrap_or_else(|error| {
            warn!("reading high score failed, starting from 0: {error}");
            0
        });

        info!(
            "session started on {}x{} grid, high score {high_score}",
            session.grid().width,
            session.grid().height
        );

        Self {
            session,
            latch: TurnLatch::default(),
            store,
            high_score,
            release_events: false,
        }
    }

    /// Declares whether key releases are reported. Without them the latch is
    /// re-armed on every tick.
    pub fn set_release_events(&mut self, enabled: bool) {
        self.release_events = enabled;
    }

    /// Applies one input event.
    pub fn handle_input(&mut self, input: GameInput) -> Control {
        if input == GameInput::Quit {
            info!("quit requested with score {}", self.session.score.value());
            return Control::Quit;
        }

        match self.session.status {
            GameStatus::GameOver => {
                if input == GameInput::Confirm {
                    self.restart();
                }
            }
            GameStatus::Playing => {
                // Any press engages the latch, even one that changes nothing.
                if !self.latch.engage() {
                    return Control::Continue;
                }
                if let GameInput::Direction(direction) = input {
                    self.session.turn(direction);
                }
            }
        }

        Control::Continue
    }

    /// Key-up: re-arms the turn latch.
    pub fn release(&mut self) {
        self.latch.release();
    }

    /// Advances the session by one tick and persists the high score when the
    /// session ends.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.release_events {
            self.latch.release();
        }

        let outcome = self.session.advance();
        match outcome {
            TickOutcome::Ended(_) => self.record_game_over(),
            TickOutcome::Moved(meal) if meal != Default::default() => {
                debug!(
                    "ate {} nourishing / {} harmful, score {}",
                    meal.nourishing,
                    meal.harmful,
                    self.session.score.value()
                );
            }
            _ => {}
        }

        outcome
    }

    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        self.session.snapshot(self.high_score)
    }

    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    fn restart(&mut self) {
        self.session.restart();
        self.latch.release();
        info!("session restarted, high score {}", self.high_score);
    }

    fn record_game_over(&mut self) {
        let score = self.session.score.value();

        match self.store.update_if_higher(score) {
            Ok(high_score) => self.high_score = high_score,
            Err(error) => {
                warn!("saving high score failed: {error}");
                if let Ok(score) = u32::try_from(score) {
                    self.high_score = self.high_score.max(score);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Grid;
    use crate::food::FoodItem;
    use crate::game::{GameSession, GameStatus, TickOutcome};
    use crate::input::{Direction, GameInput};
    use crate::score::{MemoryHighScoreStore, PersistenceError, HighScoreStore};
    use crate::snake::{Position, Snake};

    use super::{App, Control};

    struct BrokenStore;

    impl HighScoreStore for BrokenStore {
        fn load(&self) -> Result<u32, PersistenceError> {
            Err(PersistenceError::Corrupt {
                path: "broken".into(),
                contents: "x".to_owned(),
            })
        }

        fn save(&mut self, _high_score: u32) -> Result<(), PersistenceError> {
            Ok(())
        }
    }

    fn app_with_high_score(high_score: u32) -> App {
        let mut session = GameSession::new_with_seed(Grid::new(6, 6, 30), 21);
        session.food.clear();
        App::new(
            session,
            Box::new(MemoryHighScoreStore::with_high_score(high_score)),
        )
    }

    fn crash_into_wall(app: &mut App) {
        app.session_mut().snake = Snake::new(Position::new(5, 0), Direction::Right);
        assert!(matches!(app.tick(), TickOutcome::Ended(_)));
    }

    #[test]
    fn quit_is_honored_in_any_state() {
        let mut app = app_with_high_score(0);
        assert_eq!(app.handle_input(GameInput::Quit), Control::Quit);

        crash_into_wall(&mut app);
        assert_eq!(app.handle_input(GameInput::Quit), Control::Quit);
    }

    #[test]
    fn one_turn_per_press_until_release() {
        let mut app = app_with_high_score(0);
        app.set_release_events(true);

        app.handle_input(GameInput::Direction(Direction::Up));
        app.tick();
        // Still held: the second press is ignored even across a tick.
        app.handle_input(GameInput::Direction(Direction::Left));
        app.tick();
        assert_eq!(app.session().snake.heading(), Direction::Up);

        app.release();
        app.handle_input(GameInput::Direction(Direction::Left));
        assert_eq!(app.session().snake.heading(), Direction::Left);
    }

    #[test]
    fn latch_rearms_on_tick_without_release_events() {
        let mut app = app_with_high_score(0);

        app.handle_input(GameInput::Direction(Direction::Down));
        app.handle_input(GameInput::Direction(Direction::Left));
        assert_eq!(app.session().snake.heading(), Direction::Down);

        app.tick();
        app.handle_input(GameInput::Direction(Direction::Left));
        assert_eq!(app.session().snake.heading(), Direction::Left);
    }

    #[test]
    fn rejected_reversal_still_consumes_the_press() {
        let mut app = app_with_high_score(0);
        app.set_release_events(true);

        app.handle_input(GameInput::Direction(Direction::Left));
        app.handle_input(GameInput::Direction(Direction::Up));

        assert_eq!(app.session().snake.heading(), Direction::Right);
    }

    #[test]
    fn game_over_records_higher_score() {
        let mut app = app_with_high_score(3);
        for _ in 0..5 {
            app.session_mut().score.apply_nourishing();
        }

        crash_into_wall(&mut app);

        assert_eq!(app.high_score(), 5);
        assert_eq!(app.snapshot().high_score, Some(5));
    }

    #[test]
    fn game_over_keeps_higher_stored_score() {
        let mut app = app_with_high_score(30);
        app.session_mut().score.apply_harmful();

        crash_into_wall(&mut app);

        assert_eq!(app.high_score(), 30);
        assert_eq!(app.snapshot().score, -5);
    }

    #[test]
    fn confirm_restarts_only_after_game_over() {
        let mut app = app_with_high_score(0);
        app.session_mut().food.insert(FoodItem::harmful(Position::new(0, 0)));

        app.handle_input(GameInput::Confirm);
        assert_eq!(app.session().food.harmful().len(), 1);

        crash_into_wall(&mut app);
        app.handle_input(GameInput::Direction(Direction::Up));
        assert_eq!(app.session().status, GameStatus::GameOver);

        app.handle_input(GameInput::Confirm);
        assert_eq!(app.session().status, GameStatus::Playing);
        assert_eq!(app.session().score.value(), 0);
        assert!(app.session().food.harmful().is_empty());
        assert_eq!(app.session().food.nourishing().len(), 1);
    }

    #[test]
    fn unreadable_store_starts_from_zero() {
        let session = GameSession::new_with_seed(Grid::default(), 1);
        let app = App::new(session, Box::new(BrokenStore));

        assert_eq!(app.high_score(), 0);
    }
}
