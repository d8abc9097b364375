use grid_snake::app::{App, Control};
use grid_snake::config::Grid;
use grid_snake::food::FoodItem;
use grid_snake::game::{GameSession, GameStatus, TickOutcome};
use grid_snake::input::{Direction, GameInput};
use grid_snake::score::{FileHighScoreStore, HighScoreStore, MemoryHighScoreStore};
use grid_snake::snake::{Position, Snake};

/// Clears the board and drops one nourishing item right in front of the head.
fn feed_next_cell(session: &mut GameSession) {
    let next = session.snake.head().step(session.snake.heading());
    session.food.clear();
    session.food.insert(FoodItem::nourishing(next));
}

#[test]
fn stepwise_food_collection_and_wall_collision() {
    let mut state = GameSession::new_with_seed(Grid::new(6, 4, 30), 42);
    state.food.clear();
    state.snake = Snake::new(Position::new(1, 1), Direction::Right);
    state.food.insert(FoodItem::nourishing(Position::new(2, 1)));

    state.advance();
    assert_eq!(state.status, GameStatus::Playing);
    assert_eq!(state.score.value(), 1);
    assert_eq!(state.snake.target_length(), 2);
    assert_eq!(state.snake.head(), Position::new(2, 1));
    assert_eq!(state.food.nourishing().len(), 1);

    state.food.clear();
    state.turn(Direction::Up);
    state.advance();
    assert_eq!(state.status, GameStatus::Playing);
    assert_eq!(state.snake.head(), Position::new(2, 0));
    assert_eq!(state.snake.len(), 2);

    state.advance();
    assert_eq!(state.status, GameStatus::GameOver);
}

#[test]
fn harmful_waves_follow_score_milestones() {
    let mut state = GameSession::new_with_seed(Grid::new(80, 5, 10), 7);
    let mut waves = Vec::new();

    for _ in 0..30 {
        feed_next_cell(&mut state);
        let TickOutcome::Moved(meal) = state.advance() else {
            panic!("snake should survive a straight run");
        };
        assert_eq!(meal.nourishing, 1);
        waves.push((state.score.value(), meal.harmful_spawned));
        assert!(state.snake.len() <= state.snake.target_length());
        assert!(!state.food.nourishing().is_empty());
    }

    let spawning: Vec<_> = waves.into_iter().filter(|(_, spawned)| *spawned > 0).collect();
    assert_eq!(
        spawning,
        vec![(5, 1), (10, 1), (15, 1), (20, 1), (25, 1), (30, 2)]
    );
    assert_eq!(state.food.harmful_spawn_counter(), 2);
    assert_eq!(state.snake.target_length(), 31);
}

#[test]
fn sessions_feed_the_high_score_across_restarts() {
    let mut app = App::new(
        GameSession::new_with_seed(Grid::new(10, 10, 30), 3),
        Box::new(MemoryHighScoreStore::default()),
    );

    // First session: eat twice, then run into the right wall.
    for _ in 0..2 {
        feed_next_cell(app.session_mut());
        app.tick();
    }
    app.session_mut().food.clear();
    while app.session().status == GameStatus::Playing {
        app.tick();
    }
    assert_eq!(app.high_score(), 2);
    assert_eq!(app.snapshot().high_score, Some(2));

    // Second session scores less and leaves the record alone.
    assert_eq!(app.handle_input(GameInput::Confirm), Control::Continue);
    assert_eq!(app.session().score.value(), 0);
    assert_eq!(app.session().snake.len(), 1);
    assert_eq!(app.snapshot().high_score, None);

    feed_next_cell(app.session_mut());
    app.tick();
    app.session_mut().food.clear();
    app.handle_input(GameInput::Direction(Direction::Up));
    while app.session().status == GameStatus::Playing {
        app.tick();
    }

    assert_eq!(app.session().collision.map(|c| c.describe()), Some("hit the wall"));
    assert_eq!(app.high_score(), 2);
}

#[test]
fn file_store_keeps_maximum_across_runs() {
    let path = std::env::temp_dir()
        .join("grid-snake-integration")
        .join(format!("highscore-{}.txt", std::process::id()));
    let _ = std::fs::remove_file(&path);

    {
        let mut store = FileHighScoreStore::new(&path);
        assert_eq!(store.load().expect("absent record reads as zero"), 0);
        store.update_if_higher(8).expect("write should succeed");
        store.update_if_higher(-3).expect("write should succeed");
    }

    let mut reopened = FileHighScoreStore::new(&path);
    assert_eq!(reopened.load().expect("record should be readable"), 8);
    reopened.update_if_higher(11).expect("write should succeed");
    assert_eq!(reopened.load().expect("record should be readable"), 11);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn empty_record_is_rewritten_after_a_game() {
    let path = std::env::temp_dir()
        .join("grid-snake-integration")
        .join(format!("empty-highscore-{}.txt", std::process::id()));
    std::fs::create_dir_all(path.parent().expect("path has a parent"))
        .expect("test directory should be creatable");
    std::fs::write(&path, "").expect("test file write should succeed");

    let mut app = App::new(
        GameSession::new_with_seed(Grid::new(10, 10, 30), 5),
        Box::new(FileHighScoreStore::new(&path)),
    );
    assert_eq!(app.high_score(), 0);

    for _ in 0..3 {
        feed_next_cell(app.session_mut());
        app.tick();
    }
    app.session_mut().food.clear();
    while app.session().status == GameStatus::Playing {
        app.tick();
    }

    assert_eq!(app.high_score(), 3);
    let reopened = FileHighScoreStore::new(&path);
    assert_eq!(reopened.load().expect("record should be repaired"), 3);

    let _ = std::fs::remove_file(&path);
}
