//! Grid snake: a snake grows on nourishing food, loses score on harmful food,
//! and dies on walls or its own body.
//!
//! The game core (`snake`, `food`, `collision`, `score`, `game`) is free of
//! terminal I/O; `app` drives sessions, and `renderer`/`ui` draw snapshots
//! with ratatui.

pub mod app;
pub mod collision;
pub mod config;
pub mod food;
pub mod game;
pub mod input;
pub mod logging;
pub mod renderer;
pub mod score;
pub mod settings;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
