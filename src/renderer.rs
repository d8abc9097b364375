use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::Block;

use crate::config::Grid;
use crate::game::{FrameSnapshot, GameStatus};
use crate::snake::Position;
use crate::ui::hud::render_hud;
use crate::ui::menu::render_game_over_menu;

/// Terminal columns per grid cell; two columns keep cells roughly square.
const CELL_COLUMNS: u16 = 2;
const GLYPH_CELL: &str = "██";
const GLYPH_FOOD: &str = "▐▌";

const COLOR_FIELD_DARK: Color = Color::Rgb(30, 30, 30);
const COLOR_FIELD_LIGHT: Color = Color::Rgb(50, 50, 50);
const COLOR_SNAKE: Color = Color::Rgb(50, 153, 213);
const COLOR_HEAD: Color = Color::White;
const COLOR_NOURISHING: Color = Color::Rgb(0, 255, 0);
const COLOR_HARMFUL: Color = Color::Rgb(213, 50, 80);

/// Renders the full game frame from a snapshot.
pub fn render(frame: &mut Frame<'_>, snapshot: &FrameSnapshot) {
    let area = frame.area();
    let below_hud = render_hud(frame, area, snapshot);
    let play_area = board_area(below_hud, snapshot.grid);

    let block = Block::bordered().border_style(Style::new().fg(Color::DarkGray));
    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    render_field(frame, inner, snapshot.grid);
    render_cells(
        frame,
        inner,
        snapshot.grid,
        &snapshot.harmful,
        GLYPH_FOOD,
        COLOR_HARMFUL,
    );
    render_cells(
        frame,
        inner,
        snapshot.grid,
        &snapshot.nourishing,
        GLYPH_FOOD,
        COLOR_NOURISHING,
    );
    render_snake(frame, inner, snapshot);

    if snapshot.status == GameStatus::GameOver {
        render_game_over_menu(
            frame,
            play_area,
            snapshot.score,
            snapshot.high_score.unwrap_or_default(),
            snapshot.collision,
        );
    }
}

fn board_area(area: Rect, grid: Grid) -> Rect {
    let width = grid.width.saturating_mul(CELL_COLUMNS).saturating_add(2);
    let height = grid.height.saturating_add(2);

    let [column] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [board] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(column);
    board
}

fn render_field(frame: &mut Frame<'_>, inner: Rect, grid: Grid) {
    let buffer = frame.buffer_mut();
    for y in 0..i32::from(grid.height) {
        for x in 0..i32::from(grid.width) {
            let Some((column, row)) = logical_to_terminal(inner, grid, Position { x, y }) else {
                continue;
            };
            let color = if (x + y) % 2 == 0 {
                COLOR_FIELD_DARK
            } else {
                COLOR_FIELD_LIGHT
            };
            buffer.set_string(column, row, GLYPH_CELL, Style::new().fg(color));
        }
    }
}

fn render_cells(
    frame: &mut Frame<'_>,
    inner: Rect,
    grid: Grid,
    cells: &[Position],
    glyph: &str,
    color: Color,
) {
    let buffer = frame.buffer_mut();
    for cell in cells {
        let Some((x, y)) = logical_to_terminal(inner, grid, *cell) else {
            continue;
        };
        buffer.set_string(x, y, glyph, Style::new().fg(color));
    }
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, snapshot: &FrameSnapshot) {
    let Some((head, body)) = snapshot.snake.split_last() else {
        return;
    };

    render_cells(frame, inner, snapshot.grid, body, GLYPH_CELL, COLOR_SNAKE);
    render_cells(
        frame,
        inner,
        snapshot.grid,
        std::slice::from_ref(head),
        GLYPH_CELL,
        COLOR_HEAD,
    );
}

fn logical_to_terminal(inner: Rect, grid: Grid, position: Position) -> Option<(u16, u16)> {
    if !grid.contains(position) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_COLUMNS)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_COLUMNS) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
