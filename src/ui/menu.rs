use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::collision::Collision;

/// Draws the game-over screen as a centered popup.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    score: i32,
    high_score: u32,
    collision: Option<Collision>,
) {
    let popup = centered_popup(area, 80, 60);
    frame.render_widget(Clear, popup);

    let beat_record = i64::from(score) >= i64::from(high_score) && score > 0;
    let score_color = if beat_record { Color::Green } else { Color::Red };

    let lines = vec![
        Line::from("GAME OVER").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from(format!("Your score is: {score}")).style(Style::default().fg(score_color)),
        Line::from(format!("High score is: {high_score}")),
        Line::from(collision.map_or("", Collision::describe)),
        Line::from(""),
        Line::from("[Enter] Try again"),
        Line::from("[Esc] Exit"),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" game over ")),
        popup,
    );
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
