use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::game::FrameSnapshot;

const SEPARATOR: &str = " │ ";

/// Renders the one-line HUD above the board and returns the area below it.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, snapshot: &FrameSnapshot) -> Rect {
    let [hud_area, play_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

    frame.render_widget(
        Paragraph::new(info_line(
            snapshot.score,
            snapshot.snake.len(),
            usize::from(hud_area.width),
        ))
        .alignment(Alignment::Left)
        .style(Style::default().fg(Color::DarkGray)),
        hud_area,
    );

    play_area
}

fn info_line(score: i32, length: usize, available_width: usize) -> Line<'static> {
    let compact = info_width(score, length, false) > available_width;
    let score_label = if compact { "S" } else { "Your Score" };
    let length_label = if compact { "L" } else { "Length" };
    let value_style = Style::default().fg(Color::White);

    Line::from(vec![
        Span::raw(format!("{score_label}: ")),
        Span::styled(score.to_string(), value_style),
        Span::raw(SEPARATOR),
        Span::raw(format!("{length_label}: ")),
        Span::styled(length.to_string(), value_style),
    ])
}

fn info_width(score: i32, length: usize, compact: bool) -> usize {
    let score_label = if compact { "S" } else { "Your Score" };
    let length_label = if compact { "L" } else { "Length" };

    format!("{score_label}: {score}").width()
        + SEPARATOR.width()
        + format!("{length_label}: {length}").width()
}

#[cfg(test)]
mod tests {
    use super::{info_line, info_width};

    #[test]
    fn separator_counts_as_one_column() {
        // "Your Score: 12" + " │ " + "Length: 3"
        assert_eq!(info_width(12, 3, false), 14 + 3 + 9);
    }

    #[test]
    fn narrow_hud_switches_to_compact_labels() {
        let wide: String = info_line(-5, 4, 80)
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect();
        let narrow: String = info_line(-5, 4, 10)
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect();

        assert_eq!(wide, "Your Score: -5 │ Length: 4");
        assert_eq!(narrow, "S: -5 │ L: 4");
    }
}
