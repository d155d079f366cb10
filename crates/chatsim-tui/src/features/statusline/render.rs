//! Status line rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use super::state::StatusLine;
use crate::common::text::truncate_with_ellipsis;

/// Shown until the first announcement.
pub const KEY_HINTS: &str = "n next · p play/pause · r restart · f skip · q quit";

/// Progress label, e.g. `3/5` or `5/5 · End of conversation`.
pub fn progress_label(revealed: usize, total: usize, ended: Option<&str>) -> String {
    match ended {
        Some(ended) => format!("{revealed}/{total} · {ended}"),
        None => format!("{revealed}/{total}"),
    }
}

pub fn render_status_line(frame: &mut Frame, area: Rect, status: &StatusLine, progress: &str) {
    if area.height == 0 {
        return;
    }

    let progress_width = (progress.width() as u16 + 1).min(area.width);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(progress_width)])
        .split(area);

    let (text, style) = match status.announcement() {
        Some(text) => (text, Style::default().fg(Color::White)),
        None => (KEY_HINTS, Style::default().fg(Color::DarkGray)),
    };
    let left = truncate_with_ellipsis(text, chunks[0].width.saturating_sub(1) as usize);
    frame.render_widget(
        Paragraph::new(Line::from(vec![Span::raw(" "), Span::styled(left, style)])),
        chunks[0],
    );

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            progress.to_string(),
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
        ))),
        chunks[1],
    );
}
