//! Chat transcript rendering.
//!
//! Each visible unit becomes a bubble: an optional author line, then either
//! the typing indicator or the wrapped message text, followed by a blank
//! separator line. Left-origin bubbles hug the left edge, right-origin ones
//! the right edge.

use std::time::Duration;

use chatsim_core::color::{self, Rgb};
use chatsim_core::core::reveal::{RevealUnit, VisualState};
use chatsim_core::message::Origin;
use chatsim_core::timing::TYPING_DOTS;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use super::state::ChatState;
use crate::common::Scrollbar;
use crate::common::text::{sanitize_for_display, wrap_words};

/// How long each typing dot stays highlighted.
pub const TYPING_FRAME: Duration = Duration::from_millis(300);

/// Horizontal margin around the chat.
pub const CHAT_MARGIN: u16 = 1;

const SCROLLBAR_WIDTH: u16 = 1;
const MIN_BUBBLE_WIDTH: usize = 12;
const TYPING_DOT: &str = "•";

/// Width available to bubbles inside a chat area of `area_width` columns.
pub fn content_width(area_width: u16) -> usize {
    area_width.saturating_sub(CHAT_MARGIN * 2 + SCROLLBAR_WIDTH) as usize
}

/// Widest a bubble may get, padding included.
pub fn max_bubble_width(content_width: usize) -> usize {
    (content_width * 3 / 4)
        .max(MIN_BUBBLE_WIDTH)
        .min(content_width)
}

/// Index of the highlighted typing dot `elapsed` after typing started.
pub fn typing_frame(elapsed: Duration) -> usize {
    (elapsed.as_millis() / TYPING_FRAME.as_millis()) as usize % TYPING_DOTS
}

/// Author names are drawn in a tint of the bubble color that stays readable
/// on the bubble itself.
fn author_style(background: Rgb) -> Style {
    let tint =
        color::accessible_contrast_color(background, color::TINT_ATTEMPTS, color::TINT_STEP);
    Style::default()
        .bg(to_color(background))
        .fg(to_color(tint))
        .add_modifier(Modifier::BOLD)
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

fn aligned(line: Line<'static>, origin: Origin) -> Line<'static> {
    match origin {
        Origin::Left => line.alignment(Alignment::Left),
        Origin::Right => line.alignment(Alignment::Right),
    }
}

/// Builds every line of the transcript for the given width.
pub fn chat_lines(units: &[RevealUnit], now: Duration, content_width: usize) -> Vec<Line<'static>> {
    let bubble_width = max_bubble_width(content_width);
    let mut lines = Vec::new();
    for unit in units.iter().filter(|unit| unit.is_visible()) {
        lines.extend(unit_lines(unit, now, bubble_width));
        lines.push(Line::default());
    }
    lines
}

fn unit_lines(unit: &RevealUnit, now: Duration, bubble_width: usize) -> Vec<Line<'static>> {
    let message = unit.message();
    let bubble = Style::default()
        .bg(to_color(message.background_color))
        .fg(to_color(message.text_color));
    let mut lines = Vec::new();

    if let Some(name) = message.user_name.as_deref() {
        let author = Span::styled(name.to_string(), author_style(message.background_color));
        lines.push(aligned(Line::from(author), message.origin));
    }

    match unit.state() {
        VisualState::Hidden => {}
        VisualState::TypingAnimation => {
            let elapsed = unit
                .typing_started_at()
                .map_or(Duration::ZERO, |started| now.saturating_sub(started));
            let highlighted = typing_frame(elapsed);
            let mut spans = vec![Span::styled(" ", bubble)];
            for dot in 0..TYPING_DOTS {
                let style = if dot == highlighted {
                    bubble.add_modifier(Modifier::BOLD)
                } else {
                    bubble.add_modifier(Modifier::DIM)
                };
                spans.push(Span::styled(TYPING_DOT, style));
                spans.push(Span::styled(" ", bubble));
            }
            lines.push(aligned(Line::from(spans), message.origin));
        }
        VisualState::Revealed => {
            let text = sanitize_for_display(unit.shown_text());
            let wrapped = wrap_words(&text, bubble_width.saturating_sub(2));
            let inner = wrapped.iter().map(|line| line.width()).max().unwrap_or(0);
            for line in wrapped {
                let padding = inner - line.width();
                let padded = format!(" {line}{} ", " ".repeat(padding));
                lines.push(aligned(
                    Line::from(Span::styled(padded, bubble)),
                    message.origin,
                ));
            }
        }
    }

    lines
}

/// Draws the transcript (or the empty notice) into `area`.
pub fn render_chat(
    frame: &mut Frame,
    area: Rect,
    units: &[RevealUnit],
    now: Duration,
    chat: &ChatState,
    empty_notice: &str,
) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    if units.is_empty() {
        let notice = Paragraph::new(Line::from(Span::styled(
            empty_notice.to_string(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )))
        .alignment(Alignment::Center);
        let row = Rect {
            y: area.y + area.height / 2,
            height: 1,
            ..area
        };
        frame.render_widget(notice, row);
        return;
    }

    let width = content_width(area.width);
    let height = area.height as usize;
    let all_lines = chat_lines(units, now, width);
    let total = all_lines.len();
    let offset = chat.scroll.offset_for(total, height);

    let mut visible: Vec<Line<'static>> =
        all_lines.into_iter().skip(offset).take(height).collect();
    if visible.len() < height {
        let mut padded = vec![Line::default(); height - visible.len()];
        padded.append(&mut visible);
        visible = padded;
    }

    let text_area = Rect {
        x: area.x + CHAT_MARGIN,
        width: width as u16,
        ..area
    };
    frame.render_widget(Paragraph::new(visible), text_area);
    frame.render_widget(
        Scrollbar::new(total, height, offset).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
