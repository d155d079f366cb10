//! Navigation bar rendering.

use chatsim_core::dictionary::Dictionary;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::state::{Button, ButtonId, NavigationState};

/// Visible label of a button, taken from the dictionary.
pub fn button_label(button: &Button, dictionary: &Dictionary) -> String {
    match button.id {
        ButtonId::Step => format!("⏭ {}", dictionary.get("a11y.step")),
        ButtonId::Autoplay if button.is_active() => format!("⏸ {}", dictionary.get("a11y.pause")),
        ButtonId::Autoplay => format!("▶ {}", dictionary.get("a11y.play")),
    }
}

pub fn render_navigation_bar(
    frame: &mut Frame,
    area: Rect,
    nav: &NavigationState,
    dictionary: &Dictionary,
) {
    if !nav.is_visible() || area.height == 0 {
        return;
    }

    let mut spans = Vec::with_capacity(nav.buttons().len() * 2);
    for (index, button) in nav.buttons().iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw("  "));
        }
        let mut style = if button.enabled {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        if index == nav.focused_index() {
            style = style.add_modifier(Modifier::REVERSED);
        }
        if button.is_active() {
            style = style.add_modifier(Modifier::BOLD);
        }
        spans.push(Span::styled(
            format!(" {} ", button_label(button, dictionary)),
            style,
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
