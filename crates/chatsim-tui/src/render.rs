//! Pure view functions for the TUI.
//!
//! Everything here takes `&AppState` and draws into a ratatui frame. No
//! mutations, no effects.

use chatsim_core::content::Behaviour;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::features::{chat, navigation, statusline};
use crate::state::AppState;

/// Height of the status line at the bottom.
const STATUS_HEIGHT: u16 = 1;

/// Height of the navigation bar when shown.
const NAVIGATION_HEIGHT: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub chat: Rect,
    pub navigation: Rect,
    pub status: Rect,
}

/// Splits the screen: chat on top (sized per behaviour), the navigation bar
/// right below it, the status line on the last row.
pub fn layout(area: Rect, behaviour: &Behaviour, navigation_visible: bool) -> AppLayout {
    let navigation_height = if navigation_visible {
        NAVIGATION_HEIGHT
    } else {
        0
    };
    let available = area
        .height
        .saturating_sub(STATUS_HEIGHT + navigation_height);
    let chat_rows = behaviour.chat_rows(available);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(chat_rows),
            Constraint::Length(navigation_height),
            Constraint::Min(0),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(area);

    AppLayout {
        chat: chunks[0],
        navigation: chunks[1],
        status: chunks[3],
    }
}

pub fn render(app: &AppState, frame: &mut Frame) {
    let dictionary = app.playback.dictionary();
    let areas = layout(frame.area(), &app.behaviour, app.navigation.is_visible());

    chat::render_chat(
        frame,
        areas.chat,
        app.playback.units(),
        app.playback.now(),
        &app.chat,
        &dictionary.get("l10n.noMessages"),
    );

    navigation::render_navigation_bar(frame, areas.navigation, &app.navigation, dictionary);

    let ended = app
        .playback
        .has_ended()
        .then(|| dictionary.get("l10n.ended"));
    let progress =
        statusline::progress_label(app.revealed_count(), app.playback.len(), ended.as_deref());
    statusline::render_status_line(frame, areas.status, &app.status, &progress);
}
